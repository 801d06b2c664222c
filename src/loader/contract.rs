//! Contract shape descriptors
//!
//! A contract shape names an interface user code implements and the ordered
//! roles of its type parameters. Loaders report the concrete type argument
//! an implementation supplies for each role.

/// Role of one type parameter of a contract
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TypeParamRole {
    /// Values fed to the implementation
    Input,
    /// Value the implementation produces
    Return,
    /// Internal accumulator/state type
    Accumulator,
}

/// Statically defined shape of a generic contract
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ContractShape {
    pub name: &'static str,
    pub roles: &'static [TypeParamRole],
}

impl ContractShape {
    /// Number of type parameters
    pub fn arity(&self) -> usize {
        self.roles.len()
    }

    /// Position of a role in the type argument list
    pub fn position(&self, role: TypeParamRole) -> Option<usize> {
        self.roles.iter().position(|r| *r == role)
    }
}

/// The user-defined aggregate contract: `Aggregator<Input, Return, Accumulator>`
pub const AGGREGATOR_CONTRACT: ContractShape = ContractShape {
    name: "Aggregator",
    roles: &[
        TypeParamRole::Input,
        TypeParamRole::Return,
        TypeParamRole::Accumulator,
    ],
};

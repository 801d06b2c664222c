//! Runtime artifact loading
//!
//! User code (aggregate implementations) is reached only through the
//! [`ImplementationLoader`] trait:
//! - `load`: locate an artifact by its fully-qualified name
//! - `contract_arguments`: report the type arguments the artifact supplies
//!   for a contract shape
//!
//! [`ClassPath`] is the in-process loader; embedders with real dynamic
//! loading implement the trait themselves.

mod aggregator;
mod classpath;
mod contract;

pub use aggregator::{aggregator_arguments, Aggregator};
pub use classpath::{Artifact, ClassPath};
pub use contract::{ContractShape, TypeParamRole, AGGREGATOR_CONTRACT};

use thiserror::Error;

use crate::sql::types::RuntimeType;

/// Artifact loading errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum LoadError {
    /// No artifact is deployed under this name
    #[error("class not found: {0}")]
    ClassNotFound(String),

    /// Artifact exists but could not be linked
    #[error("linkage error in {class}: {reason}")]
    Linkage { class: String, reason: String },
}

/// Result type for loader operations
pub type LoadResult<T> = Result<T, LoadError>;

/// A loaded artifact
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImplementationHandle {
    /// Fully-qualified artifact name
    pub qualified_name: String,
    /// Deployment generation the handle was loaded from
    pub generation: u64,
}

/// Type arguments an artifact supplies for a contract, in role order
///
/// A `None` entry is a parameter the artifact leaves unbound.
pub type ContractArguments = Vec<Option<RuntimeType>>;

/// Loader for user-supplied implementations
pub trait ImplementationLoader: Send + Sync {
    /// Locate and load an artifact
    fn load(&self, qualified_name: &str) -> LoadResult<ImplementationHandle>;

    /// Type arguments `handle` supplies for `contract`
    ///
    /// `Ok(None)` means the artifact does not implement the contract.
    fn contract_arguments(
        &self,
        handle: &ImplementationHandle,
        contract: &ContractShape,
    ) -> LoadResult<Option<ContractArguments>>;
}

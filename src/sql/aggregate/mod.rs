//! Aggregate binding
//!
//! Resolves an aggregate call to its result type and the execution-time
//! wrapper that drives it:
//! - Built-in aggregates (COUNT, SUM, AVG, MIN, MAX) are typed from the operand
//! - User-defined aggregates are checked against the implementing artifact

mod builtin;
mod user;

pub use builtin::BuiltinAggregate;
pub use user::UserAggregateDefinition;

pub use crate::loader::{ContractShape, TypeParamRole, AGGREGATOR_CONTRACT};

use std::fmt;

use crate::catalog::DataType;
use crate::loader::ImplementationLoader;

use super::error::BindResult;

/// Execution-time adapter the engine instantiates for a bound aggregate
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AggregatorWrapper {
    Count,
    Sum,
    Avg,
    MaxMin,
    /// Drives any conforming user implementation through the aggregator contract
    UserDefined,
}

impl AggregatorWrapper {
    /// Name the execution engine registers the wrapper under
    pub fn name(&self) -> &'static str {
        match self {
            AggregatorWrapper::Count => "CountAggregator",
            AggregatorWrapper::Sum => "SumAggregator",
            AggregatorWrapper::Avg => "AvgAggregator",
            AggregatorWrapper::MaxMin => "MaxMinAggregator",
            AggregatorWrapper::UserDefined => "UserDefinedAggregator",
        }
    }
}

impl fmt::Display for AggregatorWrapper {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Result of binding an aggregate call
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedAggregateBinding {
    /// Type of the aggregate's result
    pub return_type: DataType,
    /// Wrapper the execution engine instantiates
    pub wrapper: AggregatorWrapper,
    /// Type the operand must be cast to before reaching the aggregate
    pub operand_cast: Option<DataType>,
}

/// An aggregate that can be bound against an operand type
pub trait AggregateDefinition {
    /// Compute the result type and wrapper for an operand of `input_type`
    fn bind(
        &self,
        loader: &dyn ImplementationLoader,
        input_type: &DataType,
    ) -> BindResult<ResolvedAggregateBinding>;
}

//! Built-in aggregates

use crate::catalog::DataType;
use crate::loader::ImplementationLoader;
use crate::sql::error::{BindResult, Diagnostic};

use super::{AggregateDefinition, AggregatorWrapper, ResolvedAggregateBinding};

/// Aggregates provided by the engine
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BuiltinAggregate {
    Count,
    Sum,
    Avg,
    Min,
    Max,
}

impl BuiltinAggregate {
    /// Parse aggregate name (case-insensitive)
    pub fn parse(name: &str) -> Option<Self> {
        match name.to_uppercase().as_str() {
            "COUNT" => Some(BuiltinAggregate::Count),
            "SUM" => Some(BuiltinAggregate::Sum),
            "AVG" => Some(BuiltinAggregate::Avg),
            "MIN" => Some(BuiltinAggregate::Min),
            "MAX" => Some(BuiltinAggregate::Max),
            _ => None,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            BuiltinAggregate::Count => "COUNT",
            BuiltinAggregate::Sum => "SUM",
            BuiltinAggregate::Avg => "AVG",
            BuiltinAggregate::Min => "MIN",
            BuiltinAggregate::Max => "MAX",
        }
    }

    fn wrapper(&self) -> AggregatorWrapper {
        match self {
            BuiltinAggregate::Count => AggregatorWrapper::Count,
            BuiltinAggregate::Sum => AggregatorWrapper::Sum,
            BuiltinAggregate::Avg => AggregatorWrapper::Avg,
            BuiltinAggregate::Min | BuiltinAggregate::Max => AggregatorWrapper::MaxMin,
        }
    }

    /// Result type for an operand of `input_type`
    pub fn result_type(&self, input_type: &DataType) -> BindResult<DataType> {
        match self {
            BuiltinAggregate::Count => Ok(DataType::BigInt),
            BuiltinAggregate::Sum if input_type.is_numeric() => Ok(input_type.clone()),
            BuiltinAggregate::Avg if input_type.is_numeric() => match input_type {
                DataType::Decimal { .. } => Ok(input_type.clone()),
                _ => Ok(DataType::Double),
            },
            BuiltinAggregate::Min | BuiltinAggregate::Max if input_type.is_orderable() => {
                Ok(input_type.clone())
            }
            _ => Err(Diagnostic::IllegalAggregateOperand {
                aggregate: self.name().to_string(),
                operand: input_type.clone(),
            }),
        }
    }
}

impl AggregateDefinition for BuiltinAggregate {
    fn bind(
        &self,
        _loader: &dyn ImplementationLoader,
        input_type: &DataType,
    ) -> BindResult<ResolvedAggregateBinding> {
        Ok(ResolvedAggregateBinding {
            return_type: self.result_type(input_type)?,
            wrapper: self.wrapper(),
            operand_cast: None,
        })
    }
}

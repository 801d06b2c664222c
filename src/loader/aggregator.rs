//! Typed contract for Rust aggregate implementations

use std::any::type_name;

use super::ContractArguments;
use crate::sql::types::{RuntimeRepr, RuntimeType};

/// A user-defined aggregate
///
/// The execution engine drives every implementation the same way: `init`
/// once per group, `accumulate` per non-null operand, `merge` to combine
/// partial results, `terminate` to produce the group's value. The
/// implementing type itself is the accumulator.
pub trait Aggregator: Send + 'static {
    type Input: RuntimeRepr;
    type Return: RuntimeRepr;

    /// Reset to the empty state
    fn init(&mut self);

    /// Fold one value into the state
    fn accumulate(&mut self, value: Self::Input);

    /// Fold another partial state into this one
    fn merge(&mut self, other: &Self);

    /// Result for the group; `None` yields SQL NULL
    fn terminate(&self) -> Option<Self::Return>;
}

/// Contract arguments derived from an [`Aggregator`]'s associated types
pub fn aggregator_arguments<A: Aggregator>() -> ContractArguments {
    vec![
        Some(A::Input::runtime_type()),
        Some(A::Return::runtime_type()),
        Some(RuntimeType::Opaque(type_name::<A>().to_string())),
    ]
}

//! SQL bind-time checks
//!
//! This module provides:
//! - `PermissionVerifier`: Admits or rejects a permission requirement
//! - `AggregateDefinition`: Binds built-in and user-defined aggregate calls
//! - `CompilerContext`: Per-statement entry point used by the compiler

pub mod aggregate;
pub mod compile;
pub mod error;
pub mod privileges;
pub mod types;
pub mod verifier;

pub use aggregate::{
    AggregateDefinition, AggregatorWrapper, BuiltinAggregate, ResolvedAggregateBinding,
    UserAggregateDefinition,
};
pub use compile::{AggregateOrigin, CompilerContext};
pub use error::{BindResult, Diagnostic};
pub use privileges::{GrantRecord, PermissionRequirement, Privilege, PUBLIC};
pub use types::{RuntimeRepr, RuntimeType};
pub use verifier::{AuthorizationConfig, PermissionVerifier};

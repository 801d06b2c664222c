//! Bind-time entry points for the statement compiler
//!
//! The compiler builds one [`CompilerContext`] per statement and calls into
//! it while binding nodes that reference routines or aggregates. Any
//! [`Diagnostic`] aborts compilation of the statement.

use crate::catalog::{DataDictionary, DataType, ObjectId, TxnContext};
use crate::loader::ImplementationLoader;

use super::aggregate::{
    AggregateDefinition, BuiltinAggregate, ResolvedAggregateBinding, UserAggregateDefinition,
};
use super::error::{BindResult, Diagnostic};
use super::privileges::PermissionRequirement;
use super::verifier::{AuthorizationConfig, PermissionVerifier};

/// Where an aggregate call resolved to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AggregateOrigin {
    Builtin(BuiltinAggregate),
    /// Alias id of a registered user-defined aggregate
    UserDefined(ObjectId),
}

/// Per-statement bind context
pub struct CompilerContext<'a> {
    txn: TxnContext,
    auth_id: String,
    dictionary: &'a dyn DataDictionary,
    loader: &'a dyn ImplementationLoader,
    config: AuthorizationConfig,
}

impl<'a> CompilerContext<'a> {
    /// Create a context with the default authorization config
    pub fn new(
        txn: TxnContext,
        auth_id: impl Into<String>,
        dictionary: &'a dyn DataDictionary,
        loader: &'a dyn ImplementationLoader,
    ) -> Self {
        Self {
            txn,
            auth_id: auth_id.into(),
            dictionary,
            loader,
            config: AuthorizationConfig::default(),
        }
    }

    /// Replace the authorization config
    #[must_use]
    pub fn with_config(mut self, config: AuthorizationConfig) -> Self {
        self.config = config;
        self
    }

    /// Authenticated identity compiling the statement
    pub fn auth_id(&self) -> &str {
        &self.auth_id
    }

    fn verifier(&self) -> PermissionVerifier<'_> {
        PermissionVerifier::new(self.dictionary, &self.config)
    }

    /// Check a requirement for the statement's identity
    pub fn check_permission(
        &self,
        requirement: &PermissionRequirement,
        for_grant: bool,
    ) -> BindResult<()> {
        self.verifier()
            .check(&self.txn, requirement, &self.auth_id, for_grant)
    }

    /// Check every requirement a statement raised
    pub fn check_permissions(&self, requirements: &[PermissionRequirement]) -> BindResult<()> {
        self.verifier()
            .check_all(&self.txn, requirements, &self.auth_id, false)
    }

    /// Bind a user-defined aggregate call
    ///
    /// EXECUTE is verified before the registration is read or the
    /// implementation is loaded, so an unauthorized identity never triggers
    /// artifact loading.
    pub fn bind_user_aggregate(
        &self,
        alias: ObjectId,
        input_type: &DataType,
    ) -> BindResult<ResolvedAggregateBinding> {
        self.check_permission(&PermissionRequirement::RoutineExecute(alias), false)?;

        let registration = self
            .dictionary
            .lookup_aggregate(&self.txn, alias)?
            .ok_or(Diagnostic::DanglingObjectReference {
                kind: "aggregate",
                id: alias.0,
            })?;

        UserAggregateDefinition::new(registration).bind(self.loader, input_type)
    }

    /// Bind an aggregate call of either origin
    pub fn bind_aggregate(
        &self,
        origin: AggregateOrigin,
        input_type: &DataType,
    ) -> BindResult<ResolvedAggregateBinding> {
        match origin {
            AggregateOrigin::Builtin(builtin) => builtin.bind(self.loader, input_type),
            AggregateOrigin::UserDefined(alias) => self.bind_user_aggregate(alias, input_type),
        }
    }
}

//! User-defined aggregate binding

use crate::catalog::{AggregateRegistration, DataType};
use crate::loader::{ImplementationLoader, LoadError, TypeParamRole, AGGREGATOR_CONTRACT};
use crate::sql::error::{BindResult, Diagnostic};
use crate::sql::types::RuntimeType;

use super::{AggregateDefinition, AggregatorWrapper, ResolvedAggregateBinding};

/// A registered user-defined aggregate
///
/// Nothing is cached: every bind reloads the implementation and repeats
/// every check, so a redeployed artifact is seen by the next statement.
#[derive(Debug, Clone)]
pub struct UserAggregateDefinition {
    registration: AggregateRegistration,
}

impl UserAggregateDefinition {
    pub fn new(registration: AggregateRegistration) -> Self {
        Self { registration }
    }

    /// The wrapped registration
    pub fn registration(&self) -> &AggregateRegistration {
        &self.registration
    }

    fn instantiation(&self, err: LoadError) -> Diagnostic {
        tracing::warn!(
            aggregate = %self.registration.name,
            schema = %self.registration.schema_name,
            class = %self.registration.implementation,
            error = %err,
            "aggregate implementation could not be loaded"
        );
        Diagnostic::ImplementationLoadFailure {
            class_name: self.registration.implementation.clone(),
            schema: self.registration.schema_name.clone(),
            name: self.registration.name.clone(),
            detail: err.to_string(),
        }
    }

    fn illegal_contract(&self) -> Diagnostic {
        Diagnostic::IllegalAggregateContract {
            schema: self.registration.schema_name.clone(),
            name: self.registration.name.clone(),
            class_name: self.registration.implementation.clone(),
        }
    }

    /// Actual input and return representations declared by the artifact
    fn contract_types(
        &self,
        loader: &dyn ImplementationLoader,
    ) -> BindResult<(RuntimeType, RuntimeType)> {
        let reg = &self.registration;

        let handle = loader
            .load(&reg.implementation)
            .map_err(|e| self.instantiation(e))?;

        let arguments = loader
            .contract_arguments(&handle, &AGGREGATOR_CONTRACT)
            .map_err(|e| self.instantiation(e))?
            .ok_or_else(|| self.illegal_contract())?;

        if arguments.len() != AGGREGATOR_CONTRACT.arity() {
            return Err(self.illegal_contract());
        }

        let argument = |role: TypeParamRole| {
            AGGREGATOR_CONTRACT
                .position(role)
                .and_then(|i| arguments[i].clone())
        };

        match (
            argument(TypeParamRole::Input),
            argument(TypeParamRole::Return),
        ) {
            (Some(input), Some(ret)) => Ok((input, ret)),
            _ => Err(self.illegal_contract()),
        }
    }
}

impl AggregateDefinition for UserAggregateDefinition {
    fn bind(
        &self,
        loader: &dyn ImplementationLoader,
        input_type: &DataType,
    ) -> BindResult<ResolvedAggregateBinding> {
        let reg = &self.registration;
        let (actual_input, actual_return) = self.contract_types(loader)?;

        let expected_input = RuntimeType::for_sql_type(&reg.input_type);
        let expected_return = RuntimeType::for_sql_type(&reg.return_type);

        // Input is checked before return so the reported mismatch is stable
        if actual_input != expected_input {
            return Err(Diagnostic::InputTypeMismatch {
                schema: reg.schema_name.clone(),
                name: reg.name.clone(),
                expected: expected_input.to_string(),
                actual: actual_input.to_string(),
            });
        }

        if actual_return != expected_return {
            return Err(Diagnostic::ReturnTypeMismatch {
                schema: reg.schema_name.clone(),
                name: reg.name.clone(),
                expected: expected_return.to_string(),
                actual: actual_return.to_string(),
            });
        }

        tracing::debug!(
            aggregate = %reg.name,
            schema = %reg.schema_name,
            class = %reg.implementation,
            return_type = %reg.return_type,
            "user aggregate bound"
        );

        Ok(ResolvedAggregateBinding {
            return_type: reg.return_type.clone(),
            wrapper: AggregatorWrapper::UserDefined,
            operand_cast: (*input_type != reg.input_type).then(|| reg.input_type.clone()),
        })
    }
}

//! Permission verification
//!
//! Decides whether one authorization id may use one object. Absence of a
//! grant, a grant without the needed privilege and any failure to resolve
//! the target all reject the statement.

use crate::catalog::{DataDictionary, ObjectId, SchemaId, TxnContext};

use super::error::{BindResult, Diagnostic};
use super::privileges::{GrantRecord, PermissionRequirement, PUBLIC};

/// Authorization settings for a database
#[derive(Debug, Clone)]
pub struct AuthorizationConfig {
    /// Database owner; admitted without consulting grants
    pub database_owner: Option<String>,

    /// Consult grants made to PUBLIC when the user's own grant does not admit
    /// Default: true
    pub honor_public_grants: bool,
}

impl Default for AuthorizationConfig {
    fn default() -> Self {
        Self {
            database_owner: None,
            honor_public_grants: true,
        }
    }
}

impl AuthorizationConfig {
    /// Config with a database owner
    pub fn with_owner(owner: impl Into<String>) -> Self {
        Self {
            database_owner: Some(owner.into()),
            ..Self::default()
        }
    }

    /// Only explicit grants to the user count
    pub fn strict() -> Self {
        Self {
            database_owner: None,
            honor_public_grants: false,
        }
    }

    fn is_owner(&self, auth_id: &str) -> bool {
        self.database_owner.as_deref() == Some(auth_id)
    }
}

/// Permission verifier
pub struct PermissionVerifier<'a> {
    dictionary: &'a dyn DataDictionary,
    config: &'a AuthorizationConfig,
}

impl<'a> PermissionVerifier<'a> {
    /// Create a new verifier
    pub fn new(dictionary: &'a dyn DataDictionary, config: &'a AuthorizationConfig) -> Self {
        Self { dictionary, config }
    }

    /// Check one requirement for `auth_id`
    ///
    /// `for_grant` only selects the diagnostic reported on denial; it never
    /// changes whether the requirement is admitted. The target is resolved
    /// for every identity, including the database owner, so a dropped
    /// target is always reported as dangling.
    pub fn check(
        &self,
        txn: &TxnContext,
        requirement: &PermissionRequirement,
        auth_id: &str,
        for_grant: bool,
    ) -> BindResult<()> {
        let result = match requirement {
            PermissionRequirement::SchemaOwn(schema) => {
                self.check_schema_owner(txn, *schema, auth_id, for_grant)
            }
            PermissionRequirement::RoutineExecute(object)
            | PermissionRequirement::RoleUsage(object)
            | PermissionRequirement::TableSelect { table: object, .. }
            | PermissionRequirement::ColumnUpdate { table: object, .. } => {
                self.check_object(txn, requirement, *object, auth_id, for_grant)
            }
        };

        match &result {
            Ok(()) => tracing::debug!(user = %auth_id, ?requirement, "permission admitted"),
            Err(e) => tracing::debug!(
                user = %auth_id,
                ?requirement,
                sql_state = e.sql_state(),
                "permission rejected"
            ),
        }
        result
    }

    /// Check requirements in order, stopping at the first rejection
    pub fn check_all(
        &self,
        txn: &TxnContext,
        requirements: &[PermissionRequirement],
        auth_id: &str,
        for_grant: bool,
    ) -> BindResult<()> {
        for requirement in requirements {
            self.check(txn, requirement, auth_id, for_grant)?;
        }
        Ok(())
    }

    fn check_object(
        &self,
        txn: &TxnContext,
        requirement: &PermissionRequirement,
        object: ObjectId,
        auth_id: &str,
        for_grant: bool,
    ) -> BindResult<()> {
        let dangling = Diagnostic::DanglingObjectReference {
            kind: requirement.target_kind(),
            id: object.0,
        };

        // An id naming an object of the wrong kind is treated as unresolved
        let descriptor = self
            .dictionary
            .resolve_object(txn, object)?
            .filter(|d| requirement.accepts(d.kind))
            .ok_or_else(|| dangling.clone())?;

        if self.config.is_owner(auth_id) {
            tracing::debug!(user = %auth_id, %object, "database owner admitted");
            return Ok(());
        }

        let privilege = requirement.privilege().ok_or(dangling)?;
        let columns = requirement.columns();
        let grants = self.applicable_grants(txn, object, auth_id)?;

        let uncovered = match columns {
            None if grants.iter().any(|g| g.covers(privilege, None)) => return Ok(()),
            None => None,
            Some(requested) => {
                let missing: Vec<String> = requested
                    .iter()
                    .filter(|c| !grants.iter().any(|g| g.covers_column(privilege, c)))
                    .cloned()
                    .collect();
                if missing.is_empty() {
                    return Ok(());
                }
                Some(missing)
            }
        };

        // Rejected: resolve the schema name for the message
        let schema = self
            .dictionary
            .resolve_schema(txn, descriptor.schema_id)?
            .ok_or(Diagnostic::DanglingObjectReference {
                kind: "schema",
                id: descriptor.schema_id.0,
            })?;

        Err(Diagnostic::PermissionDenied {
            auth_id: auth_id.to_string(),
            privilege: privilege.to_str().to_string(),
            object_type: descriptor.kind.descriptor_type().to_string(),
            schema: schema.name,
            name: Some(descriptor.name),
            columns: uncovered,
            for_grant,
        })
    }

    /// Grants on `object` that apply to `auth_id`: its own, then PUBLIC's
    fn applicable_grants(
        &self,
        txn: &TxnContext,
        object: ObjectId,
        auth_id: &str,
    ) -> BindResult<Vec<GrantRecord>> {
        let mut grants = Vec::with_capacity(2);
        grants.extend(self.dictionary.lookup_grant(txn, object, auth_id)?);

        if self.config.honor_public_grants && auth_id != PUBLIC {
            grants.extend(self.dictionary.lookup_grant(txn, object, PUBLIC)?);
        }

        // A record filed under another object is never trusted
        grants.retain(|g| g.object == object);
        Ok(grants)
    }

    fn check_schema_owner(
        &self,
        txn: &TxnContext,
        schema: SchemaId,
        auth_id: &str,
        for_grant: bool,
    ) -> BindResult<()> {
        let descriptor = self.dictionary.resolve_schema(txn, schema)?.ok_or(
            Diagnostic::DanglingObjectReference {
                kind: "schema",
                id: schema.0,
            },
        )?;

        if descriptor.owner == auth_id || self.config.is_owner(auth_id) {
            return Ok(());
        }

        Err(Diagnostic::PermissionDenied {
            auth_id: auth_id.to_string(),
            privilege: "OWNERSHIP".to_string(),
            object_type: "SCHEMA".to_string(),
            schema: descriptor.name,
            name: None,
            columns: None,
            for_grant,
        })
    }
}

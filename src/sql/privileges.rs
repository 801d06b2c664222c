//! Privilege model checked at bind time
//!
//! Implements privilege kinds and the requirements a statement raises:
//! - Routine: `EXECUTE` on a procedure, function or aggregate
//! - Table: `SELECT` on a table, optionally restricted to columns
//! - Column: `UPDATE` on specific columns of a table
//! - Schema: ownership of a schema (DDL inside it)
//! - Role: `USAGE` of a role (SET ROLE)

use std::collections::HashMap;
use std::fmt;

use crate::catalog::{ObjectId, ObjectKind, SchemaId};

/// Grantee name whose grants apply to every authorization id
pub const PUBLIC: &str = "PUBLIC";

/// Privilege types carried by grant records
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Privilege {
    /// Invoke a routine or aggregate
    Execute,
    /// Read data
    Select,
    /// Add data
    Insert,
    /// Modify data
    Update,
    /// Remove data
    Delete,
    /// Reference in a foreign key
    References,
    /// Create triggers on a table
    Trigger,
    /// Use a role
    Usage,
}

impl Privilege {
    /// Parse privilege name from string (case-insensitive)
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_uppercase().as_str() {
            "EXECUTE" => Some(Privilege::Execute),
            "SELECT" => Some(Privilege::Select),
            "INSERT" => Some(Privilege::Insert),
            "UPDATE" => Some(Privilege::Update),
            "DELETE" => Some(Privilege::Delete),
            "REFERENCES" => Some(Privilege::References),
            "TRIGGER" => Some(Privilege::Trigger),
            "USAGE" => Some(Privilege::Usage),
            _ => None,
        }
    }

    /// Convert to string representation
    pub fn to_str(&self) -> &'static str {
        match self {
            Privilege::Execute => "EXECUTE",
            Privilege::Select => "SELECT",
            Privilege::Insert => "INSERT",
            Privilege::Update => "UPDATE",
            Privilege::Delete => "DELETE",
            Privilege::References => "REFERENCES",
            Privilege::Trigger => "TRIGGER",
            Privilege::Usage => "USAGE",
        }
    }
}

impl fmt::Display for Privilege {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.to_str())
    }
}

/// A capability a statement needs before it may be bound
///
/// Requirements carry only identifiers, never resolved descriptors, so a
/// check always reads the current grant state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PermissionRequirement {
    /// EXECUTE on a routine or user-defined aggregate
    RoutineExecute(ObjectId),
    /// SELECT on a table; `None` columns means the whole row
    TableSelect {
        table: ObjectId,
        columns: Option<Vec<String>>,
    },
    /// UPDATE on specific columns
    ColumnUpdate {
        table: ObjectId,
        columns: Vec<String>,
    },
    /// Ownership of a schema
    SchemaOwn(SchemaId),
    /// USAGE of a role
    RoleUsage(ObjectId),
}

impl PermissionRequirement {
    /// EXECUTE on a routine
    pub fn routine_execute(routine: ObjectId) -> Self {
        PermissionRequirement::RoutineExecute(routine)
    }

    /// SELECT on a whole table
    pub fn table_select(table: ObjectId) -> Self {
        PermissionRequirement::TableSelect {
            table,
            columns: None,
        }
    }

    /// SELECT on some columns of a table
    pub fn column_select(table: ObjectId, columns: &[&str]) -> Self {
        PermissionRequirement::TableSelect {
            table,
            columns: Some(columns.iter().map(|c| c.to_string()).collect()),
        }
    }

    /// UPDATE on some columns of a table
    pub fn column_update(table: ObjectId, columns: &[&str]) -> Self {
        PermissionRequirement::ColumnUpdate {
            table,
            columns: columns.iter().map(|c| c.to_string()).collect(),
        }
    }

    /// Privilege the grant record must carry; `None` for ownership checks
    pub fn privilege(&self) -> Option<Privilege> {
        match self {
            PermissionRequirement::RoutineExecute(_) => Some(Privilege::Execute),
            PermissionRequirement::TableSelect { .. } => Some(Privilege::Select),
            PermissionRequirement::ColumnUpdate { .. } => Some(Privilege::Update),
            PermissionRequirement::RoleUsage(_) => Some(Privilege::Usage),
            PermissionRequirement::SchemaOwn(_) => None,
        }
    }

    /// Columns the requirement touches; `None` means the whole object
    pub fn columns(&self) -> Option<&[String]> {
        match self {
            PermissionRequirement::TableSelect { columns, .. } => columns.as_deref(),
            PermissionRequirement::ColumnUpdate { columns, .. } => Some(columns.as_slice()),
            _ => None,
        }
    }

    /// Whether an object of `kind` can be the target of this requirement
    pub fn accepts(&self, kind: ObjectKind) -> bool {
        match self {
            PermissionRequirement::RoutineExecute(_) => kind.is_routine(),
            PermissionRequirement::TableSelect { .. }
            | PermissionRequirement::ColumnUpdate { .. } => kind == ObjectKind::Table,
            PermissionRequirement::RoleUsage(_) => kind == ObjectKind::Role,
            PermissionRequirement::SchemaOwn(_) => false,
        }
    }

    /// Name of the target kind used when the target no longer resolves
    pub fn target_kind(&self) -> &'static str {
        match self {
            PermissionRequirement::RoutineExecute(_) => "routine",
            PermissionRequirement::TableSelect { .. }
            | PermissionRequirement::ColumnUpdate { .. } => "table",
            PermissionRequirement::SchemaOwn(_) => "schema",
            PermissionRequirement::RoleUsage(_) => "role",
        }
    }
}

/// Column scope of one granted privilege; `None` covers every column
pub type ColumnScope = Option<Vec<String>>;

/// A stored grant: the privileges one grantee holds on one object
///
/// Each privilege carries its own column scope, so a column-restricted
/// UPDATE stays restricted when SELECT is later granted on the whole table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GrantRecord {
    pub grantee: String,
    pub object: ObjectId,
    pub privileges: HashMap<Privilege, ColumnScope>,
    pub grantor: String,
}

impl GrantRecord {
    /// Create an object-wide grant
    pub fn new(
        grantee: impl Into<String>,
        object: ObjectId,
        privileges: Vec<Privilege>,
        grantor: impl Into<String>,
    ) -> Self {
        Self {
            grantee: grantee.into(),
            object,
            privileges: privileges.into_iter().map(|p| (p, None)).collect(),
            grantor: grantor.into(),
        }
    }

    /// Restrict every privilege of the grant to the given columns
    #[must_use]
    pub fn on_columns(mut self, columns: &[&str]) -> Self {
        let columns: Vec<String> = columns.iter().map(|c| c.to_string()).collect();
        for scope in self.privileges.values_mut() {
            *scope = Some(columns.clone());
        }
        self
    }

    /// Whether the grant carries `privilege` on any column
    pub fn holds(&self, privilege: Privilege) -> bool {
        self.privileges.contains_key(&privilege)
    }

    /// Check if this grant covers a privilege request
    ///
    /// `columns` is the set of columns the statement touches; `None` means
    /// the whole object, which only an unrestricted grant covers.
    pub fn covers(&self, privilege: Privilege, columns: Option<&[String]>) -> bool {
        match (self.privileges.get(&privilege), columns) {
            (None, _) => false,
            (Some(None), _) => true,
            (Some(Some(_)), None) => false,
            (Some(Some(granted)), Some(requested)) => {
                requested.iter().all(|c| granted.contains(c))
            }
        }
    }

    /// Check if `privilege` is granted on one column
    pub fn covers_column(&self, privilege: Privilege, column: &str) -> bool {
        match self.privileges.get(&privilege) {
            Some(None) => true,
            Some(Some(granted)) => granted.iter().any(|c| c == column),
            None => false,
        }
    }

    /// Fold another grant for the same (object, grantee) into this one
    ///
    /// Scopes are merged per privilege: an unrestricted grant of one
    /// privilege lifts only that privilege's column restriction.
    pub fn merge(&mut self, other: GrantRecord) {
        for (privilege, theirs) in other.privileges {
            let merged = match (self.privileges.remove(&privilege), theirs) {
                (None, theirs) => theirs,
                (Some(None), _) | (Some(_), None) => None,
                (Some(Some(mut mine)), Some(theirs)) => {
                    for col in theirs {
                        if !mine.contains(&col) {
                            mine.push(col);
                        }
                    }
                    Some(mine)
                }
            };
            self.privileges.insert(privilege, merged);
        }
    }

    /// Drop one privilege; returns whether the record still carries any
    pub fn revoke(&mut self, privilege: Privilege) -> bool {
        self.privileges.remove(&privilege);
        !self.privileges.is_empty()
    }
}

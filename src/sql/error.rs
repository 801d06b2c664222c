//! Bind-time diagnostics

use std::fmt;

use crate::catalog::{CatalogError, DataType};

/// Reasons a statement is rejected during bind
///
/// Every variant aborts compilation of the enclosing statement. None are
/// retried: they are deterministic in the catalog and artifact state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Diagnostic {
    /// Grant absent or missing the required privilege
    PermissionDenied {
        auth_id: String,
        privilege: String,
        object_type: String,
        schema: String,
        /// `None` when the target is the schema itself
        name: Option<String>,
        /// Requested columns no applicable grant covers
        columns: Option<Vec<String>>,
        /// Raised while checking a GRANT rather than a use of the object
        for_grant: bool,
    },

    /// Identifier no longer resolves to a live catalog object
    DanglingObjectReference { kind: &'static str, id: u64 },

    /// Implementing artifact could not be located or loaded
    ImplementationLoadFailure {
        class_name: String,
        schema: String,
        name: String,
        detail: String,
    },

    /// Artifact does not satisfy the aggregator contract shape
    IllegalAggregateContract {
        schema: String,
        name: String,
        class_name: String,
    },

    /// Artifact input type differs from the declared input type
    InputTypeMismatch {
        schema: String,
        name: String,
        expected: String,
        actual: String,
    },

    /// Artifact return type differs from the declared return type
    ReturnTypeMismatch {
        schema: String,
        name: String,
        expected: String,
        actual: String,
    },

    /// Built-in aggregate applied to an operand type it cannot process
    IllegalAggregateOperand { aggregate: String, operand: DataType },

    /// Dictionary read failed
    CatalogRead(CatalogError),
}

impl Diagnostic {
    /// SQLSTATE reported to the client
    pub fn sql_state(&self) -> &'static str {
        match self {
            Diagnostic::PermissionDenied {
                privilege,
                for_grant,
                ..
            } if privilege == "EXECUTE" => {
                if *for_grant {
                    "42505"
                } else {
                    "42504"
                }
            }
            Diagnostic::PermissionDenied {
                columns: Some(_), ..
            } => "42503",
            Diagnostic::PermissionDenied { .. } => "42502",
            Diagnostic::DanglingObjectReference { .. } => "XCZ02",
            Diagnostic::ImplementationLoadFailure { .. } => "42ZC8",
            Diagnostic::IllegalAggregateContract { .. } => "42ZC4",
            Diagnostic::InputTypeMismatch { .. } => "42ZC6",
            Diagnostic::ReturnTypeMismatch { .. } => "42ZC7",
            Diagnostic::IllegalAggregateOperand { .. } => "42Y22",
            Diagnostic::CatalogRead(_) => "58030",
        }
    }

    /// Whether the statement was rejected for lack of authorization
    pub fn is_authorization(&self) -> bool {
        matches!(self, Diagnostic::PermissionDenied { .. })
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Diagnostic::PermissionDenied {
                auth_id,
                privilege,
                object_type,
                schema,
                name,
                columns,
                for_grant,
            } => {
                if *for_grant {
                    write!(f, "User '{}' cannot grant {} permission on ", auth_id, privilege)?;
                } else {
                    write!(
                        f,
                        "User '{}' does not have {} permission on ",
                        auth_id, privilege
                    )?;
                }
                if let Some(columns) = columns {
                    let label = if columns.len() == 1 { "column" } else { "columns" };
                    let quoted: Vec<String> = columns.iter().map(|c| format!("'{}'", c)).collect();
                    write!(f, "{} {} of ", label, quoted.join(", "))?;
                }
                write!(f, "{} ", object_type)?;
                match name {
                    Some(name) => write!(f, "'{}'.'{}'", schema, name)?,
                    None => write!(f, "'{}'", schema)?,
                }
                if *for_grant {
                    write!(f, " without holding it")?;
                }
                write!(f, ".")
            }
            Diagnostic::DanglingObjectReference { kind, id } => {
                write!(f, "Internal error: invalid {} id {}", kind, id)
            }
            Diagnostic::ImplementationLoadFailure {
                class_name,
                schema,
                name,
                detail,
            } => write!(
                f,
                "Implementing class '{}' for user defined aggregate '{}'.'{}' could not be \
                 instantiated or was malformed: {}",
                class_name, schema, name, detail
            ),
            Diagnostic::IllegalAggregateContract {
                schema,
                name,
                class_name,
            } => write!(
                f,
                "User defined aggregate '{}'.'{}' is bound to external class '{}'. The type \
                 parameters of that class could not be resolved.",
                schema, name, class_name
            ),
            Diagnostic::InputTypeMismatch {
                schema,
                name,
                expected,
                actual,
            } => write!(
                f,
                "User defined aggregate '{}'.'{}' was declared to have input type '{}', \
                 but its implementation accepts '{}'",
                schema, name, expected, actual
            ),
            Diagnostic::ReturnTypeMismatch {
                schema,
                name,
                expected,
                actual,
            } => write!(
                f,
                "User defined aggregate '{}'.'{}' was declared to have return type '{}', \
                 but its implementation returns '{}'",
                schema, name, expected, actual
            ),
            Diagnostic::IllegalAggregateOperand { aggregate, operand } => {
                write!(f, "Aggregate {} cannot operate on type {}", aggregate, operand)
            }
            Diagnostic::CatalogRead(e) => write!(f, "catalog error: {}", e),
        }
    }
}

impl std::error::Error for Diagnostic {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Diagnostic::CatalogRead(e) => Some(e),
            _ => None,
        }
    }
}

impl From<CatalogError> for Diagnostic {
    fn from(e: CatalogError) -> Self {
        Diagnostic::CatalogRead(e)
    }
}

/// Result type for bind-time checks
pub type BindResult<T> = Result<T, Diagnostic>;

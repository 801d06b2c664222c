//! Catalog - Object metadata consulted at bind time
//!
//! The catalog stores schemas, routine/table/role descriptors, permission
//! grants and user-defined aggregate registrations.
//!
//! The bind layer never mutates the catalog: it only reads through the
//! [`DataDictionary`] trait. [`Catalog`] is the in-memory dictionary used by
//! embedders that keep metadata in process; share it as `RwLock<Catalog>`
//! when DDL runs concurrently with compilation.

mod dictionary;

pub use dictionary::{DataDictionary, TxnContext};

use std::collections::HashMap;
use std::fmt;

use thiserror::Error;

use crate::sql::privileges::{GrantRecord, Privilege};

/// SQL data types supported by the database
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum DataType {
    /// Boolean (true/false)
    Boolean,
    /// 8-bit signed integer
    TinyInt,
    /// 16-bit signed integer
    SmallInt,
    /// 32-bit signed integer
    Int,
    /// 64-bit signed integer
    BigInt,
    /// 32-bit floating point
    Float,
    /// 64-bit floating point
    Double,
    /// Exact numeric with precision and scale
    Decimal { precision: u8, scale: u8 },
    /// Fixed-length string
    Char(u32),
    /// Variable-length string with max length
    Varchar(u32),
    /// Unlimited text
    Text,
    /// Binary data
    Blob,
    /// Calendar date
    Date,
    /// Time of day
    Time,
    /// Timestamp (date and time)
    Timestamp,
}

impl DataType {
    /// Check if this type is numeric
    pub fn is_numeric(&self) -> bool {
        matches!(
            self,
            DataType::TinyInt
                | DataType::SmallInt
                | DataType::Int
                | DataType::BigInt
                | DataType::Float
                | DataType::Double
                | DataType::Decimal { .. }
        )
    }

    /// Check if this type is an integer
    pub fn is_integer(&self) -> bool {
        matches!(
            self,
            DataType::TinyInt | DataType::SmallInt | DataType::Int | DataType::BigInt
        )
    }

    /// Check if this type is a string type
    pub fn is_string(&self) -> bool {
        matches!(self, DataType::Char(_) | DataType::Varchar(_) | DataType::Text)
    }

    /// Check if values of this type can be ordered (MIN/MAX, ORDER BY)
    pub fn is_orderable(&self) -> bool {
        !matches!(self, DataType::Blob)
    }
}

impl fmt::Display for DataType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DataType::Boolean => write!(f, "BOOLEAN"),
            DataType::TinyInt => write!(f, "TINYINT"),
            DataType::SmallInt => write!(f, "SMALLINT"),
            DataType::Int => write!(f, "INTEGER"),
            DataType::BigInt => write!(f, "BIGINT"),
            DataType::Float => write!(f, "REAL"),
            DataType::Double => write!(f, "DOUBLE"),
            DataType::Decimal { precision, scale } => {
                write!(f, "DECIMAL({}, {})", precision, scale)
            }
            DataType::Char(n) => write!(f, "CHAR({})", n),
            DataType::Varchar(n) => write!(f, "VARCHAR({})", n),
            DataType::Text => write!(f, "TEXT"),
            DataType::Blob => write!(f, "BLOB"),
            DataType::Date => write!(f, "DATE"),
            DataType::Time => write!(f, "TIME"),
            DataType::Timestamp => write!(f, "TIMESTAMP"),
        }
    }
}

/// Opaque identifier of a catalog object (routine, table, role, aggregate)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ObjectId(pub u64);

impl fmt::Display for ObjectId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Opaque identifier of a schema
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SchemaId(pub u64);

impl fmt::Display for SchemaId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Kind of a catalog object
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ObjectKind {
    Table,
    Procedure,
    Function,
    Aggregate,
    Role,
}

impl ObjectKind {
    /// Descriptor type as shown in user-facing messages
    pub fn descriptor_type(&self) -> &'static str {
        match self {
            ObjectKind::Table => "TABLE",
            ObjectKind::Procedure => "PROCEDURE",
            ObjectKind::Function => "FUNCTION",
            ObjectKind::Aggregate => "AGGREGATE",
            ObjectKind::Role => "ROLE",
        }
    }

    /// Whether objects of this kind can be invoked (and carry EXECUTE grants)
    pub fn is_routine(&self) -> bool {
        matches!(
            self,
            ObjectKind::Procedure | ObjectKind::Function | ObjectKind::Aggregate
        )
    }
}

/// Schema metadata
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SchemaDescriptor {
    pub id: SchemaId,
    pub name: String,
    /// Authorization id owning the schema
    pub owner: String,
}

/// Object metadata
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ObjectDescriptor {
    pub id: ObjectId,
    pub schema_id: SchemaId,
    pub name: String,
    pub kind: ObjectKind,
}

/// A user-defined aggregate as registered by CREATE AGGREGATE
///
/// Registrations are immutable once created. The implementation named here
/// is re-loaded and re-validated on every bind since the artifact behind it
/// can be redeployed independently of the catalog.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AggregateRegistration {
    pub id: ObjectId,
    pub schema_name: String,
    pub name: String,
    /// Declared SQL input type (`FOR <type>`)
    pub input_type: DataType,
    /// Declared SQL return type (`RETURNS <type>`)
    pub return_type: DataType,
    /// Fully-qualified name of the implementing artifact (`EXTERNAL NAME`)
    pub implementation: String,
}

/// Catalog error
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CatalogError {
    /// Schema already exists
    #[error("Schema '{0}' already exists")]
    SchemaExists(String),

    /// Schema not found
    #[error("Schema {0} not found")]
    SchemaNotFound(SchemaId),

    /// Object with the same name already exists in the schema
    #[error("Object '{schema}'.'{name}' already exists")]
    ObjectExists { schema: String, name: String },

    /// Object not found
    #[error("Object {0} not found")]
    ObjectNotFound(ObjectId),

    /// Dictionary could not be read (storage unavailable, lock timeout, ...)
    #[error("Dictionary read failed: {0}")]
    ReadFailed(String),
}

/// Result type for catalog operations
pub type CatalogResult<T> = Result<T, CatalogError>;

/// In-memory data dictionary
#[derive(Debug, Default)]
pub struct Catalog {
    /// Schemas by id
    schemas: HashMap<SchemaId, SchemaDescriptor>,
    /// Objects by id
    objects: HashMap<ObjectId, ObjectDescriptor>,
    /// Grants keyed by (object, grantee)
    grants: HashMap<(ObjectId, String), GrantRecord>,
    /// Aggregate registrations by alias id
    aggregates: HashMap<ObjectId, AggregateRegistration>,
    /// Last allocated id (schemas and objects share one sequence)
    last_id: u64,
}

impl Catalog {
    /// Create a new empty catalog
    pub fn new() -> Self {
        Self::default()
    }

    fn next_id(&mut self) -> u64 {
        self.last_id += 1;
        self.last_id
    }

    /// Create a schema owned by `owner`
    pub fn create_schema(
        &mut self,
        name: impl Into<String>,
        owner: impl Into<String>,
    ) -> CatalogResult<SchemaId> {
        let name = name.into();
        if self.schema_by_name(&name).is_some() {
            return Err(CatalogError::SchemaExists(name));
        }
        let id = SchemaId(self.next_id());
        self.schemas.insert(
            id,
            SchemaDescriptor {
                id,
                name,
                owner: owner.into(),
            },
        );
        Ok(id)
    }

    /// Drop a schema (objects inside it are left dangling)
    pub fn drop_schema(&mut self, id: SchemaId) -> CatalogResult<()> {
        self.schemas
            .remove(&id)
            .map(|_| ())
            .ok_or(CatalogError::SchemaNotFound(id))
    }

    /// Look up a schema by name
    pub fn schema_by_name(&self, name: &str) -> Option<&SchemaDescriptor> {
        self.schemas.values().find(|s| s.name == name)
    }

    /// Create an object in a schema
    pub fn create_object(
        &mut self,
        schema_id: SchemaId,
        name: impl Into<String>,
        kind: ObjectKind,
    ) -> CatalogResult<ObjectId> {
        let name = name.into();
        let schema = self
            .schemas
            .get(&schema_id)
            .ok_or(CatalogError::SchemaNotFound(schema_id))?;
        if self
            .objects
            .values()
            .any(|o| o.schema_id == schema_id && o.name == name)
        {
            return Err(CatalogError::ObjectExists {
                schema: schema.name.clone(),
                name,
            });
        }
        let id = ObjectId(self.next_id());
        self.objects.insert(
            id,
            ObjectDescriptor {
                id,
                schema_id,
                name,
                kind,
            },
        );
        Ok(id)
    }

    /// Register a user-defined aggregate (CREATE AGGREGATE)
    pub fn create_aggregate(
        &mut self,
        schema_id: SchemaId,
        name: impl Into<String>,
        input_type: DataType,
        return_type: DataType,
        implementation: impl Into<String>,
    ) -> CatalogResult<ObjectId> {
        let name = name.into();
        let id = self.create_object(schema_id, name.clone(), ObjectKind::Aggregate)?;
        let schema_name = self
            .schemas
            .get(&schema_id)
            .map(|s| s.name.clone())
            .ok_or(CatalogError::SchemaNotFound(schema_id))?;
        self.aggregates.insert(
            id,
            AggregateRegistration {
                id,
                schema_name,
                name,
                input_type,
                return_type,
                implementation: implementation.into(),
            },
        );
        Ok(id)
    }

    /// Drop an object together with its grants and registration
    pub fn drop_object(&mut self, id: ObjectId) -> CatalogResult<()> {
        if self.objects.remove(&id).is_none() {
            return Err(CatalogError::ObjectNotFound(id));
        }
        self.grants.retain(|(object, _), _| *object != id);
        self.aggregates.remove(&id);
        Ok(())
    }

    /// Get an object descriptor
    pub fn get_object(&self, id: ObjectId) -> Option<&ObjectDescriptor> {
        self.objects.get(&id)
    }

    /// Grant privileges; merges with an existing record for the same grantee
    pub fn grant(&mut self, record: GrantRecord) -> CatalogResult<()> {
        if !self.objects.contains_key(&record.object) {
            return Err(CatalogError::ObjectNotFound(record.object));
        }
        let key = (record.object, record.grantee.clone());
        match self.grants.get_mut(&key) {
            Some(existing) => existing.merge(record),
            None => {
                self.grants.insert(key, record);
            }
        }
        Ok(())
    }

    /// Revoke one privilege; the record is removed once it carries nothing
    pub fn revoke(&mut self, object: ObjectId, grantee: &str, privilege: Privilege) {
        let key = (object, grantee.to_string());
        if let Some(record) = self.grants.get_mut(&key) {
            if !record.revoke(privilege) {
                self.grants.remove(&key);
            }
        }
    }

    /// Number of grant records currently stored
    pub fn grant_count(&self) -> usize {
        self.grants.len()
    }
}

impl DataDictionary for Catalog {
    fn lookup_grant(
        &self,
        _txn: &TxnContext,
        object: ObjectId,
        grantee: &str,
    ) -> CatalogResult<Option<GrantRecord>> {
        Ok(self.grants.get(&(object, grantee.to_string())).cloned())
    }

    fn resolve_object(
        &self,
        _txn: &TxnContext,
        object: ObjectId,
    ) -> CatalogResult<Option<ObjectDescriptor>> {
        Ok(self.objects.get(&object).cloned())
    }

    fn resolve_schema(
        &self,
        _txn: &TxnContext,
        schema: SchemaId,
    ) -> CatalogResult<Option<SchemaDescriptor>> {
        Ok(self.schemas.get(&schema).cloned())
    }

    fn lookup_aggregate(
        &self,
        _txn: &TxnContext,
        alias: ObjectId,
    ) -> CatalogResult<Option<AggregateRegistration>> {
        Ok(self.aggregates.get(&alias).cloned())
    }
}

//! SQL type to runtime representation mapping
//!
//! The execution engine hands aggregate operands to user code in these
//! representations, so the mapping here must match the engine's exactly.
//! Narrow integers widen to `i32`; all character types map to `String`.

use std::fmt;

use crate::catalog::DataType;

/// Runtime representation of a SQL value handed to user code
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum RuntimeType {
    Bool,
    Int32,
    Int64,
    Float32,
    Float64,
    Decimal,
    String,
    Bytes,
    Date,
    Time,
    Timestamp,
    /// A representation no SQL type maps to (user-defined class, `i16`, ...)
    Opaque(String),
}

impl RuntimeType {
    /// Representation the engine uses for values of `data_type`
    pub fn for_sql_type(data_type: &DataType) -> Self {
        match data_type {
            DataType::Boolean => RuntimeType::Bool,
            DataType::TinyInt | DataType::SmallInt | DataType::Int => RuntimeType::Int32,
            DataType::BigInt => RuntimeType::Int64,
            DataType::Float => RuntimeType::Float32,
            DataType::Double => RuntimeType::Float64,
            DataType::Decimal { .. } => RuntimeType::Decimal,
            DataType::Char(_) | DataType::Varchar(_) | DataType::Text => RuntimeType::String,
            DataType::Blob => RuntimeType::Bytes,
            DataType::Date => RuntimeType::Date,
            DataType::Time => RuntimeType::Time,
            DataType::Timestamp => RuntimeType::Timestamp,
        }
    }

    /// Name shown in diagnostics
    pub fn name(&self) -> &str {
        match self {
            RuntimeType::Bool => "bool",
            RuntimeType::Int32 => "i32",
            RuntimeType::Int64 => "i64",
            RuntimeType::Float32 => "f32",
            RuntimeType::Float64 => "f64",
            RuntimeType::Decimal => "Decimal",
            RuntimeType::String => "String",
            RuntimeType::Bytes => "Vec<u8>",
            RuntimeType::Date => "Date",
            RuntimeType::Time => "Time",
            RuntimeType::Timestamp => "Timestamp",
            RuntimeType::Opaque(name) => name,
        }
    }
}

impl fmt::Display for RuntimeType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Rust value types with a runtime representation
pub trait RuntimeRepr {
    fn runtime_type() -> RuntimeType;
}

impl RuntimeRepr for bool {
    fn runtime_type() -> RuntimeType {
        RuntimeType::Bool
    }
}

impl RuntimeRepr for i32 {
    fn runtime_type() -> RuntimeType {
        RuntimeType::Int32
    }
}

impl RuntimeRepr for i64 {
    fn runtime_type() -> RuntimeType {
        RuntimeType::Int64
    }
}

impl RuntimeRepr for f32 {
    fn runtime_type() -> RuntimeType {
        RuntimeType::Float32
    }
}

impl RuntimeRepr for f64 {
    fn runtime_type() -> RuntimeType {
        RuntimeType::Float64
    }
}

impl RuntimeRepr for String {
    fn runtime_type() -> RuntimeType {
        RuntimeType::String
    }
}

impl RuntimeRepr for Vec<u8> {
    fn runtime_type() -> RuntimeType {
        RuntimeType::Bytes
    }
}

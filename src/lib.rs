//! bindguard - Bind-time contract verification for a SQL compiler
//!
//! Features:
//! - Permission checks for routines, tables, columns, schemas and roles
//! - User-defined aggregate contract validation against loaded artifacts
//! - Built-in aggregate typing through the same binding interface

pub mod catalog;
pub mod loader;
pub mod sql;

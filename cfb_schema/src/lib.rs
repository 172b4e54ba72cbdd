//! Schema Model and Loading
//!
//! This crate holds the decoded reflection graph of a FlatBuffers schema
//! (objects, enums, fields and their type descriptors) and the loader that
//! reads it from JSON or YAML.

pub mod file;
pub mod types;

pub use file::{load, parse_str, LoadError, LoadResult, SchemaFormat};
pub use types::{BaseType, Enum, EnumVal, Field, Object, Schema, Type};

use std::path::PathBuf;
use thiserror::Error;

/// Result alias used across layout resolution and code generation.
pub type LayoutResult<T> = Result<T, LayoutError>;

/// Errors that abort a generation run.
#[derive(Debug, Error)]
pub enum LayoutError {
    /// A type descriptor uses a base kind the catalog cannot map.
    #[error("field '{field}' has unsupported type: {detail}")]
    UnsupportedType { field: String, detail: String },

    /// A type descriptor points outside the schema's objects or enums.
    #[error("field '{field}' references {table} index {index}, but the schema has only {len}")]
    DanglingReference {
        field: String,
        table: &'static str,
        index: usize,
        len: usize,
    },

    /// An enum field's default has no matching member.
    #[error("enum '{enum_name}' has no member with value {value} (default of field '{field}')")]
    MissingEnumValue {
        enum_name: String,
        field: String,
        value: i64,
    },

    /// Alignment was requested for a record with no fields.
    #[error("record '{record}' has no fields")]
    EmptyRecord { record: String },

    /// An enum declares no members.
    #[error("enum '{enum_name}' has no members")]
    EmptyEnum { enum_name: String },

    /// Two definitions share a leaf name inside one namespace.
    #[error("duplicate name '{name}' in namespace '{namespace}'")]
    DuplicateName { namespace: String, name: String },

    /// Struct padding was requested for a table.
    #[error("record '{record}' is a table, padding applies to structs only")]
    NotAStruct { record: String },

    /// The declared struct offset disagrees with the computed layout.
    #[error("struct '{record}' field '{field}' declares offset {declared}, layout places it at {computed}")]
    OffsetMismatch {
        record: String,
        field: String,
        declared: u64,
        computed: u64,
    },

    /// Writing the generated file failed.
    #[error("failed to write '{}': {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

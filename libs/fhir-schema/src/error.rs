//! Error types for schema loading

use thiserror::Error;

#[derive(Debug, Error)]
pub enum SchemaError {
    #[error("Catalog parse error: {0}")]
    Catalog(#[from] serde_json::Error),

    #[error("Invalid cardinality '{0}'")]
    InvalidCardinality(String),

    #[error("Unknown primitive kind '{0}'")]
    UnknownPrimitiveKind(String),

    #[error("Unknown type '{name}' referenced from {referenced_by}")]
    UnknownType { name: String, referenced_by: String },

    #[error("Type '{0}' is declared more than once")]
    DuplicateType(String),

    #[error("Field '{field}' is declared more than once on {type_name}")]
    DuplicateField { type_name: String, field: String },

    #[error("Choice field '{type_name}.{field}' cannot repeat")]
    RepeatingChoice { type_name: String, field: String },

    #[error("Choice field '{type_name}.{field}' declares no variants")]
    EmptyChoice { type_name: String, field: String },

    #[error("Field '{type_name}.{field}' declares no type")]
    MissingFieldType { type_name: String, field: String },

    #[error("'{0}' is reserved and cannot name a type")]
    ReservedTypeName(String),
}

pub type Result<T> = std::result::Result<T, SchemaError>;

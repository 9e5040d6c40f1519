use thiserror::Error;

#[derive(Debug, Error)]
pub enum FormatError {
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("XML write error: {0}")]
    Xml(#[from] quick_xml::Error),
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("UTF-8 error: {0}")]
    Utf8(#[from] std::string::FromUtf8Error),
    #[error("{type_name} has no field named {field}")]
    UnknownField { type_name: String, field: String },
    #[error("shape mismatch at {path}: expected {expected}, found {found}")]
    ShapeMismatch {
        path: String,
        expected: String,
        found: String,
    },
    #[error("unknown type: {0}")]
    UnknownType(String),
    #[error(transparent)]
    Model(#[from] tessera_models::Error),
}

impl FormatError {
    pub(crate) fn shape(
        path: impl Into<String>,
        expected: impl Into<String>,
        found: impl Into<String>,
    ) -> Self {
        Self::ShapeMismatch {
            path: path.into(),
            expected: expected.into(),
            found: found.into(),
        }
    }
}

pub type Result<T> = std::result::Result<T, FormatError>;

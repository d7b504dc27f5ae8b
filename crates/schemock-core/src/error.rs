use thiserror::Error;

/// Core error type shared across schemock crates.
#[derive(Debug, Error)]
pub enum Error {
    /// The schema tree violates structural invariants.
    #[error("invalid schema at {path}: {message}")]
    InvalidSchema { path: String, message: String },
    /// A lazy reference names no definition.
    #[error("unresolved definition: {0}")]
    UnresolvedDefinition(String),
    /// A schema document failed JSON Schema validation.
    #[error("schema document rejected: {0}")]
    Document(String),
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
}

impl Error {
    pub(crate) fn invalid(path: &str, message: impl Into<String>) -> Self {
        Error::InvalidSchema {
            path: path.to_string(),
            message: message.into(),
        }
    }
}

/// Convenience alias for results returned by schemock crates.
pub type Result<T> = std::result::Result<T, Error>;

use thiserror::Error;

/// Errors emitted by the generation engine.
///
/// Variants raised while walking a schema carry the value path where they
/// arose, e.g. `$.users[0].id`.
#[derive(Debug, Error)]
pub enum GenerationError {
    #[error("constraint conflict at {path}: {message}")]
    ConstraintConflict { path: String, message: String },
    #[error("invalid record key at {path}: {found} keys are not allowed")]
    InvalidKeyType { path: String, found: String },
    #[error("incompatible intersection at {path}: {message}")]
    IncompatibleIntersection { path: String, message: String },
    #[error("empty intersection at {path}: {message}")]
    EmptyIntersection { path: String, message: String },
    #[error("incompatible types at {path}: {message}")]
    IncompatibleTypes { path: String, message: String },
    #[error("lazy schema at {path} cannot terminate on {found}")]
    UnsupportedLazyTermination { path: String, found: String },
    #[error("unresolved reference at {path}: {name}")]
    UnresolvedReference { path: String, name: String },
    #[error("unknown transform at {path}: {id}")]
    UnknownTransform { path: String, id: String },
    #[error("invalid pattern at {path}: {message}")]
    InvalidPattern { path: String, message: String },
    #[error("invalid config: {0}")]
    InvalidConfig(String),
    #[error("unsupported at {path}: {message}")]
    Unsupported { path: String, message: String },
    #[error("logging setup failed: {0}")]
    Logging(String),
    #[error("schema error: {0}")]
    Schema(#[from] schemock_core::Error),
    #[error("toml error: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
}

impl GenerationError {
    /// Value path the error was raised at, when it has one.
    pub fn path(&self) -> Option<&str> {
        match self {
            GenerationError::ConstraintConflict { path, .. }
            | GenerationError::InvalidKeyType { path, .. }
            | GenerationError::IncompatibleIntersection { path, .. }
            | GenerationError::EmptyIntersection { path, .. }
            | GenerationError::IncompatibleTypes { path, .. }
            | GenerationError::UnsupportedLazyTermination { path, .. }
            | GenerationError::UnresolvedReference { path, .. }
            | GenerationError::UnknownTransform { path, .. }
            | GenerationError::InvalidPattern { path, .. }
            | GenerationError::Unsupported { path, .. } => Some(path.as_str()),
            _ => None,
        }
    }
}

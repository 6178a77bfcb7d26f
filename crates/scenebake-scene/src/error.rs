use std::path::PathBuf;

/// Errors that can occur while importing a scene document.
#[derive(Debug, thiserror::Error)]
pub enum ImportError {
    #[error("scene not found: {0}")]
    NotFound(PathBuf),

    #[error("I/O error reading '{0}': {1}")]
    Io(PathBuf, #[source] std::io::Error),

    #[error("failed to parse scene '{0}': {1}")]
    Parse(PathBuf, String),

    #[error("invalid scene document: {0}")]
    InvalidDocument(String),
}

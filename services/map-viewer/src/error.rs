//! Viewer error types.

use std::path::PathBuf;

use thiserror::Error;

pub type ViewerResult<T> = Result<T, ViewerError>;

/// Failures that stop a render or export.
///
/// Missing or unreadable layer files are not among them: those are
/// reported per layer and the render continues.
#[derive(Debug, Error)]
pub enum ViewerError {
    #[error("Failed to read config {}: {source}", path.display())]
    ConfigRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse config: {0}")]
    ConfigParse(#[from] serde_yaml::Error),

    #[error("Invalid config: {0}")]
    InvalidConfig(String),

    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    #[error("PNG encoding failed: {0}")]
    Encode(#[from] renderer::png::EncodeError),

    #[error("JSON serialization failed: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Failed to write {}: {source}", path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

//! Error types for raster and boundary loading.

use std::path::{Path, PathBuf};
use thiserror::Error;

/// Boxed underlying cause carried by [`MapError::ReadError`].
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Result type alias using MapError.
pub type MapResult<T> = Result<T, MapError>;

/// Failures of a single layer load.
///
/// Neither variant is fatal to a render: the caller skips the layer,
/// reports the error once and carries on with the remaining layers.
#[derive(Debug, Error)]
pub enum MapError {
    #[error("File not found: {}", .0.display())]
    NotFound(PathBuf),

    #[error("Failed to read {}: {source}", path.display())]
    ReadError {
        path: PathBuf,
        #[source]
        source: BoxError,
    },
}

impl MapError {
    /// Build a `ReadError` for `path` wrapping `cause`.
    pub fn read(path: impl AsRef<Path>, cause: impl Into<BoxError>) -> Self {
        MapError::ReadError {
            path: path.as_ref().to_path_buf(),
            source: cause.into(),
        }
    }

    /// Path of the file the error refers to.
    pub fn path(&self) -> &Path {
        match self {
            MapError::NotFound(path) => path,
            MapError::ReadError { path, .. } => path,
        }
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, MapError::NotFound(_))
    }

    /// Short machine-readable kind, used in structured log fields.
    pub fn kind(&self) -> &'static str {
        match self {
            MapError::NotFound(_) => "not_found",
            MapError::ReadError { .. } => "read_error",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::error::Error as _;

    #[test]
    fn test_read_error_keeps_cause() {
        let io = std::io::Error::new(std::io::ErrorKind::InvalidData, "bad magic");
        let err = MapError::read("maps/WSI_2019_CLASS.tif", io);

        assert_eq!(err.kind(), "read_error");
        assert_eq!(err.path(), Path::new("maps/WSI_2019_CLASS.tif"));
        assert!(err.to_string().contains("bad magic"));
        assert!(err.source().is_some());
    }

    #[test]
    fn test_not_found_message() {
        let err = MapError::NotFound(PathBuf::from("missing.tif"));
        assert!(err.is_not_found());
        assert_eq!(err.to_string(), "File not found: missing.tif");
    }
}

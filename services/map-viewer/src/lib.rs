//! Nairobi WSI/WDRI hotspot map viewer.
//!
//! Colorizes the classified scarcity and disease-risk rasters for a year,
//! overlays the ward boundaries and exports the result as a standalone
//! Leaflet HTML page.

pub mod config;
pub mod error;
pub mod html;
pub mod render;
pub mod request;

use std::path::{Path, PathBuf};

pub use config::ViewerConfig;
pub use error::{ViewerError, ViewerResult};
pub use html::MapDocument;
pub use render::{render, RenderOutcome, Severity, SkipReport, Subject};
pub use request::{Basemap, RenderRequest};

/// Write the rendered page to `path`, returning the path written.
///
/// If `path` is an existing directory the configured export file name is
/// used inside it.
pub fn export_html(
    config: &ViewerConfig,
    document: &MapDocument,
    path: &Path,
) -> ViewerResult<PathBuf> {
    let target = if path.is_dir() {
        path.join(config.export_file_name(document.year))
    } else {
        path.to_path_buf()
    };

    let html = document.to_html()?;
    std::fs::write(&target, html).map_err(|source| ViewerError::Write {
        path: target.clone(),
        source,
    })?;

    Ok(target)
}

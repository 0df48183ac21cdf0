//! Raster classification and colorization.
//!
//! Class values `1..=N` are normalized linearly onto `[0, 1]`:
//!
//! ```text
//! normalized = clip((value - 1) / (N - 1), 0, 1)
//! ```
//!
//! and looked up in the layer's color scheme, which splits `[0, 1]` into
//! `N` equal-width bins. Missing cells (no-data or NaN) get alpha 0;
//! every other cell is fully opaque.

use std::path::Path;

use geotiff_reader::{read_raster, RasterGrid};
use map_common::{GeoBounds, LayerKind, MapResult, Rgb};
use tracing::debug;

/// Opaque alpha for present cells.
pub const OPAQUE: u8 = 255;

/// An RGBA overlay, row-major, 4 bytes per pixel.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RgbaImage {
    pub width: usize,
    pub height: usize,
    pub pixels: Vec<u8>,
}

impl RgbaImage {
    /// A fully transparent image.
    pub fn transparent(width: usize, height: usize) -> Self {
        Self {
            width,
            height,
            pixels: vec![0; width * height * 4],
        }
    }

    /// The `[r, g, b, a]` pixel at `(row, col)`.
    pub fn pixel(&self, row: usize, col: usize) -> Option<[u8; 4]> {
        if row >= self.height || col >= self.width {
            return None;
        }
        let offset = (row * self.width + col) * 4;
        let p = self.pixels.get(offset..offset + 4)?;
        Some([p[0], p[1], p[2], p[3]])
    }

    /// Alpha channel in pixel order.
    pub fn alpha(&self) -> impl Iterator<Item = u8> + '_ {
        self.pixels.chunks_exact(4).map(|p| p[3])
    }

    /// Number of pixels with non-zero alpha.
    pub fn opaque_count(&self) -> usize {
        self.alpha().filter(|&a| a > 0).count()
    }

    pub fn is_fully_transparent(&self) -> bool {
        self.alpha().all(|a| a == 0)
    }
}

/// Read the raster at `path` and colorize it with `kind`'s scheme.
///
/// Returns the overlay together with the raster's bounds, unchanged from
/// its georeferencing.
pub fn colorize(path: &Path, kind: LayerKind) -> MapResult<(RgbaImage, GeoBounds)> {
    let grid = read_raster(path)?;
    let image = colorize_grid(&grid, kind);

    debug!(
        path = %path.display(),
        kind = ?kind,
        width = image.width,
        height = image.height,
        opaque = image.opaque_count(),
        "Colorized raster"
    );

    Ok((image, grid.bounds))
}

/// Colorize an in-memory grid, applying its no-data sentinel first.
pub fn colorize_grid(grid: &RasterGrid, kind: LayerKind) -> RgbaImage {
    colorize_values(&grid.masked(), grid.width, grid.height, kind)
}

/// Colorize class values where NaN marks a missing cell.
pub fn colorize_values(values: &[f64], width: usize, height: usize, kind: LayerKind) -> RgbaImage {
    let palette = kind.scheme().palette();
    let max_class = kind.max_class();
    let mut image = RgbaImage::transparent(width, height);

    if palette.is_empty() {
        return image;
    }

    // With nothing to normalize every cell takes the lowest class, transparent.
    let all_missing = values.iter().all(|v| v.is_nan());

    for (idx, &value) in values.iter().enumerate().take(width * height) {
        let missing = value.is_nan();
        let class = if all_missing || missing {
            0
        } else {
            class_index(normalize(value, max_class), palette.len())
        };

        let Rgb { r, g, b } = palette[class];
        let offset = idx * 4;
        image.pixels[offset] = r;
        image.pixels[offset + 1] = g;
        image.pixels[offset + 2] = b;
        image.pixels[offset + 3] = if missing { 0 } else { OPAQUE };
    }

    image
}

/// Map a class value onto `[0, 1]`.
pub fn normalize(value: f64, max_class: usize) -> f64 {
    if max_class <= 1 {
        return 0.0;
    }
    ((value - 1.0) / (max_class as f64 - 1.0)).clamp(0.0, 1.0)
}

/// Bin a normalized value into one of `classes` equal-width bins.
///
/// `1.0` lands in the last bin rather than one past it.
pub fn class_index(normalized: f64, classes: usize) -> usize {
    let bin = (normalized * classes as f64).floor();
    (bin.max(0.0) as usize).min(classes.saturating_sub(1))
}

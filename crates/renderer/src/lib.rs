//! Image rendering for classified raster overlays.
//!
//! - [`classify`]: class values to RGBA through a discrete color scheme
//! - [`png`]: PNG encoding of the resulting overlays

pub mod classify;
pub mod png;

pub use classify::{colorize, colorize_grid, RgbaImage};

//! Common types shared across the hotspot map crates.

pub mod bbox;
pub mod error;
pub mod layer;
pub mod style;

pub use bbox::GeoBounds;
pub use error::{MapError, MapResult};
pub use layer::{LayerId, LayerKind};
pub use style::{hex_to_rgb, ColorScheme, Rgb};

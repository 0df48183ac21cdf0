//! Path styles and tooltip settings for the boundary overlay.

use serde::Serialize;

/// Leaflet path options for a boundary polygon.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PathStyle {
    pub color: &'static str,
    pub weight: f64,
    pub fill_opacity: f64,
}

/// Thin black outline, no fill.
pub const DEFAULT_STYLE: PathStyle = PathStyle {
    color: "#000000",
    weight: 0.5,
    fill_opacity: 0.0,
};

/// Style applied while the pointer is over a feature.
pub const HIGHLIGHT_STYLE: PathStyle = PathStyle {
    color: "#FF8800",
    weight: 1.2,
    fill_opacity: 0.0,
};

/// Alias shown in front of the label value.
pub const TOOLTIP_ALIAS: &str = "Ward:";

/// Tooltip bound to one or more feature properties.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Tooltip {
    pub fields: Vec<String>,
    pub aliases: Vec<String>,
    pub sticky: bool,
    pub localize: bool,
}

impl Tooltip {
    /// Sticky tooltip showing `field` behind the ward alias.
    pub fn for_field(field: &str) -> Self {
        Self {
            fields: vec![field.to_string()],
            aliases: vec![TOOLTIP_ALIAS.to_string()],
            sticky: true,
            localize: true,
        }
    }
}

//! Discrete color schemes for classified rasters.

use serde::{Deserialize, Serialize};

/// An 8-bit RGB triplet.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Fallback for colors that fail to parse.
    pub const UNKNOWN: Rgb = Rgb::new(200, 200, 200);

    /// Format as `#RRGGBB`.
    pub fn to_hex(&self) -> String {
        format!("#{:02X}{:02X}{:02X}", self.r, self.g, self.b)
    }
}

/// Parse hex color string to RGB
pub fn hex_to_rgb(hex: &str) -> Option<Rgb> {
    let hex = hex.trim_start_matches('#');
    if hex.len() != 6 {
        return None;
    }

    let r = u8::from_str_radix(&hex[0..2], 16).ok()?;
    let g = u8::from_str_radix(&hex[2..4], 16).ok()?;
    let b = u8::from_str_radix(&hex[4..6], 16).ok()?;

    Some(Rgb::new(r, g, b))
}

/// An ordered list of class colors, indexed by `class value - 1`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ColorScheme {
    /// Hex colors, lowest class first.
    pub colors: &'static [&'static str],
    /// Legend label per class.
    pub labels: &'static [&'static str],
}

/// Water Scarcity Index: green, yellow, orange, red.
pub const SCARCITY_SCHEME: ColorScheme = ColorScheme {
    colors: &["#00FF00", "#FFFF00", "#FFA500", "#FF0000"],
    labels: &["Low (1)", "Moderate (2)", "Severe (3)", "Extreme (4)"],
};

/// Waterborne Disease Risk Index: green, orange, red.
pub const RISK_SCHEME: ColorScheme = ColorScheme {
    colors: &["#00FF00", "#FFA500", "#FF0000"],
    labels: &["Low (1)", "Moderate (2)", "High (3)"],
};

impl ColorScheme {
    /// Number of classes.
    pub fn len(&self) -> usize {
        self.colors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.colors.is_empty()
    }

    /// Resolve every hex color once, ready for per-pixel lookup.
    pub fn palette(&self) -> Vec<Rgb> {
        self.colors
            .iter()
            .map(|hex| hex_to_rgb(hex).unwrap_or(Rgb::UNKNOWN))
            .collect()
    }

    /// Legend rows as `(hex color, label)` pairs.
    pub fn legend(&self) -> impl Iterator<Item = (&'static str, &'static str)> + '_ {
        self.colors.iter().copied().zip(self.labels.iter().copied())
    }
}

//! Layer identities and their classification kinds.

use serde::{Deserialize, Serialize};

use crate::style::{ColorScheme, RISK_SCHEME, SCARCITY_SCHEME};

/// Classification scheme of a raster layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LayerKind {
    /// Water Scarcity Index, 4 classes.
    Scarcity,
    /// Waterborne Disease Risk Index, 3 classes.
    Risk,
}

impl LayerKind {
    pub fn scheme(&self) -> ColorScheme {
        match self {
            LayerKind::Scarcity => SCARCITY_SCHEME,
            LayerKind::Risk => RISK_SCHEME,
        }
    }

    /// Highest valid class value.
    pub fn max_class(&self) -> usize {
        self.scheme().len()
    }

    /// Legend heading.
    pub fn title(&self) -> &'static str {
        match self {
            LayerKind::Scarcity => "WSI (Water Scarcity)",
            LayerKind::Risk => "WDRI (Disease Risk)",
        }
    }
}

/// One of the displayable raster layers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LayerId {
    Scarcity,
    RiskWet,
    RiskDry,
}

impl LayerId {
    /// Every layer, in drawing order.
    pub const ALL: [LayerId; 3] = [LayerId::Scarcity, LayerId::RiskWet, LayerId::RiskDry];

    pub fn kind(&self) -> LayerKind {
        match self {
            LayerId::Scarcity => LayerKind::Scarcity,
            LayerId::RiskWet | LayerId::RiskDry => LayerKind::Risk,
        }
    }

    /// Name shown in the layer control and legend.
    pub fn display_name(&self) -> &'static str {
        match self {
            LayerId::Scarcity => "WSI",
            LayerId::RiskWet => "WDRI Wet",
            LayerId::RiskDry => "WDRI Dry",
        }
    }

    /// Parse a layer name such as `wsi`, `risk-wet` or `WDRI Dry`.
    pub fn parse(s: &str) -> Option<LayerId> {
        let normalized: String = s
            .trim()
            .to_lowercase()
            .chars()
            .map(|c| if c == ' ' || c == '-' { '_' } else { c })
            .collect();
        match normalized.as_str() {
            "wsi" | "scarcity" => Some(LayerId::Scarcity),
            "wdri_wet" | "risk_wet" => Some(LayerId::RiskWet),
            "wdri_dry" | "risk_dry" => Some(LayerId::RiskDry),
            _ => None,
        }
    }
}

impl std::fmt::Display for LayerId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.display_name())
    }
}

impl std::str::FromStr for LayerId {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        LayerId::parse(s).ok_or_else(|| format!("unknown layer '{}'", s))
    }
}

//! Render requests: what the user picked for one render cycle.

use std::collections::BTreeSet;
use std::ops::RangeInclusive;

use clap::ValueEnum;
use map_common::{LayerId, LayerKind};
use serde::{Deserialize, Serialize};

use crate::config::ViewerConfig;
use crate::error::{ViewerError, ViewerResult};

/// Allowed overlay opacity.
pub const OPACITY_RANGE: RangeInclusive<f64> = 0.1..=1.0;

/// Allowed initial zoom level.
pub const ZOOM_RANGE: RangeInclusive<u8> = 5..=18;

/// Base map tile sets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "snake_case")]
pub enum Basemap {
    #[default]
    Positron,
    DarkMatter,
    #[value(alias = "osm")]
    OpenStreetMap,
}

impl Basemap {
    /// Name shown in the layer control.
    pub fn name(&self) -> &'static str {
        match self {
            Basemap::Positron => "CartoDB positron",
            Basemap::DarkMatter => "CartoDB dark_matter",
            Basemap::OpenStreetMap => "OpenStreetMap",
        }
    }

    pub fn tile_url(&self) -> &'static str {
        match self {
            Basemap::Positron => "https://{s}.basemaps.cartocdn.com/light_all/{z}/{x}/{y}{r}.png",
            Basemap::DarkMatter => "https://{s}.basemaps.cartocdn.com/dark_all/{z}/{x}/{y}{r}.png",
            Basemap::OpenStreetMap => "https://tile.openstreetmap.org/{z}/{x}/{y}.png",
        }
    }

    pub fn attribution(&self) -> &'static str {
        match self {
            Basemap::Positron | Basemap::DarkMatter => {
                "&copy; <a href=\"https://www.openstreetmap.org/copyright\">OpenStreetMap</a> contributors &copy; <a href=\"https://carto.com/attributions\">CARTO</a>"
            }
            Basemap::OpenStreetMap => {
                "&copy; <a href=\"https://www.openstreetmap.org/copyright\">OpenStreetMap</a> contributors"
            }
        }
    }

    pub fn max_zoom(&self) -> u8 {
        match self {
            Basemap::Positron | Basemap::DarkMatter => 20,
            Basemap::OpenStreetMap => 19,
        }
    }
}

/// Selections for one render cycle.
#[derive(Debug, Clone, PartialEq)]
pub struct RenderRequest {
    pub year: i32,
    /// Layers switched off; everything else is drawn.
    pub hidden: BTreeSet<LayerId>,
    pub show_wards: bool,
    pub opacity: f64,
    pub zoom: u8,
    pub basemap: Basemap,
    pub show_measure: bool,
}

impl RenderRequest {
    /// All layers and wards on, with the configured map defaults.
    pub fn new(config: &ViewerConfig, year: i32) -> Self {
        Self {
            year,
            hidden: BTreeSet::new(),
            show_wards: true,
            opacity: config.map.opacity,
            zoom: config.map.zoom,
            basemap: config.map.basemap,
            show_measure: true,
        }
    }

    pub fn hide(mut self, layer: LayerId) -> Self {
        self.hidden.insert(layer);
        self
    }

    pub fn is_visible(&self, layer: LayerId) -> bool {
        !self.hidden.contains(&layer)
    }

    /// Visible layers in drawing order.
    pub fn visible_layers(&self) -> impl Iterator<Item = LayerId> + '_ {
        LayerId::ALL.into_iter().filter(|l| self.is_visible(*l))
    }

    /// Kinds with at least one visible layer, scarcity first.
    pub fn active_kinds(&self) -> Vec<LayerKind> {
        let mut kinds: Vec<LayerKind> = Vec::new();
        for layer in self.visible_layers() {
            if !kinds.contains(&layer.kind()) {
                kinds.push(layer.kind());
            }
        }
        kinds
    }

    pub fn validate(&self, config: &ViewerConfig) -> ViewerResult<()> {
        if !config.has_year(self.year) {
            return Err(ViewerError::InvalidRequest(format!(
                "year {} not available (expected one of {:?})",
                self.year, config.years
            )));
        }
        if !OPACITY_RANGE.contains(&self.opacity) {
            return Err(ViewerError::InvalidRequest(format!(
                "opacity {} outside {:?}",
                self.opacity, OPACITY_RANGE
            )));
        }
        if !ZOOM_RANGE.contains(&self.zoom) {
            return Err(ViewerError::InvalidRequest(format!(
                "zoom {} outside {:?}",
                self.zoom, ZOOM_RANGE
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config() -> ViewerConfig {
        ViewerConfig::embedded().unwrap()
    }

    #[test]
    fn test_defaults() {
        let request = RenderRequest::new(&config(), 2019);
        assert_eq!(request.visible_layers().count(), 3);
        assert!(request.show_wards);
        assert_eq!(request.opacity, 0.7);
        assert_eq!(request.zoom, 11);
        assert!(request.validate(&config()).is_ok());
    }

    #[test]
    fn test_unknown_year_rejected() {
        let request = RenderRequest::new(&config(), 2021);
        assert!(matches!(
            request.validate(&config()),
            Err(ViewerError::InvalidRequest(_))
        ));
    }

    #[test]
    fn test_opacity_bounds() {
        let mut request = RenderRequest::new(&config(), 2024);
        request.opacity = 0.1;
        assert!(request.validate(&config()).is_ok());
        request.opacity = 1.0;
        assert!(request.validate(&config()).is_ok());
        request.opacity = 0.05;
        assert!(request.validate(&config()).is_err());
        request.opacity = 1.5;
        assert!(request.validate(&config()).is_err());
    }

    #[test]
    fn test_zoom_bounds() {
        let mut request = RenderRequest::new(&config(), 2024);
        request.zoom = 4;
        assert!(request.validate(&config()).is_err());
        request.zoom = 18;
        assert!(request.validate(&config()).is_ok());
        request.zoom = 19;
        assert!(request.validate(&config()).is_err());
    }

    #[test]
    fn test_active_kinds() {
        let request = RenderRequest::new(&config(), 2019).hide(LayerId::Scarcity);
        assert_eq!(request.active_kinds(), vec![LayerKind::Risk]);

        let request = RenderRequest::new(&config(), 2019)
            .hide(LayerId::RiskWet)
            .hide(LayerId::RiskDry);
        assert_eq!(request.active_kinds(), vec![LayerKind::Scarcity]);
    }

    #[test]
    fn test_visible_layers_keep_drawing_order() {
        let request = RenderRequest::new(&config(), 2019).hide(LayerId::RiskWet);
        assert_eq!(
            request.visible_layers().collect::<Vec<_>>(),
            vec![LayerId::Scarcity, LayerId::RiskDry]
        );
    }
}

//! Viewer configuration.
//!
//! Loaded from YAML. The default configuration is compiled in from
//! `config/viewer.yaml` and describes the Nairobi classified maps.

use std::path::{Path, PathBuf};

use map_common::LayerId;
use serde::{Deserialize, Serialize};

use crate::error::{ViewerError, ViewerResult};
use crate::request::{Basemap, OPACITY_RANGE, ZOOM_RANGE};

const DEFAULT_CONFIG: &str = include_str!("../config/viewer.yaml");

/// Placeholder replaced with the selected year in file templates.
const YEAR_PLACEHOLDER: &str = "{year}";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ViewerConfig {
    /// Page and map heading.
    pub title: String,
    /// Directory holding the rasters and the boundary layer.
    pub data_dir: PathBuf,
    /// Years with classified maps, first is the default.
    pub years: Vec<i32>,
    pub layers: LayerFiles,
    pub boundaries: BoundaryConfig,
    pub map: MapConfig,
    pub export: ExportConfig,
}

/// File name templates per layer.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LayerFiles {
    pub scarcity: String,
    pub risk_wet: String,
    pub risk_dry: String,
}

impl LayerFiles {
    pub fn template(&self, layer: LayerId) -> &str {
        match layer {
            LayerId::Scarcity => &self.scarcity,
            LayerId::RiskWet => &self.risk_wet,
            LayerId::RiskDry => &self.risk_dry,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BoundaryConfig {
    /// Layer path without extension, relative to `data_dir`.
    pub stem: String,
    /// Name in the layer control.
    pub name: String,
    #[serde(default = "default_label_keys")]
    pub label_keys: Vec<String>,
}

fn default_label_keys() -> Vec<String> {
    boundaries::DEFAULT_LABEL_KEYS
        .iter()
        .map(|k| k.to_string())
        .collect()
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MapConfig {
    /// Initial `[lat, lon]`.
    pub center: [f64; 2],
    pub zoom: u8,
    pub opacity: f64,
    #[serde(default)]
    pub basemap: Basemap,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExportConfig {
    pub file_name: String,
}

impl ViewerConfig {
    /// The compiled-in configuration.
    pub fn embedded() -> ViewerResult<Self> {
        Self::from_yaml_str(DEFAULT_CONFIG)
    }

    pub fn from_yaml_str(yaml: &str) -> ViewerResult<Self> {
        let config: ViewerConfig = serde_yaml::from_str(yaml)?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_file(path: &Path) -> ViewerResult<Self> {
        let yaml = std::fs::read_to_string(path).map_err(|source| ViewerError::ConfigRead {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_yaml_str(&yaml)
    }

    /// Load `path` if given, otherwise the embedded default.
    pub fn load(path: Option<&Path>) -> ViewerResult<Self> {
        match path {
            Some(path) => Self::from_file(path),
            None => Self::embedded(),
        }
    }

    pub fn validate(&self) -> ViewerResult<()> {
        if self.years.is_empty() {
            return Err(ViewerError::InvalidConfig("no years configured".into()));
        }
        for layer in LayerId::ALL {
            if !self.layers.template(layer).contains(YEAR_PLACEHOLDER) {
                return Err(ViewerError::InvalidConfig(format!(
                    "file template for {} has no {} placeholder",
                    layer, YEAR_PLACEHOLDER
                )));
            }
        }
        if self.boundaries.stem.trim().is_empty() {
            return Err(ViewerError::InvalidConfig("boundary stem is empty".into()));
        }
        if !ZOOM_RANGE.contains(&self.map.zoom) {
            return Err(ViewerError::InvalidConfig(format!(
                "default zoom {} outside {:?}",
                self.map.zoom, ZOOM_RANGE
            )));
        }
        if !OPACITY_RANGE.contains(&self.map.opacity) {
            return Err(ViewerError::InvalidConfig(format!(
                "default opacity {} outside {:?}",
                self.map.opacity, OPACITY_RANGE
            )));
        }
        Ok(())
    }

    pub fn default_year(&self) -> i32 {
        self.years.first().copied().unwrap_or_default()
    }

    pub fn has_year(&self, year: i32) -> bool {
        self.years.contains(&year)
    }

    /// Raster path for `layer` in `year`.
    pub fn layer_path(&self, layer: LayerId, year: i32) -> PathBuf {
        let name = self
            .layers
            .template(layer)
            .replace(YEAR_PLACEHOLDER, &year.to_string());
        self.data_dir.join(name)
    }

    /// Boundary layer path without extension.
    pub fn boundary_stem(&self) -> PathBuf {
        self.data_dir.join(&self.boundaries.stem)
    }

    /// File name of the exported HTML map.
    pub fn export_file_name(&self, year: i32) -> String {
        self.export
            .file_name
            .replace(YEAR_PLACEHOLDER, &year.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_embedded_config() {
        let config = ViewerConfig::embedded().unwrap();
        assert_eq!(config.years, vec![2019, 2024]);
        assert_eq!(config.default_year(), 2019);
        assert_eq!(config.boundaries.stem, "Nairobi_Wards");
        assert_eq!(config.boundaries.label_keys, vec!["name_3"]);
        assert_eq!(config.map.center, [-1.2864, 36.8172]);
        assert_eq!(config.map.zoom, 11);
        assert_eq!(config.map.basemap, Basemap::Positron);
    }

    #[test]
    fn test_layer_paths() {
        let config = ViewerConfig::embedded().unwrap();
        assert_eq!(
            config.layer_path(LayerId::Scarcity, 2019),
            PathBuf::from("Classified_Maps/WSI_2019_CLASS.tif")
        );
        assert_eq!(
            config.layer_path(LayerId::RiskWet, 2024),
            PathBuf::from("Classified_Maps/WDRI_Wet_2024_CLASS.tif")
        );
        assert_eq!(
            config.layer_path(LayerId::RiskDry, 2019),
            PathBuf::from("Classified_Maps/WDRI_Dry_2019_CLASS.tif")
        );
        assert_eq!(
            config.boundary_stem(),
            PathBuf::from("Classified_Maps/Nairobi_Wards")
        );
    }

    #[test]
    fn test_export_file_name() {
        let config = ViewerConfig::embedded().unwrap();
        assert_eq!(config.export_file_name(2024), "WDRI_Map_Nairobi_2024.html");
    }

    #[test]
    fn test_template_without_year_rejected() {
        let yaml = DEFAULT_CONFIG.replace("WSI_{year}_CLASS.tif", "WSI_CLASS.tif");
        let err = ViewerConfig::from_yaml_str(&yaml).unwrap_err();
        assert!(matches!(err, ViewerError::InvalidConfig(_)));
    }

    #[test]
    fn test_label_keys_default() {
        let yaml = DEFAULT_CONFIG.replace("  label_keys: [name_3]\n", "");
        let config = ViewerConfig::from_yaml_str(&yaml).unwrap();
        assert_eq!(config.boundaries.label_keys, vec!["name_3"]);
    }

    #[test]
    fn test_missing_file() {
        let err = ViewerConfig::from_file(Path::new("/nonexistent/viewer.yaml")).unwrap_err();
        assert!(matches!(err, ViewerError::ConfigRead { .. }));
    }
}

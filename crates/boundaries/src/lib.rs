//! Ward boundary overlay loading.
//!
//! Looks for a boundary layer by stem in a fixed order of formats,
//! reads its polygons and attributes, picks a label field and returns a
//! [`BoundaryFeatureSet`] ready to be drawn over the raster overlays.

mod geojson_source;
pub mod label;
mod shapefile_source;
pub mod style;

use std::ffi::OsString;
use std::path::{Path, PathBuf};

use geojson::{Feature, FeatureCollection, Geometry, JsonObject, JsonValue};
use map_common::{MapError, MapResult};
use thiserror::Error;
use tracing::debug;

pub use label::{select_label_field, LabelFieldRule, DEFAULT_LABEL_KEYS};
pub use style::{PathStyle, Tooltip, DEFAULT_STYLE, HIGHLIGHT_STYLE, TOOLTIP_ALIAS};

/// Reasons an existing boundary file could not be loaded.
#[derive(Error, Debug)]
pub enum BoundaryError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("GeoJSON error: {0}")]
    GeoJson(#[from] geojson::Error),

    #[error("Shapefile error: {0}")]
    Shapefile(#[from] shapefile::Error),

    #[error("dBASE error: {0}")]
    Dbase(#[from] shapefile::dbase::Error),

    #[error("Expected a FeatureCollection or Feature, found {0}")]
    NotFeatures(&'static str),

    #[error("Unsupported shape type: {0}")]
    UnsupportedShape(String),

    #[error("Layer has no attribute fields to label features with")]
    NoFields,
}

/// Boundary file formats, in the order they are tried.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BoundaryFormat {
    Shapefile,
    GeoJson,
}

impl BoundaryFormat {
    /// Candidate formats, most preferred first.
    pub const CANDIDATES: [BoundaryFormat; 2] = [BoundaryFormat::Shapefile, BoundaryFormat::GeoJson];

    pub fn extension(&self) -> &'static str {
        match self {
            BoundaryFormat::Shapefile => "shp",
            BoundaryFormat::GeoJson => "geojson",
        }
    }

    /// `stem` with this format's extension appended.
    ///
    /// Appends rather than replaces, so stems containing dots keep them.
    pub fn path_for(&self, stem: &Path) -> PathBuf {
        let mut name = OsString::from(stem.as_os_str());
        name.push(".");
        name.push(self.extension());
        PathBuf::from(name)
    }
}

/// Attribute table and geometries as read from a source file.
#[derive(Debug, Default)]
pub(crate) struct RawLayer {
    /// Field names in file order.
    pub fields: Vec<String>,
    pub features: Vec<(Option<Geometry>, JsonObject)>,
}

/// One boundary polygon with its attributes.
#[derive(Debug, Clone, PartialEq)]
pub struct BoundaryFeature {
    pub geometry: Option<Geometry>,
    /// Value of the label field, if the feature has one.
    pub label: Option<String>,
    pub properties: JsonObject,
}

/// A loaded boundary layer, styled for display.
#[derive(Debug, Clone)]
pub struct BoundaryFeatureSet {
    pub source: PathBuf,
    pub format: BoundaryFormat,
    /// All attribute fields in file order.
    pub fields: Vec<String>,
    pub label_field: String,
    pub features: Vec<BoundaryFeature>,
    pub tooltip: Tooltip,
    pub style: PathStyle,
    pub highlight: PathStyle,
}

impl BoundaryFeatureSet {
    pub fn len(&self) -> usize {
        self.features.len()
    }

    pub fn is_empty(&self) -> bool {
        self.features.is_empty()
    }

    /// Labels of all features, in feature order.
    pub fn labels(&self) -> impl Iterator<Item = Option<&str>> {
        self.features.iter().map(|f| f.label.as_deref())
    }

    /// The layer as a GeoJSON FeatureCollection.
    pub fn to_feature_collection(&self) -> FeatureCollection {
        let features = self
            .features
            .iter()
            .map(|f| Feature {
                bbox: None,
                geometry: f.geometry.clone(),
                id: None,
                properties: Some(f.properties.clone()),
                foreign_members: None,
            })
            .collect();

        FeatureCollection {
            bbox: None,
            features,
            foreign_members: None,
        }
    }
}

/// The first existing boundary file for `stem`, with its format.
pub fn resolve_boundary_file(stem: &Path) -> Option<(PathBuf, BoundaryFormat)> {
    BoundaryFormat::CANDIDATES
        .iter()
        .map(|format| (format.path_for(stem), *format))
        .find(|(path, _)| path.exists())
}

/// Load the boundary layer at `stem` using the default label keys.
pub fn load_boundaries(stem: &Path) -> MapResult<BoundaryFeatureSet> {
    load_boundaries_with(stem, &LabelFieldRule::default())
}

/// Load the boundary layer at `stem`, picking the label with `rule`.
///
/// A shapefile is used whenever one exists, even if it turns out to be
/// unreadable and a GeoJSON file sits next to it.
pub fn load_boundaries_with(stem: &Path, rule: &LabelFieldRule) -> MapResult<BoundaryFeatureSet> {
    let (path, format) = resolve_boundary_file(stem)
        .ok_or_else(|| MapError::NotFound(BoundaryFormat::CANDIDATES[0].path_for(stem)))?;

    let raw = match format {
        BoundaryFormat::Shapefile => shapefile_source::read(&path),
        BoundaryFormat::GeoJson => geojson_source::read(&path),
    }
    .map_err(|e| MapError::read(&path, e))?;

    let set = build_feature_set(path.clone(), format, raw, rule)
        .map_err(|e| MapError::read(&path, e))?;

    debug!(
        path = %set.source.display(),
        format = ?set.format,
        features = set.len(),
        label_field = %set.label_field,
        "Loaded boundary layer"
    );

    Ok(set)
}

fn build_feature_set(
    source: PathBuf,
    format: BoundaryFormat,
    raw: RawLayer,
    rule: &LabelFieldRule,
) -> Result<BoundaryFeatureSet, BoundaryError> {
    let label_field = rule
        .select(&raw.fields)
        .ok_or(BoundaryError::NoFields)?
        .to_string();

    let features = raw
        .features
        .into_iter()
        .map(|(geometry, properties)| BoundaryFeature {
            label: properties.get(&label_field).and_then(label_text),
            geometry,
            properties,
        })
        .collect();

    Ok(BoundaryFeatureSet {
        source,
        format,
        fields: raw.fields,
        tooltip: Tooltip::for_field(&label_field),
        label_field,
        features,
        style: DEFAULT_STYLE,
        highlight: HIGHLIGHT_STYLE,
    })
}

/// Display text of a property value; null has none.
fn label_text(value: &JsonValue) -> Option<String> {
    match value {
        JsonValue::Null => None,
        JsonValue::String(s) => Some(s.clone()),
        other => Some(other.to_string()),
    }
}

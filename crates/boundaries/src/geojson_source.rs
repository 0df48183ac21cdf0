//! GeoJSON boundary files.

use std::path::Path;

use geojson::{Feature, GeoJson, JsonObject, JsonValue};

use crate::{BoundaryError, RawLayer};

/// Read a GeoJSON FeatureCollection (or a single Feature).
pub(crate) fn read(path: &Path) -> Result<RawLayer, BoundaryError> {
    let text = std::fs::read_to_string(path)?;
    parse(&text)
}

pub(crate) fn parse(text: &str) -> Result<RawLayer, BoundaryError> {
    let features = match text.parse::<GeoJson>()? {
        GeoJson::FeatureCollection(collection) => collection.features,
        GeoJson::Feature(feature) => vec![feature],
        GeoJson::Geometry(_) => return Err(BoundaryError::NotFeatures("Geometry")),
    };

    Ok(tabulate(features))
}

/// Collect the union of property names in first-seen order and give
/// every feature a value for each of them, null where absent.
fn tabulate(features: Vec<Feature>) -> RawLayer {
    let mut fields: Vec<String> = Vec::new();
    for feature in &features {
        for key in feature.properties.iter().flat_map(|p| p.keys()) {
            if !fields.iter().any(|f| f == key) {
                fields.push(key.clone());
            }
        }
    }

    let rows = features
        .into_iter()
        .map(|feature| {
            let mut props = feature.properties.unwrap_or_default();
            let mut row = JsonObject::new();
            for field in &fields {
                let value = props.remove(field).unwrap_or(JsonValue::Null);
                row.insert(field.clone(), value);
            }
            (feature.geometry, row)
        })
        .collect();

    RawLayer {
        fields,
        features: rows,
    }
}

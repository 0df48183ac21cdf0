//! ESRI shapefile boundary layers (`.shp` geometry, `.dbf` attributes).

use std::path::Path;

use geojson::{Geometry, JsonObject, JsonValue, Value};
use shapefile::dbase::{self, FieldValue};
use shapefile::{PolygonRing, Shape};

use crate::{BoundaryError, RawLayer};

/// Read every shape and its attribute record.
pub(crate) fn read(path: &Path) -> Result<RawLayer, BoundaryError> {
    // Records come back unordered, so take the column order from the table header.
    let fields: Vec<String> = dbase::Reader::from_path(path.with_extension("dbf"))?
        .fields()
        .iter()
        .map(|f| f.name().to_string())
        .collect();

    let mut reader = shapefile::Reader::from_path(path)?;
    let mut features = Vec::new();

    for result in reader.iter_shapes_and_records() {
        let (shape, mut record) = result?;

        let mut properties = JsonObject::new();
        for field in &fields {
            let value = record.remove(field).map(field_to_json).unwrap_or(JsonValue::Null);
            properties.insert(field.clone(), value);
        }

        features.push((shape_to_geometry(shape)?, properties));
    }

    Ok(RawLayer { fields, features })
}

fn field_to_json(value: FieldValue) -> JsonValue {
    match value {
        FieldValue::Character(s) => s
            .map(|s| JsonValue::String(s.trim_end().to_string()))
            .unwrap_or(JsonValue::Null),
        FieldValue::Memo(s) => JsonValue::String(s),
        FieldValue::Numeric(n) => n.map(number).unwrap_or(JsonValue::Null),
        FieldValue::Float(f) => f.map(|f| number(f as f64)).unwrap_or(JsonValue::Null),
        FieldValue::Double(d) => number(d),
        FieldValue::Integer(i) => JsonValue::from(i),
        FieldValue::Logical(b) => b.map(JsonValue::Bool).unwrap_or(JsonValue::Null),
        FieldValue::Currency(c) => number(c),
        FieldValue::Date(d) => d
            .map(|d| JsonValue::String(iso_date(d.year(), d.month(), d.day())))
            .unwrap_or(JsonValue::Null),
        FieldValue::DateTime(dt) => {
            let (date, time) = (dt.date(), dt.time());
            JsonValue::String(format!(
                "{}T{:02}:{:02}:{:02}",
                iso_date(date.year(), date.month(), date.day()),
                time.hours(),
                time.minutes(),
                time.seconds()
            ))
        }
        #[allow(unreachable_patterns)]
        _ => JsonValue::Null,
    }
}

/// `YYYY-MM-DD`, the form GeoJSON writers use for date columns.
fn iso_date(year: u32, month: u32, day: u32) -> String {
    format!("{:04}-{:02}-{:02}", year, month, day)
}

/// Whole numbers become JSON integers, so ward ids print without `.0`.
fn number(n: f64) -> JsonValue {
    if n.fract() == 0.0 && n.abs() < i64::MAX as f64 {
        JsonValue::from(n as i64)
    } else {
        serde_json::Number::from_f64(n)
            .map(JsonValue::Number)
            .unwrap_or(JsonValue::Null)
    }
}

fn shape_to_geometry(shape: Shape) -> Result<Option<Geometry>, BoundaryError> {
    let value = match shape {
        Shape::NullShape => return Ok(None),
        Shape::Polygon(p) => polygons(p.rings(), |pt| vec![pt.x, pt.y]),
        Shape::PolygonM(p) => polygons(p.rings(), |pt| vec![pt.x, pt.y]),
        Shape::PolygonZ(p) => polygons(p.rings(), |pt| vec![pt.x, pt.y]),
        Shape::Polyline(l) => Value::MultiLineString(
            l.parts()
                .iter()
                .map(|part| part.iter().map(|pt| vec![pt.x, pt.y]).collect())
                .collect(),
        ),
        Shape::Point(pt) => Value::Point(vec![pt.x, pt.y]),
        other => {
            return Err(BoundaryError::UnsupportedShape(format!(
                "{:?}",
                other.shapetype()
            )))
        }
    };

    Ok(Some(Geometry::new(value)))
}

/// Group rings into polygons: each outer ring opens a new polygon and
/// the inner rings that follow it are its holes.
fn polygons<P>(rings: &[PolygonRing<P>], position: impl Fn(&P) -> Vec<f64>) -> Value {
    let mut polygons: Vec<Vec<Vec<Vec<f64>>>> = Vec::new();

    for ring in rings {
        let coords: Vec<Vec<f64>> = ring.points().iter().map(&position).collect();
        match ring {
            PolygonRing::Outer(_) => polygons.push(vec![coords]),
            PolygonRing::Inner(_) => match polygons.last_mut() {
                Some(polygon) => polygon.push(coords),
                // A hole before any outer ring; keep it as its own ring
                None => polygons.push(vec![coords]),
            },
        }
    }

    if polygons.len() == 1 {
        Value::Polygon(polygons.remove(0))
    } else {
        Value::MultiPolygon(polygons)
    }
}

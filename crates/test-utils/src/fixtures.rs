//! Fixture files for raster and boundary tests.
//!
//! Writes small GeoTIFFs and GeoJSON ward layers that look like the
//! real Nairobi inputs, so readers can be exercised end to end.

use std::fs::File;
use std::io::BufWriter;
use std::path::Path;

use map_common::GeoBounds;
use serde_json::{json, Value};
use tiff::encoder::{colortype, TiffEncoder, TiffValue};
use tiff::tags::Tag;
use tiff::TiffResult;

/// Common bounds for testing.
pub mod bounds {
    use map_common::GeoBounds;

    /// Approximate extent of Nairobi County.
    pub const NAIROBI: GeoBounds = GeoBounds {
        south: -1.45,
        west: 36.65,
        north: -1.16,
        east: 37.10,
    };

    /// A neighbouring extent that only partly overlaps `NAIROBI`.
    pub const NAIROBI_EAST: GeoBounds = GeoBounds {
        south: -1.40,
        west: 36.90,
        north: -1.10,
        east: 37.30,
    };
}

/// GDAL's ASCII no-data tag.
const GDAL_NODATA: u16 = 42113;

/// GeoTIFF key directory tag.
const GEO_KEY_DIRECTORY: u16 = 34735;

/// Describes a GeoTIFF to write.
#[derive(Debug, Clone)]
pub struct GeoTiffFixture {
    pub width: u32,
    pub height: u32,
    /// Written as tiepoint + pixel scale tags; `None` writes a plain TIFF.
    pub bounds: Option<GeoBounds>,
    pub nodata: Option<f64>,
    /// Anchor the tiepoint at the top-left pixel center and tag the
    /// raster as PixelIsPoint.
    pub pixel_is_point: bool,
}

impl GeoTiffFixture {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            bounds: Some(bounds::NAIROBI),
            nodata: None,
            pixel_is_point: false,
        }
    }

    pub fn with_bounds(mut self, bounds: GeoBounds) -> Self {
        self.bounds = Some(bounds);
        self
    }

    pub fn without_georeference(mut self) -> Self {
        self.bounds = None;
        self
    }

    pub fn with_nodata(mut self, nodata: f64) -> Self {
        self.nodata = Some(nodata);
        self
    }

    pub fn with_pixel_is_point(mut self) -> Self {
        self.pixel_is_point = true;
        self
    }

    /// Write a 32-bit float single-band GeoTIFF.
    pub fn write_f32(&self, path: &Path, data: &[f32]) -> TiffResult<()> {
        self.write::<colortype::Gray32Float>(path, data)
    }

    /// Write an 8-bit single-band GeoTIFF.
    pub fn write_u8(&self, path: &Path, data: &[u8]) -> TiffResult<()> {
        self.write::<colortype::Gray8>(path, data)
    }

    /// Write a three-band RGB TIFF (not a valid class raster).
    pub fn write_rgb8(&self, path: &Path, data: &[u8]) -> TiffResult<()> {
        self.write::<colortype::RGB8>(path, data)
    }

    fn write<C>(&self, path: &Path, data: &[C::Inner]) -> TiffResult<()>
    where
        C: colortype::ColorType,
        [C::Inner]: TiffValue,
    {
        let file = BufWriter::new(File::create(path)?);
        let mut encoder = TiffEncoder::new(file)?;
        let mut image = encoder.new_image::<C>(self.width, self.height)?;

        if let Some(b) = self.bounds {
            let sx = b.width() / self.width as f64;
            let sy = b.height() / self.height as f64;
            let (x, y) = if self.pixel_is_point {
                (b.west + sx / 2.0, b.north - sy / 2.0)
            } else {
                (b.west, b.north)
            };
            image
                .encoder()
                .write_tag(Tag::ModelPixelScaleTag, &[sx, sy, 0.0][..])?;
            image
                .encoder()
                .write_tag(Tag::ModelTiepointTag, &[0.0, 0.0, 0.0, x, y, 0.0][..])?;
        }
        if self.pixel_is_point {
            // Header (1, 1, 0, 1 key), then GTRasterTypeGeoKey = PixelIsPoint
            image.encoder().write_tag(
                Tag::from_u16_exhaustive(GEO_KEY_DIRECTORY),
                &[1u16, 1, 0, 1, 1025, 0, 1, 2][..],
            )?;
        }
        if let Some(nodata) = self.nodata {
            let text = nodata.to_string();
            image
                .encoder()
                .write_tag(Tag::from_u16_exhaustive(GDAL_NODATA), text.as_str())?;
        }

        image.write_data(data)
    }
}

/// A square polygon ring (closed) with its south-west corner at `(lon, lat)`.
pub fn square_ring(lon: f64, lat: f64, size: f64) -> Vec<Vec<f64>> {
    vec![
        vec![lon, lat],
        vec![lon + size, lat],
        vec![lon + size, lat + size],
        vec![lon, lat + size],
        vec![lon, lat],
    ]
}

/// A GeoJSON FeatureCollection of square ward polygons.
///
/// `wards` holds one properties object per feature.
pub fn wards_geojson(wards: &[Value]) -> Value {
    let features: Vec<Value> = wards
        .iter()
        .enumerate()
        .map(|(i, props)| {
            let lon = 36.70 + 0.05 * i as f64;
            json!({
                "type": "Feature",
                "properties": props,
                "geometry": {
                    "type": "Polygon",
                    "coordinates": [square_ring(lon, -1.30, 0.04)],
                }
            })
        })
        .collect();

    json!({ "type": "FeatureCollection", "features": features })
}

/// Three Nairobi wards with GADM-style attribute columns.
pub fn nairobi_wards() -> Value {
    wards_geojson(&[
        json!({"GID_3": "KEN.30.1.1_1", "NAME_2": "Dagoretti North", "NAME_3": "Kilimani"}),
        json!({"GID_3": "KEN.30.1.2_1", "NAME_2": "Dagoretti North", "NAME_3": "Kawangware"}),
        json!({"GID_3": "KEN.30.4.1_1", "NAME_2": "Embakasi East", "NAME_3": "Utawala"}),
    ])
}

/// Write a GeoJSON value to `path`.
pub fn write_geojson(path: &Path, value: &Value) -> std::io::Result<()> {
    std::fs::write(path, serde_json::to_vec_pretty(value)?)
}

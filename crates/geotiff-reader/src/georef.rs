//! GeoTIFF georeferencing tags.
//!
//! Bounds come from one of two tag layouts:
//! - `ModelTiepointTag` + `ModelPixelScaleTag` (the common north-up case)
//! - `ModelTransformationTag` (a 4x4 affine, accepted only when axis-aligned)
//!
//! `GTRasterTypeGeoKey` decides what the tiepoint marks. For PixelIsArea
//! (the default when the key is absent) it is the outer corner of the
//! top-left pixel; for PixelIsPoint it is that pixel's center, and the
//! bounds are widened by half a pixel on every side, as GDAL does.

use std::io::{Read, Seek};

use map_common::GeoBounds;
use tiff::decoder::Decoder;
use tiff::tags::Tag;

use crate::GeoTiffError;

/// GDAL's private ASCII tag holding the no-data sentinel.
pub const GDAL_NODATA_TAG: u16 = 42113;

/// GeoTIFF key directory tag.
pub const GEO_KEY_DIRECTORY_TAG: u16 = 34735;

const GT_RASTER_TYPE_GEO_KEY: u32 = 1025;

/// What a raster-space coordinate refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RasterType {
    #[default]
    PixelIsArea,
    PixelIsPoint,
}

impl RasterType {
    /// Offset, in pixels, from a tiepoint's raster position to the
    /// outer corner it stands for.
    fn corner_offset(&self) -> f64 {
        match self {
            RasterType::PixelIsArea => 0.0,
            RasterType::PixelIsPoint => 0.5,
        }
    }
}

/// Read the geographic bounds of the current image.
pub fn read_bounds<R: Read + Seek>(
    decoder: &mut Decoder<R>,
    width: usize,
    height: usize,
) -> Result<GeoBounds, GeoTiffError> {
    let raster_type = read_raster_type(decoder)?;
    let scale = find_f64_vec(decoder, Tag::ModelPixelScaleTag)?;
    let tiepoint = find_f64_vec(decoder, Tag::ModelTiepointTag)?;

    if let (Some(scale), Some(tiepoint)) = (scale, tiepoint) {
        return bounds_from_tiepoint(&scale, &tiepoint, width, height, raster_type);
    }

    if let Some(matrix) = find_f64_vec(decoder, Tag::ModelTransformationTag)? {
        return bounds_from_transformation(&matrix, width, height, raster_type);
    }

    Err(GeoTiffError::MissingGeoreference)
}

/// Bounds from a tiepoint `(i, j, k, x, y, z)` and pixel scale `(sx, sy, sz)`.
pub fn bounds_from_tiepoint(
    scale: &[f64],
    tiepoint: &[f64],
    width: usize,
    height: usize,
    raster_type: RasterType,
) -> Result<GeoBounds, GeoTiffError> {
    if scale.len() < 2 || tiepoint.len() < 6 {
        return Err(GeoTiffError::InvalidGeoreference(format!(
            "expected 3 pixel scale and 6 tiepoint values, got {} and {}",
            scale.len(),
            tiepoint.len()
        )));
    }

    let (sx, sy) = (scale[0], scale[1]);
    let offset = raster_type.corner_offset();
    let west = tiepoint[3] - (tiepoint[0] + offset) * sx;
    let north = tiepoint[4] + (tiepoint[1] + offset) * sy;
    let east = west + width as f64 * sx;
    let south = north - height as f64 * sy;

    Ok(ordered(south, west, north, east))
}

/// Bounds from a row-major 4x4 model transformation.
pub fn bounds_from_transformation(
    matrix: &[f64],
    width: usize,
    height: usize,
    raster_type: RasterType,
) -> Result<GeoBounds, GeoTiffError> {
    if matrix.len() < 16 {
        return Err(GeoTiffError::InvalidGeoreference(format!(
            "expected 16 transformation values, got {}",
            matrix.len()
        )));
    }
    if matrix[1] != 0.0 || matrix[4] != 0.0 {
        return Err(GeoTiffError::InvalidGeoreference(
            "rotated or sheared rasters are not supported".to_string(),
        ));
    }

    let offset = raster_type.corner_offset();
    let west = matrix[3] - offset * matrix[0];
    let north = matrix[7] - offset * matrix[5];
    let east = west + matrix[0] * width as f64;
    let south = north + matrix[5] * height as f64;

    Ok(ordered(south, west, north, east))
}

/// Read `GTRasterTypeGeoKey` from the key directory, if there is one.
pub fn read_raster_type<R: Read + Seek>(
    decoder: &mut Decoder<R>,
) -> Result<RasterType, GeoTiffError> {
    let Some(value) = decoder.find_tag(Tag::from_u16_exhaustive(GEO_KEY_DIRECTORY_TAG))? else {
        return Ok(RasterType::default());
    };
    raster_type_from_keys(&value.into_u32_vec()?)
}

/// Find the raster type in a GeoKey directory.
///
/// The directory is a 4-value header followed by 4-value entries of
/// `(key id, tag location, count, value)`; the raster type is always
/// stored inline (tag location 0).
pub fn raster_type_from_keys(keys: &[u32]) -> Result<RasterType, GeoTiffError> {
    let Some(header) = keys.get(..4) else {
        return Err(GeoTiffError::InvalidGeoreference(
            "GeoKey directory shorter than its header".to_string(),
        ));
    };
    let count = header[3] as usize;

    for entry in keys[4..].chunks_exact(4).take(count) {
        if entry[0] != GT_RASTER_TYPE_GEO_KEY {
            continue;
        }
        return match (entry[1], entry[3]) {
            (0, 1) => Ok(RasterType::PixelIsArea),
            (0, 2) => Ok(RasterType::PixelIsPoint),
            (location, value) => Err(GeoTiffError::InvalidGeoreference(format!(
                "unsupported GTRasterTypeGeoKey (location {}, value {})",
                location, value
            ))),
        };
    }

    Ok(RasterType::default())
}

/// Read and parse the GDAL no-data tag, if present.
pub fn read_nodata<R: Read + Seek>(decoder: &mut Decoder<R>) -> Result<Option<f64>, GeoTiffError> {
    let Some(value) = decoder.find_tag(Tag::from_u16_exhaustive(GDAL_NODATA_TAG))? else {
        return Ok(None);
    };
    let text = value.into_string()?;
    parse_nodata(&text).map(Some)
}

/// Parse a GDAL no-data string such as `"-9999"`, `"0"` or `"nan"`.
pub fn parse_nodata(text: &str) -> Result<f64, GeoTiffError> {
    let trimmed = text.trim_matches(char::from(0)).trim();
    trimmed
        .parse::<f64>()
        .map_err(|_| GeoTiffError::InvalidNoData(trimmed.to_string()))
}

fn find_f64_vec<R: Read + Seek>(
    decoder: &mut Decoder<R>,
    tag: Tag,
) -> Result<Option<Vec<f64>>, GeoTiffError> {
    match decoder.find_tag(tag)? {
        Some(value) => Ok(Some(value.into_f64_vec()?)),
        None => Ok(None),
    }
}

// Flipped pixel scales produce inverted corners; normalize them.
fn ordered(south: f64, west: f64, north: f64, east: f64) -> GeoBounds {
    GeoBounds::new(
        south.min(north),
        west.min(east),
        south.max(north),
        west.max(east),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bounds_from_tiepoint() {
        let scale = [0.01, 0.01, 0.0];
        let tiepoint = [0.0, 0.0, 0.0, 36.65, -1.16, 0.0];
        let b = bounds_from_tiepoint(&scale, &tiepoint, 45, 29, RasterType::PixelIsArea).unwrap();

        assert!((b.west - 36.65).abs() < 1e-9);
        assert!((b.north - (-1.16)).abs() < 1e-9);
        assert!((b.east - 37.10).abs() < 1e-9);
        assert!((b.south - (-1.45)).abs() < 1e-9);
    }

    #[test]
    fn test_bounds_from_offset_tiepoint() {
        // Tiepoint anchored at pixel (10, 5) instead of the corner
        let scale = [0.5, 0.25, 0.0];
        let tiepoint = [10.0, 5.0, 0.0, 100.0, 50.0, 0.0];
        let b = bounds_from_tiepoint(&scale, &tiepoint, 20, 8, RasterType::PixelIsArea).unwrap();

        assert_eq!(b.west, 95.0);
        assert_eq!(b.north, 51.25);
        assert_eq!(b.east, 105.0);
        assert_eq!(b.south, 49.25);
    }

    #[test]
    fn test_bounds_from_short_tiepoint() {
        let short = bounds_from_tiepoint(&[1.0, 1.0], &[0.0, 0.0, 0.0], 4, 4, RasterType::default());
        assert!(short.is_err());
    }

    #[test]
    fn test_bounds_from_transformation() {
        let mut m = [0.0; 16];
        m[0] = 0.1;
        m[3] = 36.0;
        m[5] = -0.1;
        m[7] = -1.0;
        m[15] = 1.0;
        let b = bounds_from_transformation(&m, 10, 5, RasterType::PixelIsArea).unwrap();

        assert!((b.west - 36.0).abs() < 1e-9);
        assert!((b.east - 37.0).abs() < 1e-9);
        assert!((b.north - (-1.0)).abs() < 1e-9);
        assert!((b.south - (-1.5)).abs() < 1e-9);
    }

    #[test]
    fn test_rotated_transformation_rejected() {
        let mut m = [0.0; 16];
        m[0] = 0.1;
        m[1] = 0.01;
        m[5] = -0.1;
        assert!(matches!(
            bounds_from_transformation(&m, 10, 10, RasterType::PixelIsArea),
            Err(GeoTiffError::InvalidGeoreference(_))
        ));
    }

    #[test]
    fn test_pixel_is_point_tiepoint_widens_by_half_pixel() {
        let scale = [0.5, 0.25, 0.0];
        let tiepoint = [0.0, 0.0, 0.0, 100.0, 50.0, 0.0];
        let b = bounds_from_tiepoint(&scale, &tiepoint, 20, 8, RasterType::PixelIsPoint).unwrap();

        assert_eq!(b.west, 99.75);
        assert_eq!(b.north, 50.125);
        assert_eq!(b.east, 109.75);
        assert_eq!(b.south, 48.125);
    }

    #[test]
    fn test_pixel_is_point_transformation() {
        let mut m = [0.0; 16];
        m[0] = 0.5;
        m[3] = 100.0;
        m[5] = -0.25;
        m[7] = 50.0;
        m[15] = 1.0;
        let b = bounds_from_transformation(&m, 20, 8, RasterType::PixelIsPoint).unwrap();

        assert_eq!(b.west, 99.75);
        assert_eq!(b.north, 50.125);
        assert_eq!(b.east, 109.75);
        assert_eq!(b.south, 48.125);
    }

    #[test]
    fn test_raster_type_from_keys() {
        // Header: version 1, revision 1.0, 2 keys
        let area: [u32; 12] = [1, 1, 0, 2, 1024, 0, 1, 2, 1025, 0, 1, 1];
        let point: [u32; 12] = [1, 1, 0, 2, 1024, 0, 1, 2, 1025, 0, 1, 2];
        let absent: [u32; 8] = [1, 1, 0, 1, 1024, 0, 1, 2];

        assert_eq!(raster_type_from_keys(&area).unwrap(), RasterType::PixelIsArea);
        assert_eq!(raster_type_from_keys(&point).unwrap(), RasterType::PixelIsPoint);
        assert_eq!(raster_type_from_keys(&absent).unwrap(), RasterType::PixelIsArea);
        assert!(raster_type_from_keys(&[1, 1]).is_err());
        assert!(raster_type_from_keys(&[1, 1, 0, 1, 1025, 0, 1, 7]).is_err());
    }

    #[test]
    fn test_parse_nodata() {
        assert_eq!(parse_nodata("-9999").unwrap(), -9999.0);
        assert_eq!(parse_nodata("0\0").unwrap(), 0.0);
        assert_eq!(parse_nodata(" 255 ").unwrap(), 255.0);
        assert!(parse_nodata("nan").unwrap().is_nan());
        assert!(parse_nodata("none").is_err());
    }
}

//! Single-band GeoTIFF reader for classified rasters.
//!
//! Reads band 1 of a GeoTIFF into a [`RasterGrid`]: cell values as `f64`
//! in row-major order (row 0 is the northern edge), the GDAL no-data
//! sentinel if one is declared, and the geographic bounds from the
//! georeferencing tags.
//!
//! Failures map onto the two load errors of [`MapError`]:
//! - `NotFound` when the path does not exist (checked before opening)
//! - `ReadError` for everything else, with a [`GeoTiffError`] as the cause

pub mod georef;

use std::fs::File;
use std::io::{BufReader, Read, Seek};
use std::path::Path;

use map_common::{GeoBounds, MapError, MapResult};
use thiserror::Error;
use tiff::decoder::{Decoder, DecodingResult};
use tiff::{ColorType, TiffError};
use tracing::debug;

/// Reasons a file that exists could not be read as a raster.
#[derive(Error, Debug)]
pub enum GeoTiffError {
    #[error("TIFF decoding error: {0}")]
    Tiff(#[from] TiffError),

    #[error("Expected a single-band raster, found {0}")]
    NotSingleBand(String),

    #[error("Unsupported sample format")]
    UnsupportedSampleFormat,

    #[error("Raster has no georeferencing tags")]
    MissingGeoreference,

    #[error("Invalid georeferencing: {0}")]
    InvalidGeoreference(String),

    #[error("Invalid GDAL_NODATA value: {0:?}")]
    InvalidNoData(String),

    #[error("Expected {expected} samples, decoded {actual}")]
    SizeMismatch { expected: usize, actual: usize },
}

/// Band 1 of a georeferenced raster.
#[derive(Debug, Clone)]
pub struct RasterGrid {
    pub width: usize,
    pub height: usize,
    /// Cell values, row-major.
    pub data: Vec<f64>,
    /// Declared no-data sentinel.
    pub nodata: Option<f64>,
    pub bounds: GeoBounds,
}

impl RasterGrid {
    pub fn new(
        width: usize,
        height: usize,
        data: Vec<f64>,
        nodata: Option<f64>,
        bounds: GeoBounds,
    ) -> Self {
        Self {
            width,
            height,
            data,
            nodata,
            bounds,
        }
    }

    /// Value at `(row, col)`.
    pub fn get(&self, row: usize, col: usize) -> Option<f64> {
        if row >= self.height || col >= self.width {
            return None;
        }
        self.data.get(row * self.width + col).copied()
    }

    /// Cells with the no-data sentinel replaced by NaN.
    ///
    /// Cells that are already NaN stay NaN, so the result marks every
    /// missing cell the same way regardless of how the source declared it.
    pub fn masked(&self) -> Vec<f64> {
        match self.nodata {
            Some(nodata) => self
                .data
                .iter()
                .map(|&v| if v == nodata { f64::NAN } else { v })
                .collect(),
            None => self.data.clone(),
        }
    }
}

/// Read band 1 of the GeoTIFF at `path`.
pub fn read_raster(path: &Path) -> MapResult<RasterGrid> {
    if !path.exists() {
        return Err(MapError::NotFound(path.to_path_buf()));
    }

    // The file is dropped when this function returns, on success or error.
    let file = File::open(path).map_err(|e| MapError::read(path, e))?;
    let grid = decode(BufReader::new(file)).map_err(|e| MapError::read(path, e))?;

    debug!(
        path = %path.display(),
        width = grid.width,
        height = grid.height,
        nodata = ?grid.nodata,
        "Read raster"
    );

    Ok(grid)
}

/// Decode a GeoTIFF from any seekable reader.
pub fn decode<R: Read + Seek>(reader: R) -> Result<RasterGrid, GeoTiffError> {
    let mut decoder = Decoder::new(reader)?;

    match decoder.colortype()? {
        ColorType::Gray(_) => {}
        other => return Err(GeoTiffError::NotSingleBand(format!("{:?}", other))),
    }

    let (width, height) = decoder.dimensions()?;
    let (width, height) = (width as usize, height as usize);

    let bounds = georef::read_bounds(&mut decoder, width, height)?;
    let nodata = georef::read_nodata(&mut decoder)?;

    let data = samples_to_f64(decoder.read_image()?)?;
    let expected = width * height;
    if data.len() != expected {
        return Err(GeoTiffError::SizeMismatch {
            expected,
            actual: data.len(),
        });
    }

    Ok(RasterGrid::new(width, height, data, nodata, bounds))
}

fn samples_to_f64(result: DecodingResult) -> Result<Vec<f64>, GeoTiffError> {
    let data = match result {
        DecodingResult::U8(buf) => buf.into_iter().map(f64::from).collect(),
        DecodingResult::U16(buf) => buf.into_iter().map(f64::from).collect(),
        DecodingResult::U32(buf) => buf.into_iter().map(f64::from).collect(),
        DecodingResult::U64(buf) => buf.into_iter().map(|v| v as f64).collect(),
        DecodingResult::I8(buf) => buf.into_iter().map(f64::from).collect(),
        DecodingResult::I16(buf) => buf.into_iter().map(f64::from).collect(),
        DecodingResult::I32(buf) => buf.into_iter().map(f64::from).collect(),
        DecodingResult::I64(buf) => buf.into_iter().map(|v| v as f64).collect(),
        DecodingResult::F32(buf) => buf.into_iter().map(f64::from).collect(),
        DecodingResult::F64(buf) => buf,
        #[allow(unreachable_patterns)]
        _ => return Err(GeoTiffError::UnsupportedSampleFormat),
    };
    Ok(data)
}

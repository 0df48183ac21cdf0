//! Tests for raster colorization.
//!
//! Covers the alpha mask, clipping, the all-missing case and the
//! file-level error contract of `colorize`.

use geotiff_reader::RasterGrid;
use map_common::{LayerKind, MapError};
use renderer::classify::{colorize, colorize_grid, colorize_values, RgbaImage};
use test_utils::{
    assert_bounds_approx_eq, bounds, create_class_grid, create_class_grid_with_nodata,
    create_constant_grid, temp_test_dir, GeoTiffFixture,
};

const GREEN: [u8; 3] = [0x00, 0xFF, 0x00];
const YELLOW: [u8; 3] = [0xFF, 0xFF, 0x00];
const ORANGE: [u8; 3] = [0xFF, 0xA5, 0x00];
const RED: [u8; 3] = [0xFF, 0x00, 0x00];

// ============================================================================
// Helper functions
// ============================================================================

fn rgb(image: &RgbaImage, row: usize, col: usize) -> [u8; 3] {
    let p = image.pixel(row, col).unwrap();
    [p[0], p[1], p[2]]
}

fn grid(width: usize, height: usize, data: Vec<f64>, nodata: Option<f64>) -> RasterGrid {
    RasterGrid::new(width, height, data, nodata, bounds::NAIROBI)
}

// ============================================================================
// Scenarios
// ============================================================================

#[test]
fn test_scarcity_row_with_nodata() {
    let g = grid(5, 1, vec![1.0, 2.0, 3.0, 4.0, -9999.0], Some(-9999.0));
    let image = colorize_grid(&g, LayerKind::Scarcity);

    assert_eq!(rgb(&image, 0, 0), GREEN);
    assert_eq!(rgb(&image, 0, 1), YELLOW);
    assert_eq!(rgb(&image, 0, 2), ORANGE);
    assert_eq!(rgb(&image, 0, 3), RED);
    assert_eq!(image.alpha().collect::<Vec<_>>(), vec![255, 255, 255, 255, 0]);
}

#[test]
fn test_risk_all_ones_is_uniform_green() {
    let g = grid(4, 3, vec![1.0; 12], None);
    let image = colorize_grid(&g, LayerKind::Risk);

    for row in 0..3 {
        for col in 0..4 {
            assert_eq!(image.pixel(row, col), Some([0x00, 0xFF, 0x00, 255]));
        }
    }
}

#[test]
fn test_risk_three_classes() {
    let g = grid(3, 1, vec![1.0, 2.0, 3.0], None);
    let image = colorize_grid(&g, LayerKind::Risk);

    assert_eq!(rgb(&image, 0, 0), GREEN);
    assert_eq!(rgb(&image, 0, 1), ORANGE);
    assert_eq!(rgb(&image, 0, 2), RED);
}

// ============================================================================
// Alpha mask
// ============================================================================

#[test]
fn test_alpha_mirrors_missing_mask() {
    let data = create_class_grid_with_nodata(6, 4, 4, -1.0, &[(0, 0), (3, 1), (5, 3), (2, 2)]);
    let g = grid(6, 4, data.iter().map(|&v| v as f64).collect(), Some(-1.0));
    let masked = g.masked();
    let image = colorize_grid(&g, LayerKind::Scarcity);

    for (value, alpha) in masked.iter().zip(image.alpha()) {
        let expected = if value.is_nan() { 0 } else { 255 };
        assert_eq!(alpha, expected);
    }
    assert_eq!(image.opaque_count(), 20);
}

#[test]
fn test_nan_cells_are_missing_without_sentinel() {
    let g = grid(3, 1, vec![2.0, f64::NAN, 3.0], None);
    let image = colorize_grid(&g, LayerKind::Scarcity);
    assert_eq!(image.alpha().collect::<Vec<_>>(), vec![255, 0, 255]);
}

// ============================================================================
// Clipping
// ============================================================================

#[test]
fn test_clipping_is_idempotent() {
    for kind in [LayerKind::Scarcity, LayerKind::Risk] {
        let max = kind.max_class() as f64;
        let values: [f64; 13] = [-5.0, 0.0, 0.5, 1.0, 1.7, 2.0, 2.5, 3.0, 3.9, 4.0, 4.5, 10.0, 1e9];
        let clipped: Vec<f64> = values.iter().map(|v| v.min(max).max(1.0)).collect();

        let a = colorize_values(&values, values.len(), 1, kind);
        let b = colorize_values(&clipped, clipped.len(), 1, kind);
        assert_eq!(a, b, "{:?}", kind);
    }
}

#[test]
fn test_out_of_range_values_use_end_colors() {
    let image = colorize_values(&[0.0, 7.0], 2, 1, LayerKind::Scarcity);
    assert_eq!(rgb(&image, 0, 0), GREEN);
    assert_eq!(rgb(&image, 0, 1), RED);
}

// ============================================================================
// All-missing rasters
// ============================================================================

#[test]
fn test_all_missing_is_transparent_with_matching_dimensions() {
    let g = grid(7, 5, vec![-9999.0; 35], Some(-9999.0));
    let image = colorize_grid(&g, LayerKind::Scarcity);

    assert_eq!(image.width, 7);
    assert_eq!(image.height, 5);
    assert_eq!(image.pixels.len(), 7 * 5 * 4);
    assert!(image.is_fully_transparent());
    // Lowest class color, never garbage from a NaN normalization
    for px in image.pixels.chunks_exact(4) {
        assert_eq!(&px[0..3], &GREEN);
    }
}

// ============================================================================
// File-level contract
// ============================================================================

#[test]
fn test_colorize_reads_file_and_returns_bounds() {
    let dir = temp_test_dir();
    let path = dir.path().join("WSI_2024_CLASS.tif");
    let data = create_class_grid(8, 6, 4);
    GeoTiffFixture::new(8, 6)
        .with_bounds(bounds::NAIROBI_EAST)
        .write_f32(&path, &data)
        .unwrap();

    let (image, b) = colorize(&path, LayerKind::Scarcity).unwrap();

    assert_eq!((image.width, image.height), (8, 6));
    assert_eq!(image.opaque_count(), 48);
    assert_eq!(rgb(&image, 0, 3), RED);
    assert_bounds_approx_eq!(b, bounds::NAIROBI_EAST, 1e-9);
}

#[test]
fn test_colorize_file_with_nodata() {
    let dir = temp_test_dir();
    let path = dir.path().join("WDRI_Dry_2019_CLASS.tif");
    let mut data = create_constant_grid(3, 3, 2.0);
    data[4] = -9999.0;
    GeoTiffFixture::new(3, 3)
        .with_nodata(-9999.0)
        .write_f32(&path, &data)
        .unwrap();

    let (image, _) = colorize(&path, LayerKind::Risk).unwrap();

    assert_eq!(image.pixel(1, 1).unwrap()[3], 0);
    assert_eq!(image.pixel(0, 0), Some([0xFF, 0xA5, 0x00, 255]));
}

#[test]
fn test_colorize_missing_path_is_not_found() {
    let dir = temp_test_dir();
    let path = dir.path().join("WSI_1999_CLASS.tif");

    let err = colorize(&path, LayerKind::Scarcity).unwrap_err();
    assert!(matches!(err, MapError::NotFound(ref p) if *p == path));
}

#[test]
fn test_colorize_invalid_file_is_read_error_with_cause() {
    let dir = temp_test_dir();
    let path = dir.path().join("WSI_2019_CLASS.tif");
    std::fs::write(&path, b"<html>not a raster</html>").unwrap();

    let err = colorize(&path, LayerKind::Scarcity).unwrap_err();
    match err {
        MapError::ReadError { path: p, source } => {
            assert_eq!(p, path);
            assert!(!source.to_string().is_empty());
        }
        other => panic!("expected ReadError, got {:?}", other),
    }
}

//! Test data generators for classified rasters.
//!
//! These generators create predictable, verifiable class grids so tests
//! can check exactly which color every cell should receive.

/// Creates a class grid cycling through `1..=max_class`.
///
/// Cell `(row, col)` holds `((row + col) % max_class) + 1`, so each row
/// starts one class later than the row above it.
///
/// # Example
///
/// ```
/// use test_utils::create_class_grid;
///
/// let grid = create_class_grid(4, 2, 4);
/// assert_eq!(grid, vec![1.0, 2.0, 3.0, 4.0, 2.0, 3.0, 4.0, 1.0]);
/// ```
pub fn create_class_grid(width: usize, height: usize, max_class: usize) -> Vec<f32> {
    let mut data = Vec::with_capacity(width * height);
    for row in 0..height {
        for col in 0..width {
            data.push(((row + col) % max_class + 1) as f32);
        }
    }
    data
}

/// Creates a grid filled with a constant value.
pub fn create_constant_grid(width: usize, height: usize, value: f32) -> Vec<f32> {
    vec![value; width * height]
}

/// Creates a class grid with `sentinel` at the given `(col, row)` positions.
///
/// Useful for testing no-data handling.
pub fn create_class_grid_with_nodata(
    width: usize,
    height: usize,
    max_class: usize,
    sentinel: f32,
    nodata_positions: &[(usize, usize)],
) -> Vec<f32> {
    let mut data = create_class_grid(width, height, max_class);
    for &(col, row) in nodata_positions {
        if col < width && row < height {
            data[row * width + col] = sentinel;
        }
    }
    data
}

/// Creates a class grid as `u8` samples, the usual storage for classified maps.
pub fn create_class_grid_u8(width: usize, height: usize, max_class: usize) -> Vec<u8> {
    create_class_grid(width, height, max_class)
        .into_iter()
        .map(|v| v as u8)
        .collect()
}

/// Creates RGBA pixels using only the given colors, with every
/// `transparent_every`-th pixel fully transparent (0 disables).
///
/// Mimics colorized class rasters for PNG encoding tests.
pub fn create_class_pixels(
    width: usize,
    height: usize,
    colors: &[(u8, u8, u8)],
    transparent_every: usize,
) -> Vec<u8> {
    let mut pixels = Vec::with_capacity(width * height * 4);
    for y in 0..height {
        for x in 0..width {
            let idx = y * width + x;
            let (r, g, b) = colors[(x + y) % colors.len()];
            let a = if transparent_every > 0 && idx % transparent_every == 0 {
                0
            } else {
                255
            };
            pixels.extend_from_slice(&[r, g, b, a]);
        }
    }
    pixels
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_class_grid_stays_in_range() {
        let grid = create_class_grid(7, 5, 3);
        assert_eq!(grid.len(), 35);
        assert!(grid.iter().all(|&v| (1.0..=3.0).contains(&v)));
    }

    #[test]
    fn test_class_grid_with_nodata() {
        let grid = create_class_grid_with_nodata(3, 2, 4, -9999.0, &[(1, 0), (2, 1), (9, 9)]);
        assert_eq!(grid[1], -9999.0);
        assert_eq!(grid[5], -9999.0);
        assert_eq!(grid.iter().filter(|&&v| v == -9999.0).count(), 2);
    }

    #[test]
    fn test_class_pixels_transparency() {
        let pixels = create_class_pixels(4, 1, &[(0, 255, 0), (255, 0, 0)], 2);
        assert_eq!(&pixels[0..4], &[0, 255, 0, 0]);
        assert_eq!(&pixels[4..8], &[255, 0, 0, 255]);
        assert_eq!(pixels[11], 0);
    }
}

//! Geographic bounds of raster overlays.

use serde::{Deserialize, Serialize};

/// An axis-aligned geographic rectangle.
///
/// Coordinates are in the source raster's CRS, which is assumed to be
/// geographic (degrees), so `south`/`north` are latitudes and
/// `west`/`east` are longitudes.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeoBounds {
    pub south: f64,
    pub west: f64,
    pub north: f64,
    pub east: f64,
}

impl GeoBounds {
    pub fn new(south: f64, west: f64, north: f64, east: f64) -> Self {
        Self {
            south,
            west,
            north,
            east,
        }
    }

    /// Width in coordinate units.
    pub fn width(&self) -> f64 {
        self.east - self.west
    }

    /// Height in coordinate units.
    pub fn height(&self) -> f64 {
        self.north - self.south
    }

    /// Center point as `(lat, lon)`.
    pub fn center(&self) -> (f64, f64) {
        (
            (self.south + self.north) / 2.0,
            (self.west + self.east) / 2.0,
        )
    }

    /// Smallest rectangle containing both bounds.
    pub fn union(&self, other: &GeoBounds) -> GeoBounds {
        GeoBounds {
            south: self.south.min(other.south),
            west: self.west.min(other.west),
            north: self.north.max(other.north),
            east: self.east.max(other.east),
        }
    }

    /// Union of every bounds in the iterator, or `None` when it is empty.
    pub fn union_all<'a, I>(bounds: I) -> Option<GeoBounds>
    where
        I: IntoIterator<Item = &'a GeoBounds>,
    {
        bounds
            .into_iter()
            .fold(None, |acc: Option<GeoBounds>, b| match acc {
                Some(acc) => Some(acc.union(b)),
                None => Some(*b),
            })
    }

    /// Leaflet corner pairs: `[[south, west], [north, east]]`.
    pub fn to_leaflet(&self) -> [[f64; 2]; 2] {
        [[self.south, self.west], [self.north, self.east]]
    }
}

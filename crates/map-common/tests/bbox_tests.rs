//! Tests for GeoBounds operations.

use map_common::bbox::GeoBounds;

// ============================================================================
// Constructor tests
// ============================================================================

#[test]
fn test_bounds_new() {
    let b = GeoBounds::new(-1.45, 36.65, -1.16, 37.10);
    assert_eq!(b.south, -1.45);
    assert_eq!(b.west, 36.65);
    assert_eq!(b.north, -1.16);
    assert_eq!(b.east, 37.10);
}

#[test]
fn test_width_height() {
    let b = GeoBounds::new(0.0, 10.0, 2.0, 15.0);
    assert_eq!(b.width(), 5.0);
    assert_eq!(b.height(), 2.0);
}

// ============================================================================
// Union tests
// ============================================================================

#[test]
fn test_union_overlapping() {
    let a = GeoBounds::new(-1.4, 36.7, -1.2, 36.9);
    let b = GeoBounds::new(-1.3, 36.8, -1.1, 37.0);
    let u = a.union(&b);
    assert_eq!(u, GeoBounds::new(-1.4, 36.7, -1.1, 37.0));
}

#[test]
fn test_union_is_commutative() {
    let a = GeoBounds::new(-1.4, 36.7, -1.2, 36.9);
    let b = GeoBounds::new(-2.0, 35.0, -1.9, 35.5);
    assert_eq!(a.union(&b), b.union(&a));
}

#[test]
fn test_union_of_disjoint_bounds() {
    let a = GeoBounds::new(-1.4, 36.7, -1.2, 36.9);
    let b = GeoBounds::new(-2.0, 35.0, -1.9, 35.5);
    let u = a.union(&b);
    assert_eq!(u, GeoBounds::new(-2.0, 35.0, -1.2, 36.9));
}

#[test]
fn test_union_all_empty() {
    let none: Vec<GeoBounds> = Vec::new();
    assert_eq!(GeoBounds::union_all(&none), None);
}

#[test]
fn test_union_all_many() {
    let bounds = vec![
        GeoBounds::new(-1.4, 36.7, -1.2, 36.9),
        GeoBounds::new(-1.5, 36.6, -1.3, 36.8),
        GeoBounds::new(-1.2, 36.8, -1.0, 37.1),
    ];
    let u = GeoBounds::union_all(&bounds).unwrap();
    assert_eq!(u, GeoBounds::new(-1.5, 36.6, -1.0, 37.1));
}

#[test]
fn test_union_all_single_is_identity() {
    let b = GeoBounds::new(-1.4, 36.7, -1.2, 36.9);
    assert_eq!(GeoBounds::union_all(std::iter::once(&b)), Some(b));
}

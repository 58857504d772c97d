//! Spatial predicates and overlap measurement between features.

use field_map_layer_models::Feature;
use geo::{BooleanOps, Geometry, Intersects, MultiPolygon, Point, Relate};

use crate::measure::geometry_area;

/// Whether `point` lies inside a polygonal feature.
///
/// Points exactly on an edge or vertex count as inside. Non-polygonal
/// features never contain a point.
#[must_use]
pub fn is_point_in_polygon(point: Point<f64>, polygon: &Feature) -> bool {
    match &polygon.geometry {
        Some(Geometry::Polygon(p)) => p.intersects(&point),
        Some(Geometry::MultiPolygon(mp)) => mp.intersects(&point),
        Some(Geometry::Rect(r)) => r.intersects(&point),
        _ => false,
    }
}

/// Whether two features share any point.
#[must_use]
pub fn intersects(a: &Feature, b: &Feature) -> bool {
    match (&a.geometry, &b.geometry) {
        (Some(ga), Some(gb)) => ga.intersects(gb),
        _ => false,
    }
}

/// Whether `a` completely contains `b` (no point of `b` outside `a`, and
/// at least one interior point in common).
#[must_use]
pub fn contains(a: &Feature, b: &Feature) -> bool {
    match (&a.geometry, &b.geometry) {
        (Some(ga), Some(gb)) => ga.relate(gb).is_contains(),
        _ => false,
    }
}

/// Whether `a` lies completely within `b`.
#[must_use]
pub fn within(a: &Feature, b: &Feature) -> bool {
    match (&a.geometry, &b.geometry) {
        (Some(ga), Some(gb)) => ga.relate(gb).is_within(),
        _ => false,
    }
}

/// Area of the overlap between two polygonal features in square meters.
///
/// Returns `0.0` when the features do not overlap or either is not
/// polygonal.
#[must_use]
pub fn intersection_area(a: &Feature, b: &Feature) -> f64 {
    let (Some(mp_a), Some(mp_b)) = (as_multi_polygon(a), as_multi_polygon(b)) else {
        return 0.0;
    };

    if !mp_a.intersects(&mp_b) {
        return 0.0;
    }

    let overlap = mp_a.intersection(&mp_b);
    if overlap.0.is_empty() {
        return 0.0;
    }

    geometry_area(&Geometry::MultiPolygon(overlap))
}

fn as_multi_polygon(feature: &Feature) -> Option<MultiPolygon<f64>> {
    match feature.geometry.as_ref()? {
        Geometry::Polygon(p) => Some(MultiPolygon(vec![p.clone()])),
        Geometry::MultiPolygon(mp) => Some(mp.clone()),
        Geometry::Rect(r) => Some(MultiPolygon(vec![r.to_polygon()])),
        Geometry::Triangle(t) => Some(MultiPolygon(vec![t.to_polygon()])),
        _ => None,
    }
}

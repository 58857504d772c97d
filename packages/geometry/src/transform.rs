//! Geometry-producing operations: hull, envelope, buffer, simplify.
//!
//! Each returns a new feature carrying the input's id and properties.

use field_map_layer_models::Feature;
use geo::{Buffer, ConvexHull, CoordsIter, Geometry, MultiPoint, MultiPolygon, Point, Simplify};

use crate::GeometryError;
use crate::measure::{bounding_box, bounding_box_polygon};
use crate::spherical::EARTH_RADIUS_METERS;

/// Smallest convex polygon containing every vertex of the feature.
///
/// # Errors
///
/// Returns [`GeometryError::InvalidInput`] if the feature has no geometry.
pub fn convex_hull(feature: &Feature) -> Result<Feature, GeometryError> {
    let geometry = require_geometry(feature, "convex hull")?;
    let vertices: MultiPoint<f64> = geometry.coords_iter().map(Point::from).collect();
    Ok(derived(feature, vertices.convex_hull().into()))
}

/// Axis-aligned bounding rectangle of the feature as a polygon.
///
/// Used as the minimum bounding rectangle approximation; rotated
/// rectangles are not computed.
///
/// # Errors
///
/// Returns [`GeometryError::InvalidInput`] if the feature has no
/// geometry or the geometry is empty.
pub fn envelope(feature: &Feature) -> Result<Feature, GeometryError> {
    let bbox = bounding_box(feature)?;
    let rectangle = bounding_box_polygon(bbox);
    rectangle
        .geometry
        .map(|g| derived(feature, g))
        .ok_or_else(|| GeometryError::invalid_input("envelope produced no geometry"))
}

/// Expands (or, for negative distances, shrinks) the feature by
/// `distance_meters`.
///
/// The distance is converted to degrees along a meridian, so the buffer
/// is slightly narrower east-west away from the equator.
///
/// # Errors
///
/// Returns [`GeometryError::InvalidInput`] if the feature has no geometry
/// or the distance is not finite.
pub fn buffer(feature: &Feature, distance_meters: f64) -> Result<Feature, GeometryError> {
    if !distance_meters.is_finite() {
        return Err(GeometryError::invalid_input(format!(
            "buffer distance must be finite, got {distance_meters}"
        )));
    }
    let geometry = require_geometry(feature, "buffer")?;
    let degrees = distance_meters.to_degrees() / EARTH_RADIUS_METERS;
    let buffered: MultiPolygon<f64> = geometry.buffer(degrees);

    Ok(derived(feature, collapse_multi_polygon(buffered)))
}

/// Simplifies lines and polygon rings with Ramer-Douglas-Peucker using
/// `tolerance` in degrees. Points are returned unchanged.
///
/// # Errors
///
/// Returns [`GeometryError::InvalidInput`] if the feature has no geometry
/// or the tolerance is negative.
pub fn simplify(feature: &Feature, tolerance: f64) -> Result<Feature, GeometryError> {
    if tolerance.is_nan() || tolerance < 0.0 {
        return Err(GeometryError::invalid_input(format!(
            "simplify tolerance must be non-negative, got {tolerance}"
        )));
    }
    let geometry = require_geometry(feature, "simplify")?;
    Ok(derived(feature, simplify_geometry(geometry, tolerance)))
}

fn simplify_geometry(geometry: &Geometry<f64>, tolerance: f64) -> Geometry<f64> {
    match geometry {
        Geometry::LineString(ls) => ls.simplify(tolerance).into(),
        Geometry::MultiLineString(mls) => mls.simplify(tolerance).into(),
        Geometry::Polygon(p) => p.simplify(tolerance).into(),
        Geometry::MultiPolygon(mp) => mp.simplify(tolerance).into(),
        Geometry::GeometryCollection(gc) => Geometry::GeometryCollection(
            gc.iter()
                .map(|g| simplify_geometry(g, tolerance))
                .collect(),
        ),
        other => other.clone(),
    }
}

fn collapse_multi_polygon(mut mp: MultiPolygon<f64>) -> Geometry<f64> {
    if mp.0.len() == 1
        && let Some(polygon) = mp.0.pop()
    {
        return Geometry::Polygon(polygon);
    }
    Geometry::MultiPolygon(mp)
}

fn require_geometry<'a>(
    feature: &'a Feature,
    operation: &str,
) -> Result<&'a Geometry<f64>, GeometryError> {
    feature
        .geometry
        .as_ref()
        .ok_or_else(|| GeometryError::invalid_input(format!("{operation} of a feature without geometry")))
}

fn derived(source: &Feature, geometry: Geometry<f64>) -> Feature {
    Feature {
        id: source.id.clone(),
        geometry: Some(geometry),
        properties: source.properties.clone(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::measure::area;
    use crate::relation::is_point_in_polygon;
    use geo::{LineString, Polygon};

    fn square() -> Feature {
        Feature::new(Polygon::new(
            LineString::from(vec![(0.0, 0.0), (0.01, 0.0), (0.01, 0.01), (0.0, 0.01), (0.0, 0.0)]),
            Vec::new(),
        ))
        .with_property("name", "Lo'i")
    }

    #[test]
    fn convex_hull_of_points() {
        let points = Feature::new(MultiPoint::from(vec![
            (0.0, 0.0),
            (1.0, 0.0),
            (1.0, 1.0),
            (0.0, 1.0),
            (0.5, 0.5),
        ]));
        let hull = convex_hull(&points).unwrap();
        let Some(Geometry::Polygon(p)) = hull.geometry else {
            panic!("expected polygon hull");
        };
        // four corners plus the closing vertex; the interior point is dropped
        assert_eq!(p.exterior().0.len(), 5);
    }

    #[test]
    fn envelope_keeps_properties() {
        let line = Feature::new(LineString::from(vec![(0.0, 0.0), (2.0, 1.0)]))
            .with_property("name", "Ditch");
        let env = envelope(&line).unwrap();
        assert_eq!(env.display_name("name"), "Ditch");
        assert!(is_point_in_polygon(Point::new(1.5, 0.2), &env));
    }

    #[test]
    fn buffer_grows_polygon() {
        let field = square();
        let grown = buffer(&field, 100.0).unwrap();
        assert!(area(&grown) > area(&field));
        assert_eq!(grown.display_name("name"), "Lo'i");
    }

    #[test]
    fn buffer_rejects_non_finite_distance() {
        assert!(buffer(&square(), f64::NAN).is_err());
    }

    #[test]
    fn simplify_drops_collinear_vertices() {
        let line = Feature::new(LineString::from(vec![
            (0.0, 0.0),
            (1.0, 0.000_01),
            (2.0, 0.0),
            (3.0, 0.0),
        ]));
        let simplified = simplify(&line, 0.001).unwrap();
        let Some(Geometry::LineString(ls)) = simplified.geometry else {
            panic!("expected line string");
        };
        assert_eq!(ls.0.len(), 2);
    }

    #[test]
    fn simplify_polygon_keeps_corners() {
        let noisy = Feature::new(Polygon::new(
            LineString::from(vec![
                (0.0, 0.0),
                (0.5, 0.000_01),
                (1.0, 0.0),
                (1.0, 1.0),
                (0.0, 1.0),
                (0.0, 0.0),
            ]),
            Vec::new(),
        ));
        let simplified = simplify(&noisy, 0.001).unwrap();
        let Some(Geometry::Polygon(p)) = simplified.geometry else {
            panic!("expected polygon");
        };
        assert_eq!(p.exterior().0.len(), 5);
    }

    #[test]
    fn simplify_leaves_points_alone() {
        let marker = Feature::point(3.0, 4.0);
        assert_eq!(simplify(&marker, 1.0).unwrap(), marker);
    }

    #[test]
    fn simplify_rejects_negative_tolerance() {
        assert!(simplify(&square(), -1.0).is_err());
    }
}

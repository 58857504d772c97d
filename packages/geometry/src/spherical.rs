//! Great-circle measurements on a spherical earth.
//!
//! All inputs are `(lng, lat)` points in degrees. The `feature_*`
//! variants take point features as stored in a layer.

use field_map_layer_models::Feature;
use geo::{Coord, Point};

use crate::GeometryError;
use crate::units::LengthUnit;

/// Mean earth radius in meters.
pub const EARTH_RADIUS_METERS: f64 = 6_371_008.8;

/// Haversine distance between two points in `unit`.
#[must_use]
pub fn distance(from: Point<f64>, to: Point<f64>, unit: LengthUnit) -> f64 {
    unit.from_meters(haversine_meters(from.0, to.0))
}

/// Initial bearing from `from` to `to`, in degrees from north within
/// `-180..=180` (east positive).
#[must_use]
pub fn bearing(from: Point<f64>, to: Point<f64>) -> f64 {
    let lat1 = from.y().to_radians();
    let lat2 = to.y().to_radians();
    let delta_lon = (to.x() - from.x()).to_radians();

    let a = delta_lon.sin() * lat2.cos();
    let b = lat1.cos().mul_add(lat2.sin(), -(lat1.sin() * lat2.cos() * delta_lon.cos()));

    a.atan2(b).to_degrees()
}

/// Point reached by travelling `distance_meters` from `start` along the
/// initial bearing `bearing_degrees`.
#[must_use]
pub fn destination_point(start: Point<f64>, distance_meters: f64, bearing_degrees: f64) -> Feature {
    let (lng, lat) = destination(start, distance_meters, bearing_degrees);
    Feature::point(lng, lat)
}

/// Point halfway along the great circle between `a` and `b`.
#[must_use]
pub fn midpoint(a: Point<f64>, b: Point<f64>) -> Feature {
    let half = haversine_meters(a.0, b.0) / 2.0;
    let (lng, lat) = destination(a, half, bearing(a, b));
    Feature::point(lng, lat)
}

/// [`distance`] between two point features.
///
/// # Errors
///
/// Returns [`GeometryError::InvalidInput`] if either feature is not a
/// point.
pub fn feature_distance(from: &Feature, to: &Feature, unit: LengthUnit) -> Result<f64, GeometryError> {
    Ok(distance(point_of(from)?, point_of(to)?, unit))
}

/// [`bearing`] between two point features.
///
/// # Errors
///
/// Returns [`GeometryError::InvalidInput`] if either feature is not a
/// point.
pub fn feature_bearing(from: &Feature, to: &Feature) -> Result<f64, GeometryError> {
    Ok(bearing(point_of(from)?, point_of(to)?))
}

/// [`destination_point`] starting from a point feature.
///
/// # Errors
///
/// Returns [`GeometryError::InvalidInput`] if `start` is not a point.
pub fn feature_destination_point(
    start: &Feature,
    distance_meters: f64,
    bearing_degrees: f64,
) -> Result<Feature, GeometryError> {
    Ok(destination_point(point_of(start)?, distance_meters, bearing_degrees))
}

/// [`midpoint`] of two point features.
///
/// # Errors
///
/// Returns [`GeometryError::InvalidInput`] if either feature is not a
/// point.
pub fn feature_midpoint(a: &Feature, b: &Feature) -> Result<Feature, GeometryError> {
    Ok(midpoint(point_of(a)?, point_of(b)?))
}

fn point_of(feature: &Feature) -> Result<Point<f64>, GeometryError> {
    feature
        .as_point()
        .ok_or_else(|| GeometryError::invalid_input("expected a point feature"))
}

pub(crate) fn haversine_meters(from: Coord<f64>, to: Coord<f64>) -> f64 {
    let lat1 = from.y.to_radians();
    let lat2 = to.y.to_radians();
    let delta_lat = (to.y - from.y).to_radians();
    let delta_lon = (to.x - from.x).to_radians();

    let a = (delta_lon / 2.0)
        .sin()
        .powi(2)
        .mul_add(lat1.cos() * lat2.cos(), (delta_lat / 2.0).sin().powi(2));
    let c = 2.0 * a.sqrt().atan2((1.0 - a).sqrt());

    EARTH_RADIUS_METERS * c
}

fn destination(start: Point<f64>, distance_meters: f64, bearing_degrees: f64) -> (f64, f64) {
    let lat1 = start.y().to_radians();
    let lon1 = start.x().to_radians();
    let theta = bearing_degrees.to_radians();
    let delta = distance_meters / EARTH_RADIUS_METERS;

    let lat2 = lat1
        .sin()
        .mul_add(delta.cos(), lat1.cos() * delta.sin() * theta.cos())
        .asin();
    let lon2 = lon1
        + (theta.sin() * delta.sin() * lat1.cos())
            .atan2(lat1.sin().mul_add(-lat2.sin(), delta.cos()));

    (lon2.to_degrees(), lat2.to_degrees())
}

#[cfg(test)]
mod tests {
    use super::*;

    const ONE_DEGREE_METERS: f64 = 111_194.93;

    #[test]
    fn distance_of_one_degree_latitude() {
        let km = distance(
            Point::new(0.0, 0.0),
            Point::new(0.0, 1.0),
            LengthUnit::Kilometers,
        );
        assert!((km - 111.195).abs() < 0.01, "got {km}");
    }

    #[test]
    fn distance_to_self_is_zero() {
        let p = Point::new(-157.8, 21.3);
        assert!(distance(p, p, LengthUnit::Meters).abs() < 1e-9);
    }

    #[test]
    fn bearing_cardinal_directions() {
        let origin = Point::new(0.0, 0.0);
        assert!(bearing(origin, Point::new(0.0, 1.0)).abs() < 1e-9);
        assert!((bearing(origin, Point::new(1.0, 0.0)) - 90.0).abs() < 1e-9);
        assert!((bearing(origin, Point::new(-1.0, 0.0)) + 90.0).abs() < 1e-9);
        assert!((bearing(origin, Point::new(0.0, -1.0)).abs() - 180.0).abs() < 1e-9);
    }

    #[test]
    fn destination_north_one_degree() {
        let point = destination_point(Point::new(0.0, 0.0), ONE_DEGREE_METERS, 0.0)
            .as_point()
            .unwrap();
        assert!(point.x().abs() < 1e-9);
        assert!((point.y() - 1.0).abs() < 1e-4);
    }

    #[test]
    fn midpoint_on_equator() {
        let point = midpoint(Point::new(0.0, 0.0), Point::new(2.0, 0.0))
            .as_point()
            .unwrap();
        assert!((point.x() - 1.0).abs() < 1e-9);
        assert!(point.y().abs() < 1e-9);
    }

    #[test]
    fn feature_variants_match_point_variants() {
        let honolulu = Feature::point(-157.858, 21.307);
        let hilo = Feature::point(-155.090, 19.707);
        let (a, b) = (Point::new(-157.858, 21.307), Point::new(-155.090, 19.707));

        let km = feature_distance(&honolulu, &hilo, LengthUnit::Kilometers).unwrap();
        assert!((km - distance(a, b, LengthUnit::Kilometers)).abs() < 1e-9);
        assert!((feature_bearing(&honolulu, &hilo).unwrap() - bearing(a, b)).abs() < 1e-9);
        assert_eq!(feature_midpoint(&honolulu, &hilo).unwrap(), midpoint(a, b));
        assert_eq!(
            feature_destination_point(&honolulu, 1_000.0, 45.0).unwrap(),
            destination_point(a, 1_000.0, 45.0)
        );
    }

    #[test]
    fn feature_variants_reject_non_points() {
        let no_geometry = Feature::default();
        let marker = Feature::point(0.0, 0.0);
        assert!(feature_distance(&no_geometry, &marker, LengthUnit::Meters).is_err());
        assert!(feature_bearing(&marker, &no_geometry).is_err());
        assert!(feature_destination_point(&no_geometry, 10.0, 0.0).is_err());
        assert!(feature_midpoint(&marker, &no_geometry).is_err());
    }
}

//! Area, length, centroid, and bounding box measurements.

use field_map_layer_models::Feature;
use geo::{BoundingRect, ChamberlainDuquetteArea, Coord, Geometry, LineString, Polygon};

use crate::GeometryError;
use crate::spherical::haversine_meters;
use crate::units::{AreaUnit, LengthUnit};

/// `[min_lng, min_lat, max_lng, max_lat]`.
pub type BoundingBox = [f64; 4];

/// Spherical area of a feature in square meters.
///
/// Non-areal geometries (points, lines) and features without geometry
/// have zero area.
#[must_use]
pub fn area(feature: &Feature) -> f64 {
    feature.geometry.as_ref().map_or(0.0, geometry_area)
}

/// Area in acres, rounded to two decimal places.
#[must_use]
pub fn area_in_acres(feature: &Feature) -> f64 {
    (AreaUnit::Acres.from_square_meters(area(feature)) * 100.0).round() / 100.0
}

/// Area in hectares.
#[must_use]
pub fn area_in_hectares(feature: &Feature) -> f64 {
    AreaUnit::Hectares.from_square_meters(area(feature))
}

/// Area in square feet.
#[must_use]
pub fn area_in_square_feet(feature: &Feature) -> f64 {
    AreaUnit::SquareFeet.from_square_meters(area(feature))
}

/// Area in square kilometers.
#[must_use]
pub fn area_in_square_kilometers(feature: &Feature) -> f64 {
    AreaUnit::SquareKilometers.from_square_meters(area(feature))
}

/// Sum of the areas of `features` in square meters. Zero when empty.
#[must_use]
pub fn total_area(features: &[Feature]) -> f64 {
    features.iter().map(area).sum()
}

/// Length of every ring of a feature's outline (exterior and holes) in
/// `unit`. Line geometries measure their own length.
#[must_use]
pub fn perimeter(feature: &Feature, unit: LengthUnit) -> f64 {
    unit.from_meters(feature.geometry.as_ref().map_or(0.0, geometry_length))
}

/// Length of a line feature in `unit`.
///
/// Uses the same path measurement as [`perimeter`], so polygon input
/// yields its ring length.
#[must_use]
pub fn line_length(feature: &Feature, unit: LengthUnit) -> f64 {
    perimeter(feature, unit)
}

/// Vertex centroid of a feature.
///
/// The mean of all vertices, with the closing vertex of each polygon ring
/// left out so it is not counted twice. This is not area-weighted.
///
/// # Errors
///
/// Returns [`GeometryError::InvalidInput`] if the feature has no
/// geometry or no coordinates.
pub fn centroid(feature: &Feature) -> Result<Feature, GeometryError> {
    let geometry = feature
        .geometry
        .as_ref()
        .ok_or_else(|| GeometryError::invalid_input("centroid of a feature without geometry"))?;

    let mut coords = Vec::new();
    collect_centroid_coords(geometry, &mut coords);
    if coords.is_empty() {
        return Err(GeometryError::invalid_input(
            "centroid of a geometry without coordinates",
        ));
    }

    #[allow(clippy::cast_precision_loss)]
    let count = coords.len() as f64;
    let (sum_x, sum_y) = coords
        .iter()
        .fold((0.0, 0.0), |(x, y), c| (x + c.x, y + c.y));

    Ok(Feature::point(sum_x / count, sum_y / count))
}

/// Area-weighted centroid of several features.
///
/// A single feature yields its own [`centroid`]. Otherwise each feature's
/// centroid is weighted by its area.
///
/// # Errors
///
/// Returns [`GeometryError::InvalidInput`] if `features` is empty, the
/// total area is zero, or any feature has no centroid.
pub fn area_weighted_centroid(features: &[Feature]) -> Result<Feature, GeometryError> {
    match features {
        [] => Err(GeometryError::invalid_input(
            "area-weighted centroid of an empty feature list",
        )),
        [single] => centroid(single),
        _ => {
            let mut weighted_x = 0.0;
            let mut weighted_y = 0.0;
            let mut total = 0.0;

            for feature in features {
                let feature_area = area(feature);
                let point = centroid(feature)?
                    .as_point()
                    .ok_or_else(|| GeometryError::invalid_input("centroid is not a point"))?;
                weighted_x += point.x() * feature_area;
                weighted_y += point.y() * feature_area;
                total += feature_area;
            }

            if total <= 0.0 {
                return Err(GeometryError::invalid_input(
                    "area-weighted centroid with zero total area",
                ));
            }

            Ok(Feature::point(weighted_x / total, weighted_y / total))
        }
    }
}

/// Bounding box of a feature.
///
/// # Errors
///
/// Returns [`GeometryError::InvalidInput`] if the feature has no geometry
/// or the geometry is empty.
pub fn bounding_box(feature: &Feature) -> Result<BoundingBox, GeometryError> {
    let rect = feature
        .geometry
        .as_ref()
        .and_then(|g| g.bounding_rect())
        .ok_or_else(|| GeometryError::invalid_input("bounding box of an empty geometry"))?;

    Ok([rect.min().x, rect.min().y, rect.max().x, rect.max().y])
}

/// Builds a polygon feature covering `bbox`, as a closed five-point ring.
#[must_use]
pub fn bounding_box_polygon(bbox: BoundingBox) -> Feature {
    let [min_x, min_y, max_x, max_y] = bbox;
    let ring = LineString::from(vec![
        (min_x, min_y),
        (max_x, min_y),
        (max_x, max_y),
        (min_x, max_y),
        (min_x, min_y),
    ]);
    Feature::new(Polygon::new(ring, Vec::new()))
}

pub(crate) fn geometry_area(geometry: &Geometry<f64>) -> f64 {
    match geometry {
        Geometry::Polygon(p) => p.chamberlain_duquette_unsigned_area(),
        Geometry::MultiPolygon(mp) => mp
            .iter()
            .map(|p| p.chamberlain_duquette_unsigned_area())
            .sum(),
        Geometry::Rect(r) => r.to_polygon().chamberlain_duquette_unsigned_area(),
        Geometry::Triangle(t) => t.to_polygon().chamberlain_duquette_unsigned_area(),
        Geometry::GeometryCollection(gc) => gc.iter().map(geometry_area).sum(),
        Geometry::Point(_)
        | Geometry::MultiPoint(_)
        | Geometry::Line(_)
        | Geometry::LineString(_)
        | Geometry::MultiLineString(_) => 0.0,
    }
}

/// Total haversine length in meters of every path in the geometry.
pub(crate) fn geometry_length(geometry: &Geometry<f64>) -> f64 {
    paths(geometry)
        .iter()
        .map(|path| {
            path.windows(2)
                .map(|pair| haversine_meters(pair[0], pair[1]))
                .sum::<f64>()
        })
        .sum()
}

/// Every line and ring of a geometry as a coordinate path.
fn paths(geometry: &Geometry<f64>) -> Vec<Vec<Coord<f64>>> {
    match geometry {
        Geometry::Point(_) | Geometry::MultiPoint(_) => Vec::new(),
        Geometry::Line(line) => vec![vec![line.start, line.end]],
        Geometry::LineString(ls) => vec![ls.0.clone()],
        Geometry::MultiLineString(mls) => mls.iter().map(|ls| ls.0.clone()).collect(),
        Geometry::Polygon(p) => polygon_rings(p),
        Geometry::MultiPolygon(mp) => mp.iter().flat_map(polygon_rings).collect(),
        Geometry::Rect(r) => polygon_rings(&r.to_polygon()),
        Geometry::Triangle(t) => polygon_rings(&t.to_polygon()),
        Geometry::GeometryCollection(gc) => gc.iter().flat_map(paths).collect(),
    }
}

fn polygon_rings(polygon: &Polygon<f64>) -> Vec<Vec<Coord<f64>>> {
    std::iter::once(polygon.exterior())
        .chain(polygon.interiors())
        .map(|ring| ring.0.clone())
        .collect()
}

fn collect_centroid_coords(geometry: &Geometry<f64>, out: &mut Vec<Coord<f64>>) {
    match geometry {
        Geometry::Polygon(p) => push_polygon_vertices(p, out),
        Geometry::MultiPolygon(mp) => {
            for p in mp {
                push_polygon_vertices(p, out);
            }
        }
        Geometry::Rect(r) => push_polygon_vertices(&r.to_polygon(), out),
        Geometry::Triangle(t) => push_polygon_vertices(&t.to_polygon(), out),
        Geometry::GeometryCollection(gc) => {
            for g in gc {
                collect_centroid_coords(g, out);
            }
        }
        Geometry::Point(p) => out.push(p.0),
        Geometry::MultiPoint(mp) => out.extend(mp.iter().map(|p| p.0)),
        Geometry::Line(line) => out.extend([line.start, line.end]),
        Geometry::LineString(ls) => out.extend(ls.coords().copied()),
        Geometry::MultiLineString(mls) => {
            for ls in mls {
                out.extend(ls.coords().copied());
            }
        }
    }
}

fn push_polygon_vertices(polygon: &Polygon<f64>, out: &mut Vec<Coord<f64>>) {
    for ring in std::iter::once(polygon.exterior()).chain(polygon.interiors()) {
        let coords = &ring.0;
        let open = match coords.as_slice() {
            [first, .., last] if first == last => &coords[..coords.len() - 1],
            _ => coords.as_slice(),
        };
        out.extend_from_slice(open);
    }
}

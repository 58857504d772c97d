//! Summary statistics for a layer, shown in the layer details panel.

use std::collections::BTreeMap;

use field_map_geometry::{BoundingBox, area, bounding_box};
use field_map_layer_models::{Layer, UNNAMED_FEATURE};
use geo::Geometry;
use serde::Serialize;

/// Key used in [`LayerStatistics::geometry_counts`] for features without
/// geometry.
pub const NULL_GEOMETRY: &str = "None";

/// Aggregate counts and measures over a layer's features.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LayerStatistics {
    pub feature_count: usize,
    /// Features whose name property resolves to a non-empty value.
    pub named_feature_count: usize,
    /// Feature count per GeoJSON geometry type.
    pub geometry_counts: BTreeMap<String, usize>,
    pub total_area_m2: f64,
    /// Union of every feature's bounding box, `None` when no feature has
    /// coordinates.
    pub bounding_box: Option<BoundingBox>,
}

/// Computes [`LayerStatistics`] for `layer`.
#[must_use]
pub fn layer_statistics(layer: &Layer) -> LayerStatistics {
    let features = layer.features();

    let mut geometry_counts = BTreeMap::new();
    let mut total_area_m2 = 0.0;
    let mut extent: Option<BoundingBox> = None;
    let mut named_feature_count = 0;

    for feature in features {
        let kind = feature.geometry.as_ref().map_or(NULL_GEOMETRY, geometry_type);
        *geometry_counts.entry(kind.to_string()).or_insert(0) += 1;

        if feature.display_name(&layer.name_property) != UNNAMED_FEATURE {
            named_feature_count += 1;
        }

        total_area_m2 += area(feature);

        if let Ok(bbox) = bounding_box(feature) {
            extent = Some(extent.map_or(bbox, |e| union(e, bbox)));
        }
    }

    LayerStatistics {
        feature_count: features.len(),
        named_feature_count,
        geometry_counts,
        total_area_m2,
        bounding_box: extent,
    }
}

/// GeoJSON type name for a geometry.
const fn geometry_type(geometry: &Geometry<f64>) -> &'static str {
    match geometry {
        Geometry::Point(_) => "Point",
        Geometry::MultiPoint(_) => "MultiPoint",
        Geometry::Line(_) | Geometry::LineString(_) => "LineString",
        Geometry::MultiLineString(_) => "MultiLineString",
        Geometry::Polygon(_) | Geometry::Rect(_) | Geometry::Triangle(_) => "Polygon",
        Geometry::MultiPolygon(_) => "MultiPolygon",
        Geometry::GeometryCollection(_) => "GeometryCollection",
    }
}

fn union(a: BoundingBox, b: BoundingBox) -> BoundingBox {
    [a[0].min(b[0]), a[1].min(b[1]), a[2].max(b[2]), a[3].max(b[3])]
}

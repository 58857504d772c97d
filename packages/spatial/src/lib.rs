#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! In-memory spatial index over every feature of a layer registry.
//!
//! Built once from a [`LayerRegistry`] snapshot, it answers "which
//! features are under this click" and "which features fall in this
//! viewport" without scanning every layer.

use field_map_geometry::{BoundingBox, area};
use field_map_layer::LayerRegistry;
use geo::{BoundingRect, Geometry, Intersects, Point};
use rstar::{AABB, RTree, RTreeObject};

/// A feature stored in the R-tree with its position in the registry.
struct FeatureEntry {
    layer_index: usize,
    layer_id: String,
    feature_index: usize,
    area_m2: f64,
    envelope: AABB<[f64; 2]>,
    geometry: Geometry<f64>,
}

impl RTreeObject for FeatureEntry {
    type Envelope = AABB<[f64; 2]>;

    fn envelope(&self) -> Self::Envelope {
        self.envelope
    }
}

/// A feature located by the index.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FeatureHit {
    pub layer_id: String,
    /// Position of the feature within its layer's features.
    pub feature_index: usize,
}

impl From<&FeatureEntry> for FeatureHit {
    fn from(entry: &FeatureEntry) -> Self {
        Self {
            layer_id: entry.layer_id.clone(),
            feature_index: entry.feature_index,
        }
    }
}

/// R-tree of feature bounding boxes.
///
/// The index copies feature geometries, so it stays valid after the
/// registry changes but must be rebuilt to see those changes.
pub struct LayerSpatialIndex {
    features: RTree<FeatureEntry>,
}

impl LayerSpatialIndex {
    /// Indexes every feature with non-empty geometry in `registry`.
    #[must_use]
    pub fn build(registry: &LayerRegistry) -> Self {
        let mut entries = Vec::new();
        let mut skipped = 0_usize;

        for (layer_index, layer) in registry.layers().iter().enumerate() {
            for (feature_index, feature) in layer.features().iter().enumerate() {
                let Some(geometry) = &feature.geometry else {
                    skipped += 1;
                    continue;
                };
                let Some(envelope) = compute_envelope(geometry) else {
                    skipped += 1;
                    continue;
                };

                entries.push(FeatureEntry {
                    layer_index,
                    layer_id: layer.id.clone(),
                    feature_index,
                    area_m2: area(feature),
                    envelope,
                    geometry: geometry.clone(),
                });
            }
        }

        log::info!(
            "Indexed {} features from {} layers ({skipped} without geometry)",
            entries.len(),
            registry.len()
        );

        Self {
            features: RTree::bulk_load(entries),
        }
    }

    /// Features whose geometry contains or touches `(lng, lat)`, in
    /// registry order.
    #[must_use]
    pub fn features_at(&self, lng: f64, lat: f64) -> Vec<FeatureHit> {
        let mut hits = self.entries_at(lng, lat);
        hits.sort_by_key(|e| (e.layer_index, e.feature_index));
        hits.into_iter().map(FeatureHit::from).collect()
    }

    /// The smallest-area feature under `(lng, lat)`.
    ///
    /// Overlapping polygons are common (a field inside a parcel inside a
    /// district); the smallest one is what the user most likely clicked.
    /// Equal areas resolve to the earliest in registry order.
    #[must_use]
    pub fn topmost_at(&self, lng: f64, lat: f64) -> Option<FeatureHit> {
        let mut best: Option<&FeatureEntry> = None;

        for entry in self.entries_at(lng, lat) {
            match best {
                None => best = Some(entry),
                Some(current)
                    if entry.area_m2 < current.area_m2
                        || (entry.area_m2 <= current.area_m2
                            && (entry.layer_index, entry.feature_index)
                                < (current.layer_index, current.feature_index)) =>
                {
                    best = Some(entry);
                }
                _ => {}
            }
        }

        best.map(FeatureHit::from)
    }

    /// Features whose bounding box intersects `bbox`, in registry order.
    #[must_use]
    pub fn features_in_bbox(&self, bbox: BoundingBox) -> Vec<FeatureHit> {
        let [min_x, min_y, max_x, max_y] = bbox;
        let query_env = AABB::from_corners([min_x, min_y], [max_x, max_y]);

        let mut hits: Vec<&FeatureEntry> = self
            .features
            .locate_in_envelope_intersecting(&query_env)
            .collect();
        hits.sort_by_key(|e| (e.layer_index, e.feature_index));
        hits.into_iter().map(FeatureHit::from).collect()
    }

    /// Number of indexed features.
    #[must_use]
    pub fn len(&self) -> usize {
        self.features.size()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.features.size() == 0
    }

    fn entries_at(&self, lng: f64, lat: f64) -> Vec<&FeatureEntry> {
        let point = Point::new(lng, lat);
        let query_env = AABB::from_point([lng, lat]);

        self.features
            .locate_in_envelope_intersecting(&query_env)
            .filter(|entry| entry.geometry.intersects(&point))
            .collect()
    }
}

/// Bounding box envelope of a geometry, `None` when it has no coordinates.
fn compute_envelope(geometry: &Geometry<f64>) -> Option<AABB<[f64; 2]>> {
    geometry
        .bounding_rect()
        .map(|rect| AABB::from_corners([rect.min().x, rect.min().y], [rect.max().x, rect.max().y]))
}

#[cfg(test)]
mod tests {
    use super::*;
    use field_map_layer::{Feature, FeatureCollection, create_layer};
    use geo::{LineString, Polygon};

    fn square(min_x: f64, min_y: f64, size: f64) -> Feature {
        Feature::new(Polygon::new(
            LineString::from(vec![
                (min_x, min_y),
                (min_x + size, min_y),
                (min_x + size, min_y + size),
                (min_x, min_y + size),
                (min_x, min_y),
            ]),
            Vec::new(),
        ))
    }

    fn registry() -> LayerRegistry {
        LayerRegistry::with_layers([
            create_layer(
                "districts",
                "Districts",
                FeatureCollection::new(vec![square(0.0, 0.0, 1.0), square(5.0, 5.0, 1.0)]),
                "name",
                None,
            ),
            create_layer(
                "fields",
                "Fields",
                FeatureCollection::new(vec![
                    Feature::default(),
                    square(0.2, 0.2, 0.1),
                    Feature::point(0.25, 0.25),
                ]),
                "name",
                None,
            ),
        ])
    }

    fn hit(layer_id: &str, feature_index: usize) -> FeatureHit {
        FeatureHit {
            layer_id: layer_id.to_string(),
            feature_index,
        }
    }

    #[test]
    fn skips_features_without_geometry() {
        let index = LayerSpatialIndex::build(&registry());
        assert_eq!(index.len(), 4);
        assert!(!index.is_empty());
    }

    #[test]
    fn features_at_returns_registry_order() {
        let index = LayerSpatialIndex::build(&registry());
        assert_eq!(
            index.features_at(0.25, 0.25),
            vec![hit("districts", 0), hit("fields", 1), hit("fields", 2)]
        );
        assert_eq!(index.features_at(0.5, 0.5), vec![hit("districts", 0)]);
        assert!(index.features_at(3.0, 3.0).is_empty());
    }

    #[test]
    fn topmost_prefers_smallest_polygon() {
        let index = LayerSpatialIndex::build(&registry());
        assert_eq!(index.topmost_at(0.21, 0.21), Some(hit("fields", 1)));
        assert_eq!(index.topmost_at(0.9, 0.9), Some(hit("districts", 0)));
        assert_eq!(index.topmost_at(3.0, 3.0), None);
    }

    #[test]
    fn features_in_bbox_uses_envelopes() {
        let index = LayerSpatialIndex::build(&registry());
        assert_eq!(
            index.features_in_bbox([4.0, 4.0, 10.0, 10.0]),
            vec![hit("districts", 1)]
        );
        assert_eq!(index.features_in_bbox([-1.0, -1.0, 10.0, 10.0]).len(), 4);
    }

    #[test]
    fn empty_registry() {
        let index = LayerSpatialIndex::build(&LayerRegistry::new());
        assert!(index.is_empty());
        assert!(index.features_at(0.0, 0.0).is_empty());
    }
}

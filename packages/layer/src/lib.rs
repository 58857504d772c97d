#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Layer registry.
//!
//! Owns the ordered set of map layers, enforces id uniqueness, and
//! provides the layer-level operations the search engine and the UI rely
//! on: creation with a default style, validation, merging, feature name
//! resolution, and loading layers from GeoJSON text.

pub mod load;
pub mod names;
pub mod registry;
pub mod stats;

pub use field_map_layer_models::{
    FEATURE_COLLECTION_TYPE, Feature, FeatureCollection, Layer, LayerStyle, LayerValidation,
};
pub use load::load_layer_from_geojson;
pub use names::{FeatureName, filter_features, get_feature_names};
pub use registry::{AddLayerOutcome, LayerRegistry, merge_layers};
pub use stats::{LayerStatistics, layer_statistics};

use thiserror::Error;

/// Errors that can occur while loading or updating layers.
#[derive(Debug, Error)]
pub enum LayerError {
    /// Layer JSON could not be parsed.
    #[error(transparent)]
    Json(#[from] serde_json::Error),

    /// GeoJSON text could not be parsed.
    #[error("GeoJSON error: {0}")]
    GeoJson(Box<geojson::Error>),

    /// The GeoJSON parsed but is not usable as layer data.
    #[error("Invalid feature collection: {message}")]
    InvalidCollection {
        /// Description of what went wrong.
        message: String,
    },

    /// No layer with the given id is registered.
    #[error("Layer not found: {id}")]
    NotFound {
        /// The requested layer id.
        id: String,
    },
}

impl From<geojson::Error> for LayerError {
    fn from(e: geojson::Error) -> Self {
        Self::GeoJson(Box::new(e))
    }
}

/// Builds a layer, applying [`LayerStyle::default`] when no style is
/// given.
#[must_use]
pub fn create_layer(
    id: impl Into<String>,
    name: impl Into<String>,
    data: FeatureCollection,
    name_property: impl Into<String>,
    style: Option<LayerStyle>,
) -> Layer {
    Layer {
        id: id.into(),
        name: name.into(),
        name_property: name_property.into(),
        data: Some(data),
        style: style.unwrap_or_default(),
    }
}

/// Checks a layer for every structural problem at once.
///
/// Data-shape checks only run when data is present, so a layer with no
/// data reports a single data error.
#[must_use]
pub fn validate_layer(layer: &Layer) -> LayerValidation {
    let mut errors = Vec::new();

    if layer.id.trim().is_empty() {
        errors.push("Layer ID is required".to_string());
    }
    if layer.name.trim().is_empty() {
        errors.push("Layer name is required".to_string());
    }

    match &layer.data {
        None => errors.push("Layer data is required".to_string()),
        Some(data) => {
            if data.collection_type != FEATURE_COLLECTION_TYPE {
                errors.push(format!(
                    "Layer data must be a {FEATURE_COLLECTION_TYPE}, got '{}'",
                    data.collection_type
                ));
            }
        }
    }

    if layer.name_property.trim().is_empty() {
        errors.push("Name property is required".to_string());
    }

    if layer.data.as_ref().is_some_and(|d| d.features.is_none()) {
        errors.push("Layer features must be an array".to_string());
    }

    LayerValidation::from_errors(errors)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fields_layer() -> Layer {
        create_layer(
            "fields",
            "Fields",
            FeatureCollection::new(vec![Feature::point(-157.8, 21.3).with_property("name", "Kalo")]),
            "name",
            None,
        )
    }

    #[test]
    fn create_layer_applies_default_style() {
        let layer = fields_layer();
        assert_eq!(layer.style.fill.color, "#0888");
        assert!((layer.style.fill.opacity - 0.2).abs() < f64::EPSILON);
        assert_eq!(layer.style.line.color, "#088");
        assert!((layer.style.line.width - 2.0).abs() < f64::EPSILON);
    }

    #[test]
    fn create_layer_keeps_explicit_style() {
        let layer = create_layer(
            "merged",
            "Merged",
            FeatureCollection::default(),
            "name",
            Some(LayerStyle::neutral()),
        );
        assert_eq!(layer.style, LayerStyle::neutral());
    }

    #[test]
    fn valid_layer_has_no_errors() {
        let validation = validate_layer(&fields_layer());
        assert!(validation.is_valid);
        assert!(validation.errors.is_empty());
    }

    #[test]
    fn missing_id_and_name_reports_exactly_two_errors() {
        let mut layer = fields_layer();
        layer.id = String::new();
        layer.name = String::new();

        let validation = validate_layer(&layer);
        assert!(!validation.is_valid);
        assert_eq!(validation.errors.len(), 2, "{:?}", validation.errors);
    }

    #[test]
    fn wrong_type_and_missing_features_accumulate() {
        let json = serde_json::json!({
            "id": "broken",
            "name": "Broken",
            "nameProperty": "",
            "data": {"type": "Feature", "features": 7}
        });
        let layer: Layer = serde_json::from_value(json).unwrap();

        let validation = validate_layer(&layer);
        assert!(!validation.is_valid);
        assert_eq!(validation.errors.len(), 3, "{:?}", validation.errors);
    }

    #[test]
    fn missing_data_is_one_error() {
        let mut layer = fields_layer();
        layer.data = None;

        let validation = validate_layer(&layer);
        assert_eq!(validation.errors, vec!["Layer data is required".to_string()]);
    }
}

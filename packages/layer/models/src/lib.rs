#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Feature, layer, and style types.
//!
//! These are the plain data records exchanged with the map UI: layers of
//! GeoJSON features with display metadata. They carry no registry or
//! search behavior of their own.

pub mod feature;

pub use feature::{Feature, FeatureId, Properties, PropertyValue, UNNAMED_FEATURE};

use serde::{Deserialize, Serialize};

/// The only accepted `type` for a layer's data.
pub const FEATURE_COLLECTION_TYPE: &str = "FeatureCollection";

/// Fill styling for polygon layers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FillStyle {
    /// CSS color string (e.g. `"#0888"`).
    pub color: String,
    /// Opacity from 0.0 to 1.0.
    pub opacity: f64,
}

/// Outline styling for polygon and line layers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LineStyle {
    /// CSS color string.
    pub color: String,
    /// Line width in pixels.
    pub width: f64,
}

/// Display style for a layer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LayerStyle {
    /// Polygon fill.
    pub fill: FillStyle,
    /// Outline.
    pub line: LineStyle,
}

impl Default for LayerStyle {
    fn default() -> Self {
        Self {
            fill: FillStyle {
                color: "#0888".to_string(),
                opacity: 0.2,
            },
            line: LineStyle {
                color: "#088".to_string(),
                width: 2.0,
            },
        }
    }
}

impl LayerStyle {
    /// Neutral gray style applied to merged layers.
    #[must_use]
    pub fn neutral() -> Self {
        Self {
            fill: FillStyle {
                color: "#888".to_string(),
                opacity: 0.2,
            },
            line: LineStyle {
                color: "#666".to_string(),
                width: 2.0,
            },
        }
    }
}

/// A layer's feature collection.
///
/// `features` is `None` when the source data had a missing or malformed
/// `features` member; such a layer fails validation and contributes no
/// search candidates.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FeatureCollection {
    /// The GeoJSON `type` member.
    #[serde(rename = "type", default)]
    pub collection_type: String,
    /// Member features, in source order.
    #[serde(default, deserialize_with = "lenient_features")]
    pub features: Option<Vec<Feature>>,
}

/// Reads `features` as `None` instead of failing when the member is not
/// an array of valid features.
fn lenient_features<'de, D>(deserializer: D) -> Result<Option<Vec<Feature>>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let value = serde_json::Value::deserialize(deserializer)?;
    if !value.is_array() {
        return Ok(None);
    }
    Ok(serde_json::from_value(value).ok())
}

impl FeatureCollection {
    /// Creates a well-formed `FeatureCollection`.
    #[must_use]
    pub fn new(features: Vec<Feature>) -> Self {
        Self {
            collection_type: FEATURE_COLLECTION_TYPE.to_string(),
            features: Some(features),
        }
    }

    /// Member features, or an empty slice when malformed.
    #[must_use]
    pub fn features(&self) -> &[Feature] {
        self.features.as_deref().unwrap_or_default()
    }
}

impl Default for FeatureCollection {
    fn default() -> Self {
        Self::new(Vec::new())
    }
}

/// A named layer of features with display metadata.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Layer {
    /// Unique identifier within a registry. Never changes after creation.
    #[serde(default)]
    pub id: String,
    /// Human-readable layer name.
    #[serde(default)]
    pub name: String,
    /// Property key that supplies each feature's display name.
    #[serde(default)]
    pub name_property: String,
    /// Feature data. `None` when the layer was built without data.
    #[serde(default)]
    pub data: Option<FeatureCollection>,
    /// Display style.
    #[serde(default)]
    pub style: LayerStyle,
}

impl Layer {
    /// Returns the layer identifier.
    #[must_use]
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Returns the human-readable layer name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Member features, or an empty slice for missing or malformed data.
    #[must_use]
    pub fn features(&self) -> &[Feature] {
        self.data
            .as_ref()
            .map(FeatureCollection::features)
            .unwrap_or_default()
    }

    /// Whether the data is present and carries a `features` sequence.
    #[must_use]
    pub fn has_feature_sequence(&self) -> bool {
        self.data.as_ref().is_some_and(|d| d.features.is_some())
    }

    /// Replaces the whole feature collection, returning the old one.
    pub fn replace_data(&mut self, data: FeatureCollection) -> Option<FeatureCollection> {
        self.data.replace(data)
    }
}

/// Outcome of validating a layer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LayerValidation {
    /// `true` when `errors` is empty.
    pub is_valid: bool,
    /// Every violation found, in check order.
    pub errors: Vec<String>,
}

impl LayerValidation {
    /// Builds a validation result from the collected errors.
    #[must_use]
    pub fn from_errors(errors: Vec<String>) -> Self {
        Self {
            is_valid: errors.is_empty(),
            errors,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn layer_without_data_has_no_features() {
        let layer = Layer {
            id: "fields".to_string(),
            name: "Fields".to_string(),
            name_property: "name".to_string(),
            data: None,
            style: LayerStyle::default(),
        };
        assert!(layer.features().is_empty());
        assert!(!layer.has_feature_sequence());
    }

    #[test]
    fn malformed_features_member_deserializes_as_none() {
        let json = serde_json::json!({
            "id": "broken",
            "name": "Broken",
            "nameProperty": "name",
            "data": {"type": "FeatureCollection", "features": null}
        });
        let layer: Layer = serde_json::from_value(json).unwrap();
        assert!(layer.features().is_empty());
        assert!(!layer.has_feature_sequence());
        assert_eq!(layer.style, LayerStyle::default());
    }

    #[test]
    fn non_array_features_member_deserializes_as_none() {
        let json = serde_json::json!({"type": "FeatureCollection", "features": "oops"});
        let collection: FeatureCollection = serde_json::from_value(json).unwrap();
        assert!(collection.features.is_none());
    }

    #[test]
    fn replace_data_swaps_whole_collection() {
        let mut layer = Layer {
            id: "fields".to_string(),
            name: "Fields".to_string(),
            name_property: "name".to_string(),
            data: Some(FeatureCollection::default()),
            style: LayerStyle::default(),
        };
        let old = layer.replace_data(FeatureCollection::new(vec![Feature::point(1.0, 2.0)]));
        assert_eq!(old.unwrap().features().len(), 0);
        assert_eq!(layer.features().len(), 1);
    }
}

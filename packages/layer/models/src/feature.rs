//! Feature records and their property bags.
//!
//! A [`Feature`] is an immutable geometry + properties + optional id
//! record. Properties arrive from arbitrary external datasets, so they
//! are modelled as an ordered map of scalar [`PropertyValue`]s with
//! accessors that apply the name and id fallback chains in one place.

use std::collections::BTreeMap;
use std::fmt;

use geo::Geometry;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Name reported for features whose name property is missing or empty.
pub const UNNAMED_FEATURE: &str = "Unnamed Feature";

/// Property keys consulted (in order) before `feature.id` when resolving
/// a feature identifier.
pub const ID_PROPERTY_FALLBACKS: &[&str] = &["objectid", "id"];

/// A scalar property value.
///
/// Nested JSON values (arrays and objects) are flattened to their compact
/// JSON text when converted from [`serde_json::Value`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PropertyValue {
    /// JSON `null`.
    Null,
    /// Boolean value.
    Bool(bool),
    /// Numeric value, kept as a JSON number so integer ids print without
    /// a trailing `.0`.
    Number(serde_json::Number),
    /// String value.
    String(String),
}

impl PropertyValue {
    /// Returns the value as display text, or `None` for `null` and empty
    /// strings.
    #[must_use]
    pub fn as_text(&self) -> Option<String> {
        match self {
            Self::Null => None,
            Self::Bool(b) => Some(b.to_string()),
            Self::Number(n) => Some(n.to_string()),
            Self::String(s) if s.is_empty() => None,
            Self::String(s) => Some(s.clone()),
        }
    }

    /// Returns the numeric value, if this is a number.
    #[must_use]
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Self::Number(n) => n.as_f64(),
            _ => None,
        }
    }
}

impl From<serde_json::Value> for PropertyValue {
    fn from(value: serde_json::Value) -> Self {
        match value {
            serde_json::Value::Null => Self::Null,
            serde_json::Value::Bool(b) => Self::Bool(b),
            serde_json::Value::Number(n) => Self::Number(n),
            serde_json::Value::String(s) => Self::String(s),
            nested @ (serde_json::Value::Array(_) | serde_json::Value::Object(_)) => {
                Self::String(nested.to_string())
            }
        }
    }
}

impl From<&PropertyValue> for serde_json::Value {
    fn from(value: &PropertyValue) -> Self {
        match value {
            PropertyValue::Null => Self::Null,
            PropertyValue::Bool(b) => Self::Bool(*b),
            PropertyValue::Number(n) => Self::Number(n.clone()),
            PropertyValue::String(s) => Self::String(s.clone()),
        }
    }
}

impl From<&str> for PropertyValue {
    fn from(value: &str) -> Self {
        Self::String(value.to_string())
    }
}

impl From<String> for PropertyValue {
    fn from(value: String) -> Self {
        Self::String(value)
    }
}

impl From<i64> for PropertyValue {
    fn from(value: i64) -> Self {
        Self::Number(value.into())
    }
}

impl From<f64> for PropertyValue {
    fn from(value: f64) -> Self {
        serde_json::Number::from_f64(value).map_or(Self::Null, Self::Number)
    }
}

impl From<bool> for PropertyValue {
    fn from(value: bool) -> Self {
        Self::Bool(value)
    }
}

/// Ordered string-keyed property map.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Properties(BTreeMap<String, PropertyValue>);

impl Properties {
    /// Creates an empty property map.
    #[must_use]
    pub const fn new() -> Self {
        Self(BTreeMap::new())
    }

    /// Returns the raw value stored under `key`.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&PropertyValue> {
        self.0.get(key)
    }

    /// Returns the value stored under `key` as display text.
    ///
    /// `null` and empty strings count as absent.
    #[must_use]
    pub fn text(&self, key: &str) -> Option<String> {
        self.0.get(key).and_then(PropertyValue::as_text)
    }

    /// Inserts a value, returning the previous one.
    pub fn insert(
        &mut self,
        key: impl Into<String>,
        value: impl Into<PropertyValue>,
    ) -> Option<PropertyValue> {
        self.0.insert(key.into(), value.into())
    }

    /// Iterates over entries in key order.
    pub fn iter(&self) -> impl Iterator<Item = (&String, &PropertyValue)> {
        self.0.iter()
    }

    /// Number of entries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether the map has no entries.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl From<serde_json::Map<String, serde_json::Value>> for Properties {
    fn from(map: serde_json::Map<String, serde_json::Value>) -> Self {
        Self(
            map.into_iter()
                .map(|(key, value)| (key, PropertyValue::from(value)))
                .collect(),
        )
    }
}

impl From<&Properties> for serde_json::Map<String, serde_json::Value> {
    fn from(properties: &Properties) -> Self {
        properties
            .iter()
            .map(|(key, value)| (key.clone(), serde_json::Value::from(value)))
            .collect()
    }
}

impl<K: Into<String>, V: Into<PropertyValue>> FromIterator<(K, V)> for Properties {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self(
            iter.into_iter()
                .map(|(key, value)| (key.into(), value.into()))
                .collect(),
        )
    }
}

/// A GeoJSON feature identifier.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FeatureId {
    /// String identifier.
    String(String),
    /// Numeric identifier.
    Number(serde_json::Number),
}

impl fmt::Display for FeatureId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::String(s) => f.write_str(s),
            Self::Number(n) => write!(f, "{n}"),
        }
    }
}

impl From<&str> for FeatureId {
    fn from(value: &str) -> Self {
        Self::String(value.to_string())
    }
}

impl From<i64> for FeatureId {
    fn from(value: i64) -> Self {
        Self::Number(value.into())
    }
}

/// A geospatial feature: optional geometry, properties, optional id.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Feature {
    /// Stable identifier, unique within the owning layer.
    pub id: Option<FeatureId>,
    /// Geometry in longitude/latitude order. `None` for null geometry.
    pub geometry: Option<Geometry<f64>>,
    /// Arbitrary property bag.
    pub properties: Properties,
}

impl Feature {
    /// Creates a feature with the given geometry and no properties.
    #[must_use]
    pub fn new(geometry: impl Into<Geometry<f64>>) -> Self {
        Self {
            id: None,
            geometry: Some(geometry.into()),
            properties: Properties::new(),
        }
    }

    /// Creates a point feature at `(lng, lat)`.
    #[must_use]
    pub fn point(lng: f64, lat: f64) -> Self {
        Self::new(geo::Point::new(lng, lat))
    }

    /// Sets the feature id.
    #[must_use]
    pub fn with_id(mut self, id: impl Into<FeatureId>) -> Self {
        self.id = Some(id.into());
        self
    }

    /// Adds a property.
    #[must_use]
    pub fn with_property(mut self, key: &str, value: impl Into<PropertyValue>) -> Self {
        self.properties.insert(key, value);
        self
    }

    /// Replaces the property bag.
    #[must_use]
    pub fn with_properties(mut self, properties: Properties) -> Self {
        self.properties = properties;
        self
    }

    /// Returns the human-readable name stored under `name_property`, or
    /// [`UNNAMED_FEATURE`] when it is missing, `null`, or empty.
    #[must_use]
    pub fn display_name(&self, name_property: &str) -> String {
        self.properties
            .text(name_property)
            .unwrap_or_else(|| UNNAMED_FEATURE.to_string())
    }

    /// Resolves the feature identifier.
    ///
    /// Tries `properties.objectid`, then `properties.id`, then the
    /// feature's own `id`, and returns an empty string when none is set.
    #[must_use]
    pub fn resolved_id(&self) -> String {
        ID_PROPERTY_FALLBACKS
            .iter()
            .find_map(|key| self.properties.text(key))
            .or_else(|| {
                self.id
                    .as_ref()
                    .map(ToString::to_string)
                    .filter(|id| !id.is_empty())
            })
            .unwrap_or_default()
    }

    /// Returns the geometry as a point, if it is one.
    #[must_use]
    pub fn as_point(&self) -> Option<geo::Point<f64>> {
        match self.geometry.as_ref()? {
            Geometry::Point(p) => Some(*p),
            _ => None,
        }
    }

    /// Whether the geometry is a `Polygon` or `MultiPolygon`.
    #[must_use]
    pub const fn is_polygonal(&self) -> bool {
        matches!(
            self.geometry,
            Some(Geometry::Polygon(_) | Geometry::MultiPolygon(_))
        )
    }
}

impl From<&Feature> for geojson::Feature {
    fn from(feature: &Feature) -> Self {
        Self {
            bbox: None,
            geometry: feature
                .geometry
                .as_ref()
                .map(|g| geojson::Geometry::new(geojson::Value::from(g))),
            id: feature.id.as_ref().map(|id| match id {
                FeatureId::String(s) => geojson::feature::Id::String(s.clone()),
                FeatureId::Number(n) => geojson::feature::Id::Number(n.clone()),
            }),
            properties: Some((&feature.properties).into()),
            foreign_members: None,
        }
    }
}

impl TryFrom<geojson::Feature> for Feature {
    type Error = geojson::Error;

    fn try_from(feature: geojson::Feature) -> Result<Self, Self::Error> {
        let geometry = feature
            .geometry
            .map(|g| Geometry::<f64>::try_from(g.value))
            .transpose()?;

        Ok(Self {
            id: feature.id.map(|id| match id {
                geojson::feature::Id::String(s) => FeatureId::String(s),
                geojson::feature::Id::Number(n) => FeatureId::Number(n),
            }),
            geometry,
            properties: feature.properties.map(Properties::from).unwrap_or_default(),
        })
    }
}

impl Serialize for Feature {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        geojson::Feature::from(self).serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for Feature {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let feature = geojson::Feature::deserialize(deserializer)?;
        Self::try_from(feature).map_err(serde::de::Error::custom)
    }
}

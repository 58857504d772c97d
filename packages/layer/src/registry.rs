//! Ordered, id-unique collection of layers.

use field_map_layer_models::{Feature, FeatureCollection, Layer, LayerStyle};
use serde::{Deserialize, Serialize};

use crate::{LayerError, create_layer};

/// Name property given to merged layers.
pub const MERGED_NAME_PROPERTY: &str = "name";

/// Result of [`LayerRegistry::add_layer`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum AddLayerOutcome {
    /// The layer was appended.
    Added,
    /// A layer with the same id was already registered; nothing changed.
    AlreadyExists,
}

impl AddLayerOutcome {
    /// Whether the layer was appended.
    #[must_use]
    pub const fn is_added(self) -> bool {
        matches!(self, Self::Added)
    }
}

/// The set of layers shown on a map, in display order.
///
/// Layer ids are unique. Insertion order is preserved and is the order
/// search results tie-break on.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(from = "Vec<Layer>", into = "Vec<Layer>")]
pub struct LayerRegistry {
    layers: Vec<Layer>,
}

impl From<Vec<Layer>> for LayerRegistry {
    fn from(layers: Vec<Layer>) -> Self {
        Self::with_layers(layers)
    }
}

impl From<LayerRegistry> for Vec<Layer> {
    fn from(registry: LayerRegistry) -> Self {
        registry.layers
    }
}

impl LayerRegistry {
    /// Creates an empty registry.
    #[must_use]
    pub const fn new() -> Self {
        Self { layers: Vec::new() }
    }

    /// Creates a registry pre-seeded with `layers`. Later layers whose id
    /// is already taken are skipped.
    #[must_use]
    pub fn with_layers(layers: impl IntoIterator<Item = Layer>) -> Self {
        let mut registry = Self::new();
        for layer in layers {
            registry.add_layer(layer);
        }
        registry
    }

    /// Appends `layer` unless its id is already registered.
    pub fn add_layer(&mut self, layer: Layer) -> AddLayerOutcome {
        if self.contains(&layer.id) {
            log::warn!("Layer '{}' already exists, not adding", layer.id);
            return AddLayerOutcome::AlreadyExists;
        }

        log::debug!(
            "Adding layer '{}' with {} features",
            layer.id,
            layer.features().len()
        );
        self.layers.push(layer);
        AddLayerOutcome::Added
    }

    /// Removes and returns the layer with `id`. Absent ids are a no-op.
    pub fn remove_layer(&mut self, id: &str) -> Option<Layer> {
        let index = self.layers.iter().position(|l| l.id == id)?;
        Some(self.layers.remove(index))
    }

    /// Replaces a layer's whole feature collection, returning the previous
    /// one.
    ///
    /// # Errors
    ///
    /// Returns [`LayerError::NotFound`] if no layer has `id`.
    pub fn replace_layer_data(
        &mut self,
        id: &str,
        data: FeatureCollection,
    ) -> Result<Option<FeatureCollection>, LayerError> {
        let layer = self
            .layers
            .iter_mut()
            .find(|l| l.id == id)
            .ok_or_else(|| LayerError::NotFound { id: id.to_string() })?;

        Ok(layer.replace_data(data))
    }

    /// Merges the registered layers named by `ids` into a new layer and
    /// registers it. Source layers stay registered.
    ///
    /// # Errors
    ///
    /// Returns [`LayerError::NotFound`] for the first id that is not
    /// registered.
    pub fn merge_into(
        &mut self,
        ids: &[&str],
        merged_id: &str,
        merged_name: &str,
    ) -> Result<AddLayerOutcome, LayerError> {
        let sources = ids
            .iter()
            .map(|id| {
                self.get(id)
                    .ok_or_else(|| LayerError::NotFound { id: (*id).to_string() })
            })
            .collect::<Result<Vec<_>, _>>()?;

        let merged = merge_layers(sources, merged_id, merged_name);
        Ok(self.add_layer(merged))
    }

    /// Looks up a layer by id.
    #[must_use]
    pub fn get(&self, id: &str) -> Option<&Layer> {
        self.layers.iter().find(|l| l.id == id)
    }

    /// Whether a layer with `id` is registered.
    #[must_use]
    pub fn contains(&self, id: &str) -> bool {
        self.layers.iter().any(|l| l.id == id)
    }

    /// All layers in display order.
    #[must_use]
    pub fn layers(&self) -> &[Layer] {
        &self.layers
    }

    /// Layer ids in display order.
    pub fn ids(&self) -> impl Iterator<Item = &str> {
        self.layers.iter().map(Layer::id)
    }

    /// Number of registered layers.
    #[must_use]
    pub fn len(&self) -> usize {
        self.layers.len()
    }

    /// Whether no layers are registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.layers.is_empty()
    }
}

impl<'a> IntoIterator for &'a LayerRegistry {
    type Item = &'a Layer;
    type IntoIter = std::slice::Iter<'a, Layer>;

    fn into_iter(self) -> Self::IntoIter {
        self.layers.iter()
    }
}

/// Concatenates the features of `layers`, layer by layer, into a new
/// layer with the neutral style. The source layers are not modified.
#[must_use]
pub fn merge_layers<'a>(
    layers: impl IntoIterator<Item = &'a Layer>,
    merged_id: &str,
    merged_name: &str,
) -> Layer {
    let features: Vec<Feature> = layers
        .into_iter()
        .flat_map(|layer| layer.features().iter().cloned())
        .collect();

    create_layer(
        merged_id,
        merged_name,
        FeatureCollection::new(features),
        MERGED_NAME_PROPERTY,
        Some(LayerStyle::neutral()),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn layer(id: &str, names: &[&str]) -> Layer {
        let features = names
            .iter()
            .map(|n| Feature::point(0.0, 0.0).with_property("label", *n))
            .collect();
        create_layer(id, id.to_uppercase(), FeatureCollection::new(features), "label", None)
    }

    #[test]
    fn add_preserves_order() {
        let mut registry = LayerRegistry::new();
        assert_eq!(registry.add_layer(layer("b", &[])), AddLayerOutcome::Added);
        assert_eq!(registry.add_layer(layer("a", &[])), AddLayerOutcome::Added);
        assert_eq!(registry.ids().collect::<Vec<_>>(), vec!["b", "a"]);
    }

    #[test]
    fn duplicate_add_is_reported_and_ignored() {
        let mut registry = LayerRegistry::new();
        registry.add_layer(layer("fields", &["one"]));
        let outcome = registry.add_layer(layer("fields", &["two", "three"]));

        assert_eq!(outcome, AddLayerOutcome::AlreadyExists);
        assert!(!outcome.is_added());
        assert_eq!(registry.len(), 1);
        assert_eq!(registry.get("fields").unwrap().features().len(), 1);
    }

    #[test]
    fn remove_absent_layer_is_noop() {
        let mut registry = LayerRegistry::with_layers([layer("fields", &[])]);
        assert!(registry.remove_layer("missing").is_none());
        assert_eq!(registry.len(), 1);
        assert_eq!(registry.remove_layer("fields").unwrap().id, "fields");
        assert!(registry.is_empty());
    }

    #[test]
    fn merge_concatenates_in_layer_order_without_touching_sources() {
        let a = layer("a", &["a1", "a2"]);
        let b = layer("b", &["b1"]);

        let merged = merge_layers([&a, &b], "ab", "A and B");

        let labels: Vec<String> = merged
            .features()
            .iter()
            .map(|f| f.display_name("label"))
            .collect();
        assert_eq!(labels, vec!["a1", "a2", "b1"]);
        assert_eq!(merged.name_property, MERGED_NAME_PROPERTY);
        assert_eq!(merged.style, LayerStyle::neutral());
        assert_eq!(a.features().len(), 2);
        assert_eq!(b.features().len(), 1);
    }

    #[test]
    fn merge_into_registers_result() {
        let mut registry = LayerRegistry::with_layers([layer("a", &["a1"]), layer("b", &["b1"])]);
        let outcome = registry.merge_into(&["a", "b"], "ab", "Merged").unwrap();

        assert!(outcome.is_added());
        assert_eq!(registry.len(), 3);
        assert_eq!(registry.get("ab").unwrap().features().len(), 2);
    }

    #[test]
    fn merge_into_unknown_layer_fails() {
        let mut registry = LayerRegistry::with_layers([layer("a", &[])]);
        let err = registry.merge_into(&["a", "zzz"], "m", "M").unwrap_err();
        assert!(matches!(err, LayerError::NotFound { id } if id == "zzz"));
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn replace_layer_data_swaps_collection() {
        let mut registry = LayerRegistry::with_layers([layer("a", &["a1"])]);
        let old = registry
            .replace_layer_data("a", FeatureCollection::default())
            .unwrap();

        assert_eq!(old.unwrap().features().len(), 1);
        assert!(registry.get("a").unwrap().features().is_empty());
        assert!(registry
            .replace_layer_data("zzz", FeatureCollection::default())
            .is_err());
    }

    #[test]
    fn deserializing_skips_duplicate_ids() {
        let value = json!([
            {"id": "a", "name": "First", "data": {"type": "FeatureCollection", "features": []}},
            {"id": "b", "name": "Second", "data": {"type": "FeatureCollection", "features": []}},
            {"id": "a", "name": "Again", "data": {"type": "FeatureCollection", "features": []}},
        ]);
        let registry: LayerRegistry = serde_json::from_value(value).unwrap();

        assert_eq!(registry.ids().collect::<Vec<_>>(), vec!["a", "b"]);
        assert_eq!(registry.get("a").unwrap().name, "First");
    }

    #[test]
    fn serializes_as_layer_array() {
        let registry = LayerRegistry::with_layers([layer("a", &["x"]), layer("b", &[])]);
        let value = serde_json::to_value(&registry).unwrap();
        assert_eq!(value.as_array().map(Vec::len), Some(2));

        let back: LayerRegistry = serde_json::from_value(value).unwrap();
        assert_eq!(back, registry);
    }
}

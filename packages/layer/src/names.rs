//! Resolved display names and ids for a layer's features.

use field_map_layer_models::{Feature, Layer};
use serde::Serialize;

/// A feature paired with its resolved display name and id.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FeatureName<'a> {
    /// Value of the layer's name property, or `"Unnamed Feature"`.
    pub name: String,
    /// First of `objectid`, `id` property, or feature id; empty if none.
    pub id: String,
    /// The feature itself.
    pub feature: &'a Feature,
}

/// Resolves the name and id of every feature in `layer`, in order.
#[must_use]
pub fn get_feature_names(layer: &Layer) -> Vec<FeatureName<'_>> {
    layer
        .features()
        .iter()
        .map(|feature| FeatureName {
            name: feature.display_name(&layer.name_property),
            id: feature.resolved_id(),
            feature,
        })
        .collect()
}

/// Features whose resolved name contains `term`, ignoring case.
///
/// A blank term returns every feature.
#[must_use]
pub fn filter_features<'a>(layer: &'a Layer, term: &str) -> Vec<&'a Feature> {
    let term = term.trim().to_lowercase();
    if term.is_empty() {
        return layer.features().iter().collect();
    }

    layer
        .features()
        .iter()
        .filter(|f| {
            f.display_name(&layer.name_property)
                .to_lowercase()
                .contains(&term)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::create_layer;
    use field_map_layer_models::FeatureCollection;

    fn ahupuaa() -> Layer {
        create_layer(
            "boundary_ahupuaa_layer",
            "Ahupuaa Boundaries",
            FeatureCollection::new(vec![
                Feature::point(-157.9, 21.4)
                    .with_property("ahupuaa", "Waikele")
                    .with_property("objectid", 12_i64),
                Feature::point(-157.8, 21.3)
                    .with_property("ahupuaa", "Honouliuli")
                    .with_id("h-1"),
                Feature::point(-157.7, 21.2),
            ]),
            "ahupuaa",
            None,
        )
    }

    #[test]
    fn names_and_ids_follow_fallback_chains() {
        let layer = ahupuaa();
        let names = get_feature_names(&layer);

        assert_eq!(names.len(), 3);
        assert_eq!(names[0].name, "Waikele");
        assert_eq!(names[0].id, "12");
        assert_eq!(names[1].id, "h-1");
        assert_eq!(names[2].name, "Unnamed Feature");
        assert_eq!(names[2].id, "");
        assert!(std::ptr::eq(names[1].feature, &layer.features()[1]));
    }

    #[test]
    fn blank_filter_returns_everything_unmodified() {
        let layer = ahupuaa();
        let all = filter_features(&layer, "");
        assert_eq!(all.len(), layer.features().len());
        for (filtered, original) in all.iter().zip(layer.features()) {
            assert_eq!(*filtered, original);
        }
        assert_eq!(filter_features(&layer, "   ").len(), 3);
    }

    #[test]
    fn filter_is_case_insensitive_substring() {
        let layer = ahupuaa();
        let hits = filter_features(&layer, "WAI");
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].display_name("ahupuaa"), "Waikele");
        assert!(filter_features(&layer, "kona").is_empty());
    }
}

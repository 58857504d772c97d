//! Building layers from GeoJSON text.
//!
//! Uploaded files (GeoJSON, or CSV/KML already converted upstream) arrive
//! as GeoJSON. A bare geometry or single feature is wrapped into a
//! one-feature collection. Individual features whose geometry cannot be
//! converted are skipped with a warning so one bad record does not reject
//! a whole upload.

use field_map_layer_models::{Feature, FeatureCollection, Layer};
use geojson::GeoJson;

use crate::{LayerError, create_layer};

/// Parses `text` as GeoJSON and builds a layer with the default style.
///
/// # Errors
///
/// * [`LayerError::GeoJson`] if the text is not valid GeoJSON
/// * [`LayerError::InvalidCollection`] if every feature failed to convert
pub fn load_layer_from_geojson(
    id: &str,
    name: &str,
    text: &str,
    name_property: &str,
) -> Result<Layer, LayerError> {
    let geojson: GeoJson = text.parse()?;
    let features = features_from_geojson(geojson)?;

    log::info!("Loaded {} features into layer '{id}'", features.len());

    Ok(create_layer(
        id,
        name,
        FeatureCollection::new(features),
        name_property,
        None,
    ))
}

fn features_from_geojson(geojson: GeoJson) -> Result<Vec<Feature>, LayerError> {
    match geojson {
        GeoJson::Geometry(geometry) => {
            let geometry = geo::Geometry::<f64>::try_from(geometry.value)?;
            Ok(vec![Feature::new(geometry)])
        }
        GeoJson::Feature(feature) => Ok(vec![Feature::try_from(feature)?]),
        GeoJson::FeatureCollection(collection) => {
            let total = collection.features.len();
            let mut features = Vec::with_capacity(total);

            for (index, raw) in collection.features.into_iter().enumerate() {
                match Feature::try_from(raw) {
                    Ok(feature) => features.push(feature),
                    Err(e) => log::warn!("Skipping feature {index}: {e}"),
                }
            }

            if features.is_empty() && total > 0 {
                return Err(LayerError::InvalidCollection {
                    message: format!("none of the {total} features could be converted"),
                });
            }

            Ok(features)
        }
    }
}

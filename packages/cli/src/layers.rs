//! `--layer` argument parsing and registry loading.

use std::path::PathBuf;
use std::str::FromStr;

use field_map_layer::{AddLayerOutcome, LayerRegistry, load_layer_from_geojson};

/// Name property used when a `--layer` argument does not give one.
pub const DEFAULT_NAME_PROPERTY: &str = "name";

/// A `--layer <id>=<path>[:<name_property>]` argument.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LayerSpec {
    pub id: String,
    pub path: PathBuf,
    pub name_property: String,
}

impl FromStr for LayerSpec {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (id, rest) = s
            .split_once('=')
            .ok_or_else(|| format!("expected <id>=<path>[:<name_property>], got '{s}'"))?;

        let id = id.trim();
        if id.is_empty() {
            return Err(format!("layer id is empty in '{s}'"));
        }

        // a trailing `:word` is a name property unless it looks like part
        // of a path
        let (path, name_property) = match rest.rsplit_once(':') {
            Some((path, property))
                if !path.is_empty()
                    && !property.is_empty()
                    && !property.contains(['/', '\\']) =>
            {
                (path, property)
            }
            _ => (rest, DEFAULT_NAME_PROPERTY),
        };

        if path.is_empty() {
            return Err(format!("layer path is empty in '{s}'"));
        }

        Ok(Self {
            id: id.to_string(),
            path: PathBuf::from(path),
            name_property: name_property.to_string(),
        })
    }
}

/// Reads every layer file into a registry, in argument order.
///
/// # Errors
///
/// Returns an error if a file cannot be read or is not valid GeoJSON.
pub fn load_registry(specs: &[LayerSpec]) -> Result<LayerRegistry, Box<dyn std::error::Error>> {
    let mut registry = LayerRegistry::new();

    for spec in specs {
        let text = std::fs::read_to_string(&spec.path)
            .map_err(|e| format!("Failed to read {}: {e}", spec.path.display()))?;
        let name = spec
            .path
            .file_stem()
            .map_or_else(|| spec.id.clone(), |stem| stem.to_string_lossy().into_owned());

        let layer = load_layer_from_geojson(&spec.id, &name, &text, &spec.name_property)?;
        if registry.add_layer(layer) == AddLayerOutcome::AlreadyExists {
            log::warn!("Ignoring {}: layer id '{}' given twice", spec.path.display(), spec.id);
        }
    }

    Ok(registry)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_id_and_path() {
        let spec: LayerSpec = "fields=data/fields.geojson".parse().unwrap();
        assert_eq!(spec.id, "fields");
        assert_eq!(spec.path, PathBuf::from("data/fields.geojson"));
        assert_eq!(spec.name_property, DEFAULT_NAME_PROPERTY);
    }

    #[test]
    fn parses_name_property() {
        let spec: LayerSpec = "ahupuaa=boundaries.geojson:ahupuaa".parse().unwrap();
        assert_eq!(spec.path, PathBuf::from("boundaries.geojson"));
        assert_eq!(spec.name_property, "ahupuaa");
    }

    #[test]
    fn drive_letter_is_not_a_name_property() {
        let spec: LayerSpec = r"w=C:\maps\wells.geojson".parse().unwrap();
        assert_eq!(spec.path, PathBuf::from(r"C:\maps\wells.geojson"));
        assert_eq!(spec.name_property, DEFAULT_NAME_PROPERTY);
    }

    #[test]
    fn rejects_malformed_specs() {
        assert!("no-equals".parse::<LayerSpec>().is_err());
        assert!("=path.geojson".parse::<LayerSpec>().is_err());
        assert!("id=".parse::<LayerSpec>().is_err());
    }
}

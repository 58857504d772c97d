//! Subcommand implementations.

use field_map_color::ColorRegistry;
use field_map_geometry::{AreaUnit, LengthUnit, format_area, perimeter, shape_metrics};
use field_map_layer::{LayerRegistry, get_feature_names, layer_statistics, validate_layer};
use field_map_search::SearchEngine;
use field_map_search_models::{SearchConfig, SearchMode, SearchRequest, SearchResult};
use field_map_spatial::{FeatureHit, LayerSpatialIndex};
use serde_json::json;

type CmdResult = Result<(), Box<dyn std::error::Error>>;

/// Output format shared by every command.
#[derive(Debug, Clone, Copy)]
pub struct Output {
    pub json: bool,
}

impl Output {
    fn print_json(self, value: &impl serde::Serialize) -> CmdResult {
        println!("{}", serde_json::to_string_pretty(value)?);
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Search and suggestions
// ---------------------------------------------------------------------------

pub fn cmd_search(
    registry: &LayerRegistry,
    mut config: SearchConfig,
    query: &str,
    mode: SearchMode,
    active_layer: Option<String>,
    max_results: Option<usize>,
    output: Output,
) -> CmdResult {
    if let Some(max_results) = max_results {
        config.options = config.options.with_max_results(max_results);
    }

    let request = SearchRequest {
        query: query.to_string(),
        mode,
        active_layer,
    };
    let results = run_search(registry, config, &request);

    if output.json {
        return output.print_json(&results);
    }

    if results.is_empty() {
        println!("No results found for '{query}'");
        return Ok(());
    }

    for result in &results {
        println!("{}", describe_result(result));
    }

    Ok(())
}

/// Runs `request` with colors assigned in registry order, so a layer's
/// color does not depend on the query.
fn run_search(
    registry: &LayerRegistry,
    config: SearchConfig,
    request: &SearchRequest,
) -> Vec<SearchResult> {
    let colors = ColorRegistry::new();
    for id in registry.ids() {
        colors.assign_color(id);
    }
    SearchEngine::new(registry, &colors)
        .with_config(config)
        .search(request)
}

pub fn cmd_suggest(
    registry: &LayerRegistry,
    config: SearchConfig,
    query: &str,
    max: usize,
    output: Output,
) -> CmdResult {
    let colors = ColorRegistry::new();
    let suggestions = SearchEngine::new(registry, &colors)
        .with_config(config)
        .get_suggestions(query, max);

    if output.json {
        return output.print_json(&suggestions);
    }

    for suggestion in suggestions {
        println!("{suggestion}");
    }
    Ok(())
}

/// One-line text form of a search result.
fn describe_result(result: &SearchResult) -> String {
    match result {
        SearchResult::Layer {
            name,
            id,
            relevance,
            match_type,
            color,
            ..
        } => format!(
            "{relevance:>4}  {:<8}  layer    {name} [{id}] {}",
            match_type.as_ref(),
            color.color
        ),
        SearchResult::Feature {
            layer_name,
            name,
            id,
            relevance,
            match_type,
            area_acres,
            ..
        } => {
            let id_part = if id.is_empty() {
                String::new()
            } else {
                format!(" #{id}")
            };
            let area_part = area_acres
                .map(|acres| format!(" ({acres:.2} ac)"))
                .unwrap_or_default();
            format!(
                "{relevance:>4}  {:<8}  feature  {name} in {layer_name}{id_part}{area_part}",
                match_type.as_ref()
            )
        }
    }
}

// ---------------------------------------------------------------------------
// Measurement and validation
// ---------------------------------------------------------------------------

pub fn cmd_measure(
    registry: &LayerRegistry,
    layer_id: &str,
    feature_index: Option<usize>,
    area_unit: AreaUnit,
    length_unit: LengthUnit,
    output: Output,
) -> CmdResult {
    let layer = registry
        .get(layer_id)
        .ok_or_else(|| format!("Layer '{layer_id}' not found"))?;

    let names = get_feature_names(layer);
    let selected: Vec<_> = match feature_index {
        Some(index) => vec![names.get(index).ok_or_else(|| {
            format!("Layer '{layer_id}' has no feature {index} ({} features)", names.len())
        })?],
        None => names.iter().collect(),
    };

    if output.json {
        let features: Vec<_> = selected
            .iter()
            .map(|entry| {
                json!({
                    "name": entry.name,
                    "id": entry.id,
                    "perimeter": perimeter(entry.feature, length_unit),
                    "metrics": shape_metrics(entry.feature),
                })
            })
            .collect();
        return output.print_json(&json!({
            "layer": layer_id,
            "lengthUnit": length_unit,
            "statistics": layer_statistics(layer),
            "features": features,
        }));
    }

    for entry in &selected {
        let metrics = shape_metrics(entry.feature);
        println!("{}", entry.name);
        println!("  area:         {}", format_area(metrics.area_m2, area_unit));
        println!(
            "  perimeter:    {:.2} {length_unit}",
            perimeter(entry.feature, length_unit)
        );
        println!("  compactness:  {:.4}", metrics.compactness);
        println!("  elongation:   {:.4}", metrics.elongation);
        println!("  shape index:  {:.4}", metrics.shape_index);
        println!("  aspect ratio: {:.4}", metrics.aspect_ratio);
        println!("  fractal dim:  {:.4}", metrics.fractal_dimension);
    }

    if feature_index.is_none() {
        let stats = layer_statistics(layer);
        println!();
        println!(
            "{} features ({} named), total area {}",
            stats.feature_count,
            stats.named_feature_count,
            format_area(stats.total_area_m2, area_unit)
        );
        for (kind, count) in &stats.geometry_counts {
            println!("  {kind}: {count}");
        }
    }

    Ok(())
}

pub fn cmd_validate(registry: &LayerRegistry, output: Output) -> CmdResult {
    let results: Vec<_> = registry
        .layers()
        .iter()
        .map(|layer| (layer.id.clone(), validate_layer(layer)))
        .collect();
    let invalid = results.iter().filter(|(_, v)| !v.is_valid).count();

    if output.json {
        let by_layer: serde_json::Map<String, serde_json::Value> = results
            .iter()
            .map(|(id, v)| Ok((id.clone(), serde_json::to_value(v)?)))
            .collect::<Result<_, serde_json::Error>>()?;
        output.print_json(&by_layer)?;
    } else {
        for (id, validation) in &results {
            if validation.is_valid {
                println!("ok       {id}");
            } else {
                println!("invalid  {id}");
                for error in &validation.errors {
                    println!("           {error}");
                }
            }
        }
    }

    if invalid > 0 {
        return Err(format!("{invalid} of {} layers are invalid", results.len()).into());
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Point lookup
// ---------------------------------------------------------------------------

pub fn cmd_locate(
    registry: &LayerRegistry,
    lng: f64,
    lat: f64,
    topmost: bool,
    output: Output,
) -> CmdResult {
    let index = LayerSpatialIndex::build(registry);
    let hits: Vec<FeatureHit> = if topmost {
        index.topmost_at(lng, lat).into_iter().collect()
    } else {
        index.features_at(lng, lat)
    };

    let described: Vec<_> = hits
        .iter()
        .filter_map(|hit| {
            let layer = registry.get(&hit.layer_id)?;
            let feature = layer.features().get(hit.feature_index)?;
            Some((hit, feature.display_name(&layer.name_property)))
        })
        .collect();

    if output.json {
        let values: Vec<_> = described
            .iter()
            .map(|(hit, name)| {
                json!({
                    "layerId": hit.layer_id,
                    "featureIndex": hit.feature_index,
                    "name": name,
                })
            })
            .collect();
        return output.print_json(&values);
    }

    if described.is_empty() {
        println!("No features at ({lng}, {lat})");
    }
    for (hit, name) in described {
        println!("{}[{}]  {name}", hit.layer_id, hit.feature_index);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use field_map_color::ColorInfo;
    use field_map_layer::{Feature, FeatureCollection, create_layer};
    use field_map_search_models::MatchType;

    const TEXT: Output = Output { json: false };
    const JSON: Output = Output { json: true };

    fn fields_registry() -> LayerRegistry {
        let features = (1..=5_i32)
            .map(|i| {
                Feature::point(f64::from(i), 0.0)
                    .with_id(i64::from(i))
                    .with_property("name", format!("Kalo Patch {i}"))
            })
            .collect();
        LayerRegistry::with_layers([create_layer(
            "kalo",
            "Kalo",
            FeatureCollection::new(features),
            "name",
            None,
        )])
    }

    #[test]
    fn validate_passes_for_valid_layers() {
        assert!(cmd_validate(&fields_registry(), TEXT).is_ok());
        assert!(cmd_validate(&fields_registry(), JSON).is_ok());
    }

    #[test]
    fn validate_fails_when_any_layer_is_invalid() {
        let mut registry = fields_registry();
        registry.add_layer(create_layer(
            "unnamed",
            "",
            FeatureCollection::default(),
            "name",
            None,
        ));

        let err = cmd_validate(&registry, TEXT).unwrap_err();
        assert_eq!(err.to_string(), "1 of 2 layers are invalid");
        assert!(cmd_validate(&registry, JSON).is_err());
    }

    #[test]
    fn search_uses_config_max_results() {
        let registry = fields_registry();
        let config = SearchConfig::from_toml_str("[options]\nmax_results = 3").unwrap();
        let request = SearchRequest::new("kalo patch", SearchMode::All);

        assert_eq!(run_search(&registry, config, &request).len(), 3);
        assert!(cmd_search(&registry, config, "kalo patch", SearchMode::All, None, None, TEXT).is_ok());
    }

    #[test]
    fn max_results_flag_overrides_config() {
        let registry = fields_registry();
        let config = SearchConfig::from_toml_str("[options]\nmax_results = 3").unwrap();
        let mut overridden = config;
        overridden.options = overridden.options.with_max_results(4);
        let request = SearchRequest::new("kalo patch", SearchMode::All);

        assert_eq!(run_search(&registry, overridden, &request).len(), 4);
        assert!(
            cmd_search(&registry, config, "kalo patch", SearchMode::All, None, Some(4), JSON)
                .is_ok()
        );
    }

    #[test]
    fn search_colors_follow_registry_order() {
        let mut registry = fields_registry();
        registry.add_layer(create_layer(
            "terraces",
            "Terraces",
            FeatureCollection::default(),
            "name",
            None,
        ));
        let request = SearchRequest::new("terraces", SearchMode::Layers);
        let results = run_search(&registry, SearchConfig::default(), &request);

        let Some(SearchResult::Layer { color, .. }) = results.first() else {
            panic!("expected a layer result");
        };
        assert_eq!(color.color, ColorRegistry::new().palette()[1].color);
    }

    #[test]
    fn measure_rejects_unknown_layer_and_feature() {
        let registry = fields_registry();
        assert!(
            cmd_measure(&registry, "missing", None, AreaUnit::Acres, LengthUnit::Meters, TEXT)
                .is_err()
        );
        assert!(
            cmd_measure(&registry, "kalo", Some(99), AreaUnit::Acres, LengthUnit::Meters, TEXT)
                .is_err()
        );
        assert!(
            cmd_measure(&registry, "kalo", Some(0), AreaUnit::Acres, LengthUnit::Meters, JSON)
                .is_ok()
        );
    }

    #[test]
    fn locate_runs_in_both_formats() {
        let registry = fields_registry();
        assert!(cmd_locate(&registry, 1.0, 0.0, false, TEXT).is_ok());
        assert!(cmd_locate(&registry, 1.0, 0.0, true, JSON).is_ok());
    }

    #[test]
    fn describes_layer_result() {
        let line = describe_result(&SearchResult::Layer {
            layer_id: "fields".to_string(),
            name: "Fields".to_string(),
            id: "fields".to_string(),
            relevance: 100,
            match_type: MatchType::Exact,
            color: ColorInfo::custom("#e6194b"),
        });
        assert!(line.contains("layer"));
        assert!(line.contains("Fields [fields]"));
        assert!(line.contains("#e6194b"));
    }

    #[test]
    fn describes_feature_result_with_area() {
        let line = describe_result(&SearchResult::Feature {
            layer_id: "fields".to_string(),
            layer_name: "Fields".to_string(),
            feature: field_map_layer::Feature::point(0.0, 0.0),
            name: "Lo'i".to_string(),
            id: "12".to_string(),
            relevance: 40,
            match_type: MatchType::Contains,
            area_acres: Some(3.5),
        });
        assert!(line.contains("Lo'i in Fields #12 (3.50 ac)"), "{line}");
    }
}

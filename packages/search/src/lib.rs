#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Relevance-ranked search across map layers.
//!
//! A [`SearchEngine`] borrows the caller's [`LayerRegistry`] and
//! [`ColorRegistry`] and matches a query against layer names, layer ids,
//! feature names, and feature ids. Every candidate is classified as an
//! exact, contains, or fuzzy match and scored from the configured
//! [`RelevanceBands`]; results are sorted by score with registry order
//! breaking ties.
//!
//! Searches never fail. A layer whose data is missing or malformed simply
//! contributes no feature candidates.

pub mod matching;
pub mod suggest;

pub use field_map_search_models::{
    MatchType, RelevanceBands, SearchConfig, SearchMode, SearchOptions, SearchRequest,
    SearchResult,
};

use field_map_color::ColorRegistry;
use field_map_geometry::area_in_acres;
use field_map_layer::LayerRegistry;
use field_map_layer_models::{Feature, Layer};
use field_map_search_models::Band;

use crate::matching::{match_candidate, normalize};

/// Search over a borrowed layer registry.
#[derive(Debug, Clone, Copy)]
pub struct SearchEngine<'a> {
    layers: &'a LayerRegistry,
    colors: &'a ColorRegistry,
    config: SearchConfig,
}

impl<'a> SearchEngine<'a> {
    /// Creates an engine with the default configuration.
    #[must_use]
    pub fn new(layers: &'a LayerRegistry, colors: &'a ColorRegistry) -> Self {
        Self {
            layers,
            colors,
            config: SearchConfig::default(),
        }
    }

    #[must_use]
    pub const fn with_config(mut self, config: SearchConfig) -> Self {
        self.config = config;
        self
    }

    #[must_use]
    pub const fn with_options(mut self, options: SearchOptions) -> Self {
        self.config.options = options;
        self
    }

    #[must_use]
    pub const fn options(&self) -> &SearchOptions {
        &self.config.options
    }

    /// Runs `request` and returns at most `max_results` results, best
    /// first.
    #[must_use]
    pub fn search(&self, request: &SearchRequest) -> Vec<SearchResult> {
        let query = normalize(&request.query, self.config.options.case_sensitive);
        if query.is_empty() {
            return Vec::new();
        }

        let mut results = Vec::new();
        match request.mode {
            SearchMode::Layers => {
                for layer in self.layers {
                    results.extend(self.match_layer(layer, &query));
                }
            }
            SearchMode::Features => {
                let Some(active) = request.active_layer.as_deref() else {
                    log::debug!("Feature search without an active layer");
                    return Vec::new();
                };
                let Some(layer) = self.layers.get(active) else {
                    log::debug!("Active layer '{active}' is not registered");
                    return Vec::new();
                };
                self.match_features(layer, &query, &mut results);
            }
            SearchMode::All => {
                for layer in self.layers {
                    results.extend(self.match_layer(layer, &query));
                    self.match_features(layer, &query, &mut results);
                }
            }
        }

        self.rank(results, &query, request.mode)
    }

    /// Searches layer names and ids.
    #[must_use]
    pub fn search_layers(&self, query: &str) -> Vec<SearchResult> {
        self.search(&SearchRequest::new(query, SearchMode::Layers))
    }

    /// Searches the features of one layer.
    #[must_use]
    pub fn search_features(&self, layer_id: &str, query: &str) -> Vec<SearchResult> {
        self.search(&SearchRequest::new(query, SearchMode::Features).with_active_layer(layer_id))
    }

    /// Searches every layer and feature.
    #[must_use]
    pub fn search_all(&self, query: &str) -> Vec<SearchResult> {
        self.search(&SearchRequest::new(query, SearchMode::All))
    }

    fn rank(&self, mut results: Vec<SearchResult>, query: &str, mode: SearchMode) -> Vec<SearchResult> {
        // stable, so equal scores keep registry then feature order
        results.sort_by(|a, b| b.relevance().cmp(&a.relevance()));

        let total = results.len();
        results.truncate(self.config.options.max_results);
        log::debug!(
            "Search '{query}' ({mode}): {total} matches, returning {}",
            results.len()
        );
        results
    }

    /// Best match of the layer's name or id, as one result.
    fn match_layer(&self, layer: &Layer, query: &str) -> Option<SearchResult> {
        let band = self.config.relevance.layer;
        let (relevance, match_type) = [layer.name.as_str(), layer.id.as_str()]
            .into_iter()
            .filter_map(|candidate| self.score(candidate, query, band))
            .max_by_key(|(relevance, _)| *relevance)?;

        Some(SearchResult::Layer {
            layer_id: layer.id.clone(),
            name: layer.name.clone(),
            id: layer.id.clone(),
            relevance,
            match_type,
            color: self.colors.assign_color(&layer.id),
        })
    }

    fn match_features(&self, layer: &Layer, query: &str, results: &mut Vec<SearchResult>) {
        if !layer.has_feature_sequence() {
            log::debug!(
                "Skipping features of layer '{}': data is missing or malformed",
                layer.id
            );
            return;
        }

        for feature in layer.features() {
            if let Some(result) = self.match_feature(layer, feature, query) {
                results.push(result);
            }
        }
    }

    /// Best match of the feature's resolved name or id, as one result.
    fn match_feature(&self, layer: &Layer, feature: &Feature, query: &str) -> Option<SearchResult> {
        let name = feature.display_name(&layer.name_property);
        let id = feature.resolved_id();
        let bands = self.config.relevance;

        let by_name = self.score(&name, query, bands.feature_name);
        let by_id = self.score(&id, query, bands.feature_id);
        let (relevance, match_type) = match (by_name, by_id) {
            (Some(n), Some(i)) => {
                if i.0 > n.0 {
                    i
                } else {
                    n
                }
            }
            (Some(best), None) | (None, Some(best)) => best,
            (None, None) => return None,
        };

        Some(SearchResult::Feature {
            layer_id: layer.id.clone(),
            layer_name: layer.name.clone(),
            feature: feature.clone(),
            name,
            id,
            relevance,
            match_type,
            area_acres: feature.is_polygonal().then(|| area_in_acres(feature)),
        })
    }

    fn score(&self, candidate: &str, query: &str, band: Band) -> Option<(u32, MatchType)> {
        match_candidate(candidate, query, &self.config.options)
            .map(|match_type| (band.score(match_type), match_type))
    }
}

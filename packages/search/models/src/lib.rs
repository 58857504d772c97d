#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Request, result, and configuration types for layer and feature search.

pub mod config;

pub use config::{Band, RelevanceBands, SearchConfig, SearchConfigError, SearchOptions};

use field_map_color::ColorInfo;
use field_map_layer_models::Feature;
use serde::{Deserialize, Serialize};
use strum_macros::{AsRefStr, Display, EnumString};

/// Which candidates a search considers.
#[derive(
    Debug,
    Clone,
    Copy,
    Default,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    AsRefStr,
)]
#[serde(rename_all = "camelCase")]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
pub enum SearchMode {
    /// Layer names and ids only.
    Layers,
    /// Feature names and ids of the active layer only.
    Features,
    /// Layer names, layer ids, feature names and feature ids of every
    /// layer.
    #[default]
    All,
}

/// How a candidate string matched the query.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    AsRefStr,
)]
#[serde(rename_all = "camelCase")]
#[strum(serialize_all = "snake_case")]
pub enum MatchType {
    /// Candidate equals the query.
    Exact,
    /// Candidate contains the query.
    Contains,
    /// Candidate contains the first three characters of the query.
    Fuzzy,
}

/// A single ranked search hit.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "camelCase", rename_all_fields = "camelCase")]
pub enum SearchResult {
    /// The layer itself matched by name or id.
    Layer {
        layer_id: String,
        /// Layer display name.
        name: String,
        /// Layer id, repeated for display alongside feature ids.
        id: String,
        relevance: u32,
        match_type: MatchType,
        /// Color assigned to the layer.
        color: ColorInfo,
    },
    /// A feature matched by name or resolved id.
    Feature {
        /// Owning layer.
        layer_id: String,
        layer_name: String,
        feature: Feature,
        /// Resolved feature name.
        name: String,
        /// Resolved feature id, possibly empty.
        id: String,
        relevance: u32,
        match_type: MatchType,
        /// Rounded area in acres for polygonal features.
        area_acres: Option<f64>,
    },
}

impl SearchResult {
    /// Ordering score; higher ranks first.
    #[must_use]
    pub const fn relevance(&self) -> u32 {
        match self {
            Self::Layer { relevance, .. } | Self::Feature { relevance, .. } => *relevance,
        }
    }

    #[must_use]
    pub const fn match_type(&self) -> MatchType {
        match self {
            Self::Layer { match_type, .. } | Self::Feature { match_type, .. } => *match_type,
        }
    }

    /// Display name of the matched layer or feature.
    #[must_use]
    pub fn name(&self) -> &str {
        match self {
            Self::Layer { name, .. } | Self::Feature { name, .. } => name,
        }
    }

    /// Id of the matched layer or resolved id of the matched feature.
    #[must_use]
    pub fn id(&self) -> &str {
        match self {
            Self::Layer { id, .. } | Self::Feature { id, .. } => id,
        }
    }

    /// Id of the layer the hit belongs to.
    #[must_use]
    pub fn layer_id(&self) -> &str {
        match self {
            Self::Layer { layer_id, .. } | Self::Feature { layer_id, .. } => layer_id,
        }
    }

    #[must_use]
    pub const fn is_layer(&self) -> bool {
        matches!(self, Self::Layer { .. })
    }
}

/// A query against a layer registry.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchRequest {
    /// Raw user input; trimmed and normalized by the engine.
    pub query: String,
    #[serde(default)]
    pub mode: SearchMode,
    /// Layer searched in [`SearchMode::Features`] mode.
    #[serde(default)]
    pub active_layer: Option<String>,
}

impl SearchRequest {
    #[must_use]
    pub fn new(query: impl Into<String>, mode: SearchMode) -> Self {
        Self {
            query: query.into(),
            mode,
            active_layer: None,
        }
    }

    /// Sets the layer searched in [`SearchMode::Features`] mode.
    #[must_use]
    pub fn with_active_layer(mut self, layer_id: impl Into<String>) -> Self {
        self.active_layer = Some(layer_id.into());
        self
    }
}

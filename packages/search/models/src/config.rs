//! Search tuning: options, relevance bands, and their TOML form.
//!
//! Every field is defaulted, so a config file only lists what it changes:
//!
//! ```toml
//! [options]
//! max_results = 20
//! fuzzy = false
//!
//! [relevance.feature_name]
//! exact = 95
//! ```

use serde::{Deserialize, Deserializer, Serialize};
use thiserror::Error;

use crate::MatchType;

/// Errors that can occur while loading search configuration.
#[derive(Debug, Error)]
pub enum SearchConfigError {
    /// Configuration TOML could not be parsed.
    #[error(transparent)]
    Toml(#[from] toml::de::Error),
}

/// Scores for one kind of candidate, by match type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Band {
    pub exact: u32,
    pub contains: u32,
    pub fuzzy: u32,
}

impl Band {
    /// Score awarded for `match_type`.
    #[must_use]
    pub const fn score(&self, match_type: MatchType) -> u32 {
        match match_type {
            MatchType::Exact => self.exact,
            MatchType::Contains => self.contains,
            MatchType::Fuzzy => self.fuzzy,
        }
    }
}

/// A band table as written in a config file. Missing scores fall back to
/// the band being overridden.
#[derive(Debug, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
struct BandOverride {
    exact: Option<u32>,
    contains: Option<u32>,
    fuzzy: Option<u32>,
}

impl BandOverride {
    fn apply(self, base: Band) -> Band {
        Band {
            exact: self.exact.unwrap_or(base.exact),
            contains: self.contains.unwrap_or(base.contains),
            fuzzy: self.fuzzy.unwrap_or(base.fuzzy),
        }
    }
}

fn layer_band<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Band, D::Error> {
    Ok(BandOverride::deserialize(deserializer)?.apply(RelevanceBands::LAYER))
}

fn feature_name_band<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Band, D::Error> {
    Ok(BandOverride::deserialize(deserializer)?.apply(RelevanceBands::FEATURE_NAME))
}

fn feature_id_band<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Band, D::Error> {
    Ok(BandOverride::deserialize(deserializer)?.apply(RelevanceBands::FEATURE_ID))
}

/// Relevance scores by candidate kind and match type.
///
/// Scores only order results. The defaults rank any layer match above a
/// feature-name match of the same type, and feature names above feature
/// ids.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RelevanceBands {
    /// Layer name or layer id.
    #[serde(deserialize_with = "layer_band")]
    pub layer: Band,
    #[serde(deserialize_with = "feature_name_band")]
    pub feature_name: Band,
    #[serde(deserialize_with = "feature_id_band")]
    pub feature_id: Band,
}

impl RelevanceBands {
    pub const LAYER: Band = Band {
        exact: 100,
        contains: 50,
        fuzzy: 25,
    };

    pub const FEATURE_NAME: Band = Band {
        exact: 90,
        contains: 40,
        fuzzy: 20,
    };

    pub const FEATURE_ID: Band = Band {
        exact: 80,
        contains: 30,
        fuzzy: 15,
    };
}

impl Default for RelevanceBands {
    fn default() -> Self {
        Self {
            layer: Self::LAYER,
            feature_name: Self::FEATURE_NAME,
            feature_id: Self::FEATURE_ID,
        }
    }
}

/// Options controlling matching and truncation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchOptions {
    /// Maximum number of results returned by a search.
    pub max_results: usize,
    /// Whether prefix-of-query fuzzy matches are accepted.
    pub fuzzy: bool,
    pub case_sensitive: bool,
    /// Queries shorter than this produce no suggestions.
    pub min_suggestion_len: usize,
}

impl SearchOptions {
    pub const DEFAULT_MAX_RESULTS: usize = 50;
    pub const DEFAULT_MIN_SUGGESTION_LEN: usize = 2;

    #[must_use]
    pub const fn with_max_results(mut self, max_results: usize) -> Self {
        self.max_results = max_results;
        self
    }

    #[must_use]
    pub const fn with_fuzzy(mut self, fuzzy: bool) -> Self {
        self.fuzzy = fuzzy;
        self
    }

    #[must_use]
    pub const fn with_case_sensitive(mut self, case_sensitive: bool) -> Self {
        self.case_sensitive = case_sensitive;
        self
    }

    #[must_use]
    pub const fn with_min_suggestion_len(mut self, min_suggestion_len: usize) -> Self {
        self.min_suggestion_len = min_suggestion_len;
        self
    }
}

impl Default for SearchOptions {
    fn default() -> Self {
        Self {
            max_results: Self::DEFAULT_MAX_RESULTS,
            fuzzy: true,
            case_sensitive: false,
            min_suggestion_len: Self::DEFAULT_MIN_SUGGESTION_LEN,
        }
    }
}

/// Complete search configuration.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchConfig {
    pub options: SearchOptions,
    pub relevance: RelevanceBands,
}

impl SearchConfig {
    /// Parses a configuration file, filling unspecified fields with
    /// defaults.
    ///
    /// # Errors
    ///
    /// Returns [`SearchConfigError::Toml`] if the TOML is malformed or a
    /// field has the wrong type.
    pub fn from_toml_str(toml_str: &str) -> Result<Self, SearchConfigError> {
        Ok(toml::de::from_str(toml_str)?)
    }
}

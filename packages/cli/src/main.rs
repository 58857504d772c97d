#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Command-line front end for the field map layer tools.
//!
//! Loads GeoJSON files as layers and runs searches, suggestions,
//! measurements, validation, and point lookups against them. Set
//! `RUST_LOG=debug` to see ranking and loading details.

mod commands;
mod layers;

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use field_map_geometry::{AreaUnit, LengthUnit};
use field_map_search_models::{SearchConfig, SearchMode};

use crate::layers::LayerSpec;

// ---------------------------------------------------------------------------
// CLI definitions
// ---------------------------------------------------------------------------

/// Search, measure, and validate map layers.
#[derive(Parser)]
#[command(name = "field_map")]
#[command(about = "Search, measure, and validate GeoJSON map layers")]
struct Cli {
    /// Layer to load, as `<id>=<path>[:<name_property>]`. Repeatable;
    /// layers keep the order given.
    #[arg(long = "layer", global = true)]
    layers: Vec<LayerSpec>,

    /// TOML file overriding search options and relevance bands.
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Print results as JSON instead of text.
    #[arg(long, global = true)]
    json: bool,

    /// Subcommand to execute.
    #[command(subcommand)]
    command: Commands,
}

/// Top-level subcommands.
#[derive(Subcommand)]
enum Commands {
    /// Ranked search over layer names, feature names, and ids.
    Search {
        /// Text to search for.
        query: String,

        /// Which candidates to match: `layers`, `features`, or `all`.
        #[arg(long, default_value = "all")]
        mode: SearchMode,

        /// Layer searched in `features` mode.
        #[arg(long)]
        active_layer: Option<String>,

        /// Maximum number of results (overrides the config file).
        #[arg(long)]
        max_results: Option<usize>,
    },

    /// Autocomplete suggestions for a partial query.
    Suggest {
        /// Partial query, at least two characters.
        query: String,

        /// Maximum number of suggestions.
        #[arg(long, default_value_t = 10)]
        max: usize,
    },

    /// Area, perimeter, and shape indices of a layer's features.
    Measure {
        /// Id of the layer to measure.
        layer: String,

        /// Measure only the feature at this index.
        #[arg(long)]
        feature: Option<usize>,

        /// Area unit: `acres`, `hectares`, `square_meters`, ...
        #[arg(long, default_value = "acres")]
        area_unit: AreaUnit,

        /// Length unit: `meters`, `kilometers`, `miles`, or `feet`.
        #[arg(long, default_value = "meters")]
        length_unit: LengthUnit,
    },

    /// Check every loaded layer and report all problems.
    Validate,

    /// Features under a longitude/latitude point.
    Locate {
        /// Longitude in degrees.
        #[arg(allow_negative_numbers = true)]
        lng: f64,

        /// Latitude in degrees.
        #[arg(allow_negative_numbers = true)]
        lat: f64,

        /// Report only the smallest feature under the point.
        #[arg(long)]
        topmost: bool,
    },
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    pretty_env_logger::init();
    let cli = Cli::parse();

    let config = match &cli.config {
        Some(path) => {
            let text = std::fs::read_to_string(path)
                .map_err(|e| format!("Failed to read {}: {e}", path.display()))?;
            SearchConfig::from_toml_str(&text)?
        }
        None => SearchConfig::default(),
    };

    let registry = layers::load_registry(&cli.layers)?;
    log::info!("Loaded {} layers", registry.len());

    let output = commands::Output { json: cli.json };

    match cli.command {
        Commands::Search {
            query,
            mode,
            active_layer,
            max_results,
        } => commands::cmd_search(
            &registry,
            config,
            &query,
            mode,
            active_layer,
            max_results,
            output,
        ),
        Commands::Suggest { query, max } => {
            commands::cmd_suggest(&registry, config, &query, max, output)
        }
        Commands::Measure {
            layer,
            feature,
            area_unit,
            length_unit,
        } => commands::cmd_measure(&registry, &layer, feature, area_unit, length_unit, output),
        Commands::Validate => commands::cmd_validate(&registry, output),
        Commands::Locate { lng, lat, topmost } => {
            commands::cmd_locate(&registry, lng, lat, topmost, output)
        }
    }
}

#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Stable, visually distinct colors for map layers.
//!
//! A [`ColorRegistry`] hands each layer id a color from a fixed palette
//! and remembers it until [`ColorRegistry::reset`] is called. Registries
//! are plain values owned by the caller, so independent map views (or
//! tests) never share assignments.

pub mod palette;

pub use palette::{DEFAULT_PALETTE_TOML, default_palette, palette_from_toml};

use std::sync::{Mutex, MutexGuard, PoisonError};

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Name given to colors that are not in the palette.
pub const CUSTOM_COLOR_NAME: &str = "Custom";

/// Description given to colors that are not in the palette.
pub const CUSTOM_COLOR_DESCRIPTION: &str = "Custom color";

/// Errors that can occur while building a color registry.
#[derive(Debug, Error)]
pub enum ColorError {
    /// A registry needs at least one color to assign.
    #[error("Palette must contain at least one color")]
    EmptyPalette,

    /// Palette TOML could not be parsed.
    #[error(transparent)]
    Palette(#[from] toml::de::Error),
}

/// A palette entry.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ColorInfo {
    /// CSS hex color, e.g. `"#e6194b"`.
    pub color: String,
    /// Short human-readable name.
    pub name: String,
    pub description: String,
}

impl ColorInfo {
    /// Record for a color that is not in any palette.
    #[must_use]
    pub fn custom(color: impl Into<String>) -> Self {
        Self {
            color: color.into(),
            name: CUSTOM_COLOR_NAME.to_string(),
            description: CUSTOM_COLOR_DESCRIPTION.to_string(),
        }
    }
}

/// Layer id to color assignments, in assignment order.
#[derive(Debug, Default)]
struct Assignments {
    entries: Vec<(String, ColorInfo)>,
}

impl Assignments {
    fn get(&self, layer_id: &str) -> Option<&ColorInfo> {
        self.entries
            .iter()
            .find(|(id, _)| id == layer_id)
            .map(|(_, info)| info)
    }

    fn in_use(&self, color: &str) -> bool {
        self.entries.iter().any(|(_, info)| info.color == color)
    }
}

/// Per-layer color assignment table.
///
/// All methods take `&self`; the table lives behind a mutex so a registry
/// can be shared between threads.
#[derive(Debug)]
pub struct ColorRegistry {
    palette: Vec<ColorInfo>,
    assignments: Mutex<Assignments>,
}

impl Default for ColorRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl ColorRegistry {
    /// Creates a registry over the built-in palette.
    ///
    /// # Panics
    ///
    /// Panics if the embedded palette fails to parse, which is a build
    /// defect caught by this crate's tests.
    #[must_use]
    pub fn new() -> Self {
        Self {
            palette: default_palette(),
            assignments: Mutex::new(Assignments::default()),
        }
    }

    /// Creates a registry over a custom palette.
    ///
    /// # Errors
    ///
    /// Returns [`ColorError::EmptyPalette`] if `palette` is empty.
    pub fn with_palette(palette: Vec<ColorInfo>) -> Result<Self, ColorError> {
        if palette.is_empty() {
            return Err(ColorError::EmptyPalette);
        }
        Ok(Self {
            palette,
            assignments: Mutex::new(Assignments::default()),
        })
    }

    /// The palette colors are drawn from, in assignment order.
    #[must_use]
    pub fn palette(&self) -> &[ColorInfo] {
        &self.palette
    }

    /// Returns the color for `layer_id`, assigning one on first use.
    ///
    /// New layers get the first palette color not held by another layer.
    /// Once every color is taken, assignment cycles through the palette by
    /// assignment count, so colors start repeating.
    pub fn assign_color(&self, layer_id: &str) -> ColorInfo {
        let mut assignments = self.lock();

        if let Some(existing) = assignments.get(layer_id) {
            return existing.clone();
        }

        let info = self
            .palette
            .iter()
            .find(|candidate| !assignments.in_use(&candidate.color))
            .unwrap_or_else(|| &self.palette[assignments.entries.len() % self.palette.len()])
            .clone();

        log::debug!("Assigned color {} ({}) to layer '{layer_id}'", info.color, info.name);
        assignments
            .entries
            .push((layer_id.to_string(), info.clone()));

        info
    }

    /// The color already assigned to `layer_id`, without assigning one.
    #[must_use]
    pub fn color_for(&self, layer_id: &str) -> Option<ColorInfo> {
        self.lock().get(layer_id).cloned()
    }

    /// Palette entry for `color` (ignoring ASCII case), or a
    /// [`ColorInfo::custom`] record.
    #[must_use]
    pub fn lookup_by_color(&self, color: &str) -> ColorInfo {
        self.palette
            .iter()
            .find(|info| info.color.eq_ignore_ascii_case(color))
            .cloned()
            .unwrap_or_else(|| ColorInfo::custom(color))
    }

    /// Snapshot of every assignment, in the order they were made.
    #[must_use]
    pub fn assignments(&self) -> Vec<(String, ColorInfo)> {
        self.lock().entries.clone()
    }

    /// Forgets every assignment.
    pub fn reset(&self) {
        let mut assignments = self.lock();
        log::debug!("Clearing {} color assignments", assignments.entries.len());
        assignments.entries.clear();
    }

    /// The table is only written in single pushes or clears, so a panic in
    /// another holder cannot leave it half-updated.
    fn lock(&self) -> MutexGuard<'_, Assignments> {
        self.assignments
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
    }
}

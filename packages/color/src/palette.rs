//! Built-in layer palette, embedded at compile time from `palette.toml`.

use serde::Deserialize;

use crate::{ColorError, ColorInfo};

/// Number of colors in the built-in palette. Enforced by a test.
#[cfg(test)]
const EXPECTED_COLOR_COUNT: usize = 18;

/// Raw TOML of the built-in palette.
pub const DEFAULT_PALETTE_TOML: &str = include_str!("../palette.toml");

#[derive(Debug, Deserialize)]
struct PaletteFile {
    colors: Vec<ColorInfo>,
}

/// Parses a palette from TOML containing `[[colors]]` tables with
/// `color`, `name` and `description` keys.
///
/// # Errors
///
/// * [`ColorError::Palette`] if the TOML is malformed
/// * [`ColorError::EmptyPalette`] if it defines no colors
pub fn palette_from_toml(toml_str: &str) -> Result<Vec<ColorInfo>, ColorError> {
    let file: PaletteFile = toml::de::from_str(toml_str)?;
    if file.colors.is_empty() {
        return Err(ColorError::EmptyPalette);
    }
    Ok(file.colors)
}

/// Returns the built-in palette.
///
/// # Panics
///
/// Panics if the embedded palette fails to parse. It is a compile-time
/// constant, so a failure is a development error caught by tests.
#[must_use]
pub fn default_palette() -> Vec<ColorInfo> {
    palette_from_toml(DEFAULT_PALETTE_TOML)
        .unwrap_or_else(|e| panic!("Failed to parse built-in palette: {e}"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeSet;

    #[test]
    fn loads_default_palette() {
        let palette = default_palette();
        assert_eq!(
            palette.len(),
            EXPECTED_COLOR_COUNT,
            "Expected {EXPECTED_COLOR_COUNT} palette colors, found {}. \
             Update EXPECTED_COLOR_COUNT after adding/removing colors.",
            palette.len()
        );
        assert!(palette.len() >= 15);
    }

    #[test]
    fn palette_colors_are_unique() {
        let mut seen = BTreeSet::new();
        for info in default_palette() {
            assert!(
                seen.insert(info.color.to_lowercase()),
                "Duplicate palette color: {}",
                info.color
            );
        }
    }

    #[test]
    fn palette_entries_are_complete() {
        for info in default_palette() {
            assert!(info.color.starts_with('#'), "Bad color: {}", info.color);
            assert!(!info.name.is_empty(), "Color {} has no name", info.color);
            assert!(
                !info.description.is_empty(),
                "Color {} has no description",
                info.color
            );
        }
    }

    #[test]
    fn rejects_empty_and_malformed_palettes() {
        assert!(matches!(
            palette_from_toml("colors = []"),
            Err(ColorError::EmptyPalette)
        ));
        assert!(matches!(
            palette_from_toml("colors = 3"),
            Err(ColorError::Palette(_))
        ));
    }
}

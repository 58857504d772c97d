//! Area and length units.

use serde::{Deserialize, Serialize};
use strum_macros::{AsRefStr, Display, EnumString};

/// Units for area measurements.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    AsRefStr,
)]
#[serde(rename_all = "camelCase")]
#[strum(serialize_all = "snake_case")]
pub enum AreaUnit {
    /// Square meters (the base unit).
    SquareMeters,
    /// International acres.
    Acres,
    /// Hectares.
    Hectares,
    /// Square feet.
    SquareFeet,
    /// Square kilometers.
    SquareKilometers,
    /// Square statute miles.
    SquareMiles,
}

impl AreaUnit {
    /// How many of this unit make up one square meter.
    #[must_use]
    pub const fn per_square_meter(self) -> f64 {
        match self {
            Self::SquareMeters => 1.0,
            Self::Acres => 0.000_247_105,
            Self::Hectares => 0.0001,
            Self::SquareFeet => 10.763_910_417,
            Self::SquareKilometers => 0.000_001,
            Self::SquareMiles => 3.861_021_585_424_458e-7,
        }
    }

    /// Converts a square-meter value into this unit.
    #[must_use]
    pub fn from_square_meters(self, square_meters: f64) -> f64 {
        square_meters * self.per_square_meter()
    }

    /// Converts a value in this unit into square meters.
    #[must_use]
    pub fn to_square_meters(self, value: f64) -> f64 {
        value / self.per_square_meter()
    }

    /// Short label used in formatted area strings.
    #[must_use]
    pub const fn abbreviation(self) -> &'static str {
        match self {
            Self::SquareMeters => "m²",
            Self::Acres => "ac",
            Self::Hectares => "ha",
            Self::SquareFeet => "ft²",
            Self::SquareKilometers => "km²",
            Self::SquareMiles => "mi²",
        }
    }

    /// Returns all variants of this enum.
    #[must_use]
    pub const fn all() -> &'static [Self] {
        &[
            Self::SquareMeters,
            Self::Acres,
            Self::Hectares,
            Self::SquareFeet,
            Self::SquareKilometers,
            Self::SquareMiles,
        ]
    }
}

/// Units for lengths and distances.
#[derive(
    Debug,
    Clone,
    Copy,
    Default,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    AsRefStr,
)]
#[serde(rename_all = "camelCase")]
#[strum(serialize_all = "snake_case")]
pub enum LengthUnit {
    /// Meters.
    #[default]
    Meters,
    /// Kilometers.
    Kilometers,
    /// Statute miles.
    Miles,
    /// International feet.
    Feet,
}

impl LengthUnit {
    /// Meters in one of this unit.
    #[must_use]
    pub const fn meters(self) -> f64 {
        match self {
            Self::Meters => 1.0,
            Self::Kilometers => 1000.0,
            Self::Miles => 1609.344,
            Self::Feet => 0.3048,
        }
    }

    /// Converts a meter value into this unit.
    #[must_use]
    pub fn from_meters(self, meters: f64) -> f64 {
        meters / self.meters()
    }

    /// Converts a value in this unit into meters.
    #[must_use]
    pub fn to_meters(self, value: f64) -> f64 {
        value * self.meters()
    }
}

/// Converts an area value between units.
#[must_use]
pub fn convert_area(value: f64, from: AreaUnit, to: AreaUnit) -> f64 {
    if from == to {
        return value;
    }
    to.from_square_meters(from.to_square_meters(value))
}

/// Formats a square-meter area as a label in `unit` with two decimals,
/// e.g. `"12.35 ac"`.
#[must_use]
pub fn format_area(square_meters: f64, unit: AreaUnit) -> String {
    format!(
        "{:.2} {}",
        unit.from_square_meters(square_meters),
        unit.abbreviation()
    )
}

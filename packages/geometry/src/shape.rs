//! Shape quality indices.
//!
//! Every index returns `0.0` instead of `NaN` or infinity when the area or
//! perimeter it divides by is zero, so single points and degenerate rings
//! can be sorted and displayed like any other feature.

use std::f64::consts::PI;

use field_map_layer_models::Feature;
use serde::{Deserialize, Serialize};

use crate::measure::{area, bounding_box, perimeter};
use crate::units::LengthUnit;

/// All shape indices of a feature, computed together.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ShapeMetrics {
    /// Area in square meters.
    pub area_m2: f64,
    /// Perimeter in meters.
    pub perimeter_m: f64,
    /// `4π·A / P²`; 1.0 for a circle.
    pub compactness: f64,
    /// `P² / (4π·A)`; grows as the shape stretches.
    pub elongation: f64,
    /// Same ratio as compactness.
    pub circularity: f64,
    /// Same ratio as compactness.
    pub roundness: f64,
    /// `P / (2·√(π·A))`; 1.0 for a circle.
    pub shape_index: f64,
    /// Bounding box width over height.
    pub aspect_ratio: f64,
    /// `2·ln(P) / ln(A)`.
    pub fractal_dimension: f64,
}

/// Isoperimetric quotient `4π·A / P²`.
#[must_use]
pub fn compactness(feature: &Feature) -> f64 {
    isoperimetric(area(feature), perimeter(feature, LengthUnit::Meters))
}

/// Alias of [`compactness`].
#[must_use]
pub fn circularity(feature: &Feature) -> f64 {
    compactness(feature)
}

/// Alias of [`compactness`].
#[must_use]
pub fn roundness(feature: &Feature) -> f64 {
    compactness(feature)
}

/// Inverse isoperimetric quotient `P² / (4π·A)`.
#[must_use]
pub fn elongation(feature: &Feature) -> f64 {
    let a = area(feature);
    let p = perimeter(feature, LengthUnit::Meters);
    if a <= 0.0 || p <= 0.0 {
        return 0.0;
    }
    finite_or_zero(p.powi(2) / (4.0 * PI * a))
}

/// Perimeter relative to the circumference of a circle of equal area.
#[must_use]
pub fn shape_index(feature: &Feature) -> f64 {
    let a = area(feature);
    let p = perimeter(feature, LengthUnit::Meters);
    if a <= 0.0 || p <= 0.0 {
        return 0.0;
    }
    finite_or_zero(p / (2.0 * (PI * a).sqrt()))
}

/// Bounding box width over height, in degrees.
#[must_use]
pub fn aspect_ratio(feature: &Feature) -> f64 {
    let Ok([min_x, min_y, max_x, max_y]) = bounding_box(feature) else {
        return 0.0;
    };
    let height = max_y - min_y;
    if height <= 0.0 {
        return 0.0;
    }
    finite_or_zero((max_x - min_x) / height)
}

/// Fractal dimension `2·ln(P) / ln(A)`.
#[must_use]
pub fn fractal_dimension(feature: &Feature) -> f64 {
    let a = area(feature);
    let p = perimeter(feature, LengthUnit::Meters);
    if a <= 0.0 || p <= 0.0 {
        return 0.0;
    }
    let ln_a = a.ln();
    if ln_a.abs() < f64::EPSILON {
        return 0.0;
    }
    finite_or_zero(2.0 * p.ln() / ln_a)
}

/// Computes every shape index of `feature`, measuring it only once.
#[must_use]
pub fn shape_metrics(feature: &Feature) -> ShapeMetrics {
    let a = area(feature);
    let p = perimeter(feature, LengthUnit::Meters);
    let quotient = isoperimetric(a, p);

    ShapeMetrics {
        area_m2: a,
        perimeter_m: p,
        compactness: quotient,
        elongation: elongation(feature),
        circularity: quotient,
        roundness: quotient,
        shape_index: shape_index(feature),
        aspect_ratio: aspect_ratio(feature),
        fractal_dimension: fractal_dimension(feature),
    }
}

fn isoperimetric(a: f64, p: f64) -> f64 {
    if a <= 0.0 || p <= 0.0 {
        return 0.0;
    }
    finite_or_zero(4.0 * PI * a / p.powi(2))
}

const fn finite_or_zero(value: f64) -> f64 {
    if value.is_finite() { value } else { 0.0 }
}

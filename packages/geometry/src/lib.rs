#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Geometry analytics over layer features.
//!
//! Pure functions computing area, length, centroids, bounding boxes,
//! shape indices, spherical measurements, and spatial relations. Every
//! function treats its input features as read-only and returns either a
//! number or a new [`Feature`].
//!
//! Areas are spherical (square meters), lengths and distances use the
//! haversine formula on a mean earth radius, matching the measurements
//! shown in the map's labels and popups.

pub mod measure;
pub mod relation;
pub mod shape;
pub mod spherical;
pub mod transform;
pub mod units;

pub use field_map_layer_models::Feature;
pub use measure::{
    BoundingBox, area, area_in_acres, area_in_hectares, area_in_square_feet,
    area_in_square_kilometers, area_weighted_centroid, bounding_box, bounding_box_polygon,
    centroid, line_length, perimeter, total_area,
};
pub use relation::{contains, intersection_area, intersects, is_point_in_polygon, within};
pub use shape::{
    ShapeMetrics, aspect_ratio, circularity, compactness, elongation, fractal_dimension,
    roundness, shape_index, shape_metrics,
};
pub use spherical::{
    bearing, destination_point, distance, feature_bearing, feature_destination_point,
    feature_distance, feature_midpoint, midpoint,
};
pub use transform::{buffer, convex_hull, envelope, simplify};
pub use units::{AreaUnit, LengthUnit, convert_area, format_area};

use thiserror::Error;

/// Errors that can occur during geometry analytics.
#[derive(Debug, Error)]
pub enum GeometryError {
    /// The input cannot produce a meaningful result (empty collection,
    /// zero total area, missing geometry).
    #[error("Invalid input: {message}")]
    InvalidInput {
        /// Description of what went wrong.
        message: String,
    },
}

impl GeometryError {
    pub(crate) fn invalid_input(message: impl Into<String>) -> Self {
        Self::InvalidInput {
            message: message.into(),
        }
    }
}

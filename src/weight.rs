//! Bounding-box weight heuristic.
//!
//! Weight is taken to be proportional to box area. This is a stated
//! heuristic, not a calibrated model.

use crate::constants::{DEFAULT_WEIGHT_SCALE_FACTOR, WEIGHT_DECIMAL_PLACES};
use crate::detection::BoundingBox;

/// Estimates bird weight in kilograms from box geometry.
#[derive(Debug, Clone, Copy)]
pub struct WeightEstimator {
    scale_factor: f64,
}

impl Default for WeightEstimator {
    fn default() -> Self {
        Self::new(DEFAULT_WEIGHT_SCALE_FACTOR)
    }
}

impl WeightEstimator {
    /// Create an estimator with the given kg-per-px² factor.
    pub const fn new(scale_factor: f64) -> Self {
        Self { scale_factor }
    }

    /// `area * scale_factor`, rounded to 3 decimal places.
    ///
    /// Degenerate boxes give a non-positive weight; callers filter if needed.
    pub fn estimate(&self, bbox: &BoundingBox) -> f64 {
        round_to(bbox.area() * self.scale_factor, WEIGHT_DECIMAL_PLACES)
    }
}

/// Round to `places` decimal places, ties to even.
pub(crate) fn round_to(value: f64, places: i32) -> f64 {
    let factor = 10f64.powi(places);
    (value * factor).round_ties_even() / factor
}

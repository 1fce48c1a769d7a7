//! Value parsers for CLI flags.
//!
//! Each returns a `String` error so clap can show it next to the flag.

use crate::constants::{MAX_CROP_TOP_RATIO, confidence};
use std::str::FromStr;

fn parse_number<T: FromStr>(s: &str) -> Result<T, String> {
    s.trim()
        .parse()
        .map_err(|_| format!("'{s}' is not a valid number"))
}

/// Confidence or IoU threshold in `[0.0, 1.0]`.
pub fn parse_confidence(s: &str) -> Result<f32, String> {
    let value: f32 = parse_number(s)?;
    if (confidence::MIN..=confidence::MAX).contains(&value) {
        Ok(value)
    } else {
        Err(format!("value must be between 0.0 and 1.0, got {value}"))
    }
}

/// A float in `[min, max]`; `name` is used in the error message.
pub fn parse_bounded_float(s: &str, min: f64, max: f64, name: &str) -> Result<f64, String> {
    let value: f64 = parse_number(s)?;
    if (min..=max).contains(&value) {
        Ok(value)
    } else {
        Err(format!("{name} must be between {min} and {max}, got {value}"))
    }
}

/// Crop ratio in `[0.0, 0.99]`.
pub fn parse_crop_ratio(s: &str) -> Result<f64, String> {
    parse_bounded_float(s, 0.0, MAX_CROP_TOP_RATIO, "crop ratio")
}

/// Strictly positive, finite kg-per-px² factor.
pub fn parse_scale_factor(s: &str) -> Result<f64, String> {
    let value: f64 = parse_number(s)?;
    if value.is_finite() && value > 0.0 {
        Ok(value)
    } else {
        Err(format!("scale factor must be positive, got {value}"))
    }
}

//! Configuration validation.

use crate::config::{Config, OutputFormat};
use crate::constants::{MAX_CROP_TOP_RATIO, confidence};
use crate::error::{Error, Result};

/// Validate the entire configuration.
pub fn validate_config(config: &Config) -> Result<()> {
    validate_detector(config)?;
    validate_processing(config)?;
    validate_output(config)?;
    Ok(())
}

/// Validate detector thresholds and crop ratio.
fn validate_detector(config: &Config) -> Result<()> {
    let detector = &config.detector;

    for (name, value) in [
        ("confidence_threshold", detector.confidence_threshold),
        ("iou_threshold", detector.iou_threshold),
    ] {
        if !(confidence::MIN..=confidence::MAX).contains(&value) {
            return Err(Error::ConfigValidation {
                message: format!(
                    "{name} must be between {} and {}, got {value}",
                    confidence::MIN,
                    confidence::MAX
                ),
            });
        }
    }

    if !(0.0..=MAX_CROP_TOP_RATIO).contains(&detector.crop_top_ratio) {
        return Err(Error::InvalidCropRatio {
            value: detector.crop_top_ratio,
            max: MAX_CROP_TOP_RATIO,
        });
    }

    Ok(())
}

/// Validate frame sampling and the weight heuristic.
fn validate_processing(config: &Config) -> Result<()> {
    if config.processing.frame_skip == 0 {
        return Err(Error::InvalidFrameSkip);
    }

    let scale = config.weight.scale_factor;
    if !scale.is_finite() || scale <= 0.0 {
        return Err(Error::ConfigValidation {
            message: format!("scale_factor must be positive, got {scale}"),
        });
    }

    Ok(())
}

/// Validate output formats.
fn validate_output(config: &Config) -> Result<()> {
    if !config.output.formats.contains(&OutputFormat::Json) {
        return Err(Error::ConfigValidation {
            message: "output formats must include json".to_string(),
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_valid_config() {
        let config = Config::default();
        assert!(validate_config(&config).is_ok());
    }

    #[test]
    fn test_validate_invalid_confidence() {
        let mut config = Config::default();
        config.detector.confidence_threshold = 1.5;
        assert!(validate_config(&config).is_err());
    }

    #[test]
    fn test_validate_invalid_iou() {
        let mut config = Config::default();
        config.detector.iou_threshold = -0.1;
        assert!(validate_config(&config).is_err());
    }

    #[test]
    fn test_validate_crop_ratio_rejects_one() {
        let mut config = Config::default();
        config.detector.crop_top_ratio = 1.0;
        let result = validate_config(&config);
        assert!(matches!(result, Err(Error::InvalidCropRatio { .. })));
    }

    #[test]
    fn test_validate_crop_ratio_accepts_upper_bound() {
        let mut config = Config::default();
        config.detector.crop_top_ratio = 0.99;
        assert!(validate_config(&config).is_ok());
    }

    #[test]
    fn test_validate_zero_frame_skip() {
        let mut config = Config::default();
        config.processing.frame_skip = 0;
        assert!(matches!(
            validate_config(&config),
            Err(Error::InvalidFrameSkip)
        ));
    }

    #[test]
    fn test_validate_non_positive_scale_factor() {
        let mut config = Config::default();
        config.weight.scale_factor = 0.0;
        assert!(validate_config(&config).is_err());
    }

    #[test]
    fn test_validate_formats_without_json() {
        let mut config = Config::default();
        config.output.formats = vec![OutputFormat::Csv];
        assert!(validate_config(&config).is_err());
    }
}

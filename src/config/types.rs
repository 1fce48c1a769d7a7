//! Configuration type definitions.

use crate::constants::{
    DEFAULT_CONFIDENCE_THRESHOLD, DEFAULT_CROP_TOP_RATIO, DEFAULT_FRAME_SKIP,
    DEFAULT_IOU_THRESHOLD, DEFAULT_WEIGHT_SCALE_FACTOR,
};
use serde::{Deserialize, Serialize};

/// Complete application configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Detection source settings.
    pub detector: DetectorConfig,

    /// Frame processing settings.
    pub processing: ProcessingConfig,

    /// Weight heuristic settings.
    pub weight: WeightConfig,

    /// Output settings.
    pub output: OutputConfig,
}

/// Detection source settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DetectorConfig {
    /// Minimum confidence for a detection to be kept.
    pub confidence_threshold: f32,

    /// IoU above which overlapping detections are suppressed.
    pub iou_threshold: f32,

    /// Fraction of frame height removed from the top before detection.
    pub crop_top_ratio: f64,
}

impl Default for DetectorConfig {
    fn default() -> Self {
        Self {
            confidence_threshold: DEFAULT_CONFIDENCE_THRESHOLD,
            iou_threshold: DEFAULT_IOU_THRESHOLD,
            crop_top_ratio: DEFAULT_CROP_TOP_RATIO,
        }
    }
}

/// Frame processing settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ProcessingConfig {
    /// Process every Nth frame.
    pub frame_skip: u64,

    /// Write annotated frames alongside the report.
    pub annotate: bool,
}

impl Default for ProcessingConfig {
    fn default() -> Self {
        Self {
            frame_skip: DEFAULT_FRAME_SKIP,
            annotate: true,
        }
    }
}

/// Weight heuristic settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct WeightConfig {
    /// Kilograms per square pixel of box area.
    pub scale_factor: f64,
}

impl Default for WeightConfig {
    fn default() -> Self {
        Self {
            scale_factor: DEFAULT_WEIGHT_SCALE_FACTOR,
        }
    }
}

/// Output settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    /// Output formats. The JSON report is mandatory.
    pub formats: Vec<OutputFormat>,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            formats: vec![OutputFormat::Json],
        }
    }
}

/// Supported output formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Full JSON report (summary + per-frame detections).
    Json,
    /// Per-frame count table.
    Csv,
}

impl std::fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Json => write!(f, "json"),
            Self::Csv => write!(f, "csv"),
        }
    }
}

impl std::str::FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "json" => Ok(Self::Json),
            "csv" => Ok(Self::Csv),
            other => Err(format!("unknown output format: {other}")),
        }
    }
}

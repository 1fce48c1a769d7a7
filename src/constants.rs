//! Application-wide constants.
//!
//! All magic numbers and strings are defined here to ensure consistency
//! and make changes easy to track.

/// Application name used for config directories and user-facing messages.
pub const APP_NAME: &str = "birdcount";

/// Default minimum detection confidence passed to the tracker.
pub const DEFAULT_CONFIDENCE_THRESHOLD: f32 = 0.35;

/// Default IoU threshold for overlapping detections.
pub const DEFAULT_IOU_THRESHOLD: f32 = 0.5;

/// Default fraction of frame height removed from the top before detection.
pub const DEFAULT_CROP_TOP_RATIO: f64 = 0.3;

/// Largest accepted crop ratio.
///
/// A ratio of 1.0 would leave no rows for the detector.
pub const MAX_CROP_TOP_RATIO: f64 = 0.99;

/// Process every Nth frame.
pub const DEFAULT_FRAME_SKIP: u64 = 5;

/// Default scale factor converting box area (px²) to kilograms.
pub const DEFAULT_WEIGHT_SCALE_FACTOR: f64 = 0.0008;

/// Decimal places kept for weight estimates.
pub const WEIGHT_DECIMAL_PLACES: i32 = 3;

/// Decimal places kept for offline ratios and averages.
pub const METRIC_DECIMAL_PLACES: i32 = 2;

/// Lock file extension.
pub const LOCK_FILE_EXTENSION: &str = ".birdcount.lock";

/// Tracker export file name inside a frame directory.
pub const TRACKS_FILE_NAME: &str = "tracks.jsonl";

/// Supported frame image extensions.
pub const FRAME_EXTENSIONS: &[&str] = &["png", "jpg", "jpeg", "bmp"];

/// Output file naming.
pub mod output_names {
    /// Suffix appended to the video name for the JSON report.
    pub const REPORT_SUFFIX: &str = "_results.json";
    /// Suffix appended to the video name for the CSV frame table.
    pub const CSV_SUFFIX: &str = "_frame_counts.csv";
    /// Prefix for the annotated frame directory.
    pub const ANNOTATED_PREFIX: &str = "annotated_";
    /// Suffix appended to the report stem for offline accuracy output.
    pub const ACCURACY_SUFFIX: &str = "_accuracy.json";
    /// Default offline output directory, relative to the detections directory's parent.
    pub const EXPERIMENT_DIR: &str = "experiment";
}

/// Confidence value bounds.
pub mod confidence {
    /// Minimum valid confidence value.
    pub const MIN: f32 = 0.0;
    /// Maximum valid confidence value.
    pub const MAX: f32 = 1.0;
}

/// Annotation colours (RGB).
pub mod colors {
    /// Bounding box colour.
    pub const BOX: [u8; 3] = [0, 255, 0];
    /// Crop line colour.
    pub const CROP_LINE: [u8; 3] = [255, 0, 0];
}

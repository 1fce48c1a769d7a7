//! Error types for birdcount.

use std::path::PathBuf;

/// Result type alias for birdcount operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Top-level error type for birdcount.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// I/O operation failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Configuration directory could not be determined.
    #[error("could not determine configuration directory for this platform")]
    ConfigDirNotFound,

    /// Failed to read configuration file.
    #[error("failed to read config file '{path}'")]
    ConfigRead {
        /// Path to the config file.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// Failed to parse configuration file.
    #[error("failed to parse config file '{path}'")]
    ConfigParse {
        /// Path to the config file.
        path: PathBuf,
        /// Underlying parse error.
        #[source]
        source: toml::de::Error,
    },

    /// Failed to write configuration file.
    #[error("failed to write config file '{path}'")]
    ConfigWrite {
        /// Path to the config file.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// Failed to serialize configuration.
    #[error("failed to serialize config")]
    ConfigSerialize {
        /// Underlying serialization error.
        #[source]
        source: toml::ser::Error,
    },

    /// Configuration validation failed.
    #[error("configuration validation failed: {message}")]
    ConfigValidation {
        /// Description of the validation failure.
        message: String,
    },

    /// Crop ratio outside the supported range.
    #[error("crop_top_ratio must be between 0.0 and {max}, got {value}")]
    InvalidCropRatio {
        /// The rejected value.
        value: f64,
        /// Largest accepted value.
        max: f64,
    },

    /// Frame skip interval of zero.
    #[error("frame_skip must be at least 1")]
    InvalidFrameSkip,

    /// No processable inputs were found.
    #[error("no frame directories found in the provided paths")]
    NoValidInputs,

    /// One or more videos in a batch failed.
    #[error("{failed} of {total} video(s) failed to process")]
    BatchFailed {
        /// Videos that failed.
        failed: usize,
        /// Videos attempted or skipped in the batch.
        total: usize,
    },

    /// Frame source could not be opened.
    #[error("failed to open frame source '{path}'")]
    FrameSourceOpen {
        /// Path to the frame directory.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// Frame directory contains no frame images.
    #[error("no frame images found in '{path}'")]
    NoFrames {
        /// Path to the frame directory.
        path: PathBuf,
    },

    /// A frame image could not be decoded.
    #[error("failed to decode frame '{path}'")]
    FrameDecode {
        /// Path to the frame image.
        path: PathBuf,
        /// Underlying image error.
        #[source]
        source: image::ImageError,
    },

    /// Annotated output could not be written.
    #[error("failed to write annotated output '{path}'")]
    AnnotationWrite {
        /// Path to the annotated output.
        path: PathBuf,
        /// Underlying error.
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    /// Tracker export could not be read.
    #[error("failed to read tracker export '{path}'")]
    TracksRead {
        /// Path to the tracker export.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// Tracker export contained a malformed line.
    #[error("malformed tracker export '{path}' at line {line}")]
    TracksParse {
        /// Path to the tracker export.
        path: PathBuf,
        /// 1-based line number.
        line: usize,
        /// Underlying parse error.
        #[source]
        source: serde_json::Error,
    },

    /// The detection source failed on a frame.
    #[error("detection failed on frame {frame}: {reason}")]
    Detection {
        /// Frame index being processed.
        frame: u64,
        /// Description of the failure.
        reason: String,
    },

    /// Failed to read a persisted report.
    #[error("failed to read report '{path}'")]
    ReportRead {
        /// Path to the report.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// Failed to parse a persisted report.
    #[error("failed to parse report '{path}'")]
    ReportParse {
        /// Path to the report.
        path: PathBuf,
        /// Underlying parse error.
        #[source]
        source: serde_json::Error,
    },

    /// Failed to write a report.
    #[error("failed to write report '{path}'")]
    ReportWrite {
        /// Path to the report.
        path: PathBuf,
        /// Underlying error.
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    /// Report directory for offline analysis is missing.
    #[error("detections directory not found: {path}")]
    ReportDirNotFound {
        /// Path to the missing directory.
        path: PathBuf,
    },

    /// Report directory holds no report files.
    #[error("no JSON report files found in {path}")]
    NoReportFiles {
        /// Path to the searched directory.
        path: PathBuf,
    },

    /// Report has an empty frame mapping.
    #[error("no frames found in report '{path}'")]
    EmptyReport {
        /// Path to the report.
        path: PathBuf,
    },

    /// Input is locked by another process.
    #[error("input is locked by another process: {path}")]
    FileLocked {
        /// Path to the lock file.
        path: PathBuf,
    },

    /// Failed to create lock file.
    #[error("failed to create lock file '{path}'")]
    LockCreate {
        /// Path to the lock file.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },
}

//! JSON envelope types for CLI output.
//!
//! With `--json`, results go to stdout wrapped in an envelope so the tool can
//! sit behind a service that submits a video and reads back the outcome.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Envelope schema version.
pub const SPEC_VERSION: &str = "1.0";

/// JSON envelope wrapping all CLI output events.
#[derive(Debug, Serialize, Deserialize)]
#[serde(bound(deserialize = "T: serde::de::DeserializeOwned"))]
pub struct JsonEnvelope<T> {
    /// API specification version.
    pub spec_version: String,
    /// Event timestamp.
    pub timestamp: DateTime<Utc>,
    /// Event type.
    pub event: EventType,
    /// Event-specific payload.
    pub payload: T,
}

impl<T: Serialize> JsonEnvelope<T> {
    /// Create a new envelope with the current timestamp.
    pub fn new(event: EventType, payload: T) -> Self {
        Self {
            spec_version: SPEC_VERSION.to_string(),
            timestamp: Utc::now(),
            event,
            payload,
        }
    }
}

/// Event types for JSON output.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EventType {
    /// A video finished processing.
    VideoCompleted,
    /// Offline accuracy batch finished.
    AccuracyCompleted,
    /// Error occurred.
    Error,
}

/// Response for one processed video.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProcessResponse {
    /// Human-readable status.
    pub message: String,
    /// Frames read from the source.
    pub total_frames: u64,
    /// Frames passed through detection.
    pub processed_frames: u64,
    /// Sampling interval used.
    pub frame_skip: u64,
    /// Distinct identities seen.
    pub unique_birds: usize,
    /// Directory of annotated frames, if written.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub annotated_video: Option<PathBuf>,
    /// Path of the JSON report.
    pub results_json: PathBuf,
}

/// Result of an offline accuracy batch.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AccuracyBatchPayload {
    /// Accuracy files written.
    pub written: Vec<PathBuf>,
    /// Reports skipped as empty or unreadable.
    pub skipped: Vec<PathBuf>,
}

/// Error payload for error events.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorPayload {
    /// Input the error relates to, if any.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub input: Option<PathBuf>,
    /// Human-readable error message.
    pub message: String,
}

/// Print one envelope as a single JSON line on stdout.
#[allow(clippy::print_stdout)]
pub fn emit_json<T: Serialize>(event: EventType, payload: T) {
    let envelope = JsonEnvelope::new(event, payload);
    match serde_json::to_string(&envelope) {
        Ok(line) => println!("{line}"),
        Err(e) => tracing::error!("Failed to serialize {event:?} event: {e}"),
    }
}

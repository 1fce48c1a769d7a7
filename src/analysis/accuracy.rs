//! Offline metrics recomputed from a persisted report.
//!
//! These use the same formulas as the live analyzer, so a mismatch against a
//! report's own summary points at serialization or versioning problems.

use crate::constants::METRIC_DECIMAL_PLACES;
use crate::output::Report;
use crate::weight::round_to;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashSet};

/// Original and post-crop frame heights of the source video.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FrameHeights {
    /// Height of the decoded frame.
    pub original: u32,
    /// Height left after removing the top crop, `floor(H * (1 - ratio))`.
    pub cropped: u32,
}

impl FrameHeights {
    /// Derive heights for a frame of `original` rows and a crop ratio.
    pub fn from_crop(original: u32, crop_top_ratio: f64) -> Self {
        #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
        let cropped = (f64::from(original) * (1.0 - crop_top_ratio)).floor() as u32;
        Self { original, cropped }
    }
}

/// Accuracy and stability metrics for one report.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AccuracyReport {
    /// Report file name.
    pub video: String,
    /// Distinct frame indices present.
    pub total_frames: usize,
    /// Frames with at least one detection.
    pub frames_with_birds: usize,
    /// `frames_with_birds / total_frames`, 0 when there are no frames.
    pub detection_coverage: f64,
    /// Frames each identity appears in.
    pub track_lengths: BTreeMap<i64, usize>,
    /// Mean detections per frame.
    pub average_birds_per_frame: f64,
    /// Source frame height, if the video was found.
    pub original_frame_height: Option<u32>,
    /// Frame height after cropping, if the video was found.
    pub cropped_frame_height: Option<u32>,
}

/// Recompute metrics from a report's per-frame detections.
pub fn compute_accuracy(
    video: &str,
    report: &Report,
    heights: Option<FrameHeights>,
) -> AccuracyReport {
    let mut track_lengths: BTreeMap<i64, usize> = BTreeMap::new();
    let mut total_detections = 0usize;
    let mut frames_with_birds = 0usize;

    for detections in report.frames.values() {
        total_detections += detections.len();
        if !detections.is_empty() {
            frames_with_birds += 1;
        }
        // An identity counts once per frame even if listed twice.
        let ids: HashSet<i64> = detections.iter().map(|d| d.track_id).collect();
        for id in ids {
            *track_lengths.entry(id).or_default() += 1;
        }
    }

    let total_frames = report.frames.len();
    #[allow(clippy::cast_precision_loss)]
    let (coverage, average) = if total_frames == 0 {
        (0.0, 0.0)
    } else {
        (
            frames_with_birds as f64 / total_frames as f64,
            total_detections as f64 / total_frames as f64,
        )
    };

    AccuracyReport {
        video: video.to_string(),
        total_frames,
        frames_with_birds,
        detection_coverage: round_to(coverage, METRIC_DECIMAL_PLACES),
        track_lengths,
        average_birds_per_frame: round_to(average, METRIC_DECIMAL_PLACES),
        original_frame_height: heights.map(|h| h.original),
        cropped_frame_height: heights.map(|h| h.cropped),
    }
}

/// Differences between a report's stored summary and its recomputed metrics.
///
/// Empty when the report is self-consistent.
pub fn summary_discrepancies(report: &Report, accuracy: &AccuracyReport) -> Vec<String> {
    let mut issues = Vec::new();
    let summary = &report.summary;

    if summary.total_frames_with_birds != accuracy.frames_with_birds {
        issues.push(format!(
            "total_frames_with_birds is {} but frames contain {}",
            summary.total_frames_with_birds, accuracy.frames_with_birds
        ));
    }

    if summary.total_unique_birds != accuracy.track_lengths.len() {
        issues.push(format!(
            "total_unique_birds is {} but frames contain {} identities",
            summary.total_unique_birds,
            accuracy.track_lengths.len()
        ));
    }

    for (frame, detections) in &report.frames {
        match summary.frame_wise_counts.get(frame) {
            Some(&count) if count == detections.len() => {}
            Some(&count) => issues.push(format!(
                "frame {frame}: count {count} but {} detections",
                detections.len()
            )),
            None => issues.push(format!("frame {frame}: missing from frame_wise_counts")),
        }
    }

    for frame in summary.frame_wise_counts.keys() {
        if !report.frames.contains_key(frame) {
            issues.push(format!("frame {frame}: counted but has no detection list"));
        }
    }

    issues
}

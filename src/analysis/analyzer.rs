//! Running aggregation of tracked detections.

use crate::detection::Detection;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashSet};

/// Summary statistics for one processed video.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Summary {
    /// Distinct track identities ever observed.
    pub total_unique_birds: usize,
    /// Frames whose recorded count is non-zero.
    pub total_frames_with_birds: usize,
    /// Detection count per observed frame index.
    pub frame_wise_counts: BTreeMap<u64, usize>,
}

/// Aggregates `(frame_index, detections)` updates for a single video run.
///
/// Frame indices may be sparse. Re-updating an index replaces its previous
/// entry; the set of identities only ever grows.
#[derive(Debug, Default)]
pub struct BirdAnalyzer {
    unique_birds: HashSet<i64>,
    frame_counts: BTreeMap<u64, usize>,
    frame_detections: BTreeMap<u64, Vec<Detection>>,
}

impl BirdAnalyzer {
    /// Create an empty analyzer.
    pub fn new() -> Self {
        Self::default()
    }

    /// Record the detections for one frame.
    ///
    /// An empty list is recorded as a zero count, so the frame still counts
    /// as observed.
    pub fn update(&mut self, frame_index: u64, detections: Vec<Detection>) {
        self.unique_birds.extend(detections.iter().map(|d| d.track_id));
        self.frame_counts.insert(frame_index, detections.len());
        self.frame_detections.insert(frame_index, detections);
    }

    /// Snapshot of the aggregate counters.
    pub fn summary(&self) -> Summary {
        Summary {
            total_unique_birds: self.unique_birds.len(),
            total_frames_with_birds: self.frame_counts.values().filter(|&&c| c > 0).count(),
            frame_wise_counts: self.frame_counts.clone(),
        }
    }

    /// Per-frame detection lists, keyed by frame index.
    pub fn frame_detections(&self) -> &BTreeMap<u64, Vec<Detection>> {
        &self.frame_detections
    }

    /// Consume the analyzer, yielding the summary and the detection lists.
    pub fn into_parts(self) -> (Summary, BTreeMap<u64, Vec<Detection>>) {
        let summary = self.summary();
        (summary, self.frame_detections)
    }

    /// Number of frame indices updated so far.
    pub fn frames_observed(&self) -> usize {
        self.frame_counts.len()
    }
}

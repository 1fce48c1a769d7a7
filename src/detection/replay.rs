//! Replay of identity-tagged detections exported by an external tracker.
//!
//! The export is JSON lines, one object per frame:
//!
//! ```text
//! {"frame": 0, "detections": [{"track_id": 1, "bbox": [10, 5, 50, 40], "confidence": 0.91}]}
//! ```
//!
//! Boxes are in the coordinate space of the image the tracker saw, i.e. the
//! cropped frame.

use crate::detection::{Detection, DetectionSource, suppress_overlaps};
use crate::error::{Error, Result};
use image::RgbImage;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;
use tracing::{debug, warn};

/// One line of a tracker export.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrackedFrame {
    /// Frame index in the source video.
    pub frame: u64,
    /// Detections for this frame.
    #[serde(default)]
    pub detections: Vec<Detection>,
}

/// Detection source backed by a tracker export.
#[derive(Debug)]
pub struct ReplayTracker {
    frames: HashMap<u64, Vec<Detection>>,
    confidence_threshold: f32,
    iou_threshold: f32,
}

impl ReplayTracker {
    /// Load a tracker export from disk.
    pub fn open(path: &Path, confidence_threshold: f32, iou_threshold: f32) -> Result<Self> {
        let file = File::open(path).map_err(|e| Error::TracksRead {
            path: path.to_path_buf(),
            source: e,
        })?;
        let tracker = Self::from_reader(
            BufReader::new(file),
            path,
            confidence_threshold,
            iou_threshold,
        )?;
        debug!(
            "Loaded tracker export with {} frame(s): {}",
            tracker.frames.len(),
            path.display()
        );
        Ok(tracker)
    }

    /// Load a tracker export from any buffered reader.
    ///
    /// `path` is only used in error messages.
    pub fn from_reader<R: BufRead>(
        reader: R,
        path: &Path,
        confidence_threshold: f32,
        iou_threshold: f32,
    ) -> Result<Self> {
        let mut frames = HashMap::new();

        for (idx, line) in reader.lines().enumerate() {
            let line = line.map_err(|e| Error::TracksRead {
                path: path.to_path_buf(),
                source: e,
            })?;
            if line.trim().is_empty() {
                continue;
            }

            let record: TrackedFrame =
                serde_json::from_str(&line).map_err(|e| Error::TracksParse {
                    path: path.to_path_buf(),
                    line: idx + 1,
                    source: e,
                })?;

            if frames.insert(record.frame, record.detections).is_some() {
                warn!(
                    "Frame {} appears more than once in {}, keeping the last entry",
                    record.frame,
                    path.display()
                );
            }
        }

        Ok(Self {
            frames,
            confidence_threshold,
            iou_threshold,
        })
    }

    /// Number of frames present in the export.
    pub fn frame_count(&self) -> usize {
        self.frames.len()
    }
}

impl DetectionSource for ReplayTracker {
    fn detect(&mut self, frame_index: u64, _frame: &RgbImage) -> Result<Vec<Detection>> {
        let Some(detections) = self.frames.remove(&frame_index) else {
            return Ok(Vec::new());
        };

        let threshold = self.confidence_threshold;
        let confident: Vec<Detection> = detections
            .into_iter()
            .filter(|d| d.confidence.is_none_or(|c| c >= threshold))
            .collect();

        Ok(suppress_overlaps(confident, self.iou_threshold))
    }
}

//! Detection source trait.

use crate::detection::Detection;
use crate::error::Result;
use image::RgbImage;

/// Capability that finds and identifies birds in a frame.
///
/// Implementations own identity assignment: the same physical bird must keep
/// its `track_id` across calls. Returned boxes are in the coordinate space of
/// the image passed in.
pub trait DetectionSource {
    /// Detect and track birds in one frame.
    fn detect(&mut self, frame_index: u64, frame: &RgbImage) -> Result<Vec<Detection>>;
}

impl<T: DetectionSource + ?Sized> DetectionSource for Box<T> {
    fn detect(&mut self, frame_index: u64, frame: &RgbImage) -> Result<Vec<Detection>> {
        (**self).detect(frame_index, frame)
    }
}

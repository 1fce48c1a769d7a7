//! Top-crop preprocessing and coordinate remapping.
//!
//! The detector only sees rows `[crop_start_y, H)` of each frame. Boxes it
//! returns are relative to that cropped image and must be shifted back down
//! by `crop_start_y` before anything else looks at them.

use crate::constants::MAX_CROP_TOP_RATIO;
use crate::detection::{Detection, DetectionSource};
use crate::error::{Error, Result};
use image::RgbImage;
use image::imageops;

/// Validated fraction of frame height to drop from the top.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CropRatio(f64);

impl CropRatio {
    /// Accepts values in `[0.0, 0.99]`.
    pub fn new(value: f64) -> Result<Self> {
        if (0.0..=MAX_CROP_TOP_RATIO).contains(&value) {
            Ok(Self(value))
        } else {
            Err(Error::InvalidCropRatio {
                value,
                max: MAX_CROP_TOP_RATIO,
            })
        }
    }

    /// The raw ratio.
    pub const fn get(self) -> f64 {
        self.0
    }
}

/// Crops frames before detection and maps results back.
#[derive(Debug, Clone, Copy)]
pub struct FramePreprocessor {
    ratio: CropRatio,
}

impl FramePreprocessor {
    /// Create a preprocessor for the given crop ratio.
    pub const fn new(ratio: CropRatio) -> Self {
        Self { ratio }
    }

    /// The configured crop ratio.
    pub const fn ratio(&self) -> CropRatio {
        self.ratio
    }

    /// First row kept for a frame of `height` rows: `floor(height * ratio)`.
    pub fn crop_start_y(&self, height: u32) -> u32 {
        #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
        let start = (f64::from(height) * self.ratio.get()).floor() as u32;
        start.min(height)
    }

    /// Rows `[crop_start_y, H)` of the frame, full width.
    pub fn crop(&self, frame: &RgbImage) -> RgbImage {
        let (width, height) = frame.dimensions();
        let start = self.crop_start_y(height);
        imageops::crop_imm(frame, 0, start, width, height - start).to_image()
    }

    /// Shift boxes from cropped-frame to original-frame coordinates.
    pub fn remap(detections: Vec<Detection>, crop_start_y: u32) -> Vec<Detection> {
        let dy = f64::from(crop_start_y);
        detections
            .into_iter()
            .map(|det| Detection {
                bbox: det.bbox.shifted_y(dy),
                ..det
            })
            .collect()
    }

    /// Crop, detect, and remap in one step.
    pub fn detect<S>(
        &self,
        source: &mut S,
        frame_index: u64,
        frame: &RgbImage,
    ) -> Result<Vec<Detection>>
    where
        S: DetectionSource + ?Sized,
    {
        let crop_start_y = self.crop_start_y(frame.height());
        let cropped = self.crop(frame);
        let detections = source.detect(frame_index, &cropped)?;
        Ok(Self::remap(detections, crop_start_y))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::detection::BoundingBox;

    struct FixedSource {
        seen_heights: Vec<u32>,
    }

    impl DetectionSource for FixedSource {
        fn detect(&mut self, _frame_index: u64, frame: &RgbImage) -> Result<Vec<Detection>> {
            self.seen_heights.push(frame.height());
            Ok(vec![Detection::new(
                1,
                BoundingBox::new(10.0, 5.0, 50.0, 40.0),
                Some(0.9),
            )])
        }
    }

    fn preprocessor(ratio: f64) -> FramePreprocessor {
        FramePreprocessor::new(CropRatio::new(ratio).unwrap())
    }

    #[test]
    fn test_crop_ratio_bounds() {
        assert!(CropRatio::new(0.0).is_ok());
        assert!(CropRatio::new(0.99).is_ok());
        assert!(CropRatio::new(1.0).is_err());
        assert!(CropRatio::new(-0.1).is_err());
        assert!(CropRatio::new(f64::NAN).is_err());
    }

    #[test]
    fn test_crop_start_y_floors() {
        let pre = preprocessor(0.3);
        assert_eq!(pre.crop_start_y(100), 30);
        assert_eq!(pre.crop_start_y(101), 30);
        assert_eq!(pre.crop_start_y(0), 0);
    }

    #[test]
    fn test_remap_adds_offset_to_y_only() {
        let dets = vec![Detection::new(
            1,
            BoundingBox::new(10.0, 5.0, 50.0, 40.0),
            None,
        )];
        let remapped = FramePreprocessor::remap(dets, 30);
        assert_eq!(remapped[0].bbox, BoundingBox::new(10.0, 35.0, 50.0, 70.0));
    }

    #[test]
    fn test_detect_crops_then_remaps() {
        let pre = preprocessor(0.3);
        let mut source = FixedSource {
            seen_heights: Vec::new(),
        };
        let frame = RgbImage::new(64, 100);

        let dets = pre.detect(&mut source, 0, &frame).unwrap();

        assert_eq!(source.seen_heights, vec![70]);
        assert_eq!(dets[0].bbox, BoundingBox::new(10.0, 35.0, 50.0, 70.0));
    }

    #[test]
    fn test_zero_ratio_is_identity() {
        let pre = preprocessor(0.0);
        let frame = RgbImage::new(8, 8);
        assert_eq!(pre.crop(&frame).dimensions(), (8, 8));
    }

    #[test]
    fn test_empty_frame_does_not_fail() {
        let pre = preprocessor(0.99);
        let mut source = FixedSource {
            seen_heights: Vec::new(),
        };
        let frame = RgbImage::new(0, 0);
        assert!(pre.detect(&mut source, 0, &frame).is_ok());
        assert_eq!(source.seen_heights, vec![0]);
    }
}

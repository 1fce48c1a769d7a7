//! Box and crop-line drawing.

use crate::constants::colors;
use crate::detection::Detection;
use crate::error::{Error, Result};
use image::{Rgb, RgbImage};
use imageproc::drawing::{draw_hollow_rect_mut, draw_line_segment_mut};
use imageproc::rect::Rect;
use std::path::{Path, PathBuf};

/// Writes annotated frames as numbered PNG files.
pub struct AnnotatedFrameWriter {
    dir: PathBuf,
}

impl AnnotatedFrameWriter {
    /// Create the output directory up front so an unwritable target fails
    /// before any frame is processed.
    pub fn create(dir: &Path) -> Result<Self> {
        std::fs::create_dir_all(dir).map_err(|e| Error::AnnotationWrite {
            path: dir.to_path_buf(),
            source: Box::new(e),
        })?;
        Ok(Self {
            dir: dir.to_path_buf(),
        })
    }

    /// Output directory.
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Draw onto `frame` and save it as `<frame_index>.png`.
    pub fn write(
        &self,
        frame_index: u64,
        mut frame: RgbImage,
        detections: &[Detection],
        crop_start_y: u32,
    ) -> Result<()> {
        draw_detections(&mut frame, detections, crop_start_y);
        let path = self.dir.join(format!("{frame_index:06}.png"));
        frame.save(&path).map_err(|e| Error::AnnotationWrite {
            path,
            source: Box::new(e),
        })
    }
}

/// Draw the crop line and one box per detection.
///
/// Boxes are unlabelled: no font is bundled, so track id and confidence are
/// not rendered. Boxes thinner than a pixel are skipped.
pub fn draw_detections(frame: &mut RgbImage, detections: &[Detection], crop_start_y: u32) {
    let (width, height) = frame.dimensions();
    if width == 0 || height == 0 {
        return;
    }

    if crop_start_y > 0 && crop_start_y < height {
        #[allow(clippy::cast_precision_loss)]
        let (y, right) = (crop_start_y as f32, (width - 1) as f32);
        draw_line_segment_mut(frame, (0.0, y), (right, y), Rgb(colors::CROP_LINE));
    }

    for det in detections {
        let b = det.bbox;
        #[allow(clippy::cast_possible_truncation)]
        let (x, y, w, h) = (
            b.x1.round() as i32,
            b.y1.round() as i32,
            b.width().round() as i64,
            b.height().round() as i64,
        );
        if w < 1 || h < 1 {
            continue;
        }
        let size = |v: i64| u32::try_from(v).unwrap_or(u32::MAX);
        draw_hollow_rect_mut(frame, Rect::at(x, y).of_size(size(w), size(h)), Rgb(colors::BOX));
    }
}

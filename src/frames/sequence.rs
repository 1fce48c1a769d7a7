//! Ordered frame image sequences.

use crate::constants::FRAME_EXTENSIONS;
use crate::error::{Error, Result};
use image::RgbImage;
use std::path::{Path, PathBuf};

/// Frames of one video, ordered by file name.
///
/// The frame index is the position in that order.
#[derive(Debug, Clone)]
pub struct FrameSequence {
    dir: PathBuf,
    frames: Vec<PathBuf>,
}

impl FrameSequence {
    /// List the frame images in `dir`.
    pub fn open(dir: &Path) -> Result<Self> {
        let entries = std::fs::read_dir(dir).map_err(|e| Error::FrameSourceOpen {
            path: dir.to_path_buf(),
            source: e,
        })?;

        let mut frames = Vec::new();
        for entry in entries {
            let path = entry
                .map_err(|e| Error::FrameSourceOpen {
                    path: dir.to_path_buf(),
                    source: e,
                })?
                .path();
            if path.is_file() && is_frame_file(&path) {
                frames.push(path);
            }
        }

        if frames.is_empty() {
            return Err(Error::NoFrames {
                path: dir.to_path_buf(),
            });
        }

        frames.sort();
        Ok(Self {
            dir: dir.to_path_buf(),
            frames,
        })
    }

    /// Directory holding the frames.
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Number of frames.
    pub fn len(&self) -> usize {
        self.frames.len()
    }

    /// Whether the sequence has no frames. Never true for an opened sequence.
    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }

    /// Decode frame `index` as RGB.
    pub fn load(&self, index: usize) -> Result<RgbImage> {
        let path = self.frames.get(index).ok_or_else(|| Error::NoFrames {
            path: self.dir.clone(),
        })?;
        image::open(path)
            .map(|img| img.to_rgb8())
            .map_err(|e| Error::FrameDecode {
                path: path.clone(),
                source: e,
            })
    }

    /// Height of the first frame, read from its header only.
    pub fn frame_height(&self) -> Result<u32> {
        let path = self.frames.first().ok_or_else(|| Error::NoFrames {
            path: self.dir.clone(),
        })?;
        image::image_dimensions(path)
            .map(|(_, h)| h)
            .map_err(|e| Error::FrameDecode {
                path: path.clone(),
                source: e,
            })
    }
}

/// Check if a file has a supported frame image extension.
pub fn is_frame_file(path: &Path) -> bool {
    path.extension().is_some_and(|ext| {
        FRAME_EXTENSIONS
            .iter()
            .any(|known| ext.eq_ignore_ascii_case(known))
    })
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn write_frame(dir: &Path, name: &str, height: u32) {
        RgbImage::new(4, height).save(dir.join(name)).unwrap();
    }

    #[test]
    fn test_is_frame_file() {
        assert!(is_frame_file(Path::new("000001.png")));
        assert!(is_frame_file(Path::new("frame.JPG")));
        assert!(!is_frame_file(Path::new("tracks.jsonl")));
        assert!(!is_frame_file(Path::new("noext")));
    }

    #[test]
    fn test_open_sorts_by_name_and_ignores_other_files() {
        let dir = TempDir::new().unwrap();
        write_frame(dir.path(), "000002.png", 6);
        write_frame(dir.path(), "000001.png", 8);
        std::fs::write(dir.path().join("tracks.jsonl"), "").unwrap();

        let seq = FrameSequence::open(dir.path()).unwrap();
        assert_eq!(seq.len(), 2);
        assert_eq!(seq.frame_height().unwrap(), 8);
        assert_eq!(seq.load(1).unwrap().height(), 6);
    }

    #[test]
    fn test_open_empty_dir_fails() {
        let dir = TempDir::new().unwrap();
        assert!(matches!(
            FrameSequence::open(dir.path()),
            Err(Error::NoFrames { .. })
        ));
    }

    #[test]
    fn test_open_missing_dir_fails() {
        assert!(matches!(
            FrameSequence::open(Path::new("/nonexistent/frames")),
            Err(Error::FrameSourceOpen { .. })
        ));
    }
}

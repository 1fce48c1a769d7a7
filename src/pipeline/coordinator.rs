//! Input discovery and output naming.

use crate::config::OutputFormat;
use crate::constants::{TRACKS_FILE_NAME, output_names};
use crate::detection::CropRatio;
use crate::error::Result;
use crate::frames::is_frame_file;
use crate::locking::FileLock;
use std::borrow::Cow;
use std::path::{Path, PathBuf};
use tracing::warn;

/// Resolved settings for processing one or more videos.
#[derive(Debug, Clone)]
pub struct ProcessOptions {
    /// Output directory (None = parent of each input).
    pub output_dir: Option<PathBuf>,
    /// Explicit tracker export (None = `tracks.jsonl` inside the input).
    pub tracks: Option<PathBuf>,
    /// Output formats to generate.
    pub formats: Vec<OutputFormat>,
    /// Reprocess even if outputs exist.
    pub force: bool,
    /// Minimum detection confidence.
    pub confidence_threshold: f32,
    /// Overlap suppression threshold.
    pub iou_threshold: f32,
    /// Fraction of frame height removed before detection.
    pub crop_ratio: CropRatio,
    /// Process every Nth frame.
    pub frame_skip: u64,
    /// Weight heuristic factor.
    pub scale_factor: f64,
    /// Write annotated frames.
    pub annotate: bool,
    /// Show progress bars.
    pub progress_enabled: bool,
}

/// Result of checking whether a video should be processed.
#[derive(Debug, PartialEq, Eq)]
pub enum ProcessCheck {
    /// Video should be processed.
    Process,
    /// Skip - outputs already exist.
    SkipExists,
    /// Skip - video is locked by another process.
    SkipLocked,
}

/// Name of a video, taken from its frame directory.
pub fn video_name(input: &Path) -> Cow<'_, str> {
    input
        .file_name()
        .map_or(Cow::Borrowed("video"), |s| s.to_string_lossy())
}

/// Determine the output directory for a video.
pub fn output_dir_for(input: &Path, explicit_output_dir: Option<&Path>) -> PathBuf {
    explicit_output_dir.map_or_else(
        || {
            input
                .parent()
                .map_or_else(|| PathBuf::from("."), Path::to_path_buf)
        },
        Path::to_path_buf,
    )
}

/// Get output file path for a given format.
pub fn output_path_for(input: &Path, output_dir: &Path, format: OutputFormat) -> PathBuf {
    let name = video_name(input);
    let suffix = match format {
        OutputFormat::Json => output_names::REPORT_SUFFIX,
        OutputFormat::Csv => output_names::CSV_SUFFIX,
    };
    output_dir.join(format!("{name}{suffix}"))
}

/// Directory receiving annotated frames.
pub fn annotated_dir_for(input: &Path, output_dir: &Path) -> PathBuf {
    output_dir.join(format!(
        "{}{}",
        output_names::ANNOTATED_PREFIX,
        video_name(input)
    ))
}

/// Tracker export for a video.
pub fn tracks_path_for(input: &Path, explicit: Option<&Path>) -> PathBuf {
    explicit.map_or_else(|| input.join(TRACKS_FILE_NAME), Path::to_path_buf)
}

/// Check if a video should be processed.
pub fn should_process(
    input: &Path,
    output_dir: &Path,
    formats: &[OutputFormat],
    force: bool,
) -> ProcessCheck {
    if FileLock::is_locked(input, output_dir) {
        return ProcessCheck::SkipLocked;
    }

    if !force {
        let all_exist = formats
            .iter()
            .all(|fmt| output_path_for(input, output_dir, *fmt).exists());
        if all_exist {
            return ProcessCheck::SkipExists;
        }
    }

    ProcessCheck::Process
}

/// Collect frame directories from the given paths.
///
/// A directory holding frame images is a video; other directories are
/// searched recursively.
pub fn collect_inputs(paths: &[PathBuf]) -> Result<Vec<PathBuf>> {
    let mut videos = Vec::new();

    for path in paths {
        if path.is_dir() {
            collect_recursive(path, &mut videos)?;
        } else if path.is_file() {
            warn!(
                "Skipping {}: extract frames into a directory first (e.g. ffmpeg -i in.mp4 frames/%06d.png)",
                path.display()
            );
        } else {
            warn!("Skipping non-existent path: {}", path.display());
        }
    }

    videos.sort();
    videos.dedup();
    Ok(videos)
}

fn collect_recursive(dir: &Path, videos: &mut Vec<PathBuf>) -> Result<()> {
    let mut subdirs = Vec::new();
    let mut has_frames = false;

    for entry in std::fs::read_dir(dir)? {
        let path = entry?.path();
        if path.is_dir() {
            if !is_annotated_dir(&path) {
                subdirs.push(path);
            }
        } else if is_frame_file(&path) {
            has_frames = true;
        }
    }

    if has_frames {
        videos.push(dir.to_path_buf());
        return Ok(());
    }

    for sub in subdirs {
        collect_recursive(&sub, videos)?;
    }
    Ok(())
}

/// Annotated output directories hold frames too, but are never inputs.
fn is_annotated_dir(path: &Path) -> bool {
    path.file_name()
        .and_then(|n| n.to_str())
        .is_some_and(|n| n.starts_with(output_names::ANNOTATED_PREFIX))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_output_dir_for_with_explicit() {
        let input = Path::new("/data/videos/poultry3");
        let output = output_dir_for(input, Some(Path::new("/results")));
        assert_eq!(output, PathBuf::from("/results"));
    }

    #[test]
    fn test_output_dir_for_without_explicit() {
        let input = Path::new("/data/videos/poultry3");
        let output = output_dir_for(input, None);
        assert_eq!(output, PathBuf::from("/data/videos"));
    }

    #[test]
    fn test_output_paths() {
        let input = Path::new("/data/poultry3");
        let out = Path::new("/out");
        assert_eq!(
            output_path_for(input, out, OutputFormat::Json),
            PathBuf::from("/out/poultry3_results.json")
        );
        assert_eq!(
            output_path_for(input, out, OutputFormat::Csv),
            PathBuf::from("/out/poultry3_frame_counts.csv")
        );
        assert_eq!(
            annotated_dir_for(input, out),
            PathBuf::from("/out/annotated_poultry3")
        );
    }

    #[test]
    fn test_tracks_path_for() {
        let input = Path::new("/data/poultry3");
        assert_eq!(
            tracks_path_for(input, None),
            PathBuf::from("/data/poultry3/tracks.jsonl")
        );
        assert_eq!(
            tracks_path_for(input, Some(Path::new("/x.jsonl"))),
            PathBuf::from("/x.jsonl")
        );
    }

    #[test]
    fn test_collect_inputs_finds_frame_dirs() {
        let root = TempDir::new().unwrap();
        let a = root.path().join("a");
        let b = root.path().join("nested").join("b");
        fs::create_dir_all(&a).unwrap();
        fs::create_dir_all(&b).unwrap();
        fs::write(a.join("000000.png"), b"").unwrap();
        fs::write(b.join("000000.jpg"), b"").unwrap();
        fs::write(root.path().join("notes.txt"), b"").unwrap();

        let videos = collect_inputs(&[root.path().to_path_buf()]).unwrap();
        assert_eq!(videos, vec![a, b]);
    }

    #[test]
    fn test_collect_inputs_ignores_annotated_output() {
        let root = TempDir::new().unwrap();
        let clip = root.path().join("clip");
        let annotated = root.path().join("annotated_clip");
        fs::create_dir_all(&clip).unwrap();
        fs::create_dir_all(&annotated).unwrap();
        fs::write(clip.join("000000.png"), b"").unwrap();
        fs::write(annotated.join("000000.png"), b"").unwrap();

        let videos = collect_inputs(&[root.path().to_path_buf()]).unwrap();
        assert_eq!(videos, vec![clip]);
    }

    #[test]
    fn test_should_process_skips_existing_outputs() {
        let root = TempDir::new().unwrap();
        let input = root.path().join("clip");
        fs::write(root.path().join("clip_results.json"), b"{}").unwrap();

        assert_eq!(
            should_process(&input, root.path(), &[OutputFormat::Json], false),
            ProcessCheck::SkipExists
        );
        assert_eq!(
            should_process(&input, root.path(), &[OutputFormat::Json], true),
            ProcessCheck::Process
        );
        assert_eq!(
            should_process(
                &input,
                root.path(),
                &[OutputFormat::Json, OutputFormat::Csv],
                false
            ),
            ProcessCheck::Process
        );
    }

    #[test]
    fn test_should_process_skips_locked() {
        let root = TempDir::new().unwrap();
        let input = root.path().join("clip");
        let _lock = FileLock::acquire(&input, root.path()).unwrap();
        assert_eq!(
            should_process(&input, root.path(), &[OutputFormat::Json], true),
            ProcessCheck::SkipLocked
        );
    }
}

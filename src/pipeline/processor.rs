//! Single video processing pipeline.

use crate::analysis::BirdAnalyzer;
use crate::config::OutputFormat;
use crate::detection::{DetectionSource, FramePreprocessor, ReplayTracker};
use crate::error::Result;
use crate::frames::{AnnotatedFrameWriter, FrameSequence};
use crate::locking::FileLock;
use crate::output::{CsvFrameWriter, JsonReportWriter, Report, ReportWriter, progress};
use crate::pipeline::{ProcessOptions, annotated_dir_for, output_path_for, tracks_path_for, video_name};
use crate::weight::WeightEstimator;
use std::path::{Path, PathBuf};
use std::time::Instant;
use tracing::{debug, info};

/// Outcome of processing one video.
#[derive(Debug, Clone)]
pub struct ProcessResult {
    /// Frames in the source.
    pub total_frames: u64,
    /// Frames passed through detection.
    pub processed_frames: u64,
    /// Sampling interval used.
    pub frame_skip: u64,
    /// Distinct identities seen.
    pub unique_birds: usize,
    /// Processed frames with at least one bird.
    pub frames_with_birds: usize,
    /// JSON report location.
    pub report_path: PathBuf,
    /// CSV table location, if requested.
    pub csv_path: Option<PathBuf>,
    /// Annotated frame directory, if written.
    pub annotated_dir: Option<PathBuf>,
    /// Wall-clock processing time in seconds.
    pub duration_secs: f64,
}

/// Open the tracker export belonging to `input`.
pub fn open_tracker(input: &Path, options: &ProcessOptions) -> Result<ReplayTracker> {
    let path = tracks_path_for(input, options.tracks.as_deref());
    ReplayTracker::open(&path, options.confidence_threshold, options.iou_threshold)
}

/// Process one video and write its report.
///
/// Every `frame_skip`-th frame is cropped, passed to `source`, remapped,
/// weighed, optionally annotated, and fed to a fresh [`BirdAnalyzer`].
/// Outputs are written only once every frame has been processed, so a
/// failure never leaves a partial report behind.
pub fn process_video(
    input: &Path,
    output_dir: &Path,
    options: &ProcessOptions,
    source: &mut dyn DetectionSource,
) -> Result<ProcessResult> {
    let start_time = Instant::now();
    info!("Processing: {}", input.display());

    std::fs::create_dir_all(output_dir)?;
    let _lock = FileLock::acquire(input, output_dir)?;

    let frames = FrameSequence::open(input)?;
    let total_frames = frames.len() as u64;
    debug!("Found {} frame(s) in {}", total_frames, frames.dir().display());

    let annotator = if options.annotate {
        Some(AnnotatedFrameWriter::create(&annotated_dir_for(input, output_dir))?)
    } else {
        None
    };

    let preprocessor = FramePreprocessor::new(options.crop_ratio);
    let estimator = WeightEstimator::new(options.scale_factor);
    let mut analyzer = BirdAnalyzer::new();

    let frame_skip = options.frame_skip.max(1);
    let to_process = total_frames.div_ceil(frame_skip);
    let name = video_name(input).into_owned();
    #[allow(clippy::cast_possible_truncation)]
    let frame_progress =
        progress::create_frame_progress(to_process as usize, &name, options.progress_enabled);

    let mut processed_frames = 0u64;
    for (position, frame_index) in (0..total_frames).enumerate() {
        if frame_index % frame_skip != 0 {
            continue;
        }

        let frame = frames.load(position)?;
        let crop_start_y = preprocessor.crop_start_y(frame.height());
        let mut detections = preprocessor.detect(source, frame_index, &frame)?;

        for det in &mut detections {
            det.estimated_weight_kg = Some(estimator.estimate(&det.bbox));
        }

        if let Some(writer) = &annotator {
            writer.write(frame_index, frame, &detections, crop_start_y)?;
        }

        if !detections.is_empty() {
            debug!("Frame {}: {} bird(s)", frame_index, detections.len());
        }
        analyzer.update(frame_index, detections);
        processed_frames += 1;
        progress::inc_progress(frame_progress.as_ref());
    }
    progress::finish_progress(frame_progress, "Detection complete");

    let report = Report::from_analyzer(analyzer);
    let mut report_path = output_path_for(input, output_dir, OutputFormat::Json);
    let mut csv_path = None;
    for format in &options.formats {
        let path = write_output(input, output_dir, *format, &report)?;
        match format {
            OutputFormat::Json => report_path = path,
            OutputFormat::Csv => csv_path = Some(path),
        }
    }

    let duration_secs = start_time.elapsed().as_secs_f64();
    #[allow(clippy::cast_precision_loss)]
    let frames_per_sec = if duration_secs > 0.0 {
        processed_frames as f64 / duration_secs
    } else {
        0.0
    };
    info!(
        "Processed {} of {} frames in {:.2}s ({:.1} frames/sec): {} unique bird(s)",
        processed_frames,
        total_frames,
        duration_secs,
        frames_per_sec,
        report.summary.total_unique_birds
    );

    Ok(ProcessResult {
        total_frames,
        processed_frames,
        frame_skip,
        unique_birds: report.summary.total_unique_birds,
        frames_with_birds: report.summary.total_frames_with_birds,
        report_path,
        csv_path,
        annotated_dir: annotator.map(|a| a.dir().to_path_buf()),
        duration_secs,
    })
}

/// Write the report in one format, returning the file written.
fn write_output(
    input: &Path,
    output_dir: &Path,
    format: OutputFormat,
    report: &Report,
) -> Result<PathBuf> {
    let output_path = output_path_for(input, output_dir, format);
    debug!("Writing {} output: {}", format, output_path.display());

    let mut writer: Box<dyn ReportWriter> = match format {
        OutputFormat::Json => Box::new(JsonReportWriter::new(&output_path)),
        OutputFormat::Csv => Box::new(CsvFrameWriter::new(&output_path)),
    };
    writer.write(report)?;
    Ok(writer.path().to_path_buf())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::detection::{BoundingBox, CropRatio, Detection};
    use crate::error::Error;
    use crate::output::read_report;
    use image::RgbImage;
    use tempfile::TempDir;

    /// Reports the same bird in every frame, plus a second one on frame 10.
    struct ScriptedSource {
        calls: Vec<u64>,
    }

    impl DetectionSource for ScriptedSource {
        fn detect(&mut self, frame_index: u64, _frame: &RgbImage) -> Result<Vec<Detection>> {
            self.calls.push(frame_index);
            let mut dets = vec![Detection::new(
                1,
                BoundingBox::new(0.0, 0.0, 10.0, 10.0),
                Some(0.9),
            )];
            if frame_index == 10 {
                dets.push(Detection::new(2, BoundingBox::new(20.0, 0.0, 30.0, 5.0), None));
            }
            Ok(dets)
        }
    }

    struct FailingSource;

    impl DetectionSource for FailingSource {
        fn detect(&mut self, frame_index: u64, _frame: &RgbImage) -> Result<Vec<Detection>> {
            Err(Error::Detection {
                frame: frame_index,
                reason: "model crashed".to_string(),
            })
        }
    }

    fn options(frame_skip: u64, annotate: bool) -> ProcessOptions {
        ProcessOptions {
            output_dir: None,
            tracks: None,
            formats: vec![OutputFormat::Json, OutputFormat::Csv],
            force: false,
            confidence_threshold: 0.35,
            iou_threshold: 0.5,
            crop_ratio: CropRatio::new(0.3).unwrap(),
            frame_skip,
            scale_factor: 0.0008,
            annotate,
            progress_enabled: false,
        }
    }

    fn make_video(root: &Path, frames: usize) -> PathBuf {
        let dir = root.join("clip");
        std::fs::create_dir_all(&dir).unwrap();
        for i in 0..frames {
            RgbImage::new(40, 100)
                .save(dir.join(format!("{i:06}.png")))
                .unwrap();
        }
        dir
    }

    #[test]
    fn test_frame_skip_and_remap() {
        let root = TempDir::new().unwrap();
        let input = make_video(root.path(), 12);
        let out = root.path().join("out");
        let mut source = ScriptedSource { calls: Vec::new() };

        let result = process_video(&input, &out, &options(5, false), &mut source).unwrap();

        assert_eq!(source.calls, vec![0, 5, 10]);
        assert_eq!(result.total_frames, 12);
        assert_eq!(result.processed_frames, 3);
        assert_eq!(result.unique_birds, 2);
        assert!(result.annotated_dir.is_none());

        let report = read_report(&result.report_path).unwrap();
        let keys: Vec<u64> = report.frames.keys().copied().collect();
        assert_eq!(keys, vec![0, 5, 10]);
        assert_eq!(report.summary.frame_wise_counts[&10], 2);
        // 100px frame, 0.3 crop: boxes move down by 30px.
        assert_eq!(report.frames[&0][0].bbox, BoundingBox::new(0.0, 30.0, 10.0, 40.0));
        assert_eq!(report.frames[&0][0].estimated_weight_kg, Some(0.08));
        assert!(result.csv_path.unwrap().exists());
        assert!(!FileLock::is_locked(&input, &out));
    }

    #[test]
    fn test_annotated_frames_are_written() {
        let root = TempDir::new().unwrap();
        let input = make_video(root.path(), 3);
        let out = root.path().join("out");
        let mut source = ScriptedSource { calls: Vec::new() };

        let result = process_video(&input, &out, &options(1, true), &mut source).unwrap();

        let dir = result.annotated_dir.unwrap();
        assert_eq!(std::fs::read_dir(&dir).unwrap().count(), 3);
    }

    #[test]
    fn test_detection_failure_leaves_no_report() {
        let root = TempDir::new().unwrap();
        let input = make_video(root.path(), 2);
        let out = root.path().join("out");

        let err = process_video(&input, &out, &options(1, false), &mut FailingSource).unwrap_err();

        assert!(matches!(err, Error::Detection { frame: 0, .. }));
        assert!(!output_path_for(&input, &out, OutputFormat::Json).exists());
        assert!(!FileLock::is_locked(&input, &out));
    }

    #[test]
    fn test_missing_input_fails() {
        let root = TempDir::new().unwrap();
        let mut source = ScriptedSource { calls: Vec::new() };
        let result = process_video(
            &root.path().join("missing"),
            root.path(),
            &options(1, false),
            &mut source,
        );
        assert!(matches!(result, Err(Error::FrameSourceOpen { .. })));
    }
}

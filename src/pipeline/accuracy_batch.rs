//! Offline accuracy checks over a directory of persisted reports.

use crate::analysis::{AccuracyReport, FrameHeights, compute_accuracy, summary_discrepancies};
use crate::constants::output_names;
use crate::error::{Error, Result};
use crate::frames::FrameSequence;
use crate::output::read_report;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use tracing::{debug, error, info, warn};

/// Settings for an offline accuracy run.
#[derive(Debug, Clone)]
pub struct AccuracyBatchOptions {
    /// Directory containing `*_results.json` reports.
    pub detections_dir: PathBuf,
    /// Where accuracy files go (None = `<detections_dir>/../experiment`).
    pub output_dir: Option<PathBuf>,
    /// Directory of frame directories, used to look up frame heights.
    pub videos_dir: Option<PathBuf>,
    /// Crop ratio the reports were produced with.
    pub crop_top_ratio: f64,
}

impl AccuracyBatchOptions {
    /// Resolved output directory.
    pub fn resolved_output_dir(&self) -> PathBuf {
        self.output_dir.clone().unwrap_or_else(|| {
            self.detections_dir
                .parent()
                .unwrap_or_else(|| Path::new("."))
                .join(output_names::EXPERIMENT_DIR)
        })
    }
}

/// Files written and skipped by an accuracy run.
#[derive(Debug, Default)]
pub struct AccuracyOutcome {
    /// Accuracy files written.
    pub written: Vec<PathBuf>,
    /// Reports that were empty or unreadable.
    pub skipped: Vec<PathBuf>,
}

/// List report files, failing before any per-file work if there are none.
pub fn collect_report_files(dir: &Path) -> Result<Vec<PathBuf>> {
    if !dir.is_dir() {
        return Err(Error::ReportDirNotFound {
            path: dir.to_path_buf(),
        });
    }

    let mut files = Vec::new();
    for entry in std::fs::read_dir(dir)? {
        let path = entry?.path();
        if path.is_file()
            && path
                .extension()
                .is_some_and(|ext| ext.eq_ignore_ascii_case("json"))
        {
            files.push(path);
        }
    }

    if files.is_empty() {
        return Err(Error::NoReportFiles {
            path: dir.to_path_buf(),
        });
    }

    files.sort();
    Ok(files)
}

/// Recompute accuracy metrics for every report in the detections directory.
///
/// Empty or unreadable reports are logged and skipped; the batch continues.
pub fn run_accuracy_batch(options: &AccuracyBatchOptions) -> Result<AccuracyOutcome> {
    let files = collect_report_files(&options.detections_dir)?;
    let output_dir = options.resolved_output_dir();
    std::fs::create_dir_all(&output_dir)?;

    info!("Found {} report(s) to check", files.len());
    let mut outcome = AccuracyOutcome::default();

    for path in files {
        match check_report(&path, &output_dir, options) {
            Ok(written) => outcome.written.push(written),
            Err(e @ Error::EmptyReport { .. }) => {
                warn!("{e}, skipping");
                outcome.skipped.push(path);
            }
            Err(e @ (Error::ReportRead { .. } | Error::ReportParse { .. })) => {
                error!("{e}, skipping");
                outcome.skipped.push(path);
            }
            Err(e) => return Err(e),
        }
    }

    info!(
        "Accuracy check complete: {} written, {} skipped",
        outcome.written.len(),
        outcome.skipped.len()
    );
    Ok(outcome)
}

fn check_report(path: &Path, output_dir: &Path, options: &AccuracyBatchOptions) -> Result<PathBuf> {
    let report = read_report(path)?;
    if report.frames.is_empty() {
        return Err(Error::EmptyReport {
            path: path.to_path_buf(),
        });
    }

    let file_name = path
        .file_name()
        .map_or_else(String::new, |n| n.to_string_lossy().into_owned());
    let video = video_name_from_report(&file_name);
    let heights = options
        .videos_dir
        .as_deref()
        .and_then(|dir| probe_heights(&dir.join(video), options.crop_top_ratio));

    let accuracy = compute_accuracy(&file_name, &report, heights);
    log_accuracy(&accuracy);

    for issue in summary_discrepancies(&report, &accuracy) {
        warn!("{file_name}: summary mismatch: {issue}");
    }

    let stem = path
        .file_stem()
        .map_or_else(String::new, |s| s.to_string_lossy().into_owned());
    let out_path = output_dir.join(format!("{stem}{}", output_names::ACCURACY_SUFFIX));
    write_accuracy(&out_path, &accuracy)?;
    info!("Accuracy results saved to: {}", out_path.display());
    Ok(out_path)
}

/// Strip the report suffix to recover the video name.
fn video_name_from_report(file_name: &str) -> &str {
    file_name
        .strip_suffix(output_names::REPORT_SUFFIX)
        .or_else(|| file_name.strip_suffix(".json"))
        .unwrap_or(file_name)
}

fn probe_heights(video_dir: &Path, crop_top_ratio: f64) -> Option<FrameHeights> {
    if !video_dir.is_dir() {
        debug!("No frames for {}, skipping height check", video_dir.display());
        return None;
    }
    match FrameSequence::open(video_dir).and_then(|seq| seq.frame_height()) {
        Ok(height) => {
            let heights = FrameHeights::from_crop(height, crop_top_ratio);
            info!(
                "Frame height: {} original, {} after removing top {:.0}%",
                heights.original,
                heights.cropped,
                crop_top_ratio * 100.0
            );
            Some(heights)
        }
        Err(e) => {
            warn!("Could not read frame height: {e}");
            None
        }
    }
}

fn log_accuracy(accuracy: &AccuracyReport) {
    info!("Accuracy / stability analysis for {}", accuracy.video);
    info!("  Total processed frames: {}", accuracy.total_frames);
    info!("  Frames with birds: {}", accuracy.frames_with_birds);
    info!("  Detection coverage: {}", accuracy.detection_coverage);
    for (id, frames) in &accuracy.track_lengths {
        info!("  Bird {id}: {frames} frames");
    }
    info!(
        "  Average birds per frame: {}",
        accuracy.average_birds_per_frame
    );
}

fn write_accuracy(path: &Path, accuracy: &AccuracyReport) -> Result<()> {
    let to_err = |source: Box<dyn std::error::Error + Send + Sync>| Error::ReportWrite {
        path: path.to_path_buf(),
        source,
    };
    let file = File::create(path).map_err(|e| to_err(Box::new(e)))?;
    let mut writer = BufWriter::new(file);
    serde_json::to_writer_pretty(&mut writer, accuracy).map_err(|e| to_err(Box::new(e)))?;
    writer.write_all(b"\n").map_err(|e| to_err(Box::new(e)))?;
    writer.flush().map_err(|e| to_err(Box::new(e)))
}

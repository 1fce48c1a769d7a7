//! Per-frame count table in CSV.

use crate::constants::WEIGHT_DECIMAL_PLACES;
use crate::error::{Error, Result};
use crate::output::{Report, ReportWriter};
use crate::weight::round_to;
use std::path::{Path, PathBuf};

/// Writes one row per observed frame: index, bird count, summed weight.
pub struct CsvFrameWriter {
    path: PathBuf,
}

impl CsvFrameWriter {
    /// Create a writer targeting `path`.
    pub fn new(path: &Path) -> Self {
        Self {
            path: path.to_path_buf(),
        }
    }

    fn write_rows(&self, report: &Report) -> std::result::Result<(), csv::Error> {
        let mut writer = csv::Writer::from_path(&self.path)?;
        writer.write_record(["frame", "bird_count", "total_weight_kg"])?;

        for (frame, count) in &report.summary.frame_wise_counts {
            let total_weight: f64 = report
                .frames
                .get(frame)
                .map(|dets| dets.iter().filter_map(|d| d.estimated_weight_kg).sum())
                .unwrap_or(0.0);
            writer.write_record([
                frame.to_string(),
                count.to_string(),
                round_to(total_weight, WEIGHT_DECIMAL_PLACES).to_string(),
            ])?;
        }

        writer.flush()?;
        Ok(())
    }
}

impl ReportWriter for CsvFrameWriter {
    fn write(&mut self, report: &Report) -> Result<()> {
        self.write_rows(report).map_err(|e| Error::ReportWrite {
            path: self.path.clone(),
            source: Box::new(e),
        })
    }

    fn path(&self) -> &Path {
        &self.path
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::analysis::BirdAnalyzer;
    use crate::detection::{BoundingBox, Detection};
    use tempfile::TempDir;

    #[test]
    fn test_rows_follow_frame_order() {
        let mut analyzer = BirdAnalyzer::new();
        let mut a = Detection::new(1, BoundingBox::new(0.0, 0.0, 10.0, 10.0), None);
        a.estimated_weight_kg = Some(0.08);
        let mut b = a.clone();
        b.track_id = 2;
        analyzer.update(10, vec![a, b]);
        analyzer.update(5, Vec::new());
        let report = Report::from_analyzer(analyzer);

        let dir = TempDir::new().unwrap();
        let path = dir.path().join("clip_frame_counts.csv");
        CsvFrameWriter::new(&path).write(&report).unwrap();

        let contents = std::fs::read_to_string(&path).unwrap();
        assert_eq!(
            contents,
            "frame,bird_count,total_weight_kg\n5,0,0\n10,2,0.16\n"
        );
    }
}

//! Persisted per-video report.
//!
//! Frame-index keys serialize as decimal strings and parse back to integers.

use crate::analysis::{BirdAnalyzer, Summary};
use crate::detection::Detection;
use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs::File;
use std::io::{BufReader, BufWriter, Write};
use std::path::Path;

/// Summary plus per-frame detections for one processed video.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Report {
    /// Aggregate counters.
    pub summary: Summary,
    /// Detections per frame index.
    #[serde(default)]
    pub frames: BTreeMap<u64, Vec<Detection>>,
}

impl Report {
    /// Build a report from a finished analyzer run.
    pub fn from_analyzer(analyzer: BirdAnalyzer) -> Self {
        let (summary, frames) = analyzer.into_parts();
        Self { summary, frames }
    }
}

/// Write a report as pretty-printed JSON.
pub fn write_report(path: &Path, report: &Report) -> Result<()> {
    let to_err = |source: Box<dyn std::error::Error + Send + Sync>| Error::ReportWrite {
        path: path.to_path_buf(),
        source,
    };

    let file = File::create(path).map_err(|e| to_err(Box::new(e)))?;
    let mut writer = BufWriter::new(file);
    serde_json::to_writer_pretty(&mut writer, report).map_err(|e| to_err(Box::new(e)))?;
    writer.write_all(b"\n").map_err(|e| to_err(Box::new(e)))?;
    writer.flush().map_err(|e| to_err(Box::new(e)))
}

/// Read a report written by [`write_report`].
pub fn read_report(path: &Path) -> Result<Report> {
    let file = File::open(path).map_err(|e| Error::ReportRead {
        path: path.to_path_buf(),
        source: e,
    })?;
    serde_json::from_reader(BufReader::new(file)).map_err(|e| Error::ReportParse {
        path: path.to_path_buf(),
        source: e,
    })
}

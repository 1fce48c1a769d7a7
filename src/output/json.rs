//! JSON report writer.

use crate::error::Result;
use crate::output::{Report, ReportWriter, write_report};
use std::path::{Path, PathBuf};

/// Writes the full report as JSON.
pub struct JsonReportWriter {
    path: PathBuf,
}

impl JsonReportWriter {
    /// Create a writer targeting `path`.
    pub fn new(path: &Path) -> Self {
        Self {
            path: path.to_path_buf(),
        }
    }
}

impl ReportWriter for JsonReportWriter {
    fn write(&mut self, report: &Report) -> Result<()> {
        write_report(&self.path, report)
    }

    fn path(&self) -> &Path {
        &self.path
    }
}

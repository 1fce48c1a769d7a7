//! Output writer trait definition.

use crate::error::Result;
use crate::output::Report;
use std::path::Path;

/// Trait for persisting a finished report in some format.
pub trait ReportWriter {
    /// Write the whole report.
    fn write(&mut self, report: &Report) -> Result<()>;

    /// Destination path.
    fn path(&self) -> &Path;
}

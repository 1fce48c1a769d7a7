//! Report types and output writers.

mod csv;
mod envelope;
mod json;
pub mod progress;
mod report;
mod writer;

pub use csv::CsvFrameWriter;
pub use envelope::{
    AccuracyBatchPayload, ErrorPayload, EventType, JsonEnvelope, ProcessResponse, emit_json,
};
pub use json::JsonReportWriter;
pub use report::{Report, read_report, write_report};
pub use writer::ReportWriter;

//! Per-video aggregation and offline report checks.

mod accuracy;
mod analyzer;

pub use accuracy::{AccuracyReport, FrameHeights, compute_accuracy, summary_discrepancies};
pub use analyzer::{BirdAnalyzer, Summary};

//! Processing pipeline components.

mod accuracy_batch;
mod coordinator;
mod processor;

pub use accuracy_batch::{AccuracyBatchOptions, AccuracyOutcome, collect_report_files, run_accuracy_batch};
pub use coordinator::{
    ProcessCheck, ProcessOptions, annotated_dir_for, collect_inputs, output_dir_for,
    output_path_for, should_process, tracks_path_for, video_name,
};
pub use processor::{ProcessResult, open_tracker, process_video};

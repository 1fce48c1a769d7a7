//! CLI argument definitions.

use crate::cli::validators::{parse_confidence, parse_crop_ratio, parse_scale_factor};
use crate::config::OutputFormat;
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

/// Count tracked birds in video frames and estimate their weight.
#[derive(Debug, Parser)]
#[command(name = "birdcount")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Subcommand to run.
    #[command(subcommand)]
    pub command: Option<Command>,

    /// Frame directories (or directories containing them) to process.
    pub inputs: Vec<PathBuf>,

    /// Options for processing videos.
    #[command(flatten)]
    pub process: ProcessArgs,
}

/// Available subcommands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Manage configuration.
    Config {
        /// Configuration action to perform.
        #[command(subcommand)]
        action: ConfigAction,
    },
    /// Recompute accuracy metrics from saved reports.
    Accuracy(AccuracyArgs),
}

/// Config subcommand actions.
#[derive(Debug, Clone, Copy, Subcommand)]
pub enum ConfigAction {
    /// Create default configuration file.
    Init,
    /// Display current configuration.
    Show,
    /// Print configuration file path.
    Path,
}

/// Arguments for the accuracy command.
#[derive(Debug, Args)]
pub struct AccuracyArgs {
    /// Directory containing `*_results.json` reports.
    pub detections_dir: PathBuf,

    /// Output directory (default: `experiment/` next to the detections directory).
    #[arg(short, long)]
    pub output_dir: Option<PathBuf>,

    /// Directory holding the original frame directories, for frame height checks.
    #[arg(long, env = "BIRDCOUNT_VIDEOS_DIR")]
    pub videos_dir: Option<PathBuf>,

    /// Crop ratio the reports were produced with (default: from config).
    #[arg(long, value_parser = parse_crop_ratio)]
    pub crop_top_ratio: Option<f64>,
}

/// Arguments for processing videos.
#[derive(Debug, Args)]
#[allow(clippy::struct_excessive_bools)]
pub struct ProcessArgs {
    /// Output directory (default: parent of each input).
    #[arg(short, long, env = "BIRDCOUNT_OUTPUT_DIR")]
    pub output_dir: Option<PathBuf>,

    /// Tracker export to replay (default: `tracks.jsonl` inside the input).
    #[arg(long)]
    pub tracks: Option<PathBuf>,

    /// Output formats (comma-separated: json,csv).
    #[arg(short, long, value_delimiter = ',', env = "BIRDCOUNT_FORMAT")]
    pub format: Option<Vec<OutputFormat>>,

    /// Minimum detection confidence (0.0-1.0).
    #[arg(short = 'c', long, value_parser = parse_confidence, env = "BIRDCOUNT_CONFIDENCE")]
    pub confidence: Option<f32>,

    /// IoU threshold for suppressing overlapping boxes (0.0-1.0).
    #[arg(long, value_parser = parse_confidence, env = "BIRDCOUNT_IOU")]
    pub iou: Option<f32>,

    /// Fraction of frame height removed from the top before detection (0.0-0.99).
    #[arg(long, value_parser = parse_crop_ratio, env = "BIRDCOUNT_CROP_TOP_RATIO")]
    pub crop_top_ratio: Option<f64>,

    /// Process every Nth frame.
    #[arg(short = 'n', long, value_parser = clap::value_parser!(u64).range(1..),
          env = "BIRDCOUNT_FRAME_SKIP")]
    pub frame_skip: Option<u64>,

    /// Weight per square pixel of box area, in kg.
    #[arg(long, value_parser = parse_scale_factor)]
    pub scale_factor: Option<f64>,

    /// Do not write annotated frames.
    #[arg(long)]
    pub no_annotate: bool,

    /// Reprocess videos even if outputs exist.
    #[arg(long)]
    pub force: bool,

    /// Stop on first error.
    #[arg(long)]
    pub fail_fast: bool,

    /// Print one JSON result line per video on stdout.
    #[arg(long)]
    pub json: bool,

    /// Suppress progress output.
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Disable progress bars.
    #[arg(long)]
    pub no_progress: bool,

    /// Increase verbosity (-v: debug, -vv: trace).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_is_well_formed() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_process_flags() {
        let cli = Cli::try_parse_from([
            "birdcount",
            "-n",
            "3",
            "--crop-top-ratio",
            "0.2",
            "-f",
            "json,csv",
            "frames/clip",
        ])
        .unwrap();
        assert_eq!(cli.inputs, vec![PathBuf::from("frames/clip")]);
        assert_eq!(cli.process.frame_skip, Some(3));
        assert_eq!(cli.process.crop_top_ratio, Some(0.2));
        assert_eq!(
            cli.process.format,
            Some(vec![OutputFormat::Json, OutputFormat::Csv])
        );
    }

    #[test]
    fn test_zero_frame_skip_rejected() {
        assert!(Cli::try_parse_from(["birdcount", "-n", "0", "clip"]).is_err());
    }

    #[test]
    fn test_crop_ratio_of_one_rejected() {
        assert!(Cli::try_parse_from(["birdcount", "--crop-top-ratio", "1.0", "clip"]).is_err());
    }

    #[test]
    fn test_accuracy_subcommand() {
        let cli = Cli::try_parse_from(["birdcount", "accuracy", "outputs/detections"]).unwrap();
        match cli.command {
            Some(Command::Accuracy(args)) => {
                assert_eq!(args.detections_dir, PathBuf::from("outputs/detections"));
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }
}

//! Birdcount - bird counting and weight estimation from tracked video frames.
//!
//! Frames are cropped, passed to a detection source that assigns persistent
//! track identities, remapped to original coordinates, weighed by box area,
//! and aggregated into a per-video report.

#![warn(missing_docs)]

pub mod analysis;
pub mod cli;
pub mod config;
pub mod constants;
pub mod detection;
pub mod error;
pub mod frames;
pub mod locking;
pub mod output;
pub mod pipeline;
pub mod weight;

use clap::{CommandFactory, Parser};
use cli::{AccuracyArgs, Cli, Command, ProcessArgs};
use config::{Config, OutputFormat, config_file_path, load_default_config, save_default_config};
use detection::CropRatio;
use output::{
    AccuracyBatchPayload, ErrorPayload, EventType, ProcessResponse, emit_json, progress,
};
use pipeline::{
    AccuracyBatchOptions, ProcessCheck, ProcessOptions, collect_inputs, open_tracker,
    output_dir_for, process_video, run_accuracy_batch, should_process,
};
use std::path::PathBuf;
use std::time::Instant;
use tracing::{error, info, warn};

pub use error::{Error, Result};

/// Main entry point for birdcount CLI.
pub fn run() -> Result<()> {
    let cli = Cli::parse();

    init_logging(cli.process.verbose, cli.process.quiet);

    // Remove lock files if interrupted mid-video
    if let Err(e) = ctrlc::set_handler(|| {
        locking::cleanup_all_locks();
        std::process::exit(130); // 128 + SIGINT(2)
    }) {
        warn!("Failed to install Ctrl+C handler: {e}");
    }

    let config = load_default_config()?;

    if let Some(command) = cli.command {
        return handle_command(command, &config, cli.process.json);
    }

    if cli.inputs.is_empty() {
        Cli::command().print_help()?;
        return Ok(());
    }

    process_inputs(&cli.inputs, &cli.process, &config)
}

/// Merge CLI overrides into the loaded configuration and validate the result.
pub fn resolve_options(
    inputs_len: usize,
    args: &ProcessArgs,
    config: &Config,
) -> Result<ProcessOptions> {
    if args.tracks.is_some() && inputs_len != 1 {
        return Err(Error::ConfigValidation {
            message: "--tracks requires exactly one input".to_string(),
        });
    }

    let mut merged = config.clone();
    if let Some(c) = args.confidence {
        merged.detector.confidence_threshold = c;
    }
    if let Some(iou) = args.iou {
        merged.detector.iou_threshold = iou;
    }
    if let Some(ratio) = args.crop_top_ratio {
        merged.detector.crop_top_ratio = ratio;
    }
    if let Some(skip) = args.frame_skip {
        merged.processing.frame_skip = skip;
    }
    if let Some(scale) = args.scale_factor {
        merged.weight.scale_factor = scale;
    }
    if let Some(formats) = &args.format {
        merged.output.formats = formats.clone();
        if !merged.output.formats.contains(&OutputFormat::Json) {
            merged.output.formats.insert(0, OutputFormat::Json);
        }
    }
    if args.no_annotate {
        merged.processing.annotate = false;
    }

    config::validate_config(&merged)?;

    Ok(ProcessOptions {
        output_dir: args.output_dir.clone(),
        tracks: args.tracks.clone(),
        formats: merged.output.formats,
        force: args.force,
        confidence_threshold: merged.detector.confidence_threshold,
        iou_threshold: merged.detector.iou_threshold,
        crop_ratio: CropRatio::new(merged.detector.crop_top_ratio)?,
        frame_skip: merged.processing.frame_skip,
        scale_factor: merged.weight.scale_factor,
        annotate: merged.processing.annotate,
        progress_enabled: !args.quiet && !args.no_progress && !args.json,
    })
}

/// Process every video found under the given inputs.
fn process_inputs(inputs: &[PathBuf], args: &ProcessArgs, config: &Config) -> Result<()> {
    let total_start = Instant::now();

    let options = resolve_options(inputs.len(), args, config)?;

    let videos = collect_inputs(inputs)?;
    if videos.is_empty() {
        return Err(Error::NoValidInputs);
    }
    if options.tracks.is_some() && videos.len() != 1 {
        return Err(Error::ConfigValidation {
            message: format!(
                "--tracks requires exactly one input, found {} frame directories",
                videos.len()
            ),
        });
    }
    info!("Found {} video(s) to process", videos.len());

    info!(
        "Settings: confidence={:.2}, iou={:.2}, crop_top_ratio={:.2}, frame_skip={}",
        options.confidence_threshold,
        options.iou_threshold,
        options.crop_ratio.get(),
        options.frame_skip
    );

    let video_progress = progress::create_video_progress(videos.len(), options.progress_enabled);

    let mut processed = 0;
    let mut skipped = 0;
    let mut errors = 0;
    let mut total_unique = 0;

    for video in &videos {
        let video_output_dir = output_dir_for(video, options.output_dir.as_deref());

        match should_process(video, &video_output_dir, &options.formats, options.force) {
            ProcessCheck::SkipExists => {
                info!("Skipping (output exists): {}", video.display());
                skipped += 1;
                progress::inc_progress(video_progress.as_ref());
                continue;
            }
            ProcessCheck::SkipLocked => {
                info!("Skipping (locked): {}", video.display());
                skipped += 1;
                progress::inc_progress(video_progress.as_ref());
                continue;
            }
            ProcessCheck::Process => {}
        }

        // Each video gets its own tracker so identities never leak between runs.
        let result = open_tracker(video, &options).and_then(|mut tracker| {
            process_video(video, &video_output_dir, &options, &mut tracker)
        });

        match result {
            Ok(result) => {
                processed += 1;
                total_unique += result.unique_birds;
                if args.json {
                    emit_json(
                        EventType::VideoCompleted,
                        ProcessResponse {
                            message: "Processing complete".to_string(),
                            total_frames: result.total_frames,
                            processed_frames: result.processed_frames,
                            frame_skip: result.frame_skip,
                            unique_birds: result.unique_birds,
                            annotated_video: result.annotated_dir,
                            results_json: result.report_path,
                        },
                    );
                }
            }
            Err(e) => {
                error!("Failed to process {}: {}", video.display(), e);
                errors += 1;
                if args.json {
                    emit_json(
                        EventType::Error,
                        ErrorPayload {
                            input: Some(video.clone()),
                            message: e.to_string(),
                        },
                    );
                }
                if args.fail_fast {
                    progress::finish_progress(video_progress, "Failed");
                    return Err(e);
                }
            }
        }
        progress::inc_progress(video_progress.as_ref());
    }

    progress::finish_progress(video_progress, "Complete");

    info!(
        "Complete: {} processed, {} skipped, {} errors, {} unique birds in {:.2}s",
        processed,
        skipped,
        errors,
        total_unique,
        total_start.elapsed().as_secs_f64()
    );

    if errors > 0 {
        return Err(Error::BatchFailed {
            failed: errors,
            total: videos.len(),
        });
    }

    Ok(())
}

fn init_logging(verbose: u8, quiet: bool) {
    use tracing_subscriber::{EnvFilter, fmt};

    let filter_str = if quiet {
        "warn"
    } else {
        match verbose {
            0 => "info",
            1 => "debug",
            _ => "trace",
        }
    };

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter_str));

    // Logs go to stderr so `--json` output on stdout stays machine-readable.
    fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn handle_command(command: Command, config: &Config, json: bool) -> Result<()> {
    match command {
        Command::Config { action } => handle_config_command(action),
        Command::Accuracy(args) => handle_accuracy_command(&args, config, json),
    }
}

fn handle_accuracy_command(args: &AccuracyArgs, config: &Config, json: bool) -> Result<()> {
    let options = accuracy_options(args, config)?;
    let outcome = run_accuracy_batch(&options)?;
    info!(
        "Accuracy complete: {} written, {} skipped",
        outcome.written.len(),
        outcome.skipped.len()
    );

    if json {
        emit_json(
            EventType::AccuracyCompleted,
            AccuracyBatchPayload {
                written: outcome.written,
                skipped: outcome.skipped,
            },
        );
    }
    Ok(())
}

/// Build accuracy batch options; a crop ratio taken from config is validated
/// like one given on the command line.
fn accuracy_options(args: &AccuracyArgs, config: &Config) -> Result<AccuracyBatchOptions> {
    let ratio = CropRatio::new(args.crop_top_ratio.unwrap_or(config.detector.crop_top_ratio))?;
    Ok(AccuracyBatchOptions {
        detections_dir: args.detections_dir.clone(),
        output_dir: args.output_dir.clone(),
        videos_dir: args.videos_dir.clone(),
        crop_top_ratio: ratio.get(),
    })
}

#[allow(clippy::print_stdout)]
fn handle_config_command(action: cli::ConfigAction) -> Result<()> {
    use cli::ConfigAction;

    match action {
        ConfigAction::Init => {
            let path = config_file_path()?;
            if path.exists() {
                println!("Configuration file already exists: {}", path.display());
            } else {
                let saved_path = save_default_config(&Config::default())?;
                println!("Created configuration file: {}", saved_path.display());
            }
            Ok(())
        }
        ConfigAction::Show => {
            let config = load_default_config()?;
            println!("{config:#?}");
            Ok(())
        }
        ConfigAction::Path => {
            let path = config_file_path()?;
            println!("{}", path.display());
            Ok(())
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::float_cmp)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> Cli {
        Cli::try_parse_from(std::iter::once("birdcount").chain(args.iter().copied())).unwrap()
    }

    #[test]
    fn test_resolve_uses_config_defaults() {
        let cli = parse(&["clip"]);
        let options = resolve_options(1, &cli.process, &Config::default()).unwrap();
        assert_eq!(options.frame_skip, 5);
        assert_eq!(options.crop_ratio.get(), 0.3);
        assert_eq!(options.confidence_threshold, 0.35);
        assert!(options.annotate);
        assert_eq!(options.formats, vec![OutputFormat::Json]);
    }

    #[test]
    fn test_cli_overrides_config() {
        let cli = parse(&["-n", "2", "-c", "0.6", "--no-annotate", "-f", "csv", "clip"]);
        let options = resolve_options(1, &cli.process, &Config::default()).unwrap();
        assert_eq!(options.frame_skip, 2);
        assert_eq!(options.confidence_threshold, 0.6);
        assert!(!options.annotate);
        assert_eq!(options.formats, vec![OutputFormat::Json, OutputFormat::Csv]);
    }

    #[test]
    fn test_invalid_config_is_rejected() {
        let cli = parse(&["clip"]);
        let mut config = Config::default();
        config.detector.crop_top_ratio = 1.5;
        assert!(matches!(
            resolve_options(1, &cli.process, &config),
            Err(Error::InvalidCropRatio { .. })
        ));
    }

    #[test]
    fn test_accuracy_rejects_invalid_config_crop_ratio() {
        let Some(Command::Accuracy(args)) = parse(&["accuracy", "detections"]).command else {
            panic!("expected accuracy command");
        };
        let mut config = Config::default();
        config.detector.crop_top_ratio = 1.5;
        assert!(matches!(
            accuracy_options(&args, &config),
            Err(Error::InvalidCropRatio { .. })
        ));

        config.detector.crop_top_ratio = 0.25;
        assert_eq!(accuracy_options(&args, &config).unwrap().crop_top_ratio, 0.25);
    }

    #[test]
    fn test_tracks_requires_single_input() {
        let cli = parse(&["--tracks", "t.jsonl", "a", "b"]);
        assert!(resolve_options(2, &cli.process, &Config::default()).is_err());
    }
}

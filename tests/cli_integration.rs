//! Integration tests for the birdcount binary.

#![allow(clippy::unwrap_used)]

use assert_cmd::cargo::cargo_bin_cmd;
use image::RgbImage;
use predicates::prelude::*;
use std::fs;
use std::path::Path;
use tempfile::TempDir;

fn birdcount(config_dir: &Path) -> assert_cmd::Command {
    let mut cmd = cargo_bin_cmd!("birdcount");
    cmd.env("BIRDCOUNT_CONFIG", config_dir.join("config.toml"))
        .env_remove("RUST_LOG");
    cmd
}

fn make_video(root: &Path) -> std::path::PathBuf {
    let dir = root.join("clip");
    fs::create_dir_all(&dir).unwrap();
    for i in 0..3 {
        RgbImage::new(20, 50)
            .save(dir.join(format!("{i:06}.png")))
            .unwrap();
    }
    fs::write(
        dir.join("tracks.jsonl"),
        r#"{"frame": 0, "detections": [{"track_id": 7, "bbox": [1, 1, 11, 11], "confidence": 0.9}]}"#,
    )
    .unwrap();
    dir
}

#[test]
fn test_tracks_requires_single_input() {
    let cfg = TempDir::new().unwrap();
    let mut cmd = birdcount(cfg.path());
    cmd.arg("--tracks").arg("t.jsonl").arg("a").arg("b");

    cmd.assert()
        .failure()
        .stderr(predicate::str::contains("--tracks requires exactly one input"));
}

#[test]
fn test_invalid_crop_ratio_rejected_by_parser() {
    let cfg = TempDir::new().unwrap();
    let mut cmd = birdcount(cfg.path());
    cmd.arg("--crop-top-ratio").arg("1.5").arg("clip");

    cmd.assert().failure();
}

#[test]
fn test_config_path_honours_env() {
    let cfg = TempDir::new().unwrap();
    let mut cmd = birdcount(cfg.path());
    cmd.arg("config").arg("path");

    cmd.assert()
        .success()
        .stdout(predicate::str::contains("config.toml"))
        .stdout(predicate::str::contains(
            cfg.path().to_string_lossy().into_owned(),
        ));
}

#[test]
fn test_config_init_writes_file() {
    let cfg = TempDir::new().unwrap();
    birdcount(cfg.path())
        .args(["config", "init"])
        .assert()
        .success();

    let contents = fs::read_to_string(cfg.path().join("config.toml")).unwrap();
    assert!(contents.contains("[detector]"));
    assert!(contents.contains("frame_skip"));
}

#[test]
fn test_accuracy_missing_dir_fails() {
    let cfg = TempDir::new().unwrap();
    let mut cmd = birdcount(cfg.path());
    cmd.arg("accuracy").arg(cfg.path().join("missing"));

    cmd.assert()
        .failure()
        .stderr(predicate::str::contains("detections directory not found"));
}

#[test]
fn test_process_emits_json_envelope() {
    let root = TempDir::new().unwrap();
    let input = make_video(root.path());
    let out = root.path().join("out");

    let output = birdcount(root.path())
        .arg("--json")
        .arg("--no-annotate")
        .arg("-n")
        .arg("1")
        .arg("-o")
        .arg(&out)
        .arg(&input)
        .output()
        .unwrap();
    assert!(output.status.success());

    let stdout = String::from_utf8(output.stdout).unwrap();
    let line = stdout.lines().next().unwrap();
    let value: serde_json::Value = serde_json::from_str(line).unwrap();
    assert_eq!(value["event"], "video_completed");
    assert_eq!(value["payload"]["unique_birds"], 1);
    assert_eq!(value["payload"]["total_frames"], 3);
    assert_eq!(value["payload"]["processed_frames"], 3);
    assert!(out.join("clip_results.json").exists());
    assert!(!out.join("annotated_clip").exists());
}

#[test]
fn test_missing_tracker_export_fails_run() {
    let root = TempDir::new().unwrap();
    let input = make_video(root.path());
    fs::remove_file(input.join("tracks.jsonl")).unwrap();

    birdcount(root.path())
        .args(["-q", "--no-progress", "-o"])
        .arg(root.path().join("out"))
        .arg(&input)
        .assert()
        .failure()
        .code(1)
        .stderr(predicate::str::contains("1 of 1 video(s) failed"));

    assert!(!root.path().join("out").join("clip_results.json").exists());
}

#[test]
fn test_accuracy_after_processing() {
    let root = TempDir::new().unwrap();
    let input = make_video(root.path());
    let detections = root.path().join("detections");

    birdcount(root.path())
        .args(["-q", "--no-progress", "-o"])
        .arg(&detections)
        .arg(&input)
        .assert()
        .success();
    assert!(detections.join("annotated_clip").join("000000.png").exists());

    birdcount(root.path())
        .arg("--json")
        .arg("accuracy")
        .arg(&detections)
        .assert()
        .success()
        .stdout(predicate::str::contains("accuracy_completed"));

    assert!(
        root.path()
            .join("experiment")
            .join("clip_results_accuracy.json")
            .exists()
    );
}

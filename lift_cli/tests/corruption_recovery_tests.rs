//! Corruption recovery tests for the lift binary.
//!
//! These tests verify the system can handle:
//! - Corrupted set and workout logs
//! - Partial writes (a crash mid-line)

use assert_cmd::Command;
use std::fs;
use std::io::Write as IoWrite;
use std::path::Path;
use tempfile::TempDir;

fn cli(dir: &Path) -> Command {
    let mut cmd = Command::new(assert_cmd::cargo::cargo_bin!("lift"));
    cmd.arg("--data-dir")
        .arg(dir.join("data"))
        .arg("--config")
        .arg(dir.join("config.toml"))
        .arg("--date")
        .arg("2024-03-01");
    cmd
}

fn setup_test_dir() -> TempDir {
    let temp_dir = tempfile::tempdir().expect("Failed to create temp dir");
    fs::write(temp_dir.path().join("config.toml"), "").unwrap();
    fs::create_dir_all(temp_dir.path().join("data")).unwrap();
    temp_dir
}

fn set_numbers(dir: &Path) -> Vec<u64> {
    let content = fs::read_to_string(dir.join("data").join("sets.jsonl")).unwrap();
    content
        .lines()
        .filter_map(|l| serde_json::from_str::<serde_json::Value>(l).ok())
        .map(|v| v["set_number"].as_u64().unwrap())
        .collect()
}

#[test]
fn test_partial_set_line() {
    let temp_dir = setup_test_dir();

    // Write partial line (no newline), simulating a crash during write
    let mut file = fs::File::create(temp_dir.path().join("data").join("sets.jsonl")).unwrap();
    write!(file, r#"{{"id":"partial"#).unwrap();
    drop(file);

    cli(temp_dir.path()).args(["log", "sq 225 1x5"]).assert().success();
    cli(temp_dir.path()).args(["log", "sq 225 1x5"]).assert().success();

    // Both entries survive and keep distinct numbers
    assert_eq!(set_numbers(temp_dir.path()), vec![1, 2]);
}

#[test]
fn test_corrupted_set_lines_ignored() {
    let temp_dir = setup_test_dir();

    fs::write(
        temp_dir.path().join("data").join("sets.jsonl"),
        "{ invalid json }\n{ more invalid }\n",
    )
    .expect("Failed to write corrupted log");

    cli(temp_dir.path()).arg("today").assert().success();
    cli(temp_dir.path()).args(["log", "bp 135 2x5"]).assert().success();

    assert_eq!(set_numbers(temp_dir.path()), vec![1, 2]);
}

#[test]
fn test_partial_workout_line() {
    let temp_dir = setup_test_dir();

    let mut file = fs::File::create(temp_dir.path().join("data").join("workouts.jsonl")).unwrap();
    write!(file, r#"{{"id":"trunc"#).unwrap();
    drop(file);

    cli(temp_dir.path()).args(["log", "dl 315 1x5"]).assert().success();
    cli(temp_dir.path()).args(["log", "dl 315 1x5"]).assert().success();

    // The second run finds the workout the first one created
    let workouts = fs::read_to_string(temp_dir.path().join("data").join("workouts.jsonl")).unwrap();
    let parsed = workouts
        .lines()
        .filter(|l| serde_json::from_str::<serde_json::Value>(l).is_ok())
        .count();
    assert_eq!(parsed, 1);
    assert_eq!(set_numbers(temp_dir.path()), vec![1, 2]);
}

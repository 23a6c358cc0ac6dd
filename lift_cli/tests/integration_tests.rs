//! Integration tests for the lift binary.
//!
//! These tests verify end-to-end behavior including:
//! - Quick-entry logging and set numbering across runs
//! - User-facing parse errors
//! - Structured entry, listing and CSV export

use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use std::path::Path;
use tempfile::TempDir;

const DAY: &str = "2024-03-01";

/// Helper to create a test data directory
fn setup_test_dir() -> TempDir {
    tempfile::tempdir().expect("Failed to create temp dir")
}

/// Helper to get the CLI pointed at an isolated data dir and config
fn cli_on(dir: &Path, day: &str) -> Command {
    let mut cmd = Command::new(assert_cmd::cargo::cargo_bin!("lift"));
    cmd.arg("--data-dir")
        .arg(dir.join("data"))
        .arg("--config")
        .arg(dir.join("config.toml"))
        .arg("--date")
        .arg(day);
    cmd
}

fn cli(dir: &Path) -> Command {
    cli_on(dir, DAY)
}

/// Write an empty config so the user's own config never leaks into tests
fn write_config(dir: &Path, contents: &str) {
    fs::write(dir.join("config.toml"), contents).expect("Failed to write config");
}

fn stored_sets(dir: &Path) -> Vec<serde_json::Value> {
    let path = dir.join("data").join("sets.jsonl");
    let content = fs::read_to_string(path).unwrap_or_default();
    content
        .lines()
        .filter(|l| !l.trim().is_empty())
        .map(|l| serde_json::from_str(l).expect("valid JSON line"))
        .collect()
}

fn set_numbers(dir: &Path, exercise: &str) -> Vec<u64> {
    stored_sets(dir)
        .iter()
        .filter(|s| s["exercise_id"] == exercise)
        .map(|s| s["set_number"].as_u64().unwrap())
        .collect()
}

#[test]
fn test_cli_help() {
    Command::new(assert_cmd::cargo::cargo_bin!("lift"))
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("quick-entry"));
}

#[test]
fn test_quick_entry_logs_sets() {
    let temp_dir = setup_test_dir();
    write_config(temp_dir.path(), "");

    cli(temp_dir.path())
        .args(["log", "sq", "225", "3x5", "!hard", "#belt", "using", "new", "shoes"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Logged 3 sets of Back Squat"))
        .stdout(predicate::str::contains("!hard"));

    let sets = stored_sets(temp_dir.path());
    assert_eq!(sets.len(), 3);
    for set in &sets {
        assert_eq!(set["weight"], 225.0);
        assert_eq!(set["reps"], 5);
        assert_eq!(set["difficulty"], "hard");
        assert_eq!(set["tags"], serde_json::json!(["belt"]));
        assert_eq!(set["notes"], "using new shoes");
    }
    assert_eq!(set_numbers(temp_dir.path(), "back_squat"), vec![1, 2, 3]);
}

#[test]
fn test_entry_as_single_argument() {
    let temp_dir = setup_test_dir();
    write_config(temp_dir.path(), "");

    cli(temp_dir.path())
        .args(["log", "dl 315 1x5 #belt"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Logged 1 set of Deadlift"));
}

#[test]
fn test_numbering_continues_across_runs() {
    let temp_dir = setup_test_dir();
    write_config(temp_dir.path(), "");

    cli(temp_dir.path()).args(["log", "sq 225 3x5"]).assert().success();
    cli(temp_dir.path()).args(["log", "bp 135 2x5"]).assert().success();
    cli(temp_dir.path()).args(["log", "sq 235 2x3"]).assert().success();

    assert_eq!(set_numbers(temp_dir.path(), "back_squat"), vec![1, 2, 3, 4, 5]);
    assert_eq!(set_numbers(temp_dir.path(), "bench_press"), vec![1, 2]);
}

#[test]
fn test_new_day_restarts_numbering() {
    let temp_dir = setup_test_dir();
    write_config(temp_dir.path(), "");

    cli(temp_dir.path()).args(["log", "sq 225 3x5"]).assert().success();

    cli_on(temp_dir.path(), "2024-03-02")
        .args(["log", "sq 225 2x5"])
        .assert()
        .success();

    assert_eq!(set_numbers(temp_dir.path(), "back_squat"), vec![1, 2, 3, 1, 2]);

    let workouts = fs::read_to_string(temp_dir.path().join("data").join("workouts.jsonl")).unwrap();
    assert_eq!(workouts.lines().count(), 2);
}

#[test]
fn test_parse_errors_are_reported_and_store_nothing() {
    let temp_dir = setup_test_dir();
    write_config(temp_dir.path(), "");

    let cases = [
        ("sq", "Malformed entry"),
        ("sq abc 3x5", "Invalid weight: abc"),
        ("sq 225 3 5", "Invalid sets/reps '3': expected <sets>x<reps>"),
        ("sq 225 101x1", "101 sets exceeds the limit of 100 per entry"),
        ("zzz 225 3x5", "Exercise with shortcut 'zzz' not found"),
    ];

    for (entry, message) in cases {
        cli(temp_dir.path())
            .args(["log", entry])
            .assert()
            .failure()
            .stderr(predicate::str::contains(message));
    }

    assert!(stored_sets(temp_dir.path()).is_empty());
    assert!(!temp_dir.path().join("data").join("workouts.jsonl").exists());
}

#[test]
fn test_empty_entry_is_rejected() {
    let temp_dir = setup_test_dir();
    write_config(temp_dir.path(), "");

    cli(temp_dir.path())
        .args(["log", "   "])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Entry is empty"));
}

#[test]
fn test_structured_add_shares_numbering() {
    let temp_dir = setup_test_dir();
    write_config(temp_dir.path(), "");

    cli(temp_dir.path()).args(["log", "ohp 95 2x5"]).assert().success();

    cli(temp_dir.path())
        .args([
            "add", "--exercise", "OHP", "--weight", "97.5", "--reps", "3", "--sets", "2",
            "--tag", "pr", "--notes", "grindy",
        ])
        .assert()
        .success()
        .stdout(predicate::str::contains("Logged 2 sets of Overhead Press"));

    assert_eq!(set_numbers(temp_dir.path(), "overhead_press"), vec![1, 2, 3, 4]);
    let last = stored_sets(temp_dir.path()).pop().unwrap();
    assert_eq!(last["weight"], 97.5);
    assert_eq!(last["tags"], serde_json::json!(["pr"]));
    assert_eq!(last["notes"], "grindy");
}

#[test]
fn test_custom_exercise_from_config() {
    let temp_dir = setup_test_dir();
    write_config(
        temp_dir.path(),
        r#"
[units]
weight_unit = "kg"

[[exercises.custom]]
id = "zercher_squat"
name = "Zercher Squat"
shortcut = "zs"
"#,
    );

    cli(temp_dir.path())
        .args(["log", "zs 100 1x5"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Zercher Squat"))
        .stdout(predicate::str::contains("100 kg x 5"));
}

#[test]
fn test_today_lists_sets() {
    let temp_dir = setup_test_dir();
    write_config(temp_dir.path(), "");

    cli(temp_dir.path())
        .arg("today")
        .assert()
        .success()
        .stdout(predicate::str::contains("No workout logged"));

    cli(temp_dir.path()).args(["log", "sq 225 2x5"]).assert().success();
    cli(temp_dir.path()).args(["log", "pu 0 1x8"]).assert().success();

    cli(temp_dir.path())
        .arg("today")
        .assert()
        .success()
        .stdout(predicate::str::contains("Workout 2024-03-01 (3 sets)"))
        .stdout(predicate::str::contains("Back Squat"))
        .stdout(predicate::str::contains("Pull-up"));
}

#[test]
fn test_exercises_lists_shortcuts() {
    let temp_dir = setup_test_dir();
    write_config(temp_dir.path(), "");

    cli(temp_dir.path())
        .arg("exercises")
        .assert()
        .success()
        .stdout(predicate::str::contains("Back Squat"))
        .stdout(predicate::str::contains("rdl"));
}

#[test]
fn test_export_creates_csv() {
    let temp_dir = setup_test_dir();
    write_config(temp_dir.path(), "");

    cli(temp_dir.path()).args(["log", "sq 225 3x5 #belt"]).assert().success();

    let csv_path = temp_dir.path().join("export").join("sets.csv");
    cli(temp_dir.path())
        .arg("export")
        .arg(&csv_path)
        .assert()
        .success()
        .stdout(predicate::str::contains("Exported 3 sets"));

    let csv_content = fs::read_to_string(&csv_path).expect("Failed to read CSV");
    assert!(csv_content.starts_with("id,workout_id"));
    assert_eq!(csv_content.lines().count(), 4);
}

#[test]
fn test_duplicate_custom_shortcut_fails_validation() {
    let temp_dir = setup_test_dir();
    write_config(
        temp_dir.path(),
        r#"
[[exercises.custom]]
id = "safety_bar_squat"
name = "Safety Bar Squat"
shortcut = "sq"
"#,
    );

    cli(temp_dir.path())
        .arg("exercises")
        .assert()
        .failure()
        .stderr(predicate::str::contains("'sq' is used more than once"));
}

#[test]
fn test_export_with_no_sets_writes_header() {
    let temp_dir = setup_test_dir();
    write_config(temp_dir.path(), "");

    let csv_path = temp_dir.path().join("empty.csv");
    cli(temp_dir.path())
        .arg("export")
        .arg(&csv_path)
        .assert()
        .success()
        .stdout(predicate::str::contains("Exported 0 sets"));

    let csv_content = fs::read_to_string(&csv_path).expect("Failed to read CSV");
    assert!(csv_content.starts_with("id,workout_id"));
    assert_eq!(csv_content.lines().count(), 1);
}

#[test]
fn test_init_writes_default_config() {
    let temp_dir = setup_test_dir();
    let config_path = temp_dir.path().join("config.toml");

    cli(temp_dir.path())
        .arg("init")
        .assert()
        .success()
        .stdout(predicate::str::contains("Wrote default config"));

    let written = fs::read_to_string(&config_path).expect("Failed to read config");
    assert!(written.contains("weight_unit = \"lbs\""));

    // Existing file is left alone without --force
    fs::write(&config_path, "[units]\nweight_unit = \"kg\"\n").unwrap();
    cli(temp_dir.path())
        .arg("init")
        .assert()
        .success()
        .stdout(predicate::str::contains("already exists"));
    assert!(fs::read_to_string(&config_path).unwrap().contains("kg"));

    cli(temp_dir.path()).args(["init", "--force"]).assert().success();
    assert!(fs::read_to_string(&config_path).unwrap().contains("lbs"));
}

//! Integration tests for the coach binary.
//!
//! These tests verify end-to-end behavior including:
//! - Driving a workout session across invocations
//! - Refused transitions leaving the saved session untouched
//! - Log persistence, recommendations and exports
//! - Scoring and reporting commands

use assert_cmd::Command;
use predicates::prelude::*;
use serde_json::json;
use std::fs;
use std::path::Path;
use tempfile::TempDir;

/// Helper to create a test data directory with a plan for `dana`
fn setup_test_dir() -> TempDir {
    let temp_dir = tempfile::tempdir().expect("Failed to create temp dir");
    let plans = temp_dir.path().join("plans");
    fs::create_dir_all(&plans).unwrap();

    let plan = json!({
        "days": [
            {
                "label": "Day A",
                "focus_area": "legs",
                "exercises": [
                    { "name": "Squat", "set_count": 2, "rep_range_text": "5", "rest_seconds": 90 },
                    { "name": "Curl", "set_count": 1, "rep_range_text": "10-12", "rest_seconds": null }
                ]
            },
            { "label": "Day Empty", "focus_area": "rest", "exercises": [] }
        ]
    });
    fs::write(plans.join("dana.json"), plan.to_string()).unwrap();
    temp_dir
}

/// Helper to run the CLI as `dana` against a data directory
fn coach(data_dir: &Path) -> Command {
    let mut cmd = Command::new(assert_cmd::cargo::cargo_bin!("coach"));
    cmd.arg("--data-dir").arg(data_dir).arg("--user").arg("dana");
    cmd
}

fn log_lines(data_dir: &Path) -> Vec<String> {
    fs::read_to_string(data_dir.join("logs/dana.jsonl"))
        .unwrap_or_default()
        .lines()
        .filter(|l| !l.trim().is_empty())
        .map(String::from)
        .collect()
}

fn run_full_workout(data_dir: &Path) {
    coach(data_dir).args(["start", "Day A"]).assert().success();
    coach(data_dir).args(["set", "100", "5"]).assert().success();
    coach(data_dir).arg("skip-rest").assert().success();
    coach(data_dir).args(["set", "100", "5"]).assert().success();
    coach(data_dir)
        .args(["set", "12", "10"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Finish workout?"));
    coach(data_dir)
        .arg("confirm")
        .assert()
        .success()
        .stdout(predicate::str::contains("Workout saved"));
}

#[test]
fn test_cli_help() {
    Command::new(assert_cmd::cargo::cargo_bin!("coach"))
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("Workout session tracker"));
}

#[test]
fn test_status_without_session() {
    let temp_dir = setup_test_dir();
    coach(temp_dir.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("No workout in progress"));
}

#[test]
fn test_full_workout_saves_one_log() {
    let temp_dir = setup_test_dir();
    let data_dir = temp_dir.path();

    run_full_workout(data_dir);

    let lines = log_lines(data_dir);
    assert_eq!(lines.len(), 1);

    let log: serde_json::Value = serde_json::from_str(&lines[0]).unwrap();
    assert_eq!(log["type"], "legs");
    assert_eq!(log["exercises"].as_array().unwrap().len(), 2);
    assert_eq!(log["exercises"][0]["sets"].as_array().unwrap().len(), 2);

    // Session file is gone once the workout is committed
    assert!(!data_dir.join("session/dana.json").exists());
}

#[test]
fn test_set_refused_while_resting() {
    let temp_dir = setup_test_dir();
    let data_dir = temp_dir.path();

    coach(data_dir).args(["start", "Day A"]).assert().success();
    coach(data_dir)
        .args(["set", "100", "5"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Rest: 90s"));

    coach(data_dir)
        .args(["set", "100", "5"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("still resting"));

    coach(data_dir)
        .arg("status")
        .assert()
        .success()
        .stdout(predicate::str::contains("Sets left: 1"));
}

#[test]
fn test_set_with_bad_input_is_refused() {
    let temp_dir = setup_test_dir();
    let data_dir = temp_dir.path();

    coach(data_dir).args(["start", "Day A"]).assert().success();
    let before = fs::read_to_string(data_dir.join("session/dana.json")).unwrap();

    coach(data_dir)
        .args(["set", "heavy", "5"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("weight and reps are required"));

    let after = fs::read_to_string(data_dir.join("session/dana.json")).unwrap();
    assert_eq!(before, after);
}

#[test]
fn test_start_empty_day_is_refused() {
    let temp_dir = setup_test_dir();
    let data_dir = temp_dir.path();

    coach(data_dir)
        .args(["start", "Day Empty"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("has no exercises"));

    assert!(!data_dir.join("session/dana.json").exists());
}

#[test]
fn test_pause_holds_rest_timer() {
    let temp_dir = setup_test_dir();
    let data_dir = temp_dir.path();

    coach(data_dir).args(["start", "Day A"]).assert().success();
    coach(data_dir).args(["set", "100", "5"]).assert().success();
    coach(data_dir).args(["tick", "30"]).assert().success();
    coach(data_dir).arg("pause").assert().success();

    coach(data_dir)
        .args(["tick", "30"])
        .assert()
        .success()
        .stdout(predicate::str::contains("rest timer held at 60s"));

    coach(data_dir).arg("resume").assert().success();
    coach(data_dir)
        .args(["tick", "100"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Rest:").not());
}

#[test]
fn test_cancel_finish_keeps_session() {
    let temp_dir = setup_test_dir();
    let data_dir = temp_dir.path();

    coach(data_dir).args(["start", "Day A"]).assert().success();
    coach(data_dir).args(["set", "100", "5"]).assert().success();
    coach(data_dir)
        .arg("finish")
        .assert()
        .success()
        .stdout(predicate::str::contains("1 exercises will be saved"));
    coach(data_dir)
        .arg("cancel")
        .assert()
        .success()
        .stdout(predicate::str::contains("Sets left: 1"));

    assert!(log_lines(data_dir).is_empty());
}

#[test]
fn test_finish_empty_session_saves_nothing() {
    let temp_dir = setup_test_dir();
    let data_dir = temp_dir.path();

    coach(data_dir).args(["start", "Day A"]).assert().success();
    coach(data_dir).arg("finish").assert().success();
    coach(data_dir)
        .arg("confirm")
        .assert()
        .success()
        .stdout(predicate::str::contains("session discarded"));

    assert!(log_lines(data_dir).is_empty());
    assert!(!data_dir.join("session/dana.json").exists());
}

#[test]
fn test_recommend_after_workout() {
    let temp_dir = setup_test_dir();
    let data_dir = temp_dir.path();

    coach(data_dir)
        .args(["recommend", "Squat"])
        .assert()
        .success()
        .stdout(predicate::str::contains("No history"));

    run_full_workout(data_dir);

    coach(data_dir)
        .args(["recommend", "Squat", "--adjust", "increase", "--deload"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Last weight: 100"))
        .stdout(predicate::str::contains("Recommended: 105"))
        .stdout(predicate::str::contains("Deload recommended"));
}

#[test]
fn test_deload_flag_without_stored_recommendation() {
    let temp_dir = setup_test_dir();
    let data_dir = temp_dir.path();
    run_full_workout(data_dir);

    coach(data_dir)
        .args(["recommend", "Squat", "--deload"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Last weight: 100"))
        .stdout(predicate::str::contains("Recommended: 100"))
        .stdout(predicate::str::contains("Deload recommended"));
}

#[test]
fn test_progress_scores() {
    let temp_dir = setup_test_dir();

    coach(temp_dir.path())
        .args([
            "progress",
            "--goal",
            "fat-loss",
            "--starting-weight",
            "100",
            "--current-weight",
            "90",
            "--starting-fat",
            "25",
            "--current-fat",
            "20",
        ])
        .assert()
        .success()
        .stdout(predicate::str::contains("Body composition score: 20.00"))
        .stdout(predicate::str::contains("Workout progress score: 0.00"))
        .stdout(predicate::str::contains("Overall progress level: 14.00"));
}

#[test]
fn test_engagement_command() {
    let temp_dir = setup_test_dir();
    let path = temp_dir.path().join("thread.json");
    let thread = json!([
        { "sender": "client", "sent_at": "2026-05-01T09:00:00Z" },
        { "sender": "trainer", "sent_at": "2026-05-01T09:10:00Z" }
    ]);
    fs::write(&path, thread.to_string()).unwrap();

    coach(temp_dir.path())
        .arg("engagement")
        .arg(&path)
        .assert()
        .success()
        .stdout(predicate::str::contains("Engagement rate: 91.7"));
}

#[test]
fn test_report_command() {
    let temp_dir = setup_test_dir();
    let path = temp_dir.path().join("roster.json");
    let roster = json!({
        "trainer": { "id": "t1", "name": "Noa" },
        "clients": [{
            "id": "c1",
            "name": "Dana",
            "active": true,
            "measurements": {
                "goal": "fat_loss",
                "starting_weight": 100.0,
                "current_weight": 90.0,
                "starting_fat_pct": 25.0,
                "current_fat_pct": 20.0
            }
        }]
    });
    fs::write(&path, roster.to_string()).unwrap();

    coach(temp_dir.path())
        .arg("report")
        .arg(&path)
        .assert()
        .success()
        .stdout(predicate::str::contains("\"client_retention\": 100.0"))
        .stdout(predicate::str::contains("\"missed_sessions\": 3"))
        .stdout(predicate::str::contains("\"status\": \"behind\""));
}

#[test]
fn test_intensity_and_export() {
    let temp_dir = setup_test_dir();
    let data_dir = temp_dir.path();

    run_full_workout(data_dir);

    // Planned: Squat 60 x 2 x 5 + Curl 12 x 1 x 11 = 732; actual 1000 + 120
    coach(data_dir)
        .arg("intensity")
        .assert()
        .success()
        .stdout(predicate::str::contains("153.0%"));

    let csv_path = data_dir.join("export/logs.csv");
    coach(data_dir)
        .arg("export")
        .arg(&csv_path)
        .assert()
        .success()
        .stdout(predicate::str::contains("Exported 3 sets from 1 workouts"));

    let csv = fs::read_to_string(&csv_path).unwrap();
    assert!(csv.starts_with("log_id,date,type,exercise,set,weight,reps,volume"));
}

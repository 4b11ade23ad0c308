//! Basic CLI E2E tests.
//!
//! Each test runs the binary against its own temporary data directory with
//! the local workbook backend.

use std::path::Path;
use std::process::Command;

use tempfile::TempDir;

/// Run a CLI command and return (stdout, stderr, exit code).
fn run_cli(home: &Path, args: &[&str]) -> (String, String, i32) {
    let output = Command::new(env!("CARGO_BIN_EXE_weekplan"))
        .args(args)
        .env("WEEKPLAN_HOME", home)
        .env_remove("RUST_LOG")
        .output()
        .expect("Failed to execute CLI command");

    let stdout = String::from_utf8_lossy(&output.stdout).to_string();
    let stderr = String::from_utf8_lossy(&output.stderr).to_string();
    let code = output.status.code().unwrap_or(-1);

    (stdout, stderr, code)
}

/// Run a CLI command and expect success.
fn run_cli_success(home: &Path, args: &[&str]) -> String {
    let (stdout, stderr, code) = run_cli(home, args);
    assert_eq!(code, 0, "CLI command failed: {args:?}\n{stderr}");
    stdout
}

fn add_task(home: &Path, name: &str, frequency: &str, effort: &str) {
    run_cli_success(
        home,
        &[
            "task",
            "add",
            name,
            "--frequency",
            frequency,
            "--effort",
            effort,
        ],
    );
}

fn seeded_home() -> TempDir {
    let home = TempDir::new().unwrap();
    let dir = home.path();
    run_cli_success(dir, &["meal", "add", "Pasta"]);
    run_cli_success(dir, &["meal", "add", "Soep"]);
    add_task(dir, "Stofzuigen", "weekly", "low");
    add_task(dir, "Garage", "eenmalig", "hoog");
    run_cli_success(dir, &["activity", "add", "lise", "Yoga"]);
    home
}

#[test]
fn test_config_list_defaults() {
    let home = TempDir::new().unwrap();
    let stdout = run_cli_success(home.path(), &["config", "list"]);
    let config: serde_json::Value = serde_json::from_str(&stdout).unwrap();
    assert_eq!(config["store"]["backend"], "workbook");
    assert_eq!(config["household"]["primary"], "cedric");
    assert!(home.path().join("config.toml").exists());
}

#[test]
fn test_config_set_and_get() {
    let home = TempDir::new().unwrap();
    run_cli_success(home.path(), &["config", "set", "planner.seed", "5"]);
    let stdout = run_cli_success(home.path(), &["config", "get", "planner.seed"]);
    assert_eq!(stdout.trim(), "5");
}

#[test]
fn test_config_rejects_bad_on_days() {
    let home = TempDir::new().unwrap();
    let (_, stderr, code) = run_cli(
        home.path(),
        &["config", "set", "household.primary_on_days", "[1, 9]"],
    );
    assert_eq!(code, 1);
    assert!(stderr.contains("error:"));
}

#[test]
fn test_config_unknown_key_lists_sections() {
    let home = TempDir::new().unwrap();
    let (_, stderr, code) = run_cli(home.path(), &["config", "get", "planning.seed"]);
    assert_eq!(code, 1);
    assert!(stderr.contains("unknown config key 'planning.seed'"));
    assert!(stderr.contains("store, household, planner"));

    let (_, stderr, code) = run_cli(home.path(), &["config", "set", "planner.sed", "3"]);
    assert_eq!(code, 1);
    assert!(stderr.contains("keys in [planner]"));
    assert!(stderr.contains("planner.seed"));
}

#[test]
fn test_duplicate_meal_is_reported() {
    let home = seeded_home();
    let stdout = run_cli_success(home.path(), &["meal", "add", "Pasta"]);
    assert!(stdout.contains("already exists"));
}

#[test]
fn test_task_list_json() {
    let home = seeded_home();
    let stdout = run_cli_success(home.path(), &["task", "list", "--json"]);
    let tasks: serde_json::Value = serde_json::from_str(&stdout).unwrap();
    let names: Vec<&str> = tasks
        .as_array()
        .unwrap()
        .iter()
        .map(|t| t["name"].as_str().unwrap())
        .collect();
    assert_eq!(names, vec!["Stofzuigen", "Garage"]);
    assert_eq!(tasks[1]["frequency"], "one_off");
}

#[test]
fn test_week_show_json() {
    let home = seeded_home();
    let stdout = run_cli_success(
        home.path(),
        &["week", "show", "--start", "2024-06-03", "--json"],
    );
    let week: serde_json::Value = serde_json::from_str(&stdout).unwrap();
    let days = week.as_array().unwrap();
    assert_eq!(days.len(), 7);
    assert_eq!(days[0]["date"], "Monday 03 June 2024");
    assert_eq!(days[1]["primary_task"], "Stofzuigen");
    assert_eq!(days[3]["primary_task"], "Garage");
    assert_eq!(days[0]["activities"]["lise"], "Yoga");
    assert!(home.path().join("weekplan_db.json").exists());
}

#[test]
fn test_day_edit_checks_catalog() {
    let home = seeded_home();
    run_cli_success(home.path(), &["week", "show", "--start", "2024-06-03"]);

    run_cli_success(home.path(), &["day", "edit", "2024-06-03", "meal", "Soep"]);
    let stdout = run_cli_success(
        home.path(),
        &["week", "show", "--start", "2024-06-03", "--json"],
    );
    let week: serde_json::Value = serde_json::from_str(&stdout).unwrap();
    assert_eq!(week[0]["meal"], "Soep");

    let (_, stderr, code) = run_cli(
        home.path(),
        &["day", "edit", "2024-06-03", "meal", "Frietjes"],
    );
    assert_eq!(code, 1);
    assert!(stderr.contains("error:"));
}

#[test]
fn test_task_complete_one_off_removes_it() {
    let home = seeded_home();
    let stdout = run_cli_success(home.path(), &["task", "complete", "Garage"]);
    assert!(stdout.contains("removed"));

    let stdout = run_cli_success(home.path(), &["task", "list", "--json"]);
    let tasks: serde_json::Value = serde_json::from_str(&stdout).unwrap();
    assert_eq!(tasks.as_array().unwrap().len(), 1);
}

#[test]
fn test_task_complete_unknown_fails() {
    let home = seeded_home();
    let (_, stderr, code) = run_cli(home.path(), &["task", "complete", "Zolder"]);
    assert_eq!(code, 1);
    assert!(stderr.contains("not found"));
}

#[test]
fn test_week_archive() {
    let home = seeded_home();
    let stdout = run_cli_success(home.path(), &["week", "archive", "--start", "2024-06-03"]);
    assert!(stdout.contains("archived"));

    let raw = std::fs::read_to_string(home.path().join("weekplan_workbook.json")).unwrap();
    let book: serde_json::Value = serde_json::from_str(&raw).unwrap();
    let results = book["Weekresultaten"].as_array().unwrap();
    assert_eq!(results.len(), 2);
    assert_eq!(results[1][0], "2024-06-03");
}

#[test]
fn test_memory_backend_leaves_no_plan() {
    let home = TempDir::new().unwrap();
    run_cli_success(
        home.path(),
        &["--store", "memory", "week", "show", "--start", "2024-06-03"],
    );
    assert!(!home.path().join("weekplan_db.json").exists());
    assert!(!home.path().join("weekplan_workbook.json").exists());
}

#[test]
fn test_unknown_store_backend() {
    let home = TempDir::new().unwrap();
    let (_, _, code) = run_cli(home.path(), &["--store", "paper", "task", "list"]);
    assert_eq!(code, 2);
}

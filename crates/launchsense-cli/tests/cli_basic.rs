//! Basic CLI E2E tests.
//!
//! Tests invoke the built binary with HOME pointed at a temp directory so the
//! user's real config is never touched.

use std::path::{Path, PathBuf};
use std::process::Command;

use tempfile::TempDir;

/// Run a CLI command and return (exit code, stdout, stderr).
fn run_cli(home: &Path, args: &[&str]) -> (i32, String, String) {
    let output = Command::new(env!("CARGO_BIN_EXE_launchsense"))
        .args(args)
        .env("HOME", home)
        .env_remove("LAUNCHSENSE_ENV")
        .env_remove("LAUNCHSENSE_LOG")
        .output()
        .expect("Failed to execute CLI command");

    let stdout = String::from_utf8_lossy(&output.stdout).to_string();
    let stderr = String::from_utf8_lossy(&output.stderr).to_string();
    let code = output.status.code().unwrap_or(-1);

    (code, stdout, stderr)
}

fn write(dir: &TempDir, name: &str, content: &str) -> PathBuf {
    let path = dir.path().join(name);
    std::fs::write(&path, content).unwrap();
    path
}

const PREDICTIONS: &str = r#"[
    {"action": "Start meditation", "confidence": 0.89,
     "associated_apps": [{"package_id": "com.headspace", "display_name": "Headspace", "category": "health"}]},
    {"action": "Check work messages", "confidence": 0.75,
     "associated_apps": [{"package_id": "com.slack", "display_name": "Slack", "category": "communication"}]}
]"#;

const CATALOG: &str = r#"[
    {"package_id": "com.maps", "display_name": "Maps"},
    {"package_id": "com.slack", "display_name": "Slack", "category": "communication"},
    {"package_id": "com.headspace", "display_name": "Headspace", "category": "health"}
]"#;

#[test]
fn test_generate_json() {
    let home = TempDir::new().unwrap();
    let predictions = write(&home, "predictions.json", PREDICTIONS);
    let catalog = write(&home, "catalog.json", CATALOG);

    let (code, stdout, stderr) = run_cli(
        home.path(),
        &[
            "generate",
            "--routine",
            "morning",
            "--predictions",
            predictions.to_str().unwrap(),
            "--catalog",
            catalog.to_str().unwrap(),
            "--json",
        ],
    );
    assert_eq!(code, 0, "generate failed: {stderr}");

    let state: serde_json::Value = serde_json::from_str(&stdout).unwrap();
    assert_eq!(state["theme"]["name"], "Morning Fresh");
    assert_eq!(state["primary_actions"].as_array().unwrap().len(), 2);
    assert_eq!(state["app_grid"]["apps"][0]["display_name"], "Headspace");
}

#[test]
fn test_generate_text() {
    let home = TempDir::new().unwrap();
    let predictions = write(&home, "predictions.json", PREDICTIONS);

    let (code, stdout, _) = run_cli(
        home.path(),
        &["generate", "--routine", "morning", "--predictions", predictions.to_str().unwrap()],
    );
    assert_eq!(code, 0);
    assert!(stdout.contains("Theme: Morning Fresh"));
    assert!(stdout.contains("Start meditation"));
}

#[test]
fn test_generate_rejects_bad_confidence() {
    let home = TempDir::new().unwrap();
    let predictions = write(&home, "predictions.json", r#"[{"action": "Nap", "confidence": 3.0}]"#);

    let (code, _, stderr) = run_cli(
        home.path(),
        &["generate", "--routine", "evening", "--predictions", predictions.to_str().unwrap()],
    );
    assert_eq!(code, 1);
    assert!(stderr.contains("Invalid confidence"));
}

#[test]
fn test_unknown_routine_is_usage_error() {
    let home = TempDir::new().unwrap();
    let predictions = write(&home, "predictions.json", "[]");

    let (code, _, stderr) = run_cli(
        home.path(),
        &["generate", "--routine", "midnight", "--predictions", predictions.to_str().unwrap()],
    );
    assert_eq!(code, 2);
    assert!(stderr.contains("midnight"));
}

#[test]
fn test_analyze_json() {
    let home = TempDir::new().unwrap();
    let predictions = write(&home, "predictions.json", PREDICTIONS);

    let (code, stdout, _) = run_cli(
        home.path(),
        &["analyze", "--routine", "morning", "--predictions", predictions.to_str().unwrap(), "--json"],
    );
    assert_eq!(code, 0);

    let analysis: serde_json::Value = serde_json::from_str(&stdout).unwrap();
    assert_eq!(analysis["prediction_count"], 2);
    assert_eq!(analysis["routine_alignment"], 1.0);
    assert_eq!(analysis["focus_level"], "high");
}

#[test]
fn test_replay_debounces_rapid_batches() {
    let home = TempDir::new().unwrap();
    let batches = write(
        &home,
        "batches.json",
        r#"[
            {"offset_ms": 0, "predictions": []},
            {"offset_ms": 10, "predictions": [{"action": "Go for a run", "confidence": 0.9}]},
            {"offset_ms": 20, "predictions": [{"action": "Check work messages", "confidence": 0.75}]}
        ]"#,
    );

    let (code, stdout, stderr) = run_cli(
        home.path(),
        &["replay", "--routine", "morning", "--batches", batches.to_str().unwrap(), "--json"],
    );
    assert_eq!(code, 0, "replay failed: {stderr}");

    let emissions: Vec<serde_json::Value> = stdout
        .lines()
        .map(|line| serde_json::from_str(line).unwrap())
        .collect();
    assert_eq!(emissions.len(), 2);
    assert_eq!(emissions[0]["trigger"], "initial");
    assert_eq!(emissions[1]["trigger"], "debounced");
    assert_eq!(
        emissions[1]["state"]["primary_actions"][0]["action"],
        "Check work messages"
    );
}

#[test]
fn test_config_set_get_reset() {
    let home = TempDir::new().unwrap();

    let (code, stdout, _) = run_cli(home.path(), &["config", "get", "updater.debounce_ms"]);
    assert_eq!(code, 0);
    assert_eq!(stdout.trim(), "150");

    let (code, _, _) = run_cli(home.path(), &["config", "set", "updater.debounce_ms", "90"]);
    assert_eq!(code, 0);
    let (_, stdout, _) = run_cli(home.path(), &["config", "get", "updater.debounce_ms"]);
    assert_eq!(stdout.trim(), "90");

    let (code, _, stderr) = run_cli(home.path(), &["config", "set", "updater.debounce_ms", "0"]);
    assert_eq!(code, 1);
    assert!(stderr.contains("debounce_ms"));

    let (code, _, _) = run_cli(home.path(), &["config", "reset"]);
    assert_eq!(code, 0);
    let (_, stdout, _) = run_cli(home.path(), &["config", "get", "updater.debounce_ms"]);
    assert_eq!(stdout.trim(), "150");
}

#[test]
fn test_config_path_and_unknown_key() {
    let home = TempDir::new().unwrap();

    let (code, stdout, _) = run_cli(home.path(), &["config", "path"]);
    assert_eq!(code, 0);
    assert!(stdout.trim().ends_with(".config/launchsense/config.toml"));

    let (code, _, stderr) = run_cli(home.path(), &["config", "get", "updater.nope"]);
    assert_eq!(code, 1);
    assert!(stderr.contains("unknown key"));
}

#[test]
fn test_completions() {
    let home = TempDir::new().unwrap();
    let (code, stdout, _) = run_cli(home.path(), &["completions", "bash"]);
    assert_eq!(code, 0);
    assert!(stdout.contains("launchsense"));
}

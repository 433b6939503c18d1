//! Basic CLI E2E tests.
//!
//! Each test runs the built binary with HOME pointed at a temp directory so
//! config and history land somewhere disposable.

use std::io::Write;
use std::process::{Command, Stdio};

use tempfile::TempDir;

/// Run a CLI command and return (stdout, stderr, code).
fn run_cli(home: &TempDir, args: &[&str], stdin: &str) -> (String, String, i32) {
    let mut child = Command::new(env!("CARGO_BIN_EXE_lockin"))
        .args(args)
        .env("HOME", home.path())
        .env_remove("LOCKIN_ENV")
        .env_remove("LOCKIN_API_KEY")
        .env_remove("GEMINI_API_KEY")
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .expect("Failed to execute CLI command");

    child
        .stdin
        .take()
        .expect("stdin is piped")
        .write_all(stdin.as_bytes())
        .expect("Failed to write stdin");

    let output = child.wait_with_output().expect("Failed to wait for CLI");
    let stdout = String::from_utf8_lossy(&output.stdout).to_string();
    let stderr = String::from_utf8_lossy(&output.stderr).to_string();
    let code = output.status.code().unwrap_or(-1);

    (stdout, stderr, code)
}

#[test]
fn test_help() {
    let home = TempDir::new().unwrap();
    let (stdout, _, code) = run_cli(&home, &["--help"], "");
    assert_eq!(code, 0);
    assert!(stdout.contains("focus"));
    assert!(stdout.contains("streak"));
}

#[test]
fn test_coach_offline_fallbacks() {
    let home = TempDir::new().unwrap();
    let cases = [
        (vec!["coach", "start", "--intent", "x", "--offline"], "focus mode active. you got this."),
        (
            vec!["coach", "intervention", "--intent", "x", "--offline"],
            "stay with the feeling. don't distract yourself.",
        ),
        (vec!["coach", "completion", "--intent", "x", "--offline"], "session complete. good work."),
    ];
    for (args, expected) in cases {
        let (stdout, _, code) = run_cli(&home, &args, "");
        assert_eq!(code, 0);
        assert_eq!(stdout.trim(), expected);
    }
}

#[test]
fn test_config_get_set() {
    let home = TempDir::new().unwrap();
    let (stdout, _, code) = run_cli(&home, &["config", "get", "session.default_duration"], "");
    assert_eq!(code, 0);
    assert_eq!(stdout.trim(), "45");

    let (_, _, code) = run_cli(&home, &["config", "set", "session.default_duration", "30"], "");
    assert_eq!(code, 0);
    let (stdout, _, _) = run_cli(&home, &["config", "get", "session.default_duration"], "");
    assert_eq!(stdout.trim(), "30");
}

#[test]
fn test_config_rejects_bad_values() {
    let home = TempDir::new().unwrap();
    let (_, stderr, code) = run_cli(&home, &["config", "set", "session.default_duration", "33"], "");
    assert_ne!(code, 0);
    assert!(stderr.contains("error"));

    let (_, _, code) = run_cli(&home, &["config", "get", "nope"], "");
    assert_ne!(code, 0);
}

#[test]
fn test_streak_json_starts_empty() {
    let home = TempDir::new().unwrap();
    let (stdout, _, code) = run_cli(&home, &["streak", "--json"], "");
    assert_eq!(code, 0);
    let grid: serde_json::Value = serde_json::from_str(&stdout).expect("valid JSON");
    let cells = grid["cells"].as_array().expect("cells array");
    assert_eq!(cells.len(), 14);
    assert!(cells.iter().all(|c| c["filled"] == false));
    assert_eq!(grid["current_streak"], 0);
}

#[test]
fn test_focus_quit_from_setup() {
    let home = TempDir::new().unwrap();
    let (stdout, _, code) = run_cli(&home, &["focus", "--offline"], "quit\n");
    assert_eq!(code, 0);
    assert!(stdout.contains("Quit Instagram"));
    assert!(stdout.contains("45m"));
}

#[test]
fn test_focus_tempted_then_stay() {
    let home = TempDir::new().unwrap();
    let (stdout, _, code) = run_cli(
        &home,
        &["focus", "--offline", "--intent", "Quit Reddit"],
        "minutes 7\nstart\ntempted\nstay\n",
    );
    assert_eq!(code, 0);
    assert!(stdout.contains("Quit Reddit"));
    assert!(stdout.contains("5m"));
    assert!(stdout.contains("LOCKDOWN PROTOCOL ACTIVE"));
    assert!(stdout.contains("good choice. stay locked in."));
}

fn json_lines(output: &str) -> Vec<serde_json::Value> {
    output
        .lines()
        .map(str::trim)
        .filter(|l| l.starts_with('{'))
        .map(|l| serde_json::from_str(l).expect("valid JSON line"))
        .collect()
}

#[test]
fn test_focus_status_prints_snapshot() {
    let home = TempDir::new().unwrap();
    let (stdout, _, code) = run_cli(
        &home,
        &["focus", "--offline", "--intent", "Quit YouTube"],
        "minutes 30\nstatus\nquit\n",
    );
    assert_eq!(code, 0);

    let snapshots = json_lines(&stdout);
    assert_eq!(snapshots.len(), 1);
    let snapshot = &snapshots[0];
    assert_eq!(snapshot["type"], "StateSnapshot");
    assert_eq!(snapshot["screen"], "setup");
    assert_eq!(snapshot["intent"], "Quit YouTube");
    assert_eq!(snapshot["duration"], 30);
    assert_eq!(snapshot["generation"], 0);
    assert!(snapshot["remaining_secs"].is_null());
}

#[test]
fn test_focus_events_stream_transitions() {
    let home = TempDir::new().unwrap();
    let (stdout, stderr, code) = run_cli(
        &home,
        &["focus", "--offline", "--events"],
        "start\ntempted\nstay\n",
    );
    assert_eq!(code, 0);

    let kinds: Vec<String> = json_lines(&stderr)
        .iter()
        .map(|e| e["type"].as_str().unwrap_or_default().to_string())
        .collect();
    assert_eq!(
        kinds,
        ["SessionStarted", "InterventionTriggered", "InterventionResolved"]
    );
    // Events stay off stdout so the screen is unchanged.
    assert!(json_lines(&stdout).is_empty());
}

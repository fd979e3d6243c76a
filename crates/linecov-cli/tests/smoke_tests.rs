//! Smoke tests for the linecov CLI
//!
//! These tests verify basic CLI functionality works correctly.

#![allow(deprecated)] // Allow deprecated Command::cargo_bin until assert_cmd is updated
#![allow(clippy::expect_used, clippy::unwrap_used)]

use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use std::path::PathBuf;
use tempfile::TempDir;

/// Get a command for the linecov binary
fn linecov() -> Command {
    let mut cmd = Command::cargo_bin("linecov").expect("linecov binary should exist");
    cmd.env_remove("RUST_LOG").env_remove("LINECOV_CONFIG");
    cmd
}

const DUMP: &str = r#"{
    "scripts": [
        { "filename": "/app/index.php", "instructions": [
            { "op": "other", "code": 1, "line": 2 },
            { "op": "other", "code": 1, "line": 3 },
            { "op": "return", "line": 4 },
            { "op": "statement_marker", "line": 4 },
            { "op": "return", "line": 4 },
            { "op": "handle_exception", "line": 4 }
        ] }
    ],
    "functions": [
        { "name": "greet", "filename": "/app/index.php", "instructions": [
            { "op": "recv", "line": 6 },
            { "op": "other", "code": 1, "line": 7 },
            { "op": "return", "line": 8 },
            { "op": "statement_marker", "line": 8 },
            { "op": "return", "line": 8 },
            { "op": "handle_exception", "line": 8 }
        ] }
    ],
    "classes": [
        { "name": "Shape", "methods": [
            { "name": "area", "filename": "/app/index.php", "instructions": [
                { "op": "raise_abstract_error", "line": 12 },
                { "op": "statement_marker", "line": 12 },
                { "op": "return", "line": 12 },
                { "op": "handle_exception", "line": 12 }
            ] }
        ] }
    ]
}"#;

const HITS: &str = r#"[
    { "file": "/app/index.php", "line": 2 },
    { "file": "/app/index.php", "line": 7 },
    { "file": "/app/index.php", "line": 7 }
]"#;

fn write(dir: &TempDir, name: &str, content: &str) -> PathBuf {
    let path = dir.path().join(name);
    fs::write(&path, content).unwrap();
    path
}

// ============================================================================
// Basic CLI Tests
// ============================================================================

#[test]
fn test_version_flag() {
    linecov()
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains(env!("CARGO_PKG_VERSION")));
}

#[test]
fn test_help_flag() {
    linecov()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("analyze"))
        .stdout(predicate::str::contains("report"));
}

#[test]
fn test_no_args_fails() {
    linecov().assert().failure();
}

// ============================================================================
// Analyze
// ============================================================================

#[test]
fn test_analyze_text() {
    let dir = TempDir::new().unwrap();
    let dump = write(&dir, "dump.json", DUMP);

    linecov()
        .args(["--color", "never", "analyze"])
        .arg(&dump)
        .assert()
        .success()
        .stdout(predicate::str::contains("dead trailer dropped"))
        .stdout(predicate::str::contains("lines: [2, 3]"))
        .stdout(predicate::str::contains("lines: [7]"))
        .stdout(predicate::str::contains("abstract, skipped"));
}

#[test]
fn test_analyze_json_filtered() {
    let dir = TempDir::new().unwrap();
    let dump = write(&dir, "dump.json", DUMP);

    let output = linecov()
        .arg("analyze")
        .arg(&dump)
        .args(["--format", "json", "--file", "/app/index.php"])
        .output()
        .unwrap();
    assert!(output.status.success());
    let value: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(value.as_array().unwrap().len(), 3);
    assert_eq!(value[2]["analysis"]["abstract_body"], true);
}

#[test]
fn test_analyze_missing_dump() {
    linecov()
        .args(["analyze", "/nonexistent/dump.json"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Error:"));
}

#[test]
fn test_analyze_invalid_dump() {
    let dir = TempDir::new().unwrap();
    let dump = write(&dir, "dump.json", "{}");

    linecov()
        .arg("analyze")
        .arg(&dump)
        .assert()
        .failure()
        .stderr(predicate::str::contains("Invalid input"));
}

// ============================================================================
// Report
// ============================================================================

#[test]
fn test_report_json() {
    let dir = TempDir::new().unwrap();
    let dump = write(&dir, "dump.json", DUMP);
    let hits = write(&dir, "hits.json", HITS);

    let output = linecov()
        .arg("report")
        .arg(&dump)
        .arg("--hits")
        .arg(&hits)
        .output()
        .unwrap();
    assert!(output.status.success());
    let value: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    let file = &value["/app/index.php"];
    assert_eq!(file["2"], 1);
    assert_eq!(file["3"], -1);
    assert_eq!(file["7"], 1);
    assert!(file.get("4").is_none());
    assert!(file.get("6").is_none());
    assert!(file.get("12").is_none());
}

#[test]
fn test_report_no_prefill() {
    let dir = TempDir::new().unwrap();
    let dump = write(&dir, "dump.json", DUMP);
    let hits = write(&dir, "hits.json", HITS);

    let output = linecov()
        .arg("report")
        .arg(&dump)
        .arg("--hits")
        .arg(&hits)
        .arg("--no-prefill")
        .output()
        .unwrap();
    assert!(output.status.success());
    let value: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(
        value["/app/index.php"],
        serde_json::json!({ "2": 1, "7": 1 })
    );
}

#[test]
fn test_report_text_to_file() {
    let dir = TempDir::new().unwrap();
    let dump = write(&dir, "dump.json", DUMP);
    let out = dir.path().join("coverage.txt");

    linecov()
        .args(["--color", "never", "-q", "report"])
        .arg(&dump)
        .args(["--format", "text", "--output"])
        .arg(&out)
        .assert()
        .success()
        .stdout(predicate::str::is_empty());

    let text = fs::read_to_string(&out).unwrap();
    assert!(text.contains("/app/index.php 0/3"));
    assert!(text.contains("TOTAL 1 files"));
}

#[test]
fn test_report_config_dead_tail() {
    let dir = TempDir::new().unwrap();
    let dump = write(&dir, "dump.json", DUMP);
    let config = write(&dir, "linecov.yaml", "trailer:\n  dead_tail: 3\n");

    let output = linecov()
        .arg("--config")
        .arg(&config)
        .arg("report")
        .arg(&dump)
        .output()
        .unwrap();
    assert!(output.status.success());
    let value: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(value["/app/index.php"]["4"], -1);
}

#[test]
fn test_report_refused_without_extended_info() {
    let dir = TempDir::new().unwrap();
    let dump = write(&dir, "dump.json", DUMP);
    let config = write(&dir, "linecov.yaml", "extended_info: false\n");

    linecov()
        .arg("--config")
        .arg(&config)
        .arg("report")
        .arg(&dump)
        .assert()
        .failure()
        .stderr(predicate::str::contains("extended debug info"));
}

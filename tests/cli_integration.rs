//! Integration tests for the refscope binary.
//!
//! These tests exercise the full CLI against history snapshots written to
//! temporary directories.

use assert_cmd::Command;
use assert_fs::prelude::*;
use assert_fs::TempDir;
use predicates::prelude::*;

/// Get a command for running refscope with config discovery isolated to
/// the given directory.
fn refscope(dir: &TempDir) -> Command {
    let mut cmd = Command::cargo_bin("refscope").unwrap();
    cmd.current_dir(dir.path())
        .env("REFSCOPE_CONFIG", dir.path().join("no-global-config.toml"))
        .env("XDG_CONFIG_HOME", dir.path().join("xdg"))
        .env("HOME", dir.path())
        .env_remove("RUST_LOG");
    cmd
}

/// Build 1 green with one issue, build 2 unstable with a failed gate,
/// build 3 unstable with a passed gate, build 4 (newest) with two issues.
const HISTORY: &str = r#"{
  "job": "acme/main",
  "builds": [
    { "number": 1, "result": "SUCCESS",
      "analyses": [ { "tool": "checkstyle", "successful": true, "issues": [
        { "file_name": "Foo.java", "line_start": 10, "category": "Style", "type": "LineLength",
          "message": "Line is longer than 100 characters" }
      ] } ] },
    { "number": 2, "result": "UNSTABLE", "previous": 1,
      "analyses": [ { "tool": "checkstyle", "successful": false, "issues": [] } ] },
    { "number": 3, "result": "UNSTABLE", "previous": 2,
      "analyses": [ { "tool": "checkstyle", "successful": true, "issues": [] } ] },
    { "number": 4, "result": "SUCCESS", "previous": 3,
      "analyses": [ { "tool": "checkstyle", "successful": true, "issues": [
        { "file_name": "Foo.java", "line_start": 10, "category": "Style", "type": "LineLength",
          "message": "Line is longer than 100 characters" },
        { "file_name": "Bar.java", "line_start": 3, "category": "Naming", "type": "MethodName",
          "severity": "HIGH", "message": "Name 'Run' must match pattern" }
      ] } ] }
  ]
}"#;

fn workspace() -> TempDir {
    let dir = TempDir::new().unwrap();
    dir.child("history.json").write_str(HISTORY).unwrap();
    dir
}

// =============================================================================
// Global flags
// =============================================================================

#[test]
fn version_flag_works() {
    let dir = TempDir::new().unwrap();
    refscope(&dir)
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("refscope"));
}

#[test]
fn help_flag_works() {
    let dir = TempDir::new().unwrap();
    refscope(&dir)
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("reference"));
}

// =============================================================================
// reference
// =============================================================================

#[test]
fn previous_run_reference() {
    let dir = workspace();
    refscope(&dir)
        .args(["reference", "--tool", "checkstyle"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Reference: #3"));
}

#[test]
fn stable_overall_reference_skips_unstable_builds() {
    let dir = workspace();
    refscope(&dir)
        .args([
            "reference",
            "--tool",
            "checkstyle",
            "--stable",
            "--overall-success",
        ])
        .assert()
        .success()
        .stdout(predicate::str::contains("Reference: #1"));
}

#[test]
fn quiet_prints_only_the_number() {
    let dir = workspace();
    refscope(&dir)
        .args(["-q", "reference", "--tool", "checkstyle", "--build", "3"])
        .assert()
        .success()
        .stdout("1\n");
}

#[test]
fn first_build_has_no_reference() {
    let dir = workspace();
    refscope(&dir)
        .args(["reference", "--tool", "checkstyle", "--build", "1"])
        .assert()
        .success()
        .stdout(predicate::str::contains("no reference build"));
}

#[test]
fn json_report() {
    let dir = workspace();
    let output = refscope(&dir)
        .args(["reference", "--tool", "checkstyle", "--stable", "--json"])
        .output()
        .unwrap();
    assert!(output.status.success());

    let report: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(report["job"], "acme/main");
    assert_eq!(report["baseline"], 4);
    assert_eq!(report["reference"], 3);
    assert_eq!(report["reference_result"], "UNSTABLE");
    assert_eq!(report["reference_issues"], 0);
}

#[test]
fn project_config_supplies_defaults() {
    let dir = workspace();
    dir.child(".refscope.toml")
        .write_str(
            r#"
            tool = "checkstyle"

            [reference]
            use_stable_build_as_reference = true
            use_overall_result_as_reference = true
            "#,
        )
        .unwrap();

    refscope(&dir)
        .arg("reference")
        .assert()
        .success()
        .stdout(predicate::str::contains("Reference: #1"));

    // CLI flags override the config
    refscope(&dir)
        .args(["reference", "--previous"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Reference: #3"));
}

#[test]
fn overall_success_from_config_can_be_disabled() {
    let dir = workspace();
    dir.child(".refscope.toml")
        .write_str(
            r#"
            [reference]
            use_stable_build_as_reference = true
            use_overall_result_as_reference = true
            "#,
        )
        .unwrap();

    refscope(&dir)
        .args(["reference", "--tool", "checkstyle", "--no-overall-success"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Reference: #3"));
}

#[test]
fn forked_history_is_rejected() {
    let dir = TempDir::new().unwrap();
    dir.child("history.json")
        .write_str(
            r#"{ "job": "acme/main", "builds": [
                { "number": 1, "result": "SUCCESS" },
                { "number": 2, "result": "SUCCESS", "previous": 1 },
                { "number": 3, "result": "SUCCESS", "previous": 1 }
            ] }"#,
        )
        .unwrap();

    refscope(&dir)
        .args(["reference", "--tool", "checkstyle"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("already follows"));
}

#[test]
fn unknown_build_is_an_error() {
    let dir = workspace();
    refscope(&dir)
        .args(["reference", "--tool", "checkstyle", "--build", "99"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Build #99 not found"));
}

#[test]
fn missing_history_is_an_error() {
    let dir = TempDir::new().unwrap();
    refscope(&dir)
        .args(["reference", "--tool", "checkstyle"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Failed to load history"));
}

#[test]
fn missing_tool_is_an_error() {
    let dir = workspace();
    refscope(&dir)
        .arg("reference")
        .assert()
        .failure()
        .stderr(predicate::str::contains("No tool given"));
}

#[test]
fn history_flag_overrides_default_path() {
    let dir = TempDir::new().unwrap();
    dir.child("ci/builds.json").write_str(HISTORY).unwrap();

    refscope(&dir)
        .args(["--history", "ci/builds.json", "reference", "--tool", "checkstyle"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Reference: #3"));
}

// =============================================================================
// issues and delta
// =============================================================================

#[test]
fn issues_of_reference() {
    let dir = workspace();
    refscope(&dir)
        .args([
            "issues",
            "--tool",
            "checkstyle",
            "--stable",
            "--overall-success",
        ])
        .assert()
        .success()
        .stdout(predicate::str::contains("Foo.java:10"));
}

#[test]
fn delta_against_green_reference() {
    let dir = workspace();
    refscope(&dir)
        .args([
            "delta",
            "--tool",
            "checkstyle",
            "--stable",
            "--overall-success",
        ])
        .assert()
        .success()
        .stdout(predicate::str::contains("New: 1  Fixed: 0  Outstanding: 1"))
        .stdout(predicate::str::contains("New by severity: HIGH 1"))
        .stdout(predicate::str::contains("+ Bar.java:3 [HIGH]"));
}

#[test]
fn delta_json_lists_buckets() {
    let dir = workspace();
    let output = refscope(&dir)
        .args(["delta", "--tool", "checkstyle", "--json"])
        .output()
        .unwrap();
    assert!(output.status.success());

    let report: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(report["reference"], 3);
    assert_eq!(report["new"].as_array().unwrap().len(), 2);
    assert_eq!(report["fixed"].as_array().unwrap().len(), 0);
}

// =============================================================================
// tools, scan and completion
// =============================================================================

#[test]
fn tools_lists_native_format() {
    let dir = TempDir::new().unwrap();
    refscope(&dir)
        .arg("tools")
        .assert()
        .success()
        .stdout(predicate::str::contains("native"));
}

#[test]
fn scan_native_report() {
    let dir = TempDir::new().unwrap();
    dir.child("report.json")
        .write_str(r#"[ { "file_name": "Main.rs", "line_start": 7, "message": "unused" } ]"#)
        .unwrap();

    refscope(&dir)
        .args(["scan", "report.json", "--tool", "native"])
        .assert()
        .success()
        .stdout(predicate::str::contains("1 issues"))
        .stdout(predicate::str::contains("Main.rs:7"));
}

#[test]
fn scan_rejects_console_log_for_native() {
    let dir = TempDir::new().unwrap();
    dir.child("build.log").write_str("[]").unwrap();

    refscope(&dir)
        .args(["scan", "build.log", "--tool", "native", "--console"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("console log"));
}

#[test]
fn scan_unknown_tool() {
    let dir = TempDir::new().unwrap();
    refscope(&dir)
        .args(["scan", "report.json", "--tool", "spotbugs"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("unknown tool 'spotbugs'"));
}

#[test]
fn completion_generates_script() {
    let dir = TempDir::new().unwrap();
    refscope(&dir)
        .args(["completion", "bash"])
        .assert()
        .success()
        .stdout(predicate::str::contains("refscope"));
}

//! E2E CLI tests covering:
//! - `tb scan` over stdin and files, human and JSON output
//! - `tb apply` against a JSON ticket store, including the loop-guard
//! - `tb created` on a ticket description
//! - config file overrides and error reporting
//!
//! Each test runs the `tb` binary as a subprocess in an isolated temp directory.

use assert_cmd::Command;
use predicates::prelude::*;
use serde_json::{Value, json};
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

const MARKER: &str = "{{{\n#!html\n<div class=\"tracback\"></div>\n}}}\n";

// ---------------------------------------------------------------------------
// Test Harness
// ---------------------------------------------------------------------------

/// Build a Command targeting the tb binary, rooted in `dir`.
fn tb_cmd(dir: &Path) -> Command {
    let mut cmd = Command::new(assert_cmd::cargo::cargo_bin!("tb"));
    cmd.current_dir(dir);
    cmd.env("TRACBACKS_LOG", "error");
    cmd
}

/// Write a store holding tickets 1..=3, plus ticket 9 when given.
fn write_store(dir: &Path, ticket9: Option<Value>) -> PathBuf {
    let mut tickets = json!({
        "1": { "values": { "summary": "first" } },
        "2": { "values": { "summary": "second" } },
        "3": { "values": { "summary": "third" } },
    });
    if let Some(t9) = ticket9 {
        tickets["9"] = t9;
    }
    let path = dir.join("tickets.json");
    fs::write(&path, json!({ "tickets": tickets }).to_string()).expect("write store");
    path
}

fn read_store(path: &Path) -> Value {
    serde_json::from_str(&fs::read_to_string(path).expect("read store")).expect("store is JSON")
}

fn comments(store: &Value, id: u64) -> Vec<Value> {
    store["tickets"][id.to_string()]["comments"]
        .as_array()
        .cloned()
        .unwrap_or_default()
}

// ---------------------------------------------------------------------------
// tb scan
// ---------------------------------------------------------------------------

#[test]
fn scan_stdin_lists_references_and_messages() {
    let dir = TempDir::new().expect("tempdir");
    tb_cmd(dir.path())
        .args(["scan", "--ticket", "1"])
        .write_stdin("fixes #2 and #2, not `#3`")
        .assert()
        .success()
        .stdout(predicate::str::contains("references: #2\n"))
        .stdout(predicate::str::contains("This ticket has been referenced in ticket #1:"))
        .stdout(predicate::str::contains("trackback for #3").not());
}

#[test]
fn scan_json_reports_targets_and_full_message() {
    let dir = TempDir::new().expect("tempdir");
    let file = dir.path().join("comment.txt");
    fs::write(&file, "fixes #2 and #2").expect("write comment");

    let output = tb_cmd(dir.path())
        .args(["scan", "--ticket", "#1", "--json"])
        .arg(&file)
        .output()
        .expect("scan should not crash");
    assert!(output.status.success());

    let json: Value = serde_json::from_slice(&output.stdout).expect("valid JSON");
    assert_eq!(json["source"], 1);
    assert_eq!(json["loop_guarded"], false);
    assert_eq!(json["references"], json!([2]));
    assert_eq!(json["trackbacks"][0]["target"], 2);
    assert_eq!(
        json["trackbacks"][0]["message"],
        format!(
            "{MARKER}This ticket has been referenced in ticket #1:\n> fixes #2 and #2\n\n> fixes #2 and #2\n"
        )
    );
    assert!(json.get("redacted").is_none());
}

#[test]
fn scan_of_trackback_is_loop_guarded() {
    let dir = TempDir::new().expect("tempdir");
    tb_cmd(dir.path())
        .args(["scan", "--ticket", "2"])
        .write_stdin(format!("{MARKER}This ticket has been referenced in ticket #1:\n> see #3\n"))
        .assert()
        .success()
        .stdout(predicate::str::contains("comment is a trackback"));
}

#[test]
fn project_config_narrows_excerpts() {
    let dir = TempDir::new().expect("tempdir");
    fs::create_dir_all(dir.path().join(".tracbacks")).expect("mkdir");
    fs::write(
        dir.path().join(".tracbacks/config.toml"),
        "[excerpt]\ncontext_chars = 3\n",
    )
    .expect("write config");

    tb_cmd(dir.path())
        .args(["scan", "--ticket", "1"])
        .write_stdin("0123456789 #7 abcdefghijklmnop")
        .assert()
        .success()
        .stdout(predicate::str::contains("\n> ...9 #7 abcde...\n"));
}

#[test]
fn malformed_config_fails_with_code() {
    let dir = TempDir::new().expect("tempdir");
    let cfg = dir.path().join("bad.toml");
    fs::write(&cfg, "[excerpt\n").expect("write config");

    tb_cmd(dir.path())
        .args(["scan", "--ticket", "1", "--config"])
        .arg(&cfg)
        .write_stdin("see #2")
        .assert()
        .failure()
        .stderr(predicate::str::contains("E1002"));
}

// ---------------------------------------------------------------------------
// tb apply
// ---------------------------------------------------------------------------

#[test]
fn apply_posts_trackbacks_and_records_comment() {
    let dir = TempDir::new().expect("tempdir");
    let store = write_store(dir.path(), None);

    tb_cmd(dir.path())
        .args(["apply", "--store"])
        .arg(&store)
        .args(["--ticket", "1", "--author", "alice"])
        .write_stdin("relates to #2 and #5")
        .assert()
        .success()
        .stdout(predicate::str::contains("#1: posted trackback on #2"))
        .stdout(predicate::str::contains("#1: #5 does not exist, skipped"));

    let after = read_store(&store);
    let on_source = comments(&after, 1);
    assert_eq!(on_source.len(), 1);
    assert_eq!(on_source[0]["text"], "relates to #2 and #5");

    let on_target = comments(&after, 2);
    assert_eq!(on_target.len(), 1);
    assert_eq!(on_target[0]["author"], "alice");
    let text = on_target[0]["text"].as_str().expect("text");
    assert!(text.starts_with(MARKER));
    assert!(text.contains("\n> relates to #2 and #5\n"));
    assert!(comments(&after, 3).is_empty());
}

#[test]
fn applying_a_trackback_does_not_cascade() {
    let dir = TempDir::new().expect("tempdir");
    let store = write_store(dir.path(), None);
    let generated = format!("{MARKER}This ticket has been referenced in ticket #1:\n> see #3\n");

    let output = tb_cmd(dir.path())
        .args(["apply", "--json", "--store"])
        .arg(&store)
        .args(["--ticket", "2", "--author", "alice"])
        .write_stdin(generated)
        .output()
        .expect("apply should not crash");
    assert!(output.status.success());

    let json: Value = serde_json::from_slice(&output.stdout).expect("valid JSON");
    assert_eq!(json["skipped"], "loop_guard");
    assert!(comments(&read_store(&store), 3).is_empty());
}

#[test]
fn apply_to_unknown_ticket_fails_with_code() {
    let dir = TempDir::new().expect("tempdir");
    let store = write_store(dir.path(), None);

    tb_cmd(dir.path())
        .args(["--json", "apply", "--store"])
        .arg(&store)
        .args(["--ticket", "42", "--author", "alice"])
        .write_stdin("see #1")
        .assert()
        .failure()
        .stderr(predicate::str::contains("\"code\":\"E2001\""));
}

// ---------------------------------------------------------------------------
// tb created
// ---------------------------------------------------------------------------

#[test]
fn created_scans_description_as_reporter() {
    let dir = TempDir::new().expect("tempdir");
    let store = write_store(
        dir.path(),
        Some(json!({
            "values": {
                "description": "Split out of #3.\n{{{\n#1 is only an example\n}}}",
                "reporter": "carol"
            }
        })),
    );

    tb_cmd(dir.path())
        .args(["created", "--store"])
        .arg(&store)
        .args(["--ticket", "9"])
        .assert()
        .success()
        .stdout(predicate::str::contains("#9: posted trackback on #3"));

    let after = read_store(&store);
    assert!(comments(&after, 1).is_empty());
    let on_three = comments(&after, 3);
    assert_eq!(on_three.len(), 1);
    assert_eq!(on_three[0]["author"], "carol");
    assert!(
        on_three[0]["text"]
            .as_str()
            .expect("text")
            .contains("referenced in ticket #9:")
    );
}

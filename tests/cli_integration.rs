//! Integration tests for the `kb` CLI.
//!
//! Each test runs `kb --demo` as a subprocess with its config directory
//! pointed at a temp dir, and checks stdout, stderr and the exit status.
//! Demo data is rebuilt per process, so writes never leak between tests.

use std::fs;
use std::path::{Path, PathBuf};
use std::process::Command;

// Demo ids: board Product = 2 (states 3..=6), Home = 7; tag bug = 11;
// Product tasks 15..=19 in seed order.
const PRODUCT: &str = "2";
const FIX_LOGIN: &str = "17";

/// Path to the built `kb` binary
fn kb_bin() -> PathBuf {
    PathBuf::from(env!("CARGO_BIN_EXE_kb"))
}

/// Run `kb` with the given args, returning (stdout, stderr, success).
fn run_kb(config_home: &Path, args: &[&str]) -> (String, String, bool) {
    let output = Command::new(kb_bin())
        .args(args)
        .env("XDG_CONFIG_HOME", config_home)
        .env_remove("KB_SERVER")
        .env_remove("KB_LOG")
        .output()
        .expect("failed to run kb");

    let stdout = String::from_utf8_lossy(&output.stdout).to_string();
    let stderr = String::from_utf8_lossy(&output.stderr).to_string();
    (stdout, stderr, output.status.success())
}

/// Run `kb --demo` expecting success, return stdout.
fn run_demo_ok(config_home: &Path, args: &[&str]) -> String {
    let mut full = vec!["--demo"];
    full.extend_from_slice(args);
    let (stdout, stderr, success) = run_kb(config_home, &full);
    if !success {
        panic!("kb {:?} failed:\nstdout: {}\nstderr: {}", full, stdout, stderr);
    }
    stdout
}

fn run_demo(config_home: &Path, args: &[&str]) -> (String, String, bool) {
    let mut full = vec!["--demo"];
    full.extend_from_slice(args);
    run_kb(config_home, &full)
}

// ---------------------------------------------------------------------------
// Read command tests
// ---------------------------------------------------------------------------

#[test]
fn test_boards() {
    let tmp = tempfile::TempDir::new().unwrap();
    let out = run_demo_ok(tmp.path(), &["boards"]);
    assert!(out.contains("2  Product"));
    assert!(out.contains("7  Home"));
}

#[test]
fn test_boards_json() {
    let tmp = tempfile::TempDir::new().unwrap();
    let out = run_demo_ok(tmp.path(), &["boards", "--json"]);
    let parsed: serde_json::Value = serde_json::from_str(&out).unwrap();
    let arr = parsed.as_array().unwrap();
    assert_eq!(arr.len(), 2);
    assert_eq!(arr[0]["name"], "Product");
    assert_eq!(arr[1]["id"], 7);
}

#[test]
fn test_states_and_tags() {
    let tmp = tempfile::TempDir::new().unwrap();
    let states = run_demo_ok(tmp.path(), &["states", PRODUCT]);
    let names: Vec<&str> = states.lines().map(|l| l.trim().splitn(2, "  ").nth(1).unwrap()).collect();
    assert_eq!(names, vec!["Backlog", "In Progress", "Review", "Done"]);

    let tags = run_demo_ok(tmp.path(), &["tags", PRODUCT]);
    assert!(tags.contains("#bug"));
    assert!(tags.contains("#research"));
    assert!(!tags.contains("#errand"));
}

#[test]
fn test_tasks_grouped_by_state() {
    let tmp = tempfile::TempDir::new().unwrap();
    let out = run_demo_ok(tmp.path(), &["tasks", PRODUCT]);
    let backlog = out.find("Backlog (2)").unwrap();
    let progress = out.find("In Progress (1)").unwrap();
    let fix = out.find("Fix login redirect loop").unwrap();
    assert!(backlog < progress && progress < fix);
    assert!(out.contains("due 2026-11-02  #bug"));
    assert!(out.contains("Done (1)"));
}

#[test]
fn test_tasks_with_state_filter() {
    let tmp = tempfile::TempDir::new().unwrap();
    let out = run_demo_ok(tmp.path(), &["tasks", PRODUCT, "--state", "review"]);
    assert!(out.contains("New settings page"));
    assert!(!out.contains("Backlog"));
    assert!(!out.contains("Set up CI"));
}

#[test]
fn test_tasks_with_tag_filter() {
    let tmp = tempfile::TempDir::new().unwrap();
    let out = run_demo_ok(tmp.path(), &["tasks", PRODUCT, "--tag", "design"]);
    assert!(out.contains("Write onboarding copy"));
    assert!(out.contains("New settings page"));
    assert!(!out.contains("Interview three customers"));
}

#[test]
fn test_tasks_json() {
    let tmp = tempfile::TempDir::new().unwrap();
    let out = run_demo_ok(tmp.path(), &["tasks", PRODUCT, "--json"]);
    let parsed: serde_json::Value = serde_json::from_str(&out).unwrap();
    let groups = parsed.as_array().unwrap();
    assert_eq!(groups.len(), 4);
    assert_eq!(groups[1]["state"], "In Progress");
    assert_eq!(groups[1]["tasks"][0]["name"], "Fix login redirect loop");
    assert_eq!(groups[1]["tasks"][0]["stateId"], 4);
}

#[test]
fn test_unknown_state_fails() {
    let tmp = tempfile::TempDir::new().unwrap();
    let (_stdout, stderr, success) = run_demo(tmp.path(), &["tasks", PRODUCT, "--state", "shipped"]);
    assert!(!success);
    assert!(stderr.contains("no state 'shipped'"));
}

#[test]
fn test_unknown_board_fails() {
    let tmp = tempfile::TempDir::new().unwrap();
    let (_stdout, stderr, success) = run_demo(tmp.path(), &["tasks", "99"]);
    assert!(!success);
    assert!(stderr.contains("error: board 99 not found"));
}

// ---------------------------------------------------------------------------
// Write command tests
// ---------------------------------------------------------------------------

#[test]
fn test_add_defaults_to_first_state() {
    let tmp = tempfile::TempDir::new().unwrap();
    let out = run_demo_ok(tmp.path(), &["add", PRODUCT, "Draft pricing page", "--json"]);
    let task: serde_json::Value = serde_json::from_str(&out).unwrap();
    assert_eq!(task["name"], "Draft pricing page");
    assert_eq!(task["stateId"], 3);
    assert!(task["tags"].as_array().unwrap().is_empty());
}

#[test]
fn test_add_with_fields() {
    let tmp = tempfile::TempDir::new().unwrap();
    let out = run_demo_ok(
        tmp.path(),
        &[
            "add",
            PRODUCT,
            "Patch session timeout",
            "--state",
            "in progress",
            "--due",
            "2026-12-01",
            "--tag",
            "bug",
            "--tag",
            "#research",
        ],
    );
    assert!(out.starts_with("Created "));
    assert!(out.contains("Patch session timeout  due 2026-12-01  #bug #research"));
}

#[test]
fn test_add_rejects_blank_name() {
    let tmp = tempfile::TempDir::new().unwrap();
    let (_stdout, stderr, success) = run_demo(tmp.path(), &["add", PRODUCT, "   "]);
    assert!(!success);
    assert!(stderr.contains("name is required"));
}

#[test]
fn test_add_rejects_bad_date() {
    let tmp = tempfile::TempDir::new().unwrap();
    let (_stdout, stderr, success) = run_demo(tmp.path(), &["add", PRODUCT, "Thing", "--due", "next week"]);
    assert!(!success);
    assert!(stderr.contains("expected YYYY-MM-DD"));
}

#[test]
fn test_add_unknown_tag_fails() {
    let tmp = tempfile::TempDir::new().unwrap();
    let (_stdout, stderr, success) = run_demo(tmp.path(), &["add", PRODUCT, "Thing", "--tag", "errand"]);
    assert!(!success);
    assert!(stderr.contains("no tag 'errand' on board 2"));
}

#[test]
fn test_edit_moves_and_toggles() {
    let tmp = tempfile::TempDir::new().unwrap();
    let out = run_demo_ok(
        tmp.path(),
        &[
            "edit",
            PRODUCT,
            FIX_LOGIN,
            "--state",
            "Review",
            "--toggle-tag",
            "bug",
            "--toggle-tag",
            "design",
            "--clear-due",
        ],
    );
    assert!(out.contains("Fix login redirect loop  #design"));
    assert!(out.contains("state: Review"));
    assert!(!out.contains("#bug"));
    assert!(!out.contains("due "));
}

#[test]
fn test_edit_missing_task_fails() {
    let tmp = tempfile::TempDir::new().unwrap();
    let (_stdout, stderr, success) = run_demo(tmp.path(), &["edit", PRODUCT, "20", "--name", "x"]);
    assert!(!success);
    assert!(stderr.contains("no task 20 on board 2"));
}

#[test]
fn test_rm() {
    let tmp = tempfile::TempDir::new().unwrap();
    let out = run_demo_ok(tmp.path(), &["rm", FIX_LOGIN]);
    assert_eq!(out.trim(), "Deleted task 17");

    let (_stdout, stderr, success) = run_demo(tmp.path(), &["rm", "999"]);
    assert!(!success);
    assert!(stderr.contains("task 999 not found"));
}

#[test]
fn test_tag_create() {
    let tmp = tempfile::TempDir::new().unwrap();
    let out = run_demo_ok(tmp.path(), &["tag-create", PRODUCT, "urgent", "--json"]);
    let tag: serde_json::Value = serde_json::from_str(&out).unwrap();
    assert_eq!(tag["name"], "urgent");

    let (_stdout, stderr, success) = run_demo(tmp.path(), &["tag-create", PRODUCT, "Bug"]);
    assert!(!success);
    assert!(stderr.contains("already exists"));
}

// ---------------------------------------------------------------------------
// Config tests
// ---------------------------------------------------------------------------

#[test]
fn test_config_path_follows_xdg() {
    let tmp = tempfile::TempDir::new().unwrap();
    let (out, _stderr, success) = run_kb(tmp.path(), &["config", "path"]);
    assert!(success);
    assert_eq!(
        PathBuf::from(out.trim()),
        tmp.path().join("kanban").join("config.toml")
    );
}

#[test]
fn test_config_set_then_show() {
    let tmp = tempfile::TempDir::new().unwrap();
    let (_out, stderr, success) = run_kb(
        tmp.path(),
        &["config", "set", "server.url", "https://boards.example.com/api/"],
    );
    assert!(success, "{}", stderr);
    let written = fs::read_to_string(tmp.path().join("kanban/config.toml")).unwrap();
    assert!(written.contains("url = \"https://boards.example.com/api/\""));

    let (out, _stderr, success) = run_kb(tmp.path(), &["config", "show", "--json"]);
    assert!(success);
    let parsed: serde_json::Value = serde_json::from_str(&out).unwrap();
    assert_eq!(parsed["server"]["url"], "https://boards.example.com/api/");

    // --server wins over the file
    let (out, _stderr, _) = run_kb(
        tmp.path(),
        &["config", "show", "--json", "--server", "http://localhost:9/"],
    );
    let parsed: serde_json::Value = serde_json::from_str(&out).unwrap();
    assert_eq!(parsed["server"]["url"], "http://localhost:9/");
}

#[test]
fn test_config_set_rejects_unknown_key() {
    let tmp = tempfile::TempDir::new().unwrap();
    let (_out, stderr, success) = run_kb(tmp.path(), &["config", "set", "server.port", "80"]);
    assert!(!success);
    assert!(stderr.contains("unknown config key 'server.port'"));
}

#[test]
fn test_unreachable_server_exits_nonzero() {
    let tmp = tempfile::TempDir::new().unwrap();
    // Port 9 (discard) is almost never listening
    let (_out, stderr, success) = run_kb(tmp.path(), &["boards", "--server", "http://127.0.0.1:9/"]);
    assert!(!success);
    assert!(stderr.contains("error: network error"));
}

//! End-to-end tests of the `tb` binary.
//!
//! Each test works on its own database and config file in a temporary
//! directory. Scenarios are multi-step flows through the public commands.

use std::path::PathBuf;
use std::process::{Command, Output};

use serde_json::Value;
use serial_test::serial;
use tempfile::TempDir;

struct Workspace {
    dir: TempDir,
}

impl Workspace {
    fn new() -> Self {
        let workspace = Self {
            dir: TempDir::new().expect("failed to create temp dir"),
        };
        let init = workspace.run(None, &["init"]);
        assert!(init.status.success(), "init failed: {}", stderr(&init));
        workspace
    }

    fn db_path(&self) -> PathBuf {
        self.dir.path().join("taskboard.db")
    }

    fn config_path(&self) -> PathBuf {
        self.dir.path().join("config.toml")
    }

    fn run(&self, user: Option<&str>, args: &[&str]) -> Output {
        let mut cmd = Command::new(env!("CARGO_BIN_EXE_tb"));
        cmd.env("TB_CONFIG", self.config_path())
            .env_remove("TB_USER")
            .env("NO_COLOR", "1")
            .arg("--db")
            .arg(self.db_path());
        if let Some(user) = user {
            cmd.arg("--user").arg(user);
        }
        cmd.args(args).output().expect("failed to run tb")
    }

    fn json(&self, user: &str, args: &[&str]) -> Value {
        let mut full = vec!["--json"];
        full.extend_from_slice(args);
        let output = self.run(Some(user), &full);
        assert!(
            output.status.success(),
            "tb {args:?} failed: {}",
            stderr(&output)
        );
        serde_json::from_slice(&output.stdout).expect("stdout is not JSON")
    }

    /// Creates alice (admin) and one project she manages; returns its id.
    fn seed(&self) -> i64 {
        let output = self.run(None, &["user", "add", "alice", "--name", "Alice", "--admin"]);
        assert!(output.status.success(), "{}", stderr(&output));
        let output = self.run(None, &["user", "add", "bob"]);
        assert!(output.status.success(), "{}", stderr(&output));

        let project = self.json(
            "alice",
            &["project", "add", "Website", "--start", "2024-01-01", "--end", "2024-03-31"],
        );
        project["id"].as_i64().expect("project id")
    }
}

fn stderr(output: &Output) -> String {
    String::from_utf8_lossy(&output.stderr).into_owned()
}

fn stdout(output: &Output) -> String {
    String::from_utf8_lossy(&output.stdout).into_owned()
}

#[test]
#[serial]
fn test_commands_need_a_user() {
    let ws = Workspace::new();
    ws.seed();

    let output = ws.run(None, &["project", "list"]);
    assert_eq!(output.status.code(), Some(5));
    assert!(stderr(&output).contains("No user selected"));

    let output = ws.run(Some("mallory"), &["--json", "project", "list"]);
    assert_eq!(output.status.code(), Some(5));
    let error: Value = serde_json::from_slice(&output.stderr).unwrap();
    assert_eq!(error["error"]["code"], "CONFIG_ERROR");
}

#[test]
#[serial]
fn test_gantt_flow() {
    let ws = Workspace::new();
    let project_id = ws.seed();
    let pid = project_id.to_string();

    let charts = ws.json("alice", &["gantt", "projects"]);
    assert_eq!(charts["status"], 200);
    assert_eq!(charts["data"]["projects"][0]["title"], "Website");
    assert_eq!(charts["data"]["projects"][0]["start"], serde_json::json!([2024, 1, 1]));

    let created = ws.json(
        "alice",
        &["gantt", "add-task", &pid, "Write docs", "--set", "date_due=2024-02-01"],
    );
    assert_eq!(created["status"], 302);
    assert_eq!(
        created["location"],
        format!("/?controller=GanttController&action=project&project_id={pid}")
    );
    assert_eq!(created["flashes"][0]["message"], "Task created successfully.");

    let chart = ws.json("alice", &["gantt", "project", &pid, "--sort", "date"]);
    let tasks = chart["data"]["tasks"].as_array().unwrap();
    assert_eq!(tasks.len(), 1);
    assert_eq!(tasks[0]["title"], "Write docs");
    assert_eq!(tasks[0]["end"], serde_json::json!([2024, 2, 1]));

    let task_id = tasks[0]["id"].as_i64().unwrap().to_string();
    let moved = ws.json(
        "alice",
        &["gantt", "task-dates", &pid, &task_id, "2024-02-05", "2024-02-09"],
    );
    assert_eq!(moved["status"], 201);

    let bad = ws.run(
        Some("alice"),
        &["gantt", "task-dates", &pid, &task_id, "someday", "2024-02-09"],
    );
    assert_eq!(bad.status.code(), Some(2));
}

#[test]
#[serial]
fn test_invalid_task_prints_form_and_fails() {
    let ws = Workspace::new();
    let project_id = ws.seed().to_string();

    let output = ws.run(
        Some("alice"),
        &["--json", "gantt", "add-task", &project_id, " ", "--set", "priority=high"],
    );
    assert_eq!(output.status.code(), Some(2));
    let form: Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(form["status"], 200);
    assert_eq!(form["data"]["errors"]["title"][0], "The title is required");
    assert_eq!(form["data"]["errors"]["priority"][0], "This value must be an integer");
}

#[test]
#[serial]
fn test_recurring_task_spawns_next_occurrence() {
    let ws = Workspace::new();
    let pid = ws.seed().to_string();
    ws.json(
        "alice",
        &["gantt", "add-task", &pid, "Monthly report", "--set", "date_due=2024-01-31"],
    );

    let updated = ws.json(
        "alice",
        &[
            "recurrence", "set", "1",
            "--set", "recurrence_status=1",
            "--set", "recurrence_trigger=2",
            "--set", "recurrence_factor=1",
            "--set", "recurrence_timeframe=1",
            "--set", "recurrence_basedate=0",
        ],
    );
    assert_eq!(updated["status"], 302);

    let form = ws.json("alice", &["recurrence", "show", "1"]);
    assert_eq!(form["data"]["values"]["recurrence_factor"], "1");

    let closed = ws.json("alice", &["task", "close", "1"]);
    assert_eq!(closed["flashes"][0]["message"], "Task closed successfully.");

    let chart = ws.json("alice", &["gantt", "project", &pid]);
    let tasks = chart["data"]["tasks"].as_array().unwrap();
    assert_eq!(tasks.len(), 1);
    assert_eq!(tasks[0]["title"], "Monthly report");
    assert_eq!(tasks[0]["end"], serde_json::json!([2024, 2, 29]));

    let rejected = ws.run(
        Some("alice"),
        &["recurrence", "set", "1", "--set", "recurrence_timeframe=9"],
    );
    assert_eq!(rejected.status.code(), Some(2));
}

#[test]
#[serial]
fn test_category_flow_and_membership() {
    let ws = Workspace::new();
    let pid = ws.seed().to_string();

    let created = ws.json("alice", &["category", "add", &pid, "Bug"]);
    assert_eq!(created["status"], "created");
    let category_id = created["id"].as_i64().unwrap().to_string();

    let duplicate = ws.run(Some("alice"), &["category", "add", &pid, "Bug"]);
    assert_eq!(duplicate.status.code(), Some(2));

    let denied = ws.run(Some("bob"), &["category", "list", &pid]);
    assert_eq!(denied.status.code(), Some(2));

    let added = ws.run(Some("alice"), &["member", "add", &pid, "bob", "--role", "viewer"]);
    assert!(added.status.success(), "{}", stderr(&added));

    let listed = ws.json("bob", &["category", "list", &pid]);
    assert_eq!(listed["categories"][0]["name"], "Bug");

    let viewer_write = ws.run(Some("bob"), &["category", "rename", &category_id, "Defect"]);
    assert_eq!(viewer_write.status.code(), Some(2));

    let renamed = ws.run(Some("alice"), &["category", "rename", &category_id, "Defect"]);
    assert!(stdout(&renamed).contains("Defect"));

    let removed = ws.json("alice", &["category", "remove", &category_id]);
    assert_eq!(removed["status"], "removed");
    let missing = ws.run(Some("alice"), &["category", "show", &category_id]);
    assert_eq!(missing.status.code(), Some(4));
}

#[test]
#[serial]
fn test_activity_search() {
    let ws = Workspace::new();
    let pid = ws.seed().to_string();
    ws.json("alice", &["gantt", "add-task", &pid, "Fix login"]);

    let events = ws.json("alice", &["activity", "search", "creator:me"]);
    let events = events["data"]["events"].as_array().unwrap();
    assert_eq!(events.len(), 1);
    assert_eq!(events[0]["event_name"], "task.create");

    let output = ws.run(Some("bob"), &["--json", "activity", "project", &pid]);
    assert_eq!(output.status.code(), Some(2));
    let denied: Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(denied["status"], 403);
}

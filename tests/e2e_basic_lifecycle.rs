//! End-to-end tests for the basic workflow: init a workspace, seed
//! people and a project, then report, triage, and list bugs.

mod common;

use common::{BhWorkspace, extract_json_payload, run_bh, run_bh_with_env};
use serde_json::Value;

/// Seed two users and a project; returns the workspace.
fn seeded_workspace() -> BhWorkspace {
    let workspace = BhWorkspace::initialized();

    let run = run_bh(
        &workspace,
        ["users", "add", "Sarah", "Chen", "-e", "sarah@example.com", "-r", "developer"],
        "seed_user_1",
    );
    assert!(run.status.success(), "add user failed: {}", run.stderr);

    let run = run_bh(
        &workspace,
        ["users", "add", "Miguel", "Torres", "-e", "miguel@example.com"],
        "seed_user_2",
    );
    assert!(run.status.success(), "add user failed: {}", run.stderr);

    let run = run_bh(
        &workspace,
        ["projects", "add", "Frontend", "--lead", "1", "--default-priority", "high"],
        "seed_project",
    );
    assert!(run.status.success(), "add project failed: {}", run.stderr);

    workspace
}

#[test]
fn init_creates_workspace_and_refuses_twice() {
    let workspace = BhWorkspace::new();

    let run = run_bh(&workspace, ["init"], "init_first");
    assert!(run.status.success(), "{}", run.stderr);
    assert!(run.stdout.contains("Initialized bughive workspace"));
    assert!(workspace.root.join(".bughive").is_dir());

    let run = run_bh(&workspace, ["init"], "init_second");
    assert_eq!(run.exit_code(), 2, "stderr: {}", run.stderr);
    assert!(run.stderr.contains("ALREADY_INITIALIZED"));

    let run = run_bh(&workspace, ["init", "--force"], "init_force");
    assert!(run.status.success(), "{}", run.stderr);
}

#[test]
fn commands_outside_a_workspace_fail_cleanly() {
    let workspace = BhWorkspace::new();
    let run = run_bh(&workspace, ["list"], "list_uninitialized");
    assert_eq!(run.exit_code(), 2, "stderr: {}", run.stderr);
    assert!(run.stderr.contains("NOT_INITIALIZED"));
    assert!(run.stderr.contains("bh init"));
}

#[test]
fn create_update_show_roundtrip() {
    let workspace = seeded_workspace();

    let run = run_bh(
        &workspace,
        [
            "--json",
            "--user",
            "1",
            "create",
            "Checkout button unresponsive",
            "--project",
            "1",
            "-d",
            "Nothing happens on click",
            "--browser",
            "Safari 18",
        ],
        "create_bug",
    );
    assert!(run.status.success(), "{}", run.stderr);
    let bug: Value = serde_json::from_str(&extract_json_payload(&run.stdout)).unwrap();
    assert_eq!(bug["id"], 1);
    assert_eq!(bug["status"], "open");
    // No explicit priority, so the project default applies.
    assert_eq!(bug["priority"], "high");
    assert_eq!(bug["environment"]["browser"], "Safari 18");

    let run = run_bh(
        &workspace,
        ["--json", "update", "1", "--status", "in_progress", "-a", "2"],
        "update_bug",
    );
    assert!(run.status.success(), "{}", run.stderr);
    let bug: Value = serde_json::from_str(&extract_json_payload(&run.stdout)).unwrap();
    assert_eq!(bug["status"], "in_progress");
    assert_eq!(bug["assignee_id"], 2);

    let run = run_bh(&workspace, ["show", "1"], "show_bug");
    assert!(run.status.success(), "{}", run.stderr);
    assert!(run.stdout.contains("Checkout button unresponsive"));
    assert!(run.stdout.contains("Miguel Torres"));
}

#[test]
fn create_without_reporter_fails_with_validation() {
    let workspace = seeded_workspace();
    let run = run_bh(
        &workspace,
        ["create", "No reporter", "--project", "1"],
        "create_no_reporter",
    );
    assert_eq!(run.exit_code(), 4, "stderr: {}", run.stderr);
    assert!(run.stderr.contains("VALIDATION_FAILED"));
}

#[test]
fn reporter_resolves_from_env() {
    let workspace = seeded_workspace();
    let run = run_bh_with_env(
        &workspace,
        ["--json", "create", "From env", "--project", "1"],
        [("BUGHIVE_USER", "2")],
        "create_env_reporter",
    );
    assert!(run.status.success(), "{}", run.stderr);
    let bug: Value = serde_json::from_str(&extract_json_payload(&run.stdout)).unwrap();
    assert_eq!(bug["reporter_id"], 2);
}

#[test]
fn update_missing_bug_reports_not_found() {
    let workspace = seeded_workspace();
    let run = run_bh(
        &workspace,
        ["update", "99", "--status", "closed"],
        "update_missing",
    );
    assert_eq!(run.exit_code(), 3, "stderr: {}", run.stderr);
    assert!(run.stderr.contains("BUG_NOT_FOUND"));
}

#[test]
fn update_rejects_unknown_status_with_hint() {
    let workspace = seeded_workspace();
    run_bh(
        &workspace,
        ["--user", "1", "create", "Typo", "--project", "1"],
        "create_for_status",
    );

    // "fixed" is a common synonym for resolved; the hint should say so.
    let run = run_bh(
        &workspace,
        ["update", "1", "--status", "fixed"],
        "update_bad_status",
    );
    assert_eq!(run.exit_code(), 4, "stderr: {}", run.stderr);
    assert!(run.stderr.contains("INVALID_STATUS"));
    assert!(run.stderr.contains("resolved"), "stderr: {}", run.stderr);
}

#[test]
fn list_filters_and_sorts_from_flags() {
    let workspace = seeded_workspace();
    for (title, priority) in [
        ("Login fails on Safari", "critical"),
        ("Typo on pricing page", "low"),
        ("Checkout spinner never stops", "high"),
    ] {
        let run = run_bh(
            &workspace,
            ["--user", "1", "create", title, "--project", "1", "-p", priority],
            &format!("create_{priority}"),
        );
        assert!(run.status.success(), "{}", run.stderr);
    }
    run_bh(
        &workspace,
        ["update", "2", "--status", "closed"],
        "close_typo",
    );

    let run = run_bh(&workspace, ["--json", "list", "--status", "open"], "list_open");
    assert!(run.status.success(), "{}", run.stderr);
    let bugs: Value = serde_json::from_str(&extract_json_payload(&run.stdout)).unwrap();
    assert_eq!(bugs.as_array().unwrap().len(), 2);

    let run = run_bh(
        &workspace,
        ["--json", "list", "--sort", "priority", "--direction", "desc"],
        "list_sorted",
    );
    let bugs: Value = serde_json::from_str(&extract_json_payload(&run.stdout)).unwrap();
    let priorities: Vec<&str> = bugs
        .as_array()
        .unwrap()
        .iter()
        .map(|b| b["priority"].as_str().unwrap())
        .collect();
    assert_eq!(priorities, vec!["critical", "high", "low"]);

    let run = run_bh(
        &workspace,
        ["list", "--search", "zebra"],
        "list_no_match",
    );
    assert!(run.status.success(), "{}", run.stderr);
    assert!(run.stdout.contains("No bugs match."));
}

#[test]
fn direction_alone_flips_default_recency_sort() {
    let workspace = seeded_workspace();
    for title in ["First report", "Second report", "Third report"] {
        let run = run_bh(
            &workspace,
            ["--user", "1", "create", title, "--project", "1"],
            "create_for_direction",
        );
        assert!(run.status.success(), "{}", run.stderr);
    }

    let ids = |run: &common::BhRun| -> Vec<i64> {
        let bugs: Value = serde_json::from_str(&extract_json_payload(&run.stdout)).unwrap();
        bugs.as_array()
            .unwrap()
            .iter()
            .map(|b| b["id"].as_i64().unwrap())
            .collect()
    };

    // Default: most recently updated first.
    let run = run_bh(&workspace, ["--json", "list"], "list_default_order");
    assert!(run.status.success(), "{}", run.stderr);
    assert_eq!(ids(&run), vec![3, 2, 1]);

    // --direction without --sort flips the default field.
    let run = run_bh(
        &workspace,
        ["--json", "list", "--direction", "asc"],
        "list_direction_only",
    );
    assert!(run.status.success(), "{}", run.stderr);
    assert_eq!(ids(&run), vec![1, 2, 3]);
}

#[test]
fn list_badges_summarize_active_criteria() {
    let workspace = seeded_workspace();
    run_bh(
        &workspace,
        ["--user", "1", "create", "Crash on save", "--project", "1"],
        "create_for_badges",
    );

    let run = run_bh(
        &workspace,
        ["list", "--badges", "--status", "open", "--assignee", "1", "--search", "crash"],
        "list_badges",
    );
    assert!(run.status.success(), "{}", run.stderr);
    let first_line = run.stdout.lines().next().unwrap_or("");
    assert!(first_line.starts_with("filters:"), "stdout: {}", run.stdout);
    assert!(first_line.contains("search=\"crash\""));
    assert!(first_line.contains("status=open"));
    assert!(first_line.contains("assignee=Sarah Chen"));
}

#[test]
fn notification_flow_follows_status_changes() {
    let workspace = seeded_workspace();
    run_bh(
        &workspace,
        ["--user", "1", "create", "Flaky upload", "--project", "1"],
        "create_for_notify",
    );

    let run = run_bh(&workspace, ["notify", "unread"], "unread_before");
    assert_eq!(run.stdout.trim(), "0");

    run_bh(
        &workspace,
        ["update", "1", "--status", "in_progress"],
        "notify_transition_1",
    );
    run_bh(
        &workspace,
        ["update", "1", "--status", "resolved"],
        "notify_transition_2",
    );

    let run = run_bh(&workspace, ["notify", "unread"], "unread_after");
    assert_eq!(run.stdout.trim(), "2");

    let run = run_bh(&workspace, ["notify", "list"], "notify_list");
    assert!(run.stdout.contains("in_progress -> resolved"));
    assert!(run.stdout.contains("open -> in_progress"));

    let run = run_bh(&workspace, ["notify", "read", "1"], "read_one");
    assert!(run.status.success(), "{}", run.stderr);
    let run = run_bh(&workspace, ["notify", "unread"], "unread_after_read");
    assert_eq!(run.stdout.trim(), "1");

    let run = run_bh(&workspace, ["notify", "read", "--all"], "read_all");
    assert!(run.stdout.contains("Marked 1 notifications read."));

    let run = run_bh(&workspace, ["notify", "clear"], "notify_clear");
    assert!(run.stdout.contains("Removed 2 notifications."));
    let run = run_bh(&workspace, ["notify", "list"], "notify_list_empty");
    assert!(run.stdout.contains("No notifications."));
}

#[test]
fn notify_read_missing_id_fails() {
    let workspace = seeded_workspace();
    let run = run_bh(&workspace, ["notify", "read", "42"], "read_missing");
    assert_eq!(run.exit_code(), 3, "stderr: {}", run.stderr);
    assert!(run.stderr.contains("NOTIFICATION_NOT_FOUND"));
}

#[test]
fn version_prints_package_version() {
    let mut cmd = assert_cmd::Command::new(assert_cmd::cargo::cargo_bin!("bh"));
    cmd.arg("version")
        .assert()
        .success()
        .stdout(predicates::str::starts_with("bh "));

    let mut cmd = assert_cmd::Command::new(assert_cmd::cargo::cargo_bin!("bh"));
    cmd.args(["--json", "version"])
        .assert()
        .success()
        .stdout(predicates::str::contains("\"name\":\"bughive\""));
}

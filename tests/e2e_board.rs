mod common;

use assert_cmd::Command;
use common::{KbWorkspace, column_ids, create_issue, init_board, run_kb, run_ok};
use predicates::prelude::*;

#[test]
fn test_init_creates_default_columns() {
    let workspace = KbWorkspace::new();
    let run = run_ok(&workspace, ["--json", "--project", "web", "init"], "init");
    let out = run.json();
    assert_eq!(out["project_key"], "WEB");
    assert_eq!(
        out["columns"],
        serde_json::json!(["Todo", "In Progress", "Done"])
    );
    assert!(workspace.board_path().exists());
    assert!(workspace.root.join(".kanban").join("config.yaml").exists());
}

#[test]
fn test_init_twice_requires_force() {
    let workspace = init_board();
    let second = run_kb(&workspace, ["init"], "init again");
    assert!(!second.status.success());
    assert!(second.stderr.contains("already initialized"), "{}", second.stderr);

    run_ok(&workspace, ["init", "--force"], "init --force");
}

#[test]
fn test_commands_require_init() {
    let workspace = KbWorkspace::new();
    workspace
        .command()
        .arg("show")
        .assert()
        .failure()
        .stderr(predicate::str::contains("not initialized"));
}

#[test]
fn test_create_uses_project_prefix_and_first_column() {
    let workspace = init_board();
    let id = create_issue(&workspace, "Write docs", &[]);
    assert!(id.starts_with("web-"), "unexpected id {id}");
    assert_eq!(column_ids(&workspace, "todo"), vec![id]);
}

#[test]
fn test_create_appends_to_column() {
    let workspace = init_board();
    let a = create_issue(&workspace, "A", &["-s", "in_progress"]);
    let b = create_issue(&workspace, "B", &["-s", "In Progress"]);
    assert_eq!(column_ids(&workspace, "in_progress"), vec![a, b]);
    assert!(column_ids(&workspace, "todo").is_empty());
}

#[test]
fn test_create_unknown_status_fails() {
    let workspace = init_board();
    let run = run_kb(&workspace, ["create", "Orphan", "-s", "blocked"], "create");
    assert!(!run.status.success());
    assert!(run.stderr.contains("Status not found"), "{}", run.stderr);
}

#[test]
fn test_move_to_other_column_renumbers_both() {
    let workspace = init_board();
    let a = create_issue(&workspace, "A", &[]);
    let b = create_issue(&workspace, "B", &[]);
    let c = create_issue(&workspace, "C", &[]);
    let d = create_issue(&workspace, "D", &["-s", "done"]);

    let run = run_ok(
        &workspace,
        ["--json", "move", b.as_str(), "done", "--position", "0"],
        "move",
    );
    let out = run.json();
    assert_eq!(out["from_status"], "todo");
    assert_eq!(out["to_status"], "done");
    assert_eq!(out["position"], 0);

    assert_eq!(column_ids(&workspace, "todo"), vec![a, c]);
    assert_eq!(column_ids(&workspace, "done"), vec![b, d]);

    let board = run_ok(&workspace, ["--json", "show"], "show").json();
    for column in board["columns"].as_array().unwrap() {
        for (index, issue) in column["issues"].as_array().unwrap().iter().enumerate() {
            assert_eq!(issue["order"], index);
        }
    }
}

#[test]
fn test_move_within_column() {
    let workspace = init_board();
    let a = create_issue(&workspace, "A", &[]);
    let b = create_issue(&workspace, "B", &[]);
    let c = create_issue(&workspace, "C", &[]);

    run_ok(&workspace, ["mv", c.as_str(), "todo", "--position", "0"], "mv up");
    assert_eq!(
        column_ids(&workspace, "todo"),
        vec![c.clone(), a.clone(), b.clone()]
    );

    // Downward moves land at the requested index after removal.
    run_ok(&workspace, ["mv", c.as_str(), "todo", "--position", "2"], "mv down");
    assert_eq!(column_ids(&workspace, "todo"), vec![a, b, c]);
}

#[test]
fn test_move_without_position_appends() {
    let workspace = init_board();
    let a = create_issue(&workspace, "A", &[]);
    let d = create_issue(&workspace, "D", &["-s", "done"]);

    run_ok(&workspace, ["move", a.as_str(), "done"], "move");
    assert_eq!(column_ids(&workspace, "done"), vec![d, a]);
}

#[test]
fn test_move_position_is_clamped() {
    let workspace = init_board();
    let a = create_issue(&workspace, "A", &[]);

    let out = run_ok(
        &workspace,
        ["--json", "move", a.as_str(), "done", "--position", "99"],
        "move",
    )
    .json();
    assert_eq!(out["position"], 0);
}

#[test]
fn test_move_unknown_issue_fails() {
    let workspace = init_board();
    create_issue(&workspace, "A", &[]);
    workspace
        .command()
        .args(["move", "web-nomatch", "done"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Issue not found"));
}

#[test]
fn test_move_accepts_partial_id() {
    let workspace = init_board();
    let a = create_issue(&workspace, "A", &[]);
    let hash = a.trim_start_matches("web-").to_string();

    run_ok(&workspace, ["move", hash.as_str(), "done"], "move by hash");
    assert_eq!(column_ids(&workspace, "done"), vec![a]);
}

#[test]
fn test_show_filters_by_assignee() {
    let workspace = init_board();
    let mine = create_issue(&workspace, "Mine", &["--assignee", "alice"]);
    create_issue(&workspace, "Theirs", &["--assignee", "bob"]);

    let board = run_ok(
        &workspace,
        ["--json", "show", "--assignee", "alice"],
        "show filtered",
    )
    .json();
    assert_eq!(board["issue_count"], 1);
    assert_eq!(board["filters"]["assignee_id"], "alice");
    let todo = &board["columns"][0]["issues"];
    assert_eq!(todo[0]["id"], mine.as_str());
}

#[test]
fn test_show_text_lists_columns() {
    let workspace = init_board();
    create_issue(&workspace, "Visible title", &[]);
    workspace
        .command()
        .arg("show")
        .assert()
        .success()
        .stdout(predicate::str::contains("WEB board"))
        .stdout(predicate::str::contains("In Progress"))
        .stdout(predicate::str::contains("Visible title"));
}

#[test]
fn test_column_add_and_remove() {
    let workspace = init_board();
    let out = run_ok(
        &workspace,
        ["--json", "column", "add", "review", "Review", "--wip-limit", "2"],
        "column add",
    )
    .json();
    assert_eq!(out["id"], "col-review");
    assert_eq!(out["order"], 3);

    let id = create_issue(&workspace, "Needs eyes", &["-s", "review"]);
    let blocked = run_kb(&workspace, ["column", "remove", "review"], "remove busy");
    assert!(!blocked.status.success());
    assert!(blocked.stderr.contains("still holds"), "{}", blocked.stderr);

    run_ok(&workspace, ["move", id.as_str(), "done"], "move out");
    run_ok(&workspace, ["column", "remove", "col-review"], "remove empty");

    let columns = run_ok(&workspace, ["--json", "column", "list"], "list").json();
    assert_eq!(columns.as_array().unwrap().len(), 3);
}

#[test]
fn test_column_add_duplicate_status_fails() {
    let workspace = init_board();
    let run = run_kb(
        &workspace,
        ["column", "add", "todo", "Backlog", "--id", "col-backlog"],
        "dup status",
    );
    assert!(!run.status.success());
}

#[test]
fn test_project_key_from_env() {
    let workspace = KbWorkspace::new();
    let out = workspace
        .command()
        .env("KB_PROJECT", "ops")
        .args(["--json", "init"])
        .output()
        .unwrap();
    assert!(out.status.success());
    let value: serde_json::Value = serde_json::from_slice(&out.stdout).unwrap();
    assert_eq!(value["project_key"], "OPS");
}

#[test]
fn test_version_and_completions() {
    let mut version = Command::cargo_bin("kb").unwrap();
    version
        .arg("version")
        .assert()
        .success()
        .stdout(predicate::str::starts_with("kb "));

    let mut completions = Command::cargo_bin("kb").unwrap();
    completions
        .args(["completions", "bash"])
        .assert()
        .success()
        .stdout(predicate::str::contains("kb"));
}

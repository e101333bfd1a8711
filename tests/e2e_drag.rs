mod common;

use common::{column_ids, create_issue, init_board, run_kb, run_ok};

#[test]
fn test_drag_onto_column_appends() {
    let workspace = init_board();
    let a = create_issue(&workspace, "A", &[]);
    let d = create_issue(&workspace, "D", &["-s", "done"]);

    let out = run_ok(
        &workspace,
        ["--json", "drag", a.as_str(), "--onto-column", "col-done"],
        "drag",
    )
    .json();
    assert_eq!(out["applied"], true);
    assert_eq!(out["target"]["kind"], "column");
    assert_eq!(out["resolved"]["status_id"], "done");
    assert_eq!(out["resolved"]["position"], 1);
    assert_eq!(out["moved"]["from_status"], "todo");

    assert!(column_ids(&workspace, "todo").is_empty());
    assert_eq!(column_ids(&workspace, "done"), vec![d, a]);
}

#[test]
fn test_drag_onto_issue_inserts_before_it() {
    let workspace = init_board();
    let a = create_issue(&workspace, "A", &[]);
    let x = create_issue(&workspace, "X", &["-s", "in_progress"]);
    let y = create_issue(&workspace, "Y", &["-s", "in_progress"]);

    run_ok(
        &workspace,
        ["drag", a.as_str(), "--onto-issue", y.as_str()],
        "drag onto card",
    );
    assert_eq!(column_ids(&workspace, "in_progress"), vec![x, a, y]);
}

#[test]
fn test_drag_within_column_onto_card() {
    let workspace = init_board();
    let a = create_issue(&workspace, "A", &[]);
    let b = create_issue(&workspace, "B", &[]);
    let c = create_issue(&workspace, "C", &[]);

    run_ok(
        &workspace,
        ["drag", c.as_str(), "--onto-issue", a.as_str()],
        "drag up",
    );
    assert_eq!(column_ids(&workspace, "todo"), vec![c, a, b]);
}

#[test]
fn test_drag_onto_own_slot_is_noop() {
    let workspace = init_board();
    let a = create_issue(&workspace, "A", &[]);
    let b = create_issue(&workspace, "B", &[]);

    let out = run_ok(
        &workspace,
        ["--json", "drag", a.as_str(), "--onto-issue", a.as_str()],
        "drag onto self",
    )
    .json();
    assert_eq!(out["applied"], false);
    assert!(out["resolved"].is_null());
    assert_eq!(column_ids(&workspace, "todo"), vec![a, b]);
}

#[test]
fn test_drag_dry_run_leaves_board_unchanged() {
    let workspace = init_board();
    let a = create_issue(&workspace, "A", &[]);
    let before = std::fs::read_to_string(workspace.board_path()).unwrap();

    let out = run_ok(
        &workspace,
        ["--json", "drag", a.as_str(), "--onto-column", "done", "--dry-run"],
        "dry run",
    )
    .json();
    assert_eq!(out["applied"], false);
    assert_eq!(out["resolved"]["status_id"], "done");
    assert_eq!(out["resolved"]["position"], 0);

    let after = std::fs::read_to_string(workspace.board_path()).unwrap();
    assert_eq!(before, after);
    assert_eq!(column_ids(&workspace, "todo"), vec![a]);
}

#[test]
fn test_drag_requires_target() {
    let workspace = init_board();
    let a = create_issue(&workspace, "A", &[]);
    let run = run_kb(&workspace, ["drag", a.as_str()], "drag without target");
    assert!(!run.status.success());
}

#[test]
fn test_drag_unknown_column_fails() {
    let workspace = init_board();
    let a = create_issue(&workspace, "A", &[]);
    let run = run_kb(
        &workspace,
        ["drag", a.as_str(), "--onto-column", "archive"],
        "drag unknown column",
    );
    assert!(!run.status.success());
    assert!(run.stderr.contains("Status not found"), "{}", run.stderr);
}

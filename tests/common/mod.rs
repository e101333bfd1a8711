#![allow(dead_code)]

use std::ffi::OsStr;
use std::path::PathBuf;
use std::process::ExitStatus;

use assert_cmd::Command;
use tempfile::TempDir;

/// Isolated workspace: its own cwd, config home and actor.
pub struct KbWorkspace {
    pub temp_dir: TempDir,
    pub root: PathBuf,
}

impl KbWorkspace {
    pub fn new() -> Self {
        let temp_dir = TempDir::new().expect("create temp dir");
        let root = temp_dir.path().join("work");
        std::fs::create_dir_all(&root).expect("create workspace root");
        Self { temp_dir, root }
    }

    pub fn board_path(&self) -> PathBuf {
        self.root.join(".kanban").join("board.jsonl")
    }

    pub fn command(&self) -> Command {
        let mut cmd = Command::cargo_bin("kb").expect("kb binary");
        cmd.current_dir(&self.root)
            .env("HOME", self.temp_dir.path())
            .env("XDG_CONFIG_HOME", self.temp_dir.path().join("xdg"))
            .env("KB_ACTOR", "tester")
            .env_remove("KB_BOARD")
            .env_remove("KB_PROJECT")
            .env_remove("KB_LOG")
            .env_remove("KB_LOG_FORMAT");
        cmd
    }
}

pub struct KbRun {
    pub status: ExitStatus,
    pub stdout: String,
    pub stderr: String,
}

impl KbRun {
    pub fn json(&self) -> serde_json::Value {
        serde_json::from_str(&self.stdout)
            .unwrap_or_else(|e| panic!("invalid JSON ({e}): {}", self.stdout))
    }
}

/// Run `kb` with `args`, returning captured output. `label` names the step
/// in failure messages.
pub fn run_kb<I, S>(workspace: &KbWorkspace, args: I, label: &str) -> KbRun
where
    I: IntoIterator<Item = S>,
    S: AsRef<OsStr>,
{
    let output = workspace
        .command()
        .args(args)
        .output()
        .unwrap_or_else(|e| panic!("{label}: failed to run kb: {e}"));
    KbRun {
        status: output.status,
        stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
        stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
    }
}

/// Run and assert success.
pub fn run_ok<I, S>(workspace: &KbWorkspace, args: I, label: &str) -> KbRun
where
    I: IntoIterator<Item = S>,
    S: AsRef<OsStr>,
{
    let run = run_kb(workspace, args, label);
    assert!(
        run.status.success(),
        "{label} failed\nstdout: {}\nstderr: {}",
        run.stdout,
        run.stderr
    );
    run
}

/// `kb init --project WEB` in a fresh workspace.
pub fn init_board() -> KbWorkspace {
    let workspace = KbWorkspace::new();
    run_ok(&workspace, ["--project", "WEB", "init"], "init");
    workspace
}

/// Create an issue and return its ID.
pub fn create_issue(workspace: &KbWorkspace, title: &str, extra: &[&str]) -> String {
    let mut args = vec!["--json", "create", title];
    args.extend_from_slice(extra);
    let run = run_ok(workspace, args, "create");
    run.json()["id"]
        .as_str()
        .expect("created issue id")
        .to_string()
}

/// Issue IDs of the column holding `status_id`, in board order.
pub fn column_ids(workspace: &KbWorkspace, status_id: &str) -> Vec<String> {
    let board = run_ok(workspace, ["--json", "show"], "show").json();
    board["columns"]
        .as_array()
        .expect("columns array")
        .iter()
        .find(|c| c["status_id"] == status_id)
        .map(|c| {
            c["issues"]
                .as_array()
                .expect("issues array")
                .iter()
                .map(|i| i["id"].as_str().expect("issue id").to_string())
                .collect()
        })
        .unwrap_or_default()
}

use std::fs;

use board_lib::store::DEFAULT_PROJECT_KEY;
use board_lib::{BoardError, BoardStore, Result};
use serde::Serialize;
use tracing::info;

use crate::cli::{CommandContext, InitArgs, print_json};
use crate::config::{self, workspace_config_template};

#[derive(Serialize)]
struct InitOutput<'a> {
    project_key: &'a str,
    board_path: String,
    columns: Vec<&'a str>,
}

/// Execute the init command.
///
/// # Errors
///
/// Returns an error if a board already exists (without `--force`), the
/// project key is invalid, or the files cannot be written.
pub fn execute(args: &InitArgs, ctx: &CommandContext) -> Result<()> {
    let board_path = &ctx.config.board_path;
    if board_path.exists() && !args.force {
        return Err(BoardError::AlreadyInitialized {
            path: board_path.clone(),
        });
    }

    let project_key = ctx
        .config
        .project_key
        .as_deref()
        .unwrap_or(DEFAULT_PROJECT_KEY)
        .to_uppercase();
    if project_key.is_empty() || !project_key.chars().all(|c| c.is_ascii_alphanumeric()) {
        return Err(BoardError::validation(
            "project_key",
            "must be non-empty and alphanumeric",
        ));
    }

    let kanban_dir = ctx.config.kanban_dir();
    fs::create_dir_all(&kanban_dir)?;
    if let Some(parent) = board_path.parent() {
        fs::create_dir_all(parent)?;
    }

    let mut store = BoardStore::with_default_columns(&project_key);
    store.save_to(board_path)?;

    // Keep a hand-edited config.
    let config_path = config::workspace_config_path(&ctx.config.root);
    if !config_path.exists() {
        fs::write(&config_path, workspace_config_template(&project_key))?;
    }

    info!(project = %project_key, path = %board_path.display(), "board initialized");

    if ctx.json {
        return print_json(&InitOutput {
            project_key: &project_key,
            board_path: board_path.display().to_string(),
            columns: store.columns().iter().map(|c| c.name.as_str()).collect(),
        });
    }

    println!(
        "Initialized board {project_key} in {}",
        kanban_dir.display()
    );
    Ok(())
}

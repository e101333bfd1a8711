//! Show command implementation.

use board_lib::{BoardFilters, BoardKey, MoveCoordinator, Result};
use chrono::Utc;

use crate::cli::{CommandContext, print_json};
use crate::format::{BoardView, render_board, terminal_width};

/// Execute the show command.
///
/// # Errors
///
/// Returns an error if the board cannot be opened or fetched.
pub fn execute(filters: &BoardFilters, ctx: &CommandContext) -> Result<()> {
    let store = ctx.open_store()?;
    let project_key = store.project_key().to_string();
    let key = BoardKey::new(&project_key, filters.clone());

    let mut coordinator = MoveCoordinator::new(store);
    let snapshot = coordinator.board(&key)?;

    if ctx.json {
        return print_json(&BoardView::new(&project_key, filters, &snapshot));
    }

    let mut title = format!("{project_key} board");
    if !filters.is_empty() {
        title.push_str(" (filtered)");
    }
    println!("{title}\n");
    print!("{}", render_board(&snapshot, terminal_width(), Utc::now()));
    println!("\n{} issue(s)", snapshot.issue_count());
    Ok(())
}

//! Output formatting for `kanban_board`.
//!
//! Supports both human-readable text output and machine-parseable JSON.
//!
//! # JSON Output Types
//!
//! - [`BoardView`] - Columns with issues and WIP state (show)
//! - [`MoveOutcome`] - Moved issue with source and target status (move)
//! - [`DragOutcome`] - Drop resolution and whether it was applied (drag)

mod output;
mod text;

pub use output::{BoardView, ColumnView, DragOutcome, MoveOutcome};
pub use text::{
    format_age, format_column_header, format_issue_line, format_priority, render_board,
    truncate_to_width,
};

/// Fallback width when stdout is not a terminal.
pub const DEFAULT_WIDTH: usize = 100;

/// Current terminal width in columns.
#[must_use]
pub fn terminal_width() -> usize {
    crossterm::terminal::size().map_or(DEFAULT_WIDTH, |(cols, _)| usize::from(cols))
}

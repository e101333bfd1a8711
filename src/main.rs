//! `kanban_board` (kb) - Kanban board with optimistic drag-and-drop moves
//!
//! Boards are stored as JSONL under `.kanban/`. No daemon, no background
//! processes: every command loads the board, acts, and saves.

use kanban_board::run;

fn main() {
    if let Err(e) = run() {
        eprintln!("Error: {e:#}");
        std::process::exit(1);
    }
}

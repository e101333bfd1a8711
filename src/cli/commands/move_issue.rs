//! Move command implementation.
//!
//! Runs the move through the optimistic coordinator against the local
//! board, then saves the board file.

use board_lib::{BoardError, BoardKey, BoardStore, MoveCoordinator, ResolvedMove, Result};

use crate::cli::{CommandContext, MoveArgs, print_json, resolve_column};
use crate::format::MoveOutcome;

/// Execute the move command.
///
/// # Errors
///
/// Returns an error if the issue or status cannot be resolved, the move is
/// rejected, or the board cannot be saved.
pub fn execute(args: &MoveArgs, ctx: &CommandContext) -> Result<()> {
    let store = ctx.open_store()?;
    let issue_id = store.resolve_id(&args.issue)?;
    let status_id = resolve_column(&store, &args.status)?.status_id.clone();
    let key = BoardKey::project(store.project_key());

    let mut coordinator = MoveCoordinator::new(store);
    let snapshot = coordinator.load_board(&key)?;

    let from_status = snapshot
        .issue(&issue_id)
        .map(|issue| issue.status_id.clone())
        .ok_or_else(|| BoardError::IssueNotFound {
            id: issue_id.clone(),
        })?;
    let position = args.position.unwrap_or_else(|| {
        snapshot
            .column_for_status(&status_id)
            .map_or(0, board_lib::Column::len)
    });

    let mv = ResolvedMove::new(&issue_id, &status_id, position);
    let outcome = apply(&mut coordinator, &key, &mv, from_status)?;

    if ctx.json {
        return print_json(&outcome);
    }
    println!(
        "Moved {}: {} -> {} (position {})",
        outcome.issue.id, outcome.from_status, outcome.to_status, outcome.position
    );
    Ok(())
}

/// Run `mv` through the coordinator and persist the board on success.
///
/// # Errors
///
/// Returns `MoveRejected` if the store refused the move, `StatusNotFound`
/// if the move did not apply to the loaded board, or a save error.
pub fn apply(
    coordinator: &mut MoveCoordinator<BoardStore>,
    key: &BoardKey,
    mv: &ResolvedMove,
    from_status: String,
) -> Result<MoveOutcome> {
    let Some(issue) = coordinator.move_issue(key, mv)? else {
        return Err(BoardError::StatusNotFound {
            id: mv.status_id.clone(),
        });
    };
    coordinator.api_mut().save()?;

    Ok(MoveOutcome {
        position: issue.order,
        to_status: issue.status_id.clone(),
        from_status,
        issue,
    })
}

//! Drag command implementation.
//!
//! Replays one full gesture (start, hover, drop) through a drag session so
//! the drop resolves exactly as it would on an interactive board.

use board_lib::{BoardError, BoardKey, DragEvent, DragSession, DragTarget, MoveCoordinator, Result};
use tracing::debug;

use crate::cli::commands::move_issue;
use crate::cli::{CommandContext, DragArgs, print_json, resolve_column};
use crate::format::DragOutcome;

/// Execute the drag command.
///
/// # Errors
///
/// Returns an error if an ID cannot be resolved, the resolved move is
/// rejected, or the board cannot be saved.
pub fn execute(args: &DragArgs, ctx: &CommandContext) -> Result<()> {
    let store = ctx.open_store()?;
    let issue_id = store.resolve_id(&args.issue)?;
    let target = match (&args.onto_issue, &args.onto_column) {
        (Some(issue), _) => DragTarget::Issue(store.resolve_id(issue)?),
        (None, Some(column)) => DragTarget::Column(resolve_column(&store, column)?.id.clone()),
        (None, None) => {
            return Err(BoardError::validation(
                "target",
                "one of --onto-issue or --onto-column is required",
            ));
        }
    };
    let key = BoardKey::project(store.project_key());

    let mut coordinator = MoveCoordinator::new(store);
    let snapshot = coordinator.load_board(&key)?;
    let from_status = snapshot
        .issue(&issue_id)
        .map(|issue| issue.status_id.clone())
        .unwrap_or_default();

    let mut session = DragSession::new();
    session.handle(
        DragEvent::Start {
            issue_id: issue_id.clone(),
        },
        &snapshot,
    );
    session.handle(
        DragEvent::Over {
            target: target.clone(),
        },
        &snapshot,
    );

    let (resolved, moved) = if args.dry_run {
        let preview = session.preview(&snapshot);
        session.cancel();
        (preview, None)
    } else {
        let resolved = session.handle(
            DragEvent::End {
                target: Some(target.clone()),
            },
            &snapshot,
        );
        let moved = match &resolved {
            Some(mv) => Some(move_issue::apply(&mut coordinator, &key, mv, from_status)?),
            None => None,
        };
        (resolved, moved)
    };
    debug!(issue = %issue_id, ?resolved, dry_run = args.dry_run, "drag finished");

    let outcome = DragOutcome {
        issue_id,
        target,
        applied: moved.is_some(),
        resolved,
        moved,
    };

    if ctx.json {
        return print_json(&outcome);
    }
    match (&outcome.resolved, &outcome.moved) {
        (None, _) => println!("No move: {} stays where it is", outcome.issue_id),
        (Some(mv), None) => println!(
            "Would move {} to {} at position {}",
            mv.issue_id, mv.status_id, mv.position
        ),
        (Some(_), Some(moved)) => println!(
            "Moved {}: {} -> {} (position {})",
            moved.issue.id, moved.from_status, moved.to_status, moved.position
        ),
    }
    Ok(())
}

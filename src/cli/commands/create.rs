use std::str::FromStr;

use board_lib::{BoardError, Issue, Priority, Result};
use tracing::info;

use crate::cli::{CommandContext, CreateArgs, print_json, resolve_column};

/// Execute the create command.
///
/// # Errors
///
/// Returns an error if validation fails, the board cannot be opened, or the
/// issue cannot be created or saved.
pub fn execute(args: CreateArgs, ctx: &CommandContext) -> Result<()> {
    let title = args.title.trim().to_string();
    if title.is_empty() {
        return Err(BoardError::validation("title", "cannot be empty"));
    }
    if title.len() > 500 {
        return Err(BoardError::validation("title", "exceeds 500 characters"));
    }

    let mut store = ctx.open_store()?;

    let status_id = match args.status.as_deref() {
        Some(input) => resolve_column(&store, input)?.status_id.clone(),
        None => store
            .columns()
            .first()
            .map(|c| c.status_id.clone())
            .ok_or_else(|| BoardError::StatusNotFound {
                id: "(board has no columns)".to_string(),
            })?,
    };

    let priority = args
        .priority
        .as_deref()
        .map(Priority::from_str)
        .transpose()?
        .unwrap_or_default();

    let issue = Issue {
        title,
        status_id,
        priority,
        assignee_id: args.assignee,
        issue_type_id: args.type_,
        sprint_id: args.sprint,
        ..Default::default()
    };

    let created = store.create_issue(&issue, &ctx.config.actor)?;
    store.save()?;
    info!(issue = %created.id, status = %created.status_id, "issue created");

    if ctx.json {
        return print_json(&created);
    }
    println!("Created {}: {}", created.id, created.title);
    Ok(())
}

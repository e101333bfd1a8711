use board_lib::{Column, Result};
use tracing::info;

use crate::cli::{ColumnSubcommand, CommandContext, print_json, resolve_column};
use crate::format::{ColumnView, format_column_header};

/// Execute a column subcommand.
///
/// # Errors
///
/// Returns an error if the board cannot be opened or saved, or the store
/// rejects the change.
pub fn execute(command: ColumnSubcommand, ctx: &CommandContext) -> Result<()> {
    let mut store = ctx.open_store()?;

    match command {
        ColumnSubcommand::Add {
            status,
            name,
            id,
            color,
            wip_limit,
        } => {
            let id = id.unwrap_or_else(|| default_column_id(&status));
            let mut column = Column::new(id, status, name);
            column.color = color;
            column.wip_limit = wip_limit;
            column.order = store.next_column_order();

            store.add_column(column.clone())?;
            store.save()?;
            info!(column = %column.id, status = %column.status_id, "column added");

            if ctx.json {
                return print_json(&ColumnView::from(&column));
            }
            println!("Added column {} ({})", column.id, column.name);
        }
        ColumnSubcommand::Remove { column } => {
            let column_id = resolve_column(&store, &column)?.id.clone();
            let removed = store.remove_column(&column_id)?;
            store.save()?;
            info!(column = %removed.id, "column removed");

            if ctx.json {
                return print_json(&ColumnView::from(&removed));
            }
            println!("Removed column {} ({})", removed.id, removed.name);
        }
        ColumnSubcommand::List => {
            let snapshot = store.snapshot(&board_lib::BoardFilters::default());
            if ctx.json {
                let views: Vec<ColumnView> = snapshot.columns.iter().map(ColumnView::from).collect();
                return print_json(&views);
            }
            for column in &snapshot.columns {
                println!(
                    "{:<20} {:<16} {}",
                    column.id,
                    column.status_id,
                    format_column_header(column)
                );
            }
        }
    }
    Ok(())
}

/// `col-<status>` with underscores and spaces turned into dashes.
#[must_use]
pub fn default_column_id(status: &str) -> String {
    let slug: String = status
        .trim()
        .to_lowercase()
        .chars()
        .map(|c| if c == '_' || c.is_whitespace() { '-' } else { c })
        .collect();
    format!("col-{slug}")
}

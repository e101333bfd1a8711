//! Command-line interface for `kanban_board`.
//!
//! This module provides the CLI parsing and command routing using clap.

pub mod commands;

use std::env;
use std::path::PathBuf;

use anyhow::{Context, Result};
use board_lib::{BoardError, BoardFilters, BoardStore, Column};
use clap::{ArgGroup, Args, Parser, Subcommand};
use serde::Serialize;

use crate::config::{self, Config, ConfigLayer};
use crate::logging;

/// `kanban_board` (kb) - Kanban board with optimistic drag-and-drop moves.
#[derive(Parser, Debug)]
#[command(name = "kb")]
#[command(
    author,
    version,
    about = "Kanban board with optimistic drag-and-drop moves (JSONL-backed)",
    long_about = None,
    after_help = "The board lives in .kanban/board.jsonl; run `kb init` to create one."
)]
pub struct Cli {
    /// Output format: text (default) or json
    #[arg(long, global = true)]
    pub json: bool,

    /// Verbose output (-v info, -vv debug, -vvv trace)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Quiet mode (errors only)
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Board file to operate on
    #[arg(long, global = true, value_name = "PATH")]
    pub board: Option<PathBuf>,

    /// Project key served by the board
    #[arg(long, global = true, value_name = "KEY")]
    pub project: Option<String>,

    /// Append logs to this file instead of stderr
    #[arg(long, global = true, value_name = "PATH")]
    pub log_file: Option<PathBuf>,

    /// The command to run
    #[command(subcommand)]
    pub command: Option<Commands>,
}

impl Cli {
    /// Settings given on the command line, as the top config layer.
    #[must_use]
    pub fn config_layer(&self) -> ConfigLayer {
        ConfigLayer {
            board_path: self.board.clone(),
            project_key: self.project.clone(),
            actor: None,
        }
    }
}

/// Available commands.
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Initialize a board in .kanban/
    Init(InitArgs),

    /// Show the board
    Show(ShowArgs),

    /// Create a new issue
    Create(CreateArgs),

    /// Move an issue to a status and position
    #[command(name = "move", alias = "mv")]
    Move(MoveArgs),

    /// Drag an issue onto another issue or a column
    Drag(DragArgs),

    /// Manage columns
    Column(ColumnCommand),

    /// Check board invariants
    Doctor(DoctorArgs),

    /// Generate shell completions
    Completions(CompletionsArgs),

    /// Show version information
    Version,
}

#[derive(Args, Debug)]
pub struct InitArgs {
    /// Overwrite an existing board
    #[arg(long)]
    pub force: bool,
}

#[derive(Args, Debug, Default)]
pub struct ShowArgs {
    /// Only issues assigned to this user
    #[arg(long)]
    pub assignee: Option<String>,

    /// Only issues of this type
    #[arg(long = "type")]
    pub type_: Option<String>,

    /// Case-insensitive match on title or ID
    #[arg(long)]
    pub search: Option<String>,

    /// Only issues in this sprint
    #[arg(long)]
    pub sprint: Option<String>,
}

impl ShowArgs {
    #[must_use]
    pub fn filters(&self) -> BoardFilters {
        BoardFilters {
            assignee_id: self.assignee.clone(),
            issue_type_id: self.type_.clone(),
            search: self.search.clone(),
            sprint_id: self.sprint.clone(),
        }
    }
}

#[derive(Args, Debug)]
pub struct CreateArgs {
    /// Issue title
    pub title: String,

    /// Status, column ID or column name (default: first column)
    #[arg(long, short = 's')]
    pub status: Option<String>,

    /// Priority (P0-P4)
    #[arg(long, short = 'p')]
    pub priority: Option<String>,

    #[arg(long)]
    pub assignee: Option<String>,

    /// Issue type ID
    #[arg(long = "type")]
    pub type_: Option<String>,

    #[arg(long)]
    pub sprint: Option<String>,
}

#[derive(Args, Debug)]
pub struct MoveArgs {
    /// Issue ID (partial IDs are resolved)
    pub issue: String,

    /// Target status, column ID or column name
    pub status: String,

    /// Zero-based position in the target column (default: append)
    #[arg(long)]
    pub position: Option<usize>,
}

#[derive(Args, Debug)]
#[command(group(ArgGroup::new("target").required(true).args(["onto_issue", "onto_column"])))]
pub struct DragArgs {
    /// Issue being dragged
    pub issue: String,

    /// Drop onto this issue card (inserts at its position)
    #[arg(long, value_name = "ISSUE")]
    pub onto_issue: Option<String>,

    /// Drop onto this column's empty space (appends)
    #[arg(long, value_name = "COLUMN")]
    pub onto_column: Option<String>,

    /// Resolve the drop without applying it
    #[arg(long)]
    pub dry_run: bool,
}

#[derive(Args, Debug)]
pub struct ColumnCommand {
    #[command(subcommand)]
    pub command: ColumnSubcommand,
}

#[derive(Subcommand, Debug)]
pub enum ColumnSubcommand {
    /// Add a column for a status
    Add {
        /// Status ID the column holds
        status: String,
        /// Display name
        name: String,
        /// Column ID (default: col-<status>)
        #[arg(long)]
        id: Option<String>,
        #[arg(long)]
        color: Option<String>,
        /// Informational WIP limit
        #[arg(long)]
        wip_limit: Option<usize>,
    },

    /// Remove an empty column
    Remove {
        /// Column ID, status or name
        column: String,
    },

    /// List columns
    List,
}

#[derive(Args, Debug)]
pub struct DoctorArgs {
    /// Renumber issue orders to close gaps
    #[arg(long)]
    pub fix: bool,
}

#[derive(Args, Debug)]
pub struct CompletionsArgs {
    /// Shell to generate completions for
    #[arg(value_enum)]
    pub shell: clap_complete::Shell,
}

/// Resolved configuration plus output mode, shared by all commands.
#[derive(Debug, Clone)]
pub struct CommandContext {
    pub config: Config,
    pub json: bool,
}

impl CommandContext {
    #[must_use]
    pub const fn new(config: Config, json: bool) -> Self {
        Self { config, json }
    }

    /// Open the configured board, applying the configured project key.
    ///
    /// # Errors
    ///
    /// Returns `NotInitialized` if the board file is missing, or a load error.
    pub fn open_store(&self) -> board_lib::Result<BoardStore> {
        let path = &self.config.board_path;
        if !path.exists() {
            return Err(BoardError::NotInitialized { path: path.clone() });
        }
        let mut store = BoardStore::open(path)?;
        if let Some(key) = &self.config.project_key {
            store.set_project_key(key.to_uppercase());
        }
        Ok(store)
    }
}

/// Print `value` as pretty JSON.
///
/// # Errors
///
/// Returns `Json` if serialization fails.
pub fn print_json<T: Serialize>(value: &T) -> board_lib::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

/// Find a column by ID, status ID or case-insensitive name, in that order.
///
/// # Errors
///
/// Returns `StatusNotFound` if nothing matches.
pub fn resolve_column<'a>(store: &'a BoardStore, input: &str) -> board_lib::Result<&'a Column> {
    let columns = store.columns();
    columns
        .iter()
        .find(|c| c.id == input)
        .or_else(|| columns.iter().find(|c| c.status_id == input))
        .or_else(|| columns.iter().find(|c| c.name.eq_ignore_ascii_case(input)))
        .ok_or_else(|| BoardError::StatusNotFound {
            id: input.to_string(),
        })
}

/// Run the CLI.
///
/// # Errors
///
/// Returns an error if the command fails to execute.
pub fn run() -> Result<()> {
    let cli = Cli::parse();
    logging::init_logging(cli.verbose, cli.quiet, cli.log_file.as_deref())
        .context("Failed to initialize logging")?;

    let layer = cli.config_layer();
    let json = cli.json;
    let Some(command) = cli.command else {
        println!("kb - Kanban board. Use --help for usage.");
        return Ok(());
    };

    let cwd = env::current_dir().context("Failed to read current directory")?;
    // `init` creates a workspace here; everything else looks upwards for one.
    let root = if matches!(command, Commands::Init(_)) {
        dunce::canonicalize(&cwd).unwrap_or(cwd)
    } else {
        config::discover_root(&cwd)
    };

    let load = || -> Result<CommandContext> {
        Ok(CommandContext::new(config::resolve(&root, layer)?, json))
    };
    dispatch(command, json, load)
}

/// Route a command. `load` resolves configuration and is only called by
/// commands that work on a board.
fn dispatch<F>(command: Commands, json: bool, load: F) -> Result<()>
where
    F: FnOnce() -> Result<CommandContext>,
{
    match command {
        Commands::Version => commands::version::execute(json)?,
        Commands::Completions(args) => commands::completions::execute(args.shell),
        Commands::Init(args) => commands::init::execute(&args, &load()?)?,
        Commands::Show(args) => commands::show::execute(&args.filters(), &load()?)?,
        Commands::Create(args) => commands::create::execute(args, &load()?)?,
        Commands::Move(args) => commands::move_issue::execute(&args, &load()?)?,
        Commands::Drag(args) => commands::drag::execute(&args, &load()?)?,
        Commands::Column(column) => commands::column::execute(column.command, &load()?)?,
        Commands::Doctor(args) => commands::doctor::execute(&args, &load()?)?,
    }
    Ok(())
}

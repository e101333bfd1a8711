//! `kanban_board` - Kanban board CLI
//!
//! This crate provides the `kb` CLI on top of [`board_lib`], the
//! drag-and-drop reordering engine.
//!
//! # Architecture
//!
//! The crate is organized into the following modules:
//!
//! - [`cli`] - Command-line interface using clap
//! - [`config`] - Layered YAML configuration
//! - [`format`] - Output formatting (text, JSON)
//! - [`logging`] - Tracing subscriber setup
//! - [`validation`] - Board and issue invariant checks (doctor)

#![forbid(unsafe_code)]
#![warn(clippy::pedantic, clippy::nursery)]
#![allow(clippy::module_name_repetitions)]

pub mod cli;
pub mod config;
pub mod format;
pub mod logging;
pub mod validation;

pub use board_lib::{BoardError, Result};

/// Run the CLI application.
///
/// This is the main entry point called from `main()`.
///
/// # Errors
///
/// Returns an error if command execution fails.
pub fn run() -> anyhow::Result<()> {
    cli::run()
}

//! Tracing subscriber setup for the `kb` binary.

use std::env;
use std::fs::OpenOptions;
use std::path::Path;
use std::sync::Mutex;

use anyhow::{Context, Result};
use tracing_subscriber::fmt::writer::BoxMakeWriter;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

/// Environment variable overriding the log filter (e.g. `KB_LOG=board_lib=debug`).
pub const LOG_ENV: &str = "KB_LOG";

/// Environment variable selecting the log format: `compact` (default) or `json`.
pub const LOG_FORMAT_ENV: &str = "KB_LOG_FORMAT";

/// Default filter directive for a verbosity level.
#[must_use]
pub fn default_directive(verbose: u8, quiet: bool) -> &'static str {
    if quiet {
        return "error";
    }
    match verbose {
        0 => "warn",
        1 => "kanban_board=info,board_lib=info,warn",
        2 => "kanban_board=debug,board_lib=debug,info",
        _ => "trace",
    }
}

/// Initialize logging. Logs go to stderr, or are appended to `log_file`.
///
/// # Errors
///
/// Returns an error if the log file cannot be opened or a global subscriber
/// is already installed.
pub fn init_logging(verbose: u8, quiet: bool, log_file: Option<&Path>) -> Result<()> {
    let filter = EnvFilter::try_from_env(LOG_ENV)
        .unwrap_or_else(|_| EnvFilter::new(default_directive(verbose, quiet)));

    let writer = match log_file {
        Some(path) => {
            let file = OpenOptions::new()
                .create(true)
                .append(true)
                .open(path)
                .with_context(|| format!("Failed to open log file {}", path.display()))?;
            BoxMakeWriter::new(Mutex::new(file))
        }
        None => BoxMakeWriter::new(std::io::stderr),
    };

    let json = env::var(LOG_FORMAT_ENV).is_ok_and(|f| f.eq_ignore_ascii_case("json"));
    let (json_layer, text_layer) = if json {
        (Some(fmt::layer().json().with_ansi(false).with_writer(writer)), None)
    } else {
        (
            None,
            Some(
                fmt::layer()
                    .compact()
                    .with_ansi(log_file.is_none())
                    .with_writer(writer),
            ),
        )
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(json_layer)
        .with(text_layer)
        .try_init()
        .context("Failed to install tracing subscriber")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_directive_levels() {
        assert_eq!(default_directive(0, false), "warn");
        assert!(default_directive(1, false).contains("board_lib=info"));
        assert!(default_directive(2, false).contains("board_lib=debug"));
        assert_eq!(default_directive(5, false), "trace");
    }

    #[test]
    fn test_quiet_wins_over_verbose() {
        assert_eq!(default_directive(3, true), "error");
    }
}

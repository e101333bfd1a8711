//! Error types for `board-lib`.

use std::path::PathBuf;
use thiserror::Error;

/// Primary error type for board operations.
#[derive(Error, Debug)]
pub enum BoardError {
    // === Lookup Errors ===
    /// Issue with the specified ID was not found.
    #[error("Issue not found: {id}")]
    IssueNotFound { id: String },

    /// Column with the specified ID was not found.
    #[error("Column not found: {id}")]
    ColumnNotFound { id: String },

    /// No column on the board carries this status.
    #[error("Status not found: {id}")]
    StatusNotFound { id: String },

    /// The board does not belong to the requested project.
    #[error("Project not found: {key}")]
    ProjectNotFound { key: String },

    /// Partial ID matches multiple issues.
    #[error("Ambiguous ID '{partial}': matches {matches:?}")]
    AmbiguousId {
        partial: String,
        matches: Vec<String>,
    },

    /// Attempted to create an issue or column with an ID that already exists.
    #[error("ID collision: {id}")]
    IdCollision { id: String },

    /// Cannot remove a column that still holds issues.
    #[error("Cannot remove column {id}: it still holds {count} issues")]
    ColumnNotEmpty { id: String, count: usize },

    // === Validation Errors ===
    /// Field validation failed.
    #[error("Validation failed: {field}: {reason}")]
    Validation { field: String, reason: String },

    // === API Errors ===
    /// Loading the board from the API failed.
    #[error("Board fetch failed: {reason}")]
    Fetch { reason: String },

    /// The API refused or failed to persist a move; local state was rolled back.
    #[error("Move of {issue_id} rejected: {reason}")]
    MoveRejected { issue_id: String, reason: String },

    // === JSONL Errors ===
    /// Failed to parse a line in the JSONL file.
    #[error("JSONL parse error at line {line}: {reason}")]
    JsonlParse { line: usize, reason: String },

    // === Configuration Errors ===
    /// Configuration error.
    #[error("Configuration error: {0}")]
    Config(String),

    // === Storage Errors ===
    /// Workspace has no board file yet.
    #[error("Board not initialized at {path} (run `kb init`)")]
    NotInitialized { path: PathBuf },

    /// A board file already exists where one would be created.
    #[error("Board already initialized at {path}")]
    AlreadyInitialized { path: PathBuf },

    /// Generic storage error.
    #[error("Storage error: {0}")]
    Storage(String),

    /// File not found at the specified path.
    #[error("File not found: {0}")]
    FileNotFound(PathBuf),

    // === I/O Errors ===
    /// File system I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization/deserialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// A single field validation error.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationError {
    pub field: String,
    pub message: String,
}

impl ValidationError {
    #[must_use]
    pub fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }
}

impl std::fmt::Display for ValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

impl std::error::Error for ValidationError {}

impl BoardError {
    #[must_use]
    pub fn validation(field: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::Validation {
            field: field.into(),
            reason: reason.into(),
        }
    }

    /// Wrap any API-side failure as a fetch error.
    #[must_use]
    pub fn fetch(reason: impl std::fmt::Display) -> Self {
        Self::Fetch {
            reason: reason.to_string(),
        }
    }
}

/// Result type using `BoardError`.
pub type Result<T> = std::result::Result<T, BoardError>;

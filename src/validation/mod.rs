//! Validation helpers for `kanban_board`.
//!
//! These routines check board data constraints and return structured
//! validation errors without mutating storage.

use std::collections::HashSet;

use board_lib::util::is_contiguous;
use board_lib::{Issue, Priority, Snapshot, ValidationError};

/// Validates issue fields.
pub struct IssueValidator;

impl IssueValidator {
    /// Validate an issue and return all validation errors found.
    ///
    /// # Errors
    ///
    /// Returns a `Vec<ValidationError>` if any validation rules are violated.
    pub fn validate(issue: &Issue) -> Result<(), Vec<ValidationError>> {
        let mut errors = Vec::new();

        // ID: Required, max 50 chars, prefix-hash format.
        if issue.id.trim().is_empty() {
            errors.push(ValidationError::new("id", "cannot be empty"));
        }
        if issue.id.len() > 50 {
            errors.push(ValidationError::new("id", "exceeds 50 characters"));
        }
        if !issue.id.is_empty() && !is_valid_id_format(&issue.id) {
            errors.push(ValidationError::new(
                "id",
                "invalid format (expected prefix-hash)",
            ));
        }

        // Title: Required, max 500 chars.
        if issue.title.trim().is_empty() {
            errors.push(ValidationError::new("title", "cannot be empty"));
        }
        if issue.title.len() > 500 {
            errors.push(ValidationError::new("title", "exceeds 500 characters"));
        }

        if issue.status_id.trim().is_empty() {
            errors.push(ValidationError::new("status_id", "cannot be empty"));
        }

        // Priority: 0-4 range.
        if issue.priority < Priority::CRITICAL || issue.priority > Priority::BACKLOG {
            errors.push(ValidationError::new("priority", "must be 0-4"));
        }

        // Timestamps: created_at <= updated_at.
        if issue.updated_at < issue.created_at {
            errors.push(ValidationError::new(
                "updated_at",
                "cannot be before created_at",
            ));
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }
}

/// Validates the structural invariants of a board snapshot.
pub struct BoardValidator;

impl BoardValidator {
    /// Check column uniqueness, status agreement, single membership and
    /// contiguous ordering.
    ///
    /// # Errors
    ///
    /// Returns every violation found.
    pub fn validate(snapshot: &Snapshot) -> Result<(), Vec<ValidationError>> {
        let mut errors = Vec::new();
        let mut column_ids = HashSet::new();
        let mut statuses = HashSet::new();
        let mut seen_issues = HashSet::new();

        for column in &snapshot.columns {
            if !column_ids.insert(column.id.as_str()) {
                errors.push(ValidationError::new(
                    format!("columns.{}", column.id),
                    "duplicate column id",
                ));
            }
            if !statuses.insert(column.status_id.as_str()) {
                errors.push(ValidationError::new(
                    format!("columns.{}", column.id),
                    format!("status '{}' has more than one column", column.status_id),
                ));
            }

            for issue in &column.issues {
                if issue.status_id != column.status_id {
                    errors.push(ValidationError::new(
                        format!("issues.{}", issue.id),
                        format!(
                            "status '{}' does not match column status '{}'",
                            issue.status_id, column.status_id
                        ),
                    ));
                }
                if !seen_issues.insert(issue.id.as_str()) {
                    errors.push(ValidationError::new(
                        format!("issues.{}", issue.id),
                        "appears in more than one place",
                    ));
                }
            }

            if !is_contiguous(&column.issues) {
                let orders: Vec<String> = column.issues.iter().map(|i| i.order.to_string()).collect();
                errors.push(ValidationError::new(
                    format!("columns.{}", column.id),
                    format!("orders not contiguous: [{}]", orders.join(", ")),
                ));
            }
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }
}

/// `prefix-hash` with a non-empty alphanumeric prefix and hash.
#[must_use]
pub fn is_valid_id_format(id: &str) -> bool {
    let Some((prefix, hash)) = id.rsplit_once('-') else {
        return false;
    };
    !prefix.is_empty()
        && !hash.is_empty()
        && prefix
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
        && hash.chars().all(|c| c.is_ascii_alphanumeric())
}

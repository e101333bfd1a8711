//! Core data types for the board.
//!
//! A [`Snapshot`] is the full board for one project/filter combination:
//! status columns, each holding its issues in rank order.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Issue priority (0=Critical, 4=Backlog).
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[serde(transparent)]
pub struct Priority(pub i32);

impl Priority {
    pub const CRITICAL: Self = Self(0);
    pub const HIGH: Self = Self(1);
    pub const MEDIUM: Self = Self(2);
    pub const LOW: Self = Self(3);
    pub const BACKLOG: Self = Self(4);
}

impl Default for Priority {
    fn default() -> Self {
        Self::MEDIUM
    }
}

impl fmt::Display for Priority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "P{}", self.0)
    }
}

impl FromStr for Priority {
    type Err = crate::error::BoardError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim().to_uppercase();
        let val = s.strip_prefix('P').unwrap_or(&s);

        match val.parse::<i32>() {
            Ok(p) if (0..=4).contains(&p) => Ok(Self(p)),
            _ => Err(crate::error::BoardError::validation(
                "priority",
                format!("must be P0-P4, got '{s}'"),
            )),
        }
    }
}

/// A unit of work placed on the board.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Issue {
    /// Unique ID, stable across moves (e.g., "web-a1b").
    pub id: String,

    pub title: String,

    /// Status of the column this issue currently sits in.
    pub status_id: String,

    /// Zero-based rank within the column.
    #[serde(default)]
    pub order: usize,

    #[serde(default)]
    pub priority: Priority,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub assignee_id: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub issue_type_id: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sprint_id: Option<String>,

    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Default for Issue {
    fn default() -> Self {
        let now = Utc::now();
        Self {
            id: String::new(),
            title: String::new(),
            status_id: String::new(),
            order: 0,
            priority: Priority::default(),
            assignee_id: None,
            issue_type_id: None,
            sprint_id: None,
            created_at: now,
            updated_at: now,
        }
    }
}

/// One workflow status lane on the board.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Column {
    pub id: String,

    /// Status every issue in this column carries.
    pub status_id: String,

    /// Display name of the status (e.g., "In Progress").
    pub name: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,

    /// Rank among columns. Need not be contiguous.
    #[serde(default)]
    pub order: i64,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub wip_limit: Option<usize>,

    /// Issues in rank order. Empty in the persisted column record.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub issues: Vec<Issue>,
}

impl Column {
    #[must_use]
    pub fn new(id: impl Into<String>, status_id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            status_id: status_id.into(),
            name: name.into(),
            color: None,
            order: 0,
            wip_limit: None,
            issues: Vec::new(),
        }
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.issues.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.issues.is_empty()
    }

    /// Index of an issue within this column.
    #[must_use]
    pub fn position_of(&self, issue_id: &str) -> Option<usize> {
        self.issues.iter().position(|issue| issue.id == issue_id)
    }

    /// `(count, limit)` when a WIP limit is configured.
    #[must_use]
    pub fn wip_usage(&self) -> Option<(usize, usize)> {
        self.wip_limit.map(|limit| (self.issues.len(), limit))
    }

    /// WIP limits are informational; moves are never refused for exceeding one.
    #[must_use]
    pub fn is_over_wip_limit(&self) -> bool {
        self.wip_usage().is_some_and(|(count, limit)| count > limit)
    }
}

/// The complete board for one project/filter combination.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
pub struct Snapshot {
    pub columns: Vec<Column>,
}

impl Snapshot {
    /// Build a snapshot, sorting columns by `order` (ties by `id`).
    #[must_use]
    pub fn new(mut columns: Vec<Column>) -> Self {
        columns.sort_by(|a, b| a.order.cmp(&b.order).then_with(|| a.id.cmp(&b.id)));
        Self { columns }
    }

    #[must_use]
    pub fn column(&self, column_id: &str) -> Option<&Column> {
        self.columns.iter().find(|c| c.id == column_id)
    }

    #[must_use]
    pub fn column_for_status(&self, status_id: &str) -> Option<&Column> {
        self.columns.iter().find(|c| c.status_id == status_id)
    }

    /// Column whose issue list holds `issue_id`. Linear scan.
    #[must_use]
    pub fn find_column_containing_issue(&self, issue_id: &str) -> Option<&Column> {
        self.columns
            .iter()
            .find(|c| c.issues.iter().any(|issue| issue.id == issue_id))
    }

    /// `(column index, issue index)` of an issue.
    #[must_use]
    pub fn locate_issue(&self, issue_id: &str) -> Option<(usize, usize)> {
        self.columns
            .iter()
            .enumerate()
            .find_map(|(ci, c)| c.position_of(issue_id).map(|ii| (ci, ii)))
    }

    #[must_use]
    pub fn issue(&self, issue_id: &str) -> Option<&Issue> {
        self.locate_issue(issue_id)
            .map(|(ci, ii)| &self.columns[ci].issues[ii])
    }

    #[must_use]
    pub fn issue_count(&self) -> usize {
        self.columns.iter().map(Column::len).sum()
    }

    /// Deterministic content hash of the snapshot.
    #[must_use]
    pub fn fingerprint(&self) -> String {
        crate::util::snapshot_fingerprint(self)
    }
}

//! In-memory board store backed by `HashMap`.
//!
//! Plays the server side of the board: it owns the authoritative columns and
//! issues for one project, answers board fetches and persists moves. Use
//! `open()` to load from a JSONL file and `save()` to write back.

use std::collections::{HashMap, HashSet};
use std::path::{Path, PathBuf};

use chrono::Utc;
use tracing::debug;

use crate::api::BoardApi;
use crate::error::{BoardError, Result};
use crate::jsonl;
use crate::model::{Column, Issue, Snapshot};
use crate::query::{BoardFilters, BoardKey, IssueUpdate, MoveRequest};
use crate::util::{clamp_position, generate_id};

/// Default project key for a store with no issues to infer one from.
pub const DEFAULT_PROJECT_KEY: &str = "KB";

/// Authoritative board data for one project.
#[derive(Debug)]
pub struct BoardStore {
    project_key: String,
    columns: Vec<Column>,
    issues: HashMap<String, Issue>,
    dirty_ids: HashSet<String>,
    jsonl_path: Option<PathBuf>,
}

impl BoardStore {
    // ========================================================================
    // Lifecycle
    // ========================================================================

    /// Create an empty store with no columns.
    #[must_use]
    pub fn new(project_key: impl Into<String>) -> Self {
        Self {
            project_key: project_key.into(),
            columns: Vec::new(),
            issues: HashMap::new(),
            dirty_ids: HashSet::new(),
            jsonl_path: None,
        }
    }

    /// Create a store with the stock Todo / In Progress / Done columns.
    #[must_use]
    pub fn with_default_columns(project_key: impl Into<String>) -> Self {
        let mut store = Self::new(project_key);
        for column in default_columns() {
            store.dirty_ids.insert(column.id.clone());
            store.columns.push(column);
        }
        store
    }

    /// Open and load from a JSONL file.
    ///
    /// The project key is inferred from the issue ID prefix; override it
    /// with [`set_project_key`](Self::set_project_key).
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let loaded = jsonl::load(path)?;

        let mut store = Self::new(DEFAULT_PROJECT_KEY);
        store.jsonl_path = Some(path.to_path_buf());
        store.columns = Snapshot::new(loaded.columns).columns;

        for issue in loaded.issues {
            store.issues.insert(issue.id.clone(), issue);
        }

        // Smallest ID keeps the inference deterministic.
        if let Some(id) = store.issues.keys().min() {
            if let Some(dash) = id.rfind('-') {
                store.project_key = id[..dash].to_uppercase();
            }
        }

        debug!(
            path = %path.display(),
            columns = store.columns.len(),
            issues = store.issues.len(),
            "board loaded"
        );
        Ok(store)
    }

    /// Set the project key served by this store.
    pub fn set_project_key(&mut self, project_key: impl Into<String>) {
        self.project_key = project_key.into();
    }

    #[must_use]
    pub fn project_key(&self) -> &str {
        &self.project_key
    }

    /// Prefix for generated issue IDs.
    #[must_use]
    pub fn id_prefix(&self) -> String {
        self.project_key.to_lowercase()
    }

    #[must_use]
    pub fn path(&self) -> Option<&Path> {
        self.jsonl_path.as_deref()
    }

    /// Save to the file that was opened. A clean store whose file already
    /// exists is not rewritten.
    ///
    /// Returns whether the file was written.
    ///
    /// # Errors
    ///
    /// Returns `Storage` if no file path is set, or `Io` on write failure.
    pub fn save(&mut self) -> Result<bool> {
        let path = self
            .jsonl_path
            .clone()
            .ok_or_else(|| BoardError::Storage("No file path set; use save_to()".to_string()))?;
        if !self.is_dirty() && path.exists() {
            debug!(path = %path.display(), "board unchanged; save skipped");
            return Ok(false);
        }
        self.save_to(&path)?;
        Ok(true)
    }

    /// Save to a specific file path and mark the store clean.
    ///
    /// # Errors
    ///
    /// Returns `Io` on write failure.
    pub fn save_to(&mut self, path: impl AsRef<Path>) -> Result<()> {
        let mut issues: Vec<Issue> = self.issues.values().cloned().collect();
        issues.sort_by(|a, b| a.id.cmp(&b.id));
        jsonl::save(path.as_ref(), &self.columns, &issues)?;
        debug!(path = %path.as_ref().display(), changed = self.dirty_ids.len(), "board saved");
        self.dirty_ids.clear();
        Ok(())
    }

    // ========================================================================
    // Columns
    // ========================================================================

    /// Columns in board order, without their issues.
    #[must_use]
    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    #[must_use]
    pub fn get_column(&self, column_id: &str) -> Option<&Column> {
        self.columns.iter().find(|c| c.id == column_id)
    }

    #[must_use]
    pub fn has_status(&self, status_id: &str) -> bool {
        self.columns.iter().any(|c| c.status_id == status_id)
    }

    /// Order value that places a new column last.
    #[must_use]
    pub fn next_column_order(&self) -> i64 {
        self.columns.iter().map(|c| c.order + 1).max().unwrap_or(0)
    }

    /// Add a column to the board.
    ///
    /// # Errors
    ///
    /// Returns `IdCollision` if the column ID exists, or `Validation` if a
    /// required field is blank or the status already has a column.
    pub fn add_column(&mut self, column: Column) -> Result<()> {
        if column.id.trim().is_empty() {
            return Err(BoardError::validation("id", "cannot be empty"));
        }
        if column.status_id.trim().is_empty() {
            return Err(BoardError::validation("status_id", "cannot be empty"));
        }
        if column.name.trim().is_empty() {
            return Err(BoardError::validation("name", "cannot be empty"));
        }
        if self.get_column(&column.id).is_some() {
            return Err(BoardError::IdCollision { id: column.id });
        }
        if self.has_status(&column.status_id) {
            return Err(BoardError::validation(
                "status_id",
                format!("status '{}' already has a column", column.status_id),
            ));
        }

        let mut column = column;
        column.issues.clear();
        self.dirty_ids.insert(column.id.clone());
        self.columns.push(column);
        self.columns = Snapshot::new(std::mem::take(&mut self.columns)).columns;
        Ok(())
    }

    /// Remove an empty column.
    ///
    /// # Errors
    ///
    /// Returns `ColumnNotFound`, or `ColumnNotEmpty` if issues still carry
    /// the column's status.
    pub fn remove_column(&mut self, column_id: &str) -> Result<Column> {
        let index = self
            .columns
            .iter()
            .position(|c| c.id == column_id)
            .ok_or_else(|| BoardError::ColumnNotFound {
                id: column_id.to_string(),
            })?;

        let count = self.ordered_ids(&self.columns[index].status_id).len();
        if count > 0 {
            return Err(BoardError::ColumnNotEmpty {
                id: column_id.to_string(),
                count,
            });
        }

        self.dirty_ids.insert(column_id.to_string());
        Ok(self.columns.remove(index))
    }

    // ========================================================================
    // Issues
    // ========================================================================

    /// Create a new issue at the bottom of its status column.
    ///
    /// If `issue.id` is empty, a new ID is generated from the project key.
    ///
    /// # Errors
    ///
    /// Returns `Validation` if the title is empty, `StatusNotFound` if no
    /// column carries the issue's status, or `IdCollision`.
    pub fn create_issue(&mut self, issue: &Issue, actor: &str) -> Result<Issue> {
        if issue.title.trim().is_empty() {
            return Err(BoardError::validation("title", "cannot be empty"));
        }
        if !self.has_status(&issue.status_id) {
            return Err(BoardError::StatusNotFound {
                id: issue.status_id.clone(),
            });
        }

        let mut new_issue = issue.clone();
        let now = Utc::now();

        if new_issue.id.is_empty() {
            new_issue.id = generate_id(
                &self.id_prefix(),
                &new_issue.title,
                Some(actor),
                now,
                self.issues.len(),
                |id| self.issues.contains_key(id),
            );
        } else if self.issues.contains_key(&new_issue.id) {
            return Err(BoardError::IdCollision {
                id: new_issue.id.clone(),
            });
        }

        new_issue.order = self.ordered_ids(&new_issue.status_id).len();
        new_issue.created_at = now;
        new_issue.updated_at = now;

        self.dirty_ids.insert(new_issue.id.clone());
        self.issues.insert(new_issue.id.clone(), new_issue.clone());
        Ok(new_issue)
    }

    /// Update non-positional issue fields.
    ///
    /// # Errors
    ///
    /// Returns `IssueNotFound` or `Validation` if the new title is empty.
    pub fn update_issue(&mut self, id: &str, updates: &IssueUpdate) -> Result<Issue> {
        if let Some(title) = &updates.title {
            if title.trim().is_empty() {
                return Err(BoardError::validation("title", "cannot be empty"));
            }
        }

        let issue = self
            .issues
            .get_mut(id)
            .ok_or_else(|| BoardError::IssueNotFound { id: id.to_string() })?;

        if updates.is_empty() {
            return Ok(issue.clone());
        }

        if let Some(title) = &updates.title {
            issue.title.clone_from(title);
        }
        if let Some(priority) = updates.priority {
            issue.priority = priority;
        }
        if let Some(assignee) = &updates.assignee_id {
            issue.assignee_id.clone_from(assignee);
        }
        if let Some(issue_type) = &updates.issue_type_id {
            issue.issue_type_id.clone_from(issue_type);
        }
        if let Some(sprint) = &updates.sprint_id {
            issue.sprint_id.clone_from(sprint);
        }
        issue.updated_at = Utc::now();

        self.dirty_ids.insert(id.to_string());
        Ok(issue.clone())
    }

    /// Delete an issue and close the gap it leaves in its column.
    ///
    /// # Errors
    ///
    /// Returns `IssueNotFound`.
    pub fn delete_issue(&mut self, id: &str) -> Result<Issue> {
        let issue = self
            .issues
            .remove(id)
            .ok_or_else(|| BoardError::IssueNotFound { id: id.to_string() })?;

        let remaining = self.ordered_ids(&issue.status_id);
        self.apply_order(&remaining);
        self.dirty_ids.insert(id.to_string());
        Ok(issue)
    }

    #[must_use]
    pub fn get_issue(&self, id: &str) -> Option<&Issue> {
        self.issues.get(id)
    }

    /// Issues matching `filters`, by column then rank.
    #[must_use]
    pub fn list_issues(&self, filters: &BoardFilters) -> Vec<Issue> {
        let column_rank: HashMap<&str, usize> = self
            .columns
            .iter()
            .enumerate()
            .map(|(i, c)| (c.status_id.as_str(), i))
            .collect();

        let mut issues: Vec<Issue> = self
            .issues
            .values()
            .filter(|issue| filters.matches(issue))
            .cloned()
            .collect();
        issues.sort_by(|a, b| {
            let rank_a = column_rank.get(a.status_id.as_str()).copied().unwrap_or(usize::MAX);
            let rank_b = column_rank.get(b.status_id.as_str()).copied().unwrap_or(usize::MAX);
            rank_a
                .cmp(&rank_b)
                .then_with(|| a.order.cmp(&b.order))
                .then_with(|| a.id.cmp(&b.id))
        });
        issues
    }

    /// Issues whose status has no column. They never appear on the board.
    #[must_use]
    pub fn orphaned_issues(&self) -> Vec<&Issue> {
        let mut orphans: Vec<&Issue> = self
            .issues
            .values()
            .filter(|issue| !self.has_status(&issue.status_id))
            .collect();
        orphans.sort_by(|a, b| a.id.cmp(&b.id));
        orphans
    }

    /// Server-side move: reposition an issue and renumber both columns.
    ///
    /// Orders past the end of the target column append.
    ///
    /// # Errors
    ///
    /// Returns `IssueNotFound` or `StatusNotFound`.
    pub fn move_issue_to(&mut self, request: &MoveRequest) -> Result<Issue> {
        let source_status = self
            .issues
            .get(&request.issue_id)
            .map(|issue| issue.status_id.clone())
            .ok_or_else(|| BoardError::IssueNotFound {
                id: request.issue_id.clone(),
            })?;
        if !self.has_status(&request.status_id) {
            return Err(BoardError::StatusNotFound {
                id: request.status_id.clone(),
            });
        }

        let mut source_ids = self.ordered_ids(&source_status);
        source_ids.retain(|id| id != &request.issue_id);

        let mut target_ids = if source_status == request.status_id {
            source_ids
        } else {
            self.apply_order(&source_ids);
            self.ordered_ids(&request.status_id)
        };
        let position = clamp_position(request.order, target_ids.len());
        target_ids.insert(position, request.issue_id.clone());

        if let Some(issue) = self.issues.get_mut(&request.issue_id) {
            issue.status_id.clone_from(&request.status_id);
            issue.updated_at = Utc::now();
        }
        self.apply_order(&target_ids);
        self.dirty_ids.insert(request.issue_id.clone());

        debug!(
            issue = %request.issue_id,
            from = %source_status,
            to = %request.status_id,
            position,
            "issue moved"
        );
        self.issues
            .get(&request.issue_id)
            .cloned()
            .ok_or_else(|| BoardError::IssueNotFound {
                id: request.issue_id.clone(),
            })
    }

    /// Rewrite every column's orders to `0..n`, keeping relative rank.
    ///
    /// Returns the number of issues whose order changed.
    pub fn normalize_orders(&mut self) -> usize {
        let statuses: HashSet<String> = self
            .issues
            .values()
            .map(|issue| issue.status_id.clone())
            .collect();

        let mut changed = 0;
        for status in statuses {
            let ids = self.ordered_ids(&status);
            for (index, id) in ids.iter().enumerate() {
                if self.issues.get(id).is_some_and(|issue| issue.order != index) {
                    changed += 1;
                }
            }
            self.apply_order(&ids);
        }
        changed
    }

    // ========================================================================
    // Board
    // ========================================================================

    /// Board view for `filters`: every column with its matching issues.
    #[must_use]
    pub fn snapshot(&self, filters: &BoardFilters) -> Snapshot {
        let columns = self
            .columns
            .iter()
            .map(|column| {
                let mut column = column.clone();
                let mut issues: Vec<Issue> = self
                    .issues
                    .values()
                    .filter(|issue| issue.status_id == column.status_id && filters.matches(issue))
                    .cloned()
                    .collect();
                issues.sort_by(|a, b| a.order.cmp(&b.order).then_with(|| a.id.cmp(&b.id)));
                column.issues = issues;
                column
            })
            .collect();
        Snapshot::new(columns)
    }

    // ========================================================================
    // ID Resolution
    // ========================================================================

    /// Resolve a partial ID to a full ID.
    ///
    /// Tries: exact match, prefix-normalized, substring match on the hash.
    ///
    /// # Errors
    ///
    /// Returns `IssueNotFound` or `AmbiguousId`.
    pub fn resolve_id(&self, input: &str) -> Result<String> {
        let input = input.trim().to_lowercase();

        if input.is_empty() {
            return Err(BoardError::IssueNotFound { id: input });
        }

        if self.issues.contains_key(&input) {
            return Ok(input);
        }

        if !input.contains('-') {
            let with_prefix = format!("{}-{}", self.id_prefix(), input);
            if self.issues.contains_key(&with_prefix) {
                return Ok(with_prefix);
            }
        }

        let hash_pattern = input
            .rfind('-')
            .map_or(input.as_str(), |pos| &input[pos + 1..]);

        if !hash_pattern.is_empty() {
            let mut matches: Vec<String> = self
                .issues
                .keys()
                .filter(|id| {
                    id.rfind('-')
                        .is_some_and(|pos| id[pos + 1..].contains(hash_pattern))
                })
                .cloned()
                .collect();
            matches.sort();

            match matches.len() {
                0 => {}
                1 => return Ok(matches.remove(0)),
                _ => {
                    return Err(BoardError::AmbiguousId {
                        partial: input,
                        matches,
                    });
                }
            }
        }

        Err(BoardError::IssueNotFound { id: input })
    }

    // ========================================================================
    // Dirty Tracking
    // ========================================================================

    /// Check if any issues or columns have been modified.
    #[must_use]
    pub fn is_dirty(&self) -> bool {
        !self.dirty_ids.is_empty()
    }

    #[must_use]
    pub fn dirty_count(&self) -> usize {
        self.dirty_ids.len()
    }

    pub fn clear_dirty(&mut self) {
        self.dirty_ids.clear();
    }

    /// Get the total number of issues.
    #[must_use]
    pub fn len(&self) -> usize {
        self.issues.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.issues.is_empty()
    }

    // ========================================================================
    // Internal Helpers
    // ========================================================================

    /// IDs carrying `status_id`, by (order, id).
    fn ordered_ids(&self, status_id: &str) -> Vec<String> {
        let mut issues: Vec<&Issue> = self
            .issues
            .values()
            .filter(|issue| issue.status_id == status_id)
            .collect();
        issues.sort_by(|a, b| a.order.cmp(&b.order).then_with(|| a.id.cmp(&b.id)));
        issues.into_iter().map(|issue| issue.id.clone()).collect()
    }

    fn apply_order(&mut self, ids: &[String]) {
        for (index, id) in ids.iter().enumerate() {
            if let Some(issue) = self.issues.get_mut(id) {
                if issue.order != index {
                    issue.order = index;
                    self.dirty_ids.insert(id.clone());
                }
            }
        }
    }
}

impl Default for BoardStore {
    fn default() -> Self {
        Self::new(DEFAULT_PROJECT_KEY)
    }
}

impl BoardApi for BoardStore {
    fn fetch_board(&mut self, key: &BoardKey) -> Result<Snapshot> {
        if !key.project_key.eq_ignore_ascii_case(&self.project_key) {
            return Err(BoardError::ProjectNotFound {
                key: key.project_key.clone(),
            });
        }
        Ok(self.snapshot(&key.filters))
    }

    fn move_issue(&mut self, request: &MoveRequest) -> Result<Issue> {
        self.move_issue_to(request)
    }
}

/// Stock columns for a new board.
#[must_use]
pub fn default_columns() -> Vec<Column> {
    [
        ("col-todo", "todo", "Todo", "#94a3b8"),
        ("col-in-progress", "in_progress", "In Progress", "#3b82f6"),
        ("col-done", "done", "Done", "#22c55e"),
    ]
    .into_iter()
    .zip(0_i64..)
    .map(|((id, status, name, color), order)| {
        let mut column = Column::new(id, status, name);
        column.color = Some(color.to_string());
        column.order = order;
        column
    })
    .collect()
}

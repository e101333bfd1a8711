//! Optimistic move coordination.
//!
//! A move is applied to the cached snapshot before the API confirms it.
//! If the API call fails, the snapshot captured just before the move is
//! restored in full. Either way the board is refetched afterwards, and that
//! refetch is the source of truth.
//!
//! Rollback restores the whole pre-move snapshot. When two moves overlap and
//! the earlier one fails, the later move's local effect is discarded until
//! the refetch lands.

use serde::Serialize;
use tracing::{debug, info, warn};

use crate::api::BoardApi;
use crate::board;
use crate::cache::BoardCache;
use crate::error::{BoardError, Result};
use crate::model::{Issue, Snapshot};
use crate::query::{BoardKey, MoveRequest, ResolvedMove};
use crate::util::{clamp_position, renumber};

/// State of the most recent move, for the UI's loading/error indicator.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum MoveStatus {
    #[default]
    Idle,
    Pending {
        issue_id: String,
    },
    Failed {
        issue_id: String,
        reason: String,
    },
}

/// Derive the board after moving an issue.
///
/// The issue is removed from every column, then inserted into the column
/// for `mv.status_id` at `mv.position` (past the end appends). Every column
/// that changed is renumbered so orders stay `0..len`.
///
/// Returns `None` if the target status has no column or the issue is not on
/// the board.
#[must_use]
pub fn apply_move(snapshot: &Snapshot, mv: &ResolvedMove) -> Option<Snapshot> {
    let target = snapshot
        .columns
        .iter()
        .position(|c| c.status_id == mv.status_id)?;
    let (source_col, source_idx) = snapshot.locate_issue(&mv.issue_id)?;

    let mut next = snapshot.clone();
    let mut moved = next.columns[source_col].issues[source_idx].clone();

    for column in &mut next.columns {
        let before = column.issues.len();
        column.issues.retain(|issue| issue.id != mv.issue_id);
        if column.issues.len() != before {
            renumber(&mut column.issues);
        }
    }

    moved.status_id.clone_from(&mv.status_id);
    let column = &mut next.columns[target];
    let at = clamp_position(mv.position, column.issues.len());
    column.issues.insert(at, moved);
    renumber(&mut column.issues);

    Some(next)
}

/// One optimistic move: the snapshot before it and the snapshot after it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MoveCommand {
    key: BoardKey,
    resolved: ResolvedMove,
    previous: Snapshot,
    next: Snapshot,
}

impl MoveCommand {
    /// Build the command against the current snapshot. `None` when the move
    /// cannot be applied to it.
    #[must_use]
    pub fn prepare(key: &BoardKey, current: &Snapshot, mv: &ResolvedMove) -> Option<Self> {
        let next = apply_move(current, mv)?;
        Some(Self {
            key: key.clone(),
            resolved: mv.clone(),
            previous: current.clone(),
            next,
        })
    }

    #[must_use]
    pub const fn key(&self) -> &BoardKey {
        &self.key
    }

    #[must_use]
    pub const fn resolved(&self) -> &ResolvedMove {
        &self.resolved
    }

    #[must_use]
    pub const fn previous(&self) -> &Snapshot {
        &self.previous
    }

    #[must_use]
    pub const fn next(&self) -> &Snapshot {
        &self.next
    }

    /// Body for the move-issue endpoint.
    #[must_use]
    pub fn request(&self) -> MoveRequest {
        self.resolved.request()
    }

    /// Commit the derived snapshot to the cache.
    pub fn apply(&self, cache: &mut BoardCache) {
        cache.set(&self.key, self.next.clone());
    }

    /// Restore the snapshot captured before the move.
    pub fn rollback(&self, cache: &mut BoardCache) {
        cache.set(&self.key, self.previous.clone());
    }
}

/// Owns the API client and snapshot cache and runs moves against them.
#[derive(Debug)]
pub struct MoveCoordinator<A: BoardApi> {
    api: A,
    cache: BoardCache,
    status: MoveStatus,
}

impl<A: BoardApi> MoveCoordinator<A> {
    #[must_use]
    pub fn new(api: A) -> Self {
        Self::with_cache(api, BoardCache::new())
    }

    #[must_use]
    pub fn with_cache(api: A, cache: BoardCache) -> Self {
        Self {
            api,
            cache,
            status: MoveStatus::Idle,
        }
    }

    #[must_use]
    pub const fn api(&self) -> &A {
        &self.api
    }

    pub const fn api_mut(&mut self) -> &mut A {
        &mut self.api
    }

    #[must_use]
    pub fn into_api(self) -> A {
        self.api
    }

    #[must_use]
    pub const fn cache(&self) -> &BoardCache {
        &self.cache
    }

    /// For registering cache observers.
    pub const fn cache_mut(&mut self) -> &mut BoardCache {
        &mut self.cache
    }

    #[must_use]
    pub const fn status(&self) -> &MoveStatus {
        &self.status
    }

    /// Current (possibly optimistic) snapshot for `key`.
    #[must_use]
    pub fn snapshot(&self, key: &BoardKey) -> Option<&Snapshot> {
        self.cache.get(key)
    }

    // ========================================================================
    // Loading
    // ========================================================================

    /// Fetch the board for `key` unconditionally.
    ///
    /// # Errors
    ///
    /// Returns `Fetch` if the API call fails; the cache is left as it was.
    pub fn load_board(&mut self, key: &BoardKey) -> Result<Snapshot> {
        board::get_board_data(&mut self.api, &mut self.cache, key)
    }

    /// Cached board for `key`, fetching it first if missing or stale.
    ///
    /// # Errors
    ///
    /// Returns `Fetch` if a fetch was needed and failed.
    pub fn board(&mut self, key: &BoardKey) -> Result<Snapshot> {
        if !self.cache.is_stale(key) {
            if let Some(snapshot) = self.cache.get(key) {
                return Ok(snapshot.clone());
            }
        }
        self.load_board(key)
    }

    // ========================================================================
    // Moves
    // ========================================================================

    /// Apply a move optimistically. Returns the in-flight command, or `None`
    /// if there is no cached board or the move does not apply to it.
    ///
    /// Pass the command to [`Self::settle`] once the API call completes.
    pub fn begin_move(&mut self, key: &BoardKey, mv: &ResolvedMove) -> Option<MoveCommand> {
        let Some(current) = self.cache.get(key) else {
            debug!(project = %key.project_key, "no board cached; move skipped");
            return None;
        };
        let Some(command) = MoveCommand::prepare(key, current, mv) else {
            debug!(
                issue = %mv.issue_id,
                status = %mv.status_id,
                "move does not apply to cached board; skipped"
            );
            return None;
        };

        command.apply(&mut self.cache);
        self.status = MoveStatus::Pending {
            issue_id: mv.issue_id.clone(),
        };
        debug!(
            issue = %mv.issue_id,
            status = %mv.status_id,
            position = mv.position,
            "optimistic move applied"
        );
        Some(command)
    }

    /// Reconcile an in-flight move with the API outcome, then refetch.
    ///
    /// # Errors
    ///
    /// Returns `MoveRejected` if `outcome` is an error. The cache has been
    /// rolled back to the command's previous snapshot by then.
    pub fn settle(&mut self, command: &MoveCommand, outcome: Result<Issue>) -> Result<Issue> {
        let issue_id = &command.resolved().issue_id;
        let result = match outcome {
            Ok(issue) => {
                info!(
                    issue = %issue_id,
                    status = %issue.status_id,
                    order = issue.order,
                    "move persisted"
                );
                self.status = MoveStatus::Idle;
                Ok(issue)
            }
            Err(err) => {
                warn!(issue = %issue_id, error = %err, "move failed; rolling back");
                command.rollback(&mut self.cache);
                let reason = err.to_string();
                self.status = MoveStatus::Failed {
                    issue_id: issue_id.clone(),
                    reason: reason.clone(),
                };
                Err(BoardError::MoveRejected {
                    issue_id: issue_id.clone(),
                    reason,
                })
            }
        };

        self.refresh_after_settle(command.key());
        result
    }

    /// Apply, persist and reconcile a move in one call.
    ///
    /// Returns `Ok(None)` when the move was skipped without touching the API.
    ///
    /// # Errors
    ///
    /// Returns `MoveRejected` if the API call failed and the move was rolled back.
    pub fn move_issue(&mut self, key: &BoardKey, mv: &ResolvedMove) -> Result<Option<Issue>> {
        let Some(command) = self.begin_move(key, mv) else {
            return Ok(None);
        };
        let outcome = self.api.move_issue(&command.request());
        self.settle(&command, outcome).map(Some)
    }

    fn refresh_after_settle(&mut self, key: &BoardKey) {
        self.cache.invalidate_project(&key.project_key);
        if let Err(err) = self.load_board(key) {
            warn!(project = %key.project_key, error = %err, "refetch after move failed");
        }
    }
}

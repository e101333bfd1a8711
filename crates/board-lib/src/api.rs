//! The remote board API the engine talks to.
//!
//! Transport is the implementor's concern. [`crate::store::BoardStore`] is
//! the in-process implementation.

use crate::error::Result;
use crate::model::{Issue, Snapshot};
use crate::query::{BoardKey, MoveRequest};

/// Board fetch and move-issue endpoints.
pub trait BoardApi {
    /// Fetch all columns joined with their issues for a project and filter set.
    ///
    /// # Errors
    ///
    /// Returns an error if the board cannot be loaded.
    fn fetch_board(&mut self, key: &BoardKey) -> Result<Snapshot>;

    /// Persist an issue's new status and rank.
    ///
    /// # Errors
    ///
    /// Returns an error if the server refuses or fails to persist the move.
    fn move_issue(&mut self, request: &MoveRequest) -> Result<Issue>;
}

impl<T: BoardApi + ?Sized> BoardApi for &mut T {
    fn fetch_board(&mut self, key: &BoardKey) -> Result<Snapshot> {
        (**self).fetch_board(key)
    }

    fn move_issue(&mut self, request: &MoveRequest) -> Result<Issue> {
        (**self).move_issue(request)
    }
}

impl<T: BoardApi + ?Sized> BoardApi for Box<T> {
    fn fetch_board(&mut self, key: &BoardKey) -> Result<Snapshot> {
        (**self).fetch_board(key)
    }

    fn move_issue(&mut self, request: &MoveRequest) -> Result<Issue> {
        (**self).move_issue(request)
    }
}

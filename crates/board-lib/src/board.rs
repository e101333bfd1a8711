//! Loading and querying the board for a project/filter key.

use tracing::{debug, warn};

use crate::api::BoardApi;
use crate::cache::BoardCache;
use crate::error::{BoardError, Result};
use crate::model::{Column, Snapshot};
use crate::query::BoardKey;

/// Fetch the board for `key` and store it in the cache.
///
/// # Errors
///
/// Returns `Fetch` if the API call fails. The cached entry for `key`, if
/// any, is left untouched so callers can keep showing it.
pub fn get_board_data<A: BoardApi + ?Sized>(
    api: &mut A,
    cache: &mut BoardCache,
    key: &BoardKey,
) -> Result<Snapshot> {
    let snapshot = match api.fetch_board(key) {
        Ok(snapshot) => Snapshot::new(snapshot.columns),
        Err(err) => {
            warn!(project = %key.project_key, error = %err, "board fetch failed");
            return Err(match err {
                BoardError::Fetch { .. } => err,
                other => BoardError::fetch(other),
            });
        }
    };

    debug!(
        project = %key.project_key,
        columns = snapshot.columns.len(),
        issues = snapshot.issue_count(),
        "board fetched"
    );
    cache.set(key, snapshot.clone());
    Ok(snapshot)
}

/// Column whose issue list holds `issue_id`.
#[must_use]
pub fn find_column_containing_issue<'a>(
    snapshot: &'a Snapshot,
    issue_id: &str,
) -> Option<&'a Column> {
    snapshot.find_column_containing_issue(issue_id)
}

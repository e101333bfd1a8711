use board_lib::{BoardFilters, Column, DragTarget, Issue, ResolvedMove, Snapshot};
use serde::Serialize;

/// Board as printed by `show --json`.
#[derive(Debug, Clone, Serialize)]
pub struct BoardView {
    pub project_key: String,
    #[serde(skip_serializing_if = "BoardFilters::is_empty")]
    pub filters: BoardFilters,
    pub issue_count: usize,
    pub columns: Vec<ColumnView>,
}

impl BoardView {
    #[must_use]
    pub fn new(project_key: &str, filters: &BoardFilters, snapshot: &Snapshot) -> Self {
        Self {
            project_key: project_key.to_string(),
            filters: filters.clone(),
            issue_count: snapshot.issue_count(),
            columns: snapshot.columns.iter().map(ColumnView::from).collect(),
        }
    }
}

/// Column with its issues and WIP state.
#[derive(Debug, Clone, Serialize)]
pub struct ColumnView {
    pub id: String,
    pub status_id: String,
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
    pub order: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub wip_limit: Option<usize>,
    pub over_wip_limit: bool,
    pub issues: Vec<Issue>,
}

impl From<&Column> for ColumnView {
    fn from(column: &Column) -> Self {
        Self {
            id: column.id.clone(),
            status_id: column.status_id.clone(),
            name: column.name.clone(),
            color: column.color.clone(),
            order: column.order,
            wip_limit: column.wip_limit,
            over_wip_limit: column.is_over_wip_limit(),
            issues: column.issues.clone(),
        }
    }
}

/// Result of `move` and of an applied `drag`.
#[derive(Debug, Clone, Serialize)]
pub struct MoveOutcome {
    pub issue: Issue,
    pub from_status: String,
    pub to_status: String,
    pub position: usize,
}

/// Result of a `drag` session.
#[derive(Debug, Clone, Serialize)]
pub struct DragOutcome {
    pub issue_id: String,
    pub target: DragTarget,
    /// `None` when the drop resolved to no move.
    pub resolved: Option<ResolvedMove>,
    pub applied: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub moved: Option<MoveOutcome>,
}

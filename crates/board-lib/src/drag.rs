//! Drag session state machine.
//!
//! Turns drag-start / drag-over / drag-end events from the host gesture
//! layer into at most one [`ResolvedMove`]. Hovering is purely visual; a move
//! is resolved only when the gesture ends over a valid target.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::model::Snapshot;
use crate::query::ResolvedMove;

/// Something an issue card can be dropped on.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "kind", content = "id", rename_all = "snake_case")]
pub enum DragTarget {
    /// Empty space of a column, by column ID. Appends to the column.
    Column(String),
    /// Another card, by issue ID. Inserts before it.
    Issue(String),
}

/// Inbound gesture events.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DragEvent {
    Start { issue_id: String },
    Over { target: DragTarget },
    /// Pointer released; `None` when not over any droppable area.
    End { target: Option<DragTarget> },
    Cancel,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum DragState {
    #[default]
    Idle,
    Dragging {
        active_issue_id: String,
        last_hover: Option<DragTarget>,
    },
}

/// One drag gesture at a time, from pointer-down to drop or cancel.
#[derive(Debug, Clone, Default)]
pub struct DragSession {
    state: DragState,
}

impl DragSession {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub const fn state(&self) -> &DragState {
        &self.state
    }

    #[must_use]
    pub const fn is_dragging(&self) -> bool {
        matches!(self.state, DragState::Dragging { .. })
    }

    #[must_use]
    pub fn active_issue_id(&self) -> Option<&str> {
        match &self.state {
            DragState::Dragging {
                active_issue_id, ..
            } => Some(active_issue_id.as_str()),
            DragState::Idle => None,
        }
    }

    #[must_use]
    pub fn hover_target(&self) -> Option<&DragTarget> {
        match &self.state {
            DragState::Dragging { last_hover, .. } => last_hover.as_ref(),
            DragState::Idle => None,
        }
    }

    /// Begin dragging `issue_id`. A gesture already in progress is replaced.
    pub fn start(&mut self, issue_id: impl Into<String>) {
        let issue_id = issue_id.into();
        debug!(issue = %issue_id, "drag start");
        self.state = DragState::Dragging {
            active_issue_id: issue_id,
            last_hover: None,
        };
    }

    /// Record the hovered target. Ignored while idle.
    pub fn hover(&mut self, target: DragTarget) -> bool {
        match &mut self.state {
            DragState::Dragging { last_hover, .. } => {
                *last_hover = Some(target);
                true
            }
            DragState::Idle => false,
        }
    }

    /// End the gesture and resolve the drop. The session is idle afterwards
    /// whatever the outcome.
    pub fn end(&mut self, target: Option<&DragTarget>, snapshot: &Snapshot) -> Option<ResolvedMove> {
        let DragState::Dragging {
            active_issue_id, ..
        } = std::mem::take(&mut self.state)
        else {
            return None;
        };

        let Some(target) = target else {
            debug!(issue = %active_issue_id, "dropped outside any target");
            return None;
        };

        resolve_drop(snapshot, &active_issue_id, target)
    }

    /// Abandon the gesture. Returns false if nothing was being dragged.
    pub fn cancel(&mut self) -> bool {
        let was_dragging = self.is_dragging();
        if was_dragging {
            debug!("drag cancelled");
        }
        self.state = DragState::Idle;
        was_dragging
    }

    /// Move the current hover target would produce if dropped now.
    #[must_use]
    pub fn preview(&self, snapshot: &Snapshot) -> Option<ResolvedMove> {
        match &self.state {
            DragState::Dragging {
                active_issue_id,
                last_hover: Some(target),
            } => resolve_drop(snapshot, active_issue_id, target),
            _ => None,
        }
    }

    /// Feed one gesture event. Returns a move only for a resolving `End`.
    pub fn handle(&mut self, event: DragEvent, snapshot: &Snapshot) -> Option<ResolvedMove> {
        match event {
            DragEvent::Start { issue_id } => {
                self.start(issue_id);
                None
            }
            DragEvent::Over { target } => {
                self.hover(target);
                None
            }
            DragEvent::End { target } => self.end(target.as_ref(), snapshot),
            DragEvent::Cancel => {
                self.cancel();
                None
            }
        }
    }
}

/// Resolve dropping `active_issue_id` on `target`.
///
/// Column targets append; issue targets insert at the hovered card's index.
/// Returns `None` for unknown targets, a missing source issue, or a drop
/// that would leave the issue where it already is.
#[must_use]
pub fn resolve_drop(
    snapshot: &Snapshot,
    active_issue_id: &str,
    target: &DragTarget,
) -> Option<ResolvedMove> {
    let (target_status_id, target_position) = match target {
        DragTarget::Column(column_id) => {
            let Some(column) = snapshot.column(column_id) else {
                debug!(column = %column_id, "drop on unknown column");
                return None;
            };
            (column.status_id.as_str(), column.len())
        }
        DragTarget::Issue(issue_id) => {
            let Some(column) = snapshot.find_column_containing_issue(issue_id) else {
                debug!(issue = %issue_id, "drop on unknown issue");
                return None;
            };
            let position = column.position_of(issue_id)?;
            (column.status_id.as_str(), position)
        }
    };

    let Some(source) = snapshot.find_column_containing_issue(active_issue_id) else {
        debug!(issue = %active_issue_id, "dragged issue no longer on board");
        return None;
    };
    let current_index = source.position_of(active_issue_id)?;

    if source.status_id == target_status_id && current_index == target_position {
        debug!(issue = %active_issue_id, "drop leaves issue in place");
        return None;
    }

    Some(ResolvedMove::new(
        active_issue_id,
        target_status_id,
        target_position,
    ))
}

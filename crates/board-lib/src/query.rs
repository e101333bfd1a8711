//! Query, filter and request types for board operations.

use serde::{Deserialize, Serialize};

use crate::model::{Issue, Priority};

/// Fields to update on an issue. Moves go through `move_issue`, not here.
#[derive(Debug, Clone, Default)]
pub struct IssueUpdate {
    pub title: Option<String>,
    pub priority: Option<Priority>,
    pub assignee_id: Option<Option<String>>,
    pub issue_type_id: Option<Option<String>>,
    pub sprint_id: Option<Option<String>>,
}

impl IssueUpdate {
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.title.is_none()
            && self.priority.is_none()
            && self.assignee_id.is_none()
            && self.issue_type_id.is_none()
            && self.sprint_id.is_none()
    }
}

/// Optional board filters. All set filters must match.
#[derive(Debug, Clone, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct BoardFilters {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub assignee_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub issue_type_id: Option<String>,
    /// Case-insensitive match against title or ID.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub search: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sprint_id: Option<String>,
}

impl BoardFilters {
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.assignee_id.is_none()
            && self.issue_type_id.is_none()
            && self.search_term().is_none()
            && self.sprint_id.is_none()
    }

    /// Trimmed, lowercased search text; blank search counts as none.
    #[must_use]
    pub fn search_term(&self) -> Option<String> {
        self.search
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::to_lowercase)
    }

    #[must_use]
    pub fn matches(&self, issue: &Issue) -> bool {
        if let Some(ref assignee) = self.assignee_id {
            if issue.assignee_id.as_deref() != Some(assignee.as_str()) {
                return false;
            }
        }
        if let Some(ref issue_type) = self.issue_type_id {
            if issue.issue_type_id.as_deref() != Some(issue_type.as_str()) {
                return false;
            }
        }
        if let Some(ref sprint) = self.sprint_id {
            if issue.sprint_id.as_deref() != Some(sprint.as_str()) {
                return false;
            }
        }
        if let Some(term) = self.search_term() {
            if !issue.title.to_lowercase().contains(&term)
                && !issue.id.to_lowercase().contains(&term)
            {
                return false;
            }
        }
        true
    }
}

/// Cache key: one snapshot per project and filter set.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct BoardKey {
    pub project_key: String,
    #[serde(default)]
    pub filters: BoardFilters,
}

impl BoardKey {
    #[must_use]
    pub fn new(project_key: impl Into<String>, filters: BoardFilters) -> Self {
        Self {
            project_key: project_key.into(),
            filters,
        }
    }

    /// Key for the unfiltered board of a project.
    #[must_use]
    pub fn project(project_key: impl Into<String>) -> Self {
        Self::new(project_key, BoardFilters::default())
    }
}

/// A drop resolved into a concrete move.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResolvedMove {
    pub issue_id: String,
    pub status_id: String,
    pub position: usize,
}

impl ResolvedMove {
    #[must_use]
    pub fn new(issue_id: impl Into<String>, status_id: impl Into<String>, position: usize) -> Self {
        Self {
            issue_id: issue_id.into(),
            status_id: status_id.into(),
            position,
        }
    }

    /// Body of the move-issue request for this move.
    #[must_use]
    pub fn request(&self) -> MoveRequest {
        MoveRequest {
            issue_id: self.issue_id.clone(),
            status_id: self.status_id.clone(),
            order: self.position,
        }
    }
}

/// Move-issue endpoint request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MoveRequest {
    pub issue_id: String,
    pub status_id: String,
    pub order: usize,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn issue() -> Issue {
        Issue {
            id: "web-a1".to_string(),
            title: "Fix Login redirect".to_string(),
            status_id: "todo".to_string(),
            assignee_id: Some("ana".to_string()),
            sprint_id: Some("s1".to_string()),
            ..Default::default()
        }
    }

    #[test]
    fn test_empty_filters_match_everything() {
        let filters = BoardFilters::default();
        assert!(filters.is_empty());
        assert!(filters.matches(&issue()));
    }

    #[test]
    fn test_blank_search_is_no_filter() {
        let filters = BoardFilters {
            search: Some("   ".to_string()),
            ..Default::default()
        };
        assert!(filters.is_empty());
        assert!(filters.matches(&issue()));
    }

    #[test]
    fn test_search_matches_title_and_id() {
        let by_title = BoardFilters {
            search: Some("login".to_string()),
            ..Default::default()
        };
        assert!(by_title.matches(&issue()));

        let by_id = BoardFilters {
            search: Some("WEB-A".to_string()),
            ..Default::default()
        };
        assert!(by_id.matches(&issue()));

        let miss = BoardFilters {
            search: Some("logout".to_string()),
            ..Default::default()
        };
        assert!(!miss.matches(&issue()));
    }

    #[test]
    fn test_filters_combine_with_and() {
        let filters = BoardFilters {
            assignee_id: Some("ana".to_string()),
            sprint_id: Some("s2".to_string()),
            ..Default::default()
        };
        assert!(!filters.matches(&issue()));

        let filters = BoardFilters {
            assignee_id: Some("ana".to_string()),
            sprint_id: Some("s1".to_string()),
            ..Default::default()
        };
        assert!(filters.matches(&issue()));
    }

    #[test]
    fn test_issue_type_filter_requires_type() {
        let filters = BoardFilters {
            issue_type_id: Some("bug".to_string()),
            ..Default::default()
        };
        assert!(!filters.matches(&issue()));
    }

    #[test]
    fn test_keys_differ_by_filters() {
        let plain = BoardKey::project("WEB");
        let filtered = BoardKey::new(
            "WEB",
            BoardFilters {
                sprint_id: Some("s1".to_string()),
                ..Default::default()
            },
        );
        assert_ne!(plain, filtered);
        assert_eq!(plain, BoardKey::project("WEB"));
    }
}

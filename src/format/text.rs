//! Text formatting functions for `kanban_board`.
//!
//! Provides plain text (non-ANSI) formatting for terminal output:
//! - Priority labels (P0-P4)
//! - Column headers with WIP usage
//! - Issue lines with age and assignee
//! - Whole-board rendering, truncated to the terminal width

use board_lib::{Column, Issue, Priority, Snapshot};
use chrono::{DateTime, Utc};
use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

/// Marker appended to a header when the column exceeds its WIP limit.
pub const OVER_LIMIT: &str = "⚠";

/// Format priority as "P0", "P1", etc.
#[must_use]
pub fn format_priority(priority: &Priority) -> String {
    format!("P{}", priority.0)
}

/// Compact age of a timestamp: `now`, `12m`, `5h`, `3d`.
#[must_use]
pub fn format_age(then: DateTime<Utc>, now: DateTime<Utc>) -> String {
    let elapsed = now.signed_duration_since(then);
    if elapsed.num_minutes() < 1 {
        "now".to_string()
    } else if elapsed.num_hours() < 1 {
        format!("{}m", elapsed.num_minutes())
    } else if elapsed.num_days() < 1 {
        format!("{}h", elapsed.num_hours())
    } else {
        format!("{}d", elapsed.num_days())
    }
}

/// Column header: `Name (count)` or `Name (count/limit)`.
#[must_use]
pub fn format_column_header(column: &Column) -> String {
    match column.wip_usage() {
        Some((count, limit)) if column.is_over_wip_limit() => {
            format!("{} ({count}/{limit}) {OVER_LIMIT}", column.name)
        }
        Some((count, limit)) => format!("{} ({count}/{limit})", column.name),
        None => format!("{} ({})", column.name, column.len()),
    }
}

/// Format a single-line issue summary.
///
/// Format: `{id} [{priority}] {title} @{assignee} ({age})`
#[must_use]
pub fn format_issue_line(issue: &Issue, now: DateTime<Utc>) -> String {
    let mut line = format!(
        "{} [{}] {}",
        issue.id,
        format_priority(&issue.priority),
        issue.title
    );
    if let Some(assignee) = &issue.assignee_id {
        line.push_str(&format!(" @{assignee}"));
    }
    line.push_str(&format!(" ({})", format_age(issue.updated_at, now)));
    line
}

/// Cut `text` to at most `width` display columns, ending in `…` when cut.
#[must_use]
pub fn truncate_to_width(text: &str, width: usize) -> String {
    if text.width() <= width {
        return text.to_string();
    }
    if width == 0 {
        return String::new();
    }

    let mut out = String::new();
    let mut used = 0;
    for ch in text.chars() {
        let w = ch.width().unwrap_or(0);
        if used + w > width - 1 {
            break;
        }
        out.push(ch);
        used += w;
    }
    out.push('…');
    out
}

/// Render the board one column after another.
#[must_use]
pub fn render_board(snapshot: &Snapshot, width: usize, now: DateTime<Utc>) -> String {
    let mut out = String::new();
    for (index, column) in snapshot.columns.iter().enumerate() {
        if index > 0 {
            out.push('\n');
        }
        let header = format_column_header(column);
        let rule = "─".repeat(header.width().min(width));
        out.push_str(&truncate_to_width(&header, width));
        out.push('\n');
        out.push_str(&rule);
        out.push('\n');

        if column.is_empty() {
            out.push_str("  (empty)\n");
            continue;
        }
        for issue in &column.issues {
            let line = format!("  {}. {}", issue.order, format_issue_line(issue, now));
            out.push_str(&truncate_to_width(&line, width));
            out.push('\n');
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn make_test_issue(now: DateTime<Utc>) -> Issue {
        Issue {
            id: "web-a1".to_string(),
            title: "Test title".to_string(),
            status_id: "todo".to_string(),
            priority: Priority::MEDIUM,
            created_at: now,
            updated_at: now,
            ..Default::default()
        }
    }

    #[test]
    fn test_format_priority() {
        assert_eq!(format_priority(&Priority::CRITICAL), "P0");
        assert_eq!(format_priority(&Priority::MEDIUM), "P2");
        assert_eq!(format_priority(&Priority::BACKLOG), "P4");
    }

    #[test]
    fn test_format_age() {
        let now = Utc::now();
        assert_eq!(format_age(now, now), "now");
        assert_eq!(format_age(now - Duration::minutes(12), now), "12m");
        assert_eq!(format_age(now - Duration::hours(5), now), "5h");
        assert_eq!(format_age(now - Duration::days(3), now), "3d");
    }

    #[test]
    fn test_format_issue_line() {
        let now = Utc::now();
        let issue = make_test_issue(now);
        assert_eq!(format_issue_line(&issue, now), "web-a1 [P2] Test title (now)");
    }

    #[test]
    fn test_format_issue_line_with_assignee() {
        let now = Utc::now();
        let mut issue = make_test_issue(now);
        issue.assignee_id = Some("ana".to_string());
        assert!(format_issue_line(&issue, now).contains(" @ana "));
    }

    #[test]
    fn test_column_header_wip() {
        let mut column = Column::new("col-doing", "doing", "Doing");
        assert_eq!(format_column_header(&column), "Doing (0)");

        column.wip_limit = Some(1);
        column.issues.push(make_test_issue(Utc::now()));
        assert_eq!(format_column_header(&column), "Doing (1/1)");

        column.issues.push(make_test_issue(Utc::now()));
        assert!(format_column_header(&column).ends_with(OVER_LIMIT));
    }

    #[test]
    fn test_truncate_to_width() {
        assert_eq!(truncate_to_width("short", 10), "short");
        assert_eq!(truncate_to_width("abcdefgh", 5), "abcd…");
        assert_eq!(truncate_to_width("日本語テキスト", 5), "日本…");
        assert_eq!(truncate_to_width("abc", 0), "");
    }

    #[test]
    fn test_render_board() {
        let now = Utc::now();
        let mut todo = Column::new("col-todo", "todo", "Todo");
        todo.issues.push(make_test_issue(now));
        let mut done = Column::new("col-done", "done", "Done");
        done.order = 1;
        let rendered = render_board(&Snapshot::new(vec![todo, done]), 80, now);

        assert!(rendered.starts_with("Todo (1)\n"));
        assert!(rendered.contains("  0. web-a1 [P2] Test title (now)\n"));
        assert!(rendered.contains("Done (0)\n"));
        assert!(rendered.ends_with("  (empty)\n"));
    }

    #[test]
    fn test_render_board_follows_column_order() {
        let now = Utc::now();
        let mut review = Column::new("col-a-review", "review", "Review");
        review.order = 5;
        let backlog = Column::new("col-z-backlog", "backlog", "Backlog");
        let rendered = render_board(&Snapshot::new(vec![review, backlog]), 80, now);

        let backlog_at = rendered.find("Backlog (0)").unwrap();
        let review_at = rendered.find("Review (0)").unwrap();
        assert!(backlog_at < review_at);
    }
}

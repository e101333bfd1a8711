//! JSONL file I/O for boards.
//!
//! Each line is one tagged record: a column (without its issues) or an
//! issue. Issues are placed into columns by their `status_id` on load.

use std::fs;
use std::io::{BufRead, BufReader, Write};
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{BoardError, Result};
use crate::model::{Column, Issue};

/// One line of a board file.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Record {
    Column(Column),
    Issue(Issue),
}

/// Loaded board data, not yet grouped.
pub struct LoadedData {
    pub columns: Vec<Column>,
    pub issues: Vec<Issue>,
}

/// Load columns and issues from a JSONL file.
///
/// Issues embedded in a column record are lifted out into `issues`.
///
/// # Errors
///
/// Returns `FileNotFound` if the file is missing, `Io` if it cannot be read,
/// or `JsonlParse` if any line is invalid.
pub fn load(path: &Path) -> Result<LoadedData> {
    let file = fs::File::open(path).map_err(|e| {
        if e.kind() == std::io::ErrorKind::NotFound {
            BoardError::FileNotFound(path.to_path_buf())
        } else {
            BoardError::Io(e)
        }
    })?;
    let reader = BufReader::new(file);

    let mut columns = Vec::new();
    let mut issues = Vec::new();

    for (line_num, line) in reader.lines().enumerate() {
        let line = line?;
        let trimmed = line.trim();
        if trimmed.is_empty() {
            continue;
        }

        let record: Record =
            serde_json::from_str(trimmed).map_err(|e| BoardError::JsonlParse {
                line: line_num + 1,
                reason: e.to_string(),
            })?;

        match record {
            Record::Column(mut column) => {
                issues.append(&mut column.issues);
                columns.push(column);
            }
            Record::Issue(issue) => issues.push(issue),
        }
    }

    Ok(LoadedData { columns, issues })
}

/// Save columns and issues to a JSONL file with atomic write.
///
/// Columns are written first, then issues. Uses write-to-temp + rename.
///
/// # Errors
///
/// Returns `Io` if the file cannot be written.
pub fn save(path: &Path, columns: &[Column], issues: &[Issue]) -> Result<()> {
    let tmp_path = path.with_extension("jsonl.tmp");
    let mut file = fs::File::create(&tmp_path)?;

    for column in columns {
        let mut bare = column.clone();
        bare.issues.clear();
        let json = serde_json::to_string(&Record::Column(bare))?;
        writeln!(file, "{json}")?;
    }
    for issue in issues {
        let json = serde_json::to_string(&Record::Issue(issue.clone()))?;
        writeln!(file, "{json}")?;
    }

    file.flush()?;
    drop(file);

    fs::rename(&tmp_path, path)?;

    Ok(())
}

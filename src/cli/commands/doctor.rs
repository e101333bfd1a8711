//! Doctor command implementation.

use board_lib::{BoardFilters, BoardStore, Result, ValidationError};
use serde::Serialize;

use crate::cli::{CommandContext, DoctorArgs, print_json};
use crate::config::Config;
use crate::validation::{BoardValidator, IssueValidator};

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "lowercase")]
enum CheckStatus {
    Ok,
    Warn,
    Error,
}

#[derive(Debug, Clone, Serialize)]
struct CheckResult {
    name: String,
    status: CheckStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    message: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    details: Option<serde_json::Value>,
}

#[derive(Debug, Clone, Serialize)]
struct DoctorReport {
    ok: bool,
    checks: Vec<CheckResult>,
}

fn push_check(
    checks: &mut Vec<CheckResult>,
    name: &str,
    status: CheckStatus,
    message: Option<String>,
    details: Option<serde_json::Value>,
) {
    checks.push(CheckResult {
        name: name.to_string(),
        status,
        message,
        details,
    });
}

fn has_error(checks: &[CheckResult]) -> bool {
    checks
        .iter()
        .any(|check| matches!(check.status, CheckStatus::Error))
}

fn print_report(report: &DoctorReport, json: bool) -> Result<()> {
    if json {
        return print_json(report);
    }

    println!("kb doctor");
    for check in &report.checks {
        let label = match check.status {
            CheckStatus::Ok => "OK",
            CheckStatus::Warn => "WARN",
            CheckStatus::Error => "ERROR",
        };
        if let Some(message) = &check.message {
            println!("{label} {}: {}", check.name, message);
        } else {
            println!("{label} {}", check.name);
        }
    }
    Ok(())
}

fn messages(errors: &[ValidationError]) -> Vec<String> {
    errors.iter().map(ToString::to_string).collect()
}

fn check_layout(store: &mut BoardStore, fix: bool, checks: &mut Vec<CheckResult>) -> Result<()> {
    let errors = match BoardValidator::validate(&store.snapshot(&BoardFilters::default())) {
        Ok(()) => {
            push_check(checks, "board.layout", CheckStatus::Ok, None, None);
            return Ok(());
        }
        Err(errors) => errors,
    };

    if !fix {
        push_check(
            checks,
            "board.layout",
            CheckStatus::Error,
            Some(format!("{} problem(s); run `kb doctor --fix`", errors.len())),
            Some(serde_json::json!({ "errors": messages(&errors) })),
        );
        return Ok(());
    }

    let renumbered = store.normalize_orders();
    store.save()?;
    match BoardValidator::validate(&store.snapshot(&BoardFilters::default())) {
        Ok(()) => push_check(
            checks,
            "board.layout",
            CheckStatus::Ok,
            Some(format!("Fixed: renumbered {renumbered} issue(s)")),
            None,
        ),
        Err(remaining) => push_check(
            checks,
            "board.layout",
            CheckStatus::Error,
            Some(format!("{} problem(s) remain after fix", remaining.len())),
            Some(serde_json::json!({ "errors": messages(&remaining) })),
        ),
    }
    Ok(())
}

fn check_issue_fields(store: &BoardStore, checks: &mut Vec<CheckResult>) {
    let mut invalid = serde_json::Map::new();
    let issues = store
        .list_issues(&BoardFilters::default())
        .into_iter()
        .chain(store.orphaned_issues().into_iter().cloned());
    for issue in issues {
        if let Err(errors) = IssueValidator::validate(&issue) {
            invalid.insert(issue.id.clone(), serde_json::json!(messages(&errors)));
        }
    }

    if invalid.is_empty() {
        push_check(checks, "issues.fields", CheckStatus::Ok, None, None);
    } else {
        push_check(
            checks,
            "issues.fields",
            CheckStatus::Error,
            Some(format!("{} issue(s) with invalid fields", invalid.len())),
            Some(serde_json::Value::Object(invalid)),
        );
    }
}

fn check_orphans(store: &BoardStore, checks: &mut Vec<CheckResult>) {
    let orphans: Vec<String> = store
        .orphaned_issues()
        .iter()
        .map(|issue| format!("{} ({})", issue.id, issue.status_id))
        .collect();
    if orphans.is_empty() {
        push_check(checks, "issues.orphaned", CheckStatus::Ok, None, None);
    } else {
        push_check(
            checks,
            "issues.orphaned",
            CheckStatus::Warn,
            Some(format!("{} issue(s) have a status with no column", orphans.len())),
            Some(serde_json::json!({ "issues": orphans })),
        );
    }
}

fn check_wip(store: &BoardStore, checks: &mut Vec<CheckResult>) {
    let snapshot = store.snapshot(&BoardFilters::default());
    let over: Vec<String> = snapshot
        .columns
        .iter()
        .filter(|column| column.is_over_wip_limit())
        .filter_map(|column| {
            column
                .wip_usage()
                .map(|(count, limit)| format!("{} {count}/{limit}", column.name))
        })
        .collect();
    if over.is_empty() {
        push_check(checks, "columns.wip", CheckStatus::Ok, None, None);
    } else {
        push_check(
            checks,
            "columns.wip",
            CheckStatus::Warn,
            Some(format!("Over WIP limit: {}", over.join(", "))),
            None,
        );
    }
}

fn run_checks(config: &Config, fix: bool) -> Result<Vec<CheckResult>> {
    let mut checks = Vec::new();

    if !config.board_path.exists() {
        push_check(
            &mut checks,
            "board.file",
            CheckStatus::Error,
            Some(format!(
                "Missing {} (run `kb init`)",
                config.board_path.display()
            )),
            None,
        );
        return Ok(checks);
    }

    let mut store = match BoardStore::open(&config.board_path) {
        Ok(store) => store,
        Err(err) => {
            push_check(
                &mut checks,
                "board.parse",
                CheckStatus::Error,
                Some(format!("Failed to read board: {err}")),
                Some(serde_json::json!({ "path": config.board_path.display().to_string() })),
            );
            return Ok(checks);
        }
    };
    push_check(
        &mut checks,
        "board.parse",
        CheckStatus::Ok,
        Some(format!(
            "{} column(s), {} issue(s)",
            store.columns().len(),
            store.len()
        )),
        None,
    );

    if store.columns().is_empty() {
        push_check(
            &mut checks,
            "board.columns",
            CheckStatus::Warn,
            Some("Board has no columns".to_string()),
            None,
        );
    }

    check_layout(&mut store, fix, &mut checks)?;
    check_issue_fields(&store, &mut checks);
    check_orphans(&store, &mut checks);
    check_wip(&store, &mut checks);

    Ok(checks)
}

/// Execute the doctor command.
///
/// # Errors
///
/// Returns an error if report serialization fails or if IO operations fail.
pub fn execute(args: &DoctorArgs, ctx: &CommandContext) -> Result<()> {
    let checks = run_checks(&ctx.config, args.fix)?;
    let report = DoctorReport {
        ok: !has_error(&checks),
        checks,
    };
    print_report(&report, ctx.json)?;

    if !report.ok {
        std::process::exit(1);
    }

    Ok(())
}

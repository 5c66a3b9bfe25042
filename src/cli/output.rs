use chrono::NaiveDate;
use serde::Serialize;

use crate::model::day::DayKey;
use crate::model::task::{TaskLine, TaskStatus};
use crate::ops::archive::DatedTask;
use crate::ops::migrate::MigrationReport;
use crate::ops::task_ops::ToggleOutcome;

// ---------------------------------------------------------------------------
// JSON output structs
// ---------------------------------------------------------------------------

#[derive(Serialize)]
pub struct TaskJson {
    pub id: usize,
    pub status: TaskStatus,
    pub indent_level: usize,
    pub text: String,
    pub clean_text: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub from: Option<NaiveDate>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub moved_to: Option<NaiveDate>,
}

#[derive(Serialize)]
pub struct DayListJson {
    pub day: DayKey,
    pub path: String,
    pub tasks: Vec<TaskJson>,
}

/// A task with the day it belongs to, for cross-day listings
#[derive(Serialize)]
pub struct DatedTaskJson {
    pub day: DayKey,
    #[serde(flatten)]
    pub task: TaskJson,
}

#[derive(Serialize)]
pub struct ToggleJson {
    pub id: usize,
    pub changed: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<TaskStatus>,
}

#[derive(Serialize)]
pub struct AddJson {
    pub id: usize,
    pub path: String,
}

// ---------------------------------------------------------------------------
// Conversions
// ---------------------------------------------------------------------------

pub fn task_to_json(task: &TaskLine) -> TaskJson {
    TaskJson {
        id: task.line_number,
        status: task.status,
        indent_level: task.indent_level(),
        text: task.text.clone(),
        clean_text: task.clean_text(),
        from: task.from_date(),
        moved_to: task.moved_to_date(),
    }
}

pub fn dated_to_json(task: &DatedTask) -> DatedTaskJson {
    DatedTaskJson {
        day: task.day,
        task: task_to_json(&task.task),
    }
}

pub fn toggle_to_json(id: usize, outcome: ToggleOutcome) -> ToggleJson {
    match outcome {
        ToggleOutcome::Toggled(status) => ToggleJson {
            id,
            changed: true,
            status: Some(status),
        },
        ToggleOutcome::Unchanged => ToggleJson {
            id,
            changed: false,
            status: None,
        },
    }
}

// ---------------------------------------------------------------------------
// Text formatting
// ---------------------------------------------------------------------------

/// `  4  [ ] text`, indented by nesting level
pub fn format_task(task: &TaskLine) -> String {
    format!(
        "{:>3}  {}[{}] {}",
        task.line_number,
        "  ".repeat(task.indent_level()),
        task.status.checkbox_char(),
        task.text
    )
}

pub fn format_dated(task: &DatedTask) -> String {
    format!("{}  {}", task.day, format_task(&task.task))
}

/// Summary line; a dry run also lists each task with its origin day
pub fn format_migration(report: &MigrationReport) -> String {
    let verb = if report.dry_run { "would move" } else { "moved" };
    let mut out = match report.migrated {
        0 => format!("nothing to migrate into {}", report.today),
        1 => format!(
            "{} 1 task from {} file(s) into {}",
            verb,
            report.files.len(),
            report.today
        ),
        n => format!(
            "{} {} tasks from {} file(s) into {}",
            verb,
            n,
            report.files.len(),
            report.today
        ),
    };
    if report.dry_run {
        for task in &report.tasks {
            out.push_str(&format!("\n{}  {}", task.origin, task.line));
        }
    }
    out
}

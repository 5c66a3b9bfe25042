use crate::io::daily_io::{self, DailyError};
use crate::io::journal::Journal;
use crate::io::lock::LockError;
use crate::model::day::DayKey;
use crate::model::task::{INDENT_UNIT, TaskStatus};
use crate::model::todo::TodoFile;
use crate::parse::todo_parser::{self, is_blank, leading_whitespace, parse_task_line};

/// Error type for task operations
#[derive(Debug, thiserror::Error)]
pub enum TaskError {
    #[error("parent task not found on line {0}")]
    ParentNotFound(usize),
    #[error("task text is empty")]
    EmptyText,
    #[error(transparent)]
    Daily(#[from] DailyError),
    #[error(transparent)]
    Lock(#[from] LockError),
}

/// Result of a toggle request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToggleOutcome {
    /// The line now has this status
    Toggled(TaskStatus),
    /// Stale id, non-task line or moved task; the file is untouched
    Unchanged,
}

// ---------------------------------------------------------------------------
// In-memory edits
// ---------------------------------------------------------------------------

/// Flip `open ⇄ done` on one line.
pub fn toggle_line(file: &mut TodoFile, line_number: usize) -> ToggleOutcome {
    let Some(task) = file.task_at(line_number) else {
        return ToggleOutcome::Unchanged;
    };
    let next = match task.status {
        TaskStatus::Open => TaskStatus::Done,
        TaskStatus::Done => TaskStatus::Open,
        TaskStatus::Moved => return ToggleOutcome::Unchanged,
    };
    let idx = line_number - 1;
    match todo_parser::with_status(&file.lines[idx], next) {
        Some(line) => {
            file.lines[idx] = line;
            ToggleOutcome::Toggled(next)
        }
        None => ToggleOutcome::Unchanged,
    }
}

/// Where a new task goes and how far it is indented.
///
/// Returns a 0-based insertion index and the raw indent prefix.
pub fn insertion_point(
    file: &TodoFile,
    parent: Option<usize>,
    todo_header: &str,
) -> Result<(usize, String), TaskError> {
    let Some(parent_line) = parent else {
        let idx = file
            .find_header(todo_header)
            .map_or(file.len(), |h| h + 1);
        return Ok((idx, String::new()));
    };

    // a moved task lives on in a later day; nothing new nests under it here
    let parent_task = file
        .task_at(parent_line)
        .filter(|t| t.status != TaskStatus::Moved)
        .ok_or(TaskError::ParentNotFound(parent_line))?;
    let parent_idx = parent_line - 1;
    let indent = format!(
        "{}{}",
        leading_whitespace(&file.lines[parent_idx]),
        " ".repeat(INDENT_UNIT)
    );

    // Last line belonging to the parent's subtree. Blank lines are stepped
    // over but never extend the subtree on their own.
    let mut last = parent_idx;
    for (idx, line) in file.lines.iter().enumerate().skip(parent_idx + 1) {
        match parse_task_line(line, idx + 1) {
            Some(task) if task.indent > parent_task.indent => last = idx,
            Some(_) => break,
            None if is_blank(line) => continue,
            // headers and prose end the subtree
            None => break,
        }
    }
    Ok((last + 1, indent))
}

/// Splice a new open task into the file. Returns its 1-based line number.
pub fn insert_line(
    file: &mut TodoFile,
    text: &str,
    parent: Option<usize>,
    todo_header: &str,
) -> Result<usize, TaskError> {
    let text = single_line(text);
    if text.is_empty() {
        return Err(TaskError::EmptyText);
    }
    let (idx, indent) = insertion_point(file, parent, todo_header)?;
    file.insert_line(
        idx,
        format!("{}- [{}] {}", indent, TaskStatus::Open.checkbox_char(), text),
    );
    Ok(idx + 1)
}

fn single_line(text: &str) -> String {
    text.lines()
        .map(str::trim)
        .filter(|l| !l.is_empty())
        .collect::<Vec<_>>()
        .join(" ")
}

// ---------------------------------------------------------------------------
// File-level operations
// ---------------------------------------------------------------------------

/// Toggle a task in a day's file. Only writes when something changed.
pub fn toggle_task(
    journal: &Journal,
    day: DayKey,
    line_number: usize,
) -> Result<ToggleOutcome, TaskError> {
    let _lock = journal.lock()?;
    let path = journal.todo_path(day);
    let mut file = daily_io::read_todo(&path)?;
    let outcome = toggle_line(&mut file, line_number);
    match outcome {
        ToggleOutcome::Toggled(status) => {
            daily_io::write_todo(journal.root(), &path, &file)?;
            tracing::info!(day = %day, line = line_number, %status, "toggled task");
        }
        ToggleOutcome::Unchanged => {
            tracing::debug!(day = %day, line = line_number, "toggle ignored");
        }
    }
    Ok(outcome)
}

/// Add a task to a day's file, creating the file with its header if needed.
/// Returns the new task's line number.
pub fn add_task(
    journal: &Journal,
    day: DayKey,
    text: &str,
    parent: Option<usize>,
) -> Result<usize, TaskError> {
    let _lock = journal.lock()?;
    let path = journal.todo_path(day);
    let mut file = if path.exists() {
        daily_io::read_todo(&path)?
    } else {
        TodoFile::with_header(&journal.sections.todo_header)
    };
    let line_number = insert_line(&mut file, text, parent, &journal.sections.todo_header)?;
    daily_io::write_todo(journal.root(), &path, &file)?;
    tracing::info!(day = %day, line = line_number, "added task");
    Ok(line_number)
}

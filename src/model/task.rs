use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::parse::annotation;

/// Spaces per nesting level
pub const INDENT_UNIT: usize = 2;

/// Task checkbox state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TaskStatus {
    Open,
    Done,
    Moved,
}

impl TaskStatus {
    /// The character used inside the checkbox `[ ]`
    pub fn checkbox_char(self) -> char {
        match self {
            TaskStatus::Open => ' ',
            TaskStatus::Done => 'x',
            TaskStatus::Moved => '>',
        }
    }

    /// Parse a checkbox character into a status
    pub fn from_checkbox_char(c: char) -> Option<TaskStatus> {
        match c {
            ' ' => Some(TaskStatus::Open),
            'x' => Some(TaskStatus::Done),
            '>' => Some(TaskStatus::Moved),
            _ => None,
        }
    }

    /// Parse a user-supplied status name (`open`, `done`, `moved`)
    pub fn parse_name(s: &str) -> Option<TaskStatus> {
        match s.to_ascii_lowercase().as_str() {
            "open" | "todo" | "incomplete" => Some(TaskStatus::Open),
            "done" | "completed" | "x" => Some(TaskStatus::Done),
            "moved" => Some(TaskStatus::Moved),
            _ => None,
        }
    }
}

impl std::fmt::Display for TaskStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TaskStatus::Open => write!(f, "open"),
            TaskStatus::Done => write!(f, "done"),
            TaskStatus::Moved => write!(f, "moved"),
        }
    }
}

/// A checkbox line recognized in a daily todo file
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskLine {
    /// 1-based line number; only valid for the file version it was parsed from
    pub line_number: usize,
    /// Raw leading whitespace width
    pub indent: usize,
    pub status: TaskStatus,
    /// Everything after the checkbox, annotations included
    pub text: String,
}

impl TaskLine {
    /// Display depth: one level per two spaces of indent
    pub fn indent_level(&self) -> usize {
        self.indent / INDENT_UNIT
    }

    pub fn is_top_level(&self) -> bool {
        self.indent == 0
    }

    /// Date from a `(From [YYYY-MM-DD](...))` annotation
    pub fn from_date(&self) -> Option<NaiveDate> {
        annotation::from_date(&self.text)
    }

    /// Date from a `(Moved to [YYYY-MM-DD](...))` annotation
    pub fn moved_to_date(&self) -> Option<NaiveDate> {
        annotation::moved_to_date(&self.text)
    }

    /// Text with back-link annotations removed
    pub fn clean_text(&self) -> String {
        annotation::strip_annotations(&self.text)
    }
}

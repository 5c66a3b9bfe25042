use std::sync::LazyLock;

use regex::Regex;

use crate::model::task::{TaskLine, TaskStatus};
use crate::model::todo::TodoFile;

/// `- [ ] text`, `  - [x] text`, `- [>] text`; any leading whitespace
static TASK_LINE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(\s*)-\s*\[([ x>])\]\s*(.*)$").unwrap());

/// Parse a whole file into its positional line model.
pub fn parse_todo(source: &str) -> TodoFile {
    let mut lines = Vec::new();
    let mut crlf = Vec::new();
    for piece in source.split_inclusive('\n') {
        let (line, is_crlf) = match piece.strip_suffix('\n') {
            Some(body) => match body.strip_suffix('\r') {
                Some(body) => (body, true),
                None => (body, false),
            },
            None => (piece, false),
        };
        lines.push(line.to_string());
        crlf.push(is_crlf);
    }
    let mut file = TodoFile {
        lines,
        crlf,
        trailing_newline: source.ends_with('\n'),
    };
    // an unterminated last line gets the ending it would be written with
    if !file.trailing_newline && !file.crlf.is_empty() {
        let last = file.crlf.len() - 1;
        file.crlf.truncate(last);
        let majority = file.prefers_crlf();
        file.crlf.push(majority);
    }
    file
}

/// Parse a single line. Returns `None` for anything that is not a checkbox
/// line; `line_number` is 1-based.
pub fn parse_task_line(line: &str, line_number: usize) -> Option<TaskLine> {
    let caps = TASK_LINE.captures(line)?;
    let indent = caps.get(1).map_or(0, |m| m.as_str().chars().count());
    let status = caps
        .get(2)
        .and_then(|m| m.as_str().chars().next())
        .and_then(TaskStatus::from_checkbox_char)?;
    let text = caps.get(3).map_or("", |m| m.as_str()).to_string();
    Some(TaskLine {
        line_number,
        indent,
        status,
        text,
    })
}

/// Collect every task in file order.
pub fn parse_tasks(lines: &[String]) -> Vec<TaskLine> {
    lines
        .iter()
        .enumerate()
        .filter_map(|(idx, line)| parse_task_line(line, idx + 1))
        .collect()
}

/// Rewrite the checkbox character of a task line, leaving every other byte
/// as it was. Returns `None` if `line` is not a task line.
pub fn with_status(line: &str, status: TaskStatus) -> Option<String> {
    let caps = TASK_LINE.captures(line)?;
    let mark = caps.get(2)?;
    let mut out = String::with_capacity(line.len());
    out.push_str(&line[..mark.start()]);
    out.push(status.checkbox_char());
    out.push_str(&line[mark.end()..]);
    Some(out)
}

/// The raw leading whitespace of a line
pub fn leading_whitespace(line: &str) -> &str {
    &line[..line.len() - line.trim_start().len()]
}

pub fn is_blank(line: &str) -> bool {
    line.trim().is_empty()
}

use crate::model::task::TaskLine;
use crate::parse::todo_parser;

/// A daily todo file as an ordered list of raw lines.
///
/// Task lines and free markdown share one positional model, so line numbers
/// double as task identifiers and untouched lines serialize unchanged.
///
/// Each line keeps its own terminator, so files with mixed endings survive
/// edits; add lines through [`TodoFile::insert_line`] or
/// [`TodoFile::push_line`] to keep `crlf` aligned with `lines`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TodoFile {
    pub lines: Vec<String>,
    /// Per line: whether it ended with `\r\n` rather than `\n`
    pub crlf: Vec<bool>,
    /// Whether the source ended with a line break
    pub trailing_newline: bool,
}

impl Default for TodoFile {
    fn default() -> Self {
        TodoFile {
            lines: Vec::new(),
            crlf: Vec::new(),
            trailing_newline: true,
        }
    }
}

impl TodoFile {
    /// A fresh file holding only a header line
    pub fn with_header(header: &str) -> Self {
        let mut file = TodoFile::default();
        file.push_line(header);
        file
    }

    /// Whether most lines end in `\r\n`; new lines follow the majority
    pub fn prefers_crlf(&self) -> bool {
        self.crlf.iter().filter(|&&c| c).count() * 2 > self.crlf.len()
    }

    /// Terminator of the 0-based line `idx`
    pub fn line_ending(&self, idx: usize) -> &'static str {
        let crlf = self
            .crlf
            .get(idx)
            .copied()
            .unwrap_or_else(|| self.prefers_crlf());
        if crlf { "\r\n" } else { "\n" }
    }

    /// Insert a line before the 0-based index `idx`
    pub fn insert_line(&mut self, idx: usize, line: impl Into<String>) {
        let crlf = self.prefers_crlf();
        self.lines.insert(idx, line.into());
        self.crlf.insert(idx.min(self.crlf.len()), crlf);
    }

    pub fn push_line(&mut self, line: impl Into<String>) {
        let idx = self.lines.len();
        self.insert_line(idx, line);
    }

    pub fn len(&self) -> usize {
        self.lines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// All task lines, in file order
    pub fn tasks(&self) -> Vec<TaskLine> {
        todo_parser::parse_tasks(&self.lines)
    }

    /// The task on a 1-based line, if that line exists and is a checkbox
    pub fn task_at(&self, line_number: usize) -> Option<TaskLine> {
        let idx = line_number.checked_sub(1)?;
        let line = self.lines.get(idx)?;
        todo_parser::parse_task_line(line, line_number)
    }

    /// 0-based index of the first line equal to `header` (surrounding
    /// whitespace ignored)
    pub fn find_header(&self, header: &str) -> Option<usize> {
        let header = header.trim();
        self.lines.iter().position(|l| l.trim() == header)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::task::TaskStatus;
    use crate::parse::parse_todo;

    #[test]
    fn test_task_at() {
        let file = parse_todo("# To Do\n- [ ] one\nprose\n  - [x] two\n");
        assert!(file.task_at(0).is_none());
        assert!(file.task_at(1).is_none());
        assert_eq!(file.task_at(2).unwrap().text, "one");
        assert!(file.task_at(3).is_none());
        assert_eq!(file.task_at(4).unwrap().status, TaskStatus::Done);
        assert!(file.task_at(5).is_none());
    }

    #[test]
    fn test_find_header() {
        let file = parse_todo("intro\n# To Do  \n- [ ] a\n");
        assert_eq!(file.find_header("# To Do"), Some(1));
        assert_eq!(file.find_header("## Previous Tasks"), None);
    }

    #[test]
    fn test_new_lines_follow_majority_ending() {
        let mut file = parse_todo("# To Do\r\n- [ ] a\r\n- [ ] b\n");
        assert!(file.prefers_crlf());
        file.insert_line(1, "- [ ] new");
        assert_eq!(file.crlf, vec![true, true, true, false]);
        assert_eq!(file.line_ending(3), "\n");

        let mut file = parse_todo("a\r\nb\n");
        assert!(!file.prefers_crlf());
        file.push_line("c");
        assert_eq!(file.line_ending(2), "\n");
    }

    #[test]
    fn test_with_header() {
        let file = TodoFile::with_header("# To Do");
        assert_eq!(file.len(), 1);
        assert!(file.tasks().is_empty());
        assert!(file.trailing_newline);
    }
}

use std::path::PathBuf;

use serde::Serialize;

use crate::io::daily_io::{self, DailyError};
use crate::io::journal::Journal;
use crate::model::day::DayKey;
use crate::model::task::{TaskLine, TaskStatus};

/// A task together with the day file it lives in
#[derive(Debug, Clone, Serialize)]
pub struct DatedTask {
    pub day: DayKey,
    pub path: PathBuf,
    pub task: TaskLine,
}

/// Tasks of one day, optionally filtered by status.
///
/// A missing file yields no tasks.
pub fn day_tasks(
    journal: &Journal,
    day: DayKey,
    status: Option<TaskStatus>,
) -> Result<Vec<TaskLine>, DailyError> {
    let file = daily_io::read_todo(&journal.todo_path(day))?;
    Ok(file
        .tasks()
        .into_iter()
        .filter(|t| status.is_none_or(|s| t.status == s))
        .collect())
}

/// Every task in every dated todo file, oldest day first.
///
/// Files under directories that are not a date are ignored.
pub fn scan_archive(journal: &Journal) -> Result<Vec<DatedTask>, DailyError> {
    let mut out = Vec::new();
    for entry in journal.resolver.list_todo_files() {
        let Some(day) = entry.day else {
            continue;
        };
        let file = daily_io::read_todo(&entry.path)?;
        out.extend(file.tasks().into_iter().map(|task| DatedTask {
            day,
            path: entry.path.clone(),
            task,
        }));
    }
    Ok(out)
}

/// Filter for [`query_tasks`]. Both date bounds are inclusive.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskQuery {
    pub status: Option<TaskStatus>,
    pub from: Option<DayKey>,
    pub to: Option<DayKey>,
    pub limit: usize,
    pub offset: usize,
}

impl Default for TaskQuery {
    fn default() -> Self {
        TaskQuery {
            status: None,
            from: None,
            to: None,
            limit: 100,
            offset: 0,
        }
    }
}

impl TaskQuery {
    fn matches(&self, task: &DatedTask) -> bool {
        self.status.is_none_or(|s| task.task.status == s)
            && self.from.is_none_or(|from| task.day >= from)
            && self.to.is_none_or(|to| task.day <= to)
    }
}

/// Tasks across every day matching `query`, newest day first and file order
/// within a day, with `offset` skipped and at most `limit` returned.
pub fn query_tasks(journal: &Journal, query: &TaskQuery) -> Result<Vec<DatedTask>, DailyError> {
    let mut hits: Vec<DatedTask> = scan_archive(journal)?
        .into_iter()
        .filter(|t| query.matches(t))
        .collect();
    // stable: keeps file order within one day
    hits.sort_by(|a, b| b.day.cmp(&a.day));
    Ok(hits
        .into_iter()
        .skip(query.offset)
        .take(query.limit)
        .collect())
}

/// Open tasks across the whole journal, newest day first, at most `limit`
pub fn active_tasks(journal: &Journal, limit: usize) -> Result<Vec<DatedTask>, DailyError> {
    query_tasks(
        journal,
        &TaskQuery {
            status: Some(TaskStatus::Open),
            limit,
            ..Default::default()
        },
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::config::Config;
    use std::fs;
    use std::path::Path;
    use tempfile::TempDir;

    fn write(root: &Path, rel: &str, content: &str) {
        let path = root.join(rel);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, content).unwrap();
    }

    fn journal(root: &Path) -> Journal {
        write(root, "2024/03/04/todos.md", "- [ ] legacy open\n- [x] legacy done\n");
        write(
            root,
            "2024/03/05/todo.md",
            "# To Do\n- [>] moved (Moved to [2024-03-06](../06/todo.md))\n- [ ] second\n",
        );
        write(root, "2024/03/06/todo.md", "# To Do\n- [ ] a\n  - [ ] b\n");
        write(root, "drafts/x/y/todo.md", "- [ ] not dated\n");
        Journal::new(root, &Config::default())
    }

    #[test]
    fn test_day_tasks_filter() {
        let tmp = TempDir::new().unwrap();
        let journal = journal(tmp.path());
        let day = DayKey::parse("2024-03-05").unwrap();

        assert_eq!(day_tasks(&journal, day, None).unwrap().len(), 2);
        let moved = day_tasks(&journal, day, Some(TaskStatus::Moved)).unwrap();
        assert_eq!(moved.len(), 1);
        assert_eq!(moved[0].line_number, 2);
        assert_eq!(moved[0].moved_to_date(), chrono::NaiveDate::from_ymd_opt(2024, 3, 6));

        let empty = DayKey::parse("2030-01-01").unwrap();
        assert!(day_tasks(&journal, empty, None).unwrap().is_empty());
    }

    #[test]
    fn test_day_tasks_reads_legacy_name() {
        let tmp = TempDir::new().unwrap();
        let journal = journal(tmp.path());
        let day = DayKey::parse("2024-03-04").unwrap();
        let tasks = day_tasks(&journal, day, Some(TaskStatus::Open)).unwrap();
        assert_eq!(tasks.len(), 1);
        assert_eq!(tasks[0].text, "legacy open");
    }

    #[test]
    fn test_scan_skips_undated() {
        let tmp = TempDir::new().unwrap();
        let journal = journal(tmp.path());
        let all = scan_archive(&journal).unwrap();
        assert_eq!(all.len(), 6);
        assert!(all.iter().all(|t| t.task.text != "not dated"));
        assert_eq!(all[0].day, DayKey::parse("2024-03-04").unwrap());
    }

    #[test]
    fn test_active_newest_first() {
        let tmp = TempDir::new().unwrap();
        let journal = journal(tmp.path());
        let open = active_tasks(&journal, 10).unwrap();
        let texts: Vec<_> = open.iter().map(|t| t.task.text.as_str()).collect();
        assert_eq!(texts, vec!["a", "b", "second", "legacy open"]);

        let limited = active_tasks(&journal, 2).unwrap();
        assert_eq!(limited.len(), 2);
    }

    #[test]
    fn test_query_range_is_inclusive() {
        let tmp = TempDir::new().unwrap();
        let journal = journal(tmp.path());
        let query = TaskQuery {
            from: Some(DayKey::parse("2024-03-04").unwrap()),
            to: Some(DayKey::parse("2024-03-05").unwrap()),
            ..Default::default()
        };
        let hits = query_tasks(&journal, &query).unwrap();
        let days: Vec<String> = hits.iter().map(|t| t.day.to_string()).collect();
        assert_eq!(
            days,
            vec!["2024-03-05", "2024-03-05", "2024-03-04", "2024-03-04"]
        );

        let one_day = TaskQuery {
            from: Some(DayKey::parse("2024-03-06").unwrap()),
            to: Some(DayKey::parse("2024-03-06").unwrap()),
            ..Default::default()
        };
        assert_eq!(query_tasks(&journal, &one_day).unwrap().len(), 2);

        let inverted = TaskQuery {
            from: Some(DayKey::parse("2024-03-06").unwrap()),
            to: Some(DayKey::parse("2024-03-04").unwrap()),
            ..Default::default()
        };
        assert!(query_tasks(&journal, &inverted).unwrap().is_empty());
    }

    #[test]
    fn test_query_status_offset_limit() {
        let tmp = TempDir::new().unwrap();
        let journal = journal(tmp.path());
        let done = TaskQuery {
            status: Some(TaskStatus::Done),
            ..Default::default()
        };
        let hits = query_tasks(&journal, &done).unwrap();
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].task.text, "legacy done");

        let page = TaskQuery {
            offset: 1,
            limit: 2,
            ..Default::default()
        };
        let texts: Vec<_> = query_tasks(&journal, &page)
            .unwrap()
            .into_iter()
            .map(|t| t.task.text)
            .collect();
        assert_eq!(texts.len(), 2);
        assert_eq!(texts[0], "b");
        assert!(texts[1].starts_with("moved"));

        let past_end = TaskQuery {
            offset: 50,
            ..Default::default()
        };
        assert!(query_tasks(&journal, &past_end).unwrap().is_empty());
    }
}

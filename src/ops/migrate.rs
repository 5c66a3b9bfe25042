use std::path::{Path, PathBuf};

use serde::Serialize;

use crate::io::daily_io::{self, DailyError};
use crate::io::journal::Journal;
use crate::io::lock::LockError;
use crate::model::day::DayKey;
use crate::model::task::TaskStatus;
use crate::model::todo::TodoFile;
use crate::parse::annotation;
use crate::parse::todo_parser::{is_blank, leading_whitespace, parse_task_line, with_status};
use crate::util::path::relative_path;

#[derive(Debug, thiserror::Error)]
pub enum MigrateError {
    #[error("today's file {0} does not exist yet; create it before migrating")]
    TodayMissing(PathBuf),
    #[error(transparent)]
    Daily(#[from] DailyError),
    #[error(transparent)]
    Lock(#[from] LockError),
}

/// A task line on its way into today's file
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CarriedTask {
    pub origin: DayKey,
    pub line: String,
}

/// Outcome of a migration run
#[derive(Debug, Clone, Serialize)]
pub struct MigrationReport {
    pub today: DayKey,
    pub migrated: usize,
    /// Past files that had tasks marked moved
    pub files: Vec<PathBuf>,
    /// Lines appended to today's file, in order
    pub tasks: Vec<CarriedTask>,
    pub dry_run: bool,
}

/// Links between one past file and today's file
struct Links<'a> {
    origin: DayKey,
    today: DayKey,
    /// origin dir → today's file
    forward: &'a Path,
    /// today's dir → origin file
    backward: &'a Path,
}

/// Mark every carried task in `file` as moved and return the fresh copies,
/// in file order.
///
/// A top-level open task is always carried. A nested open task is carried
/// only when its nearest shallower task was carried in this same pass; done
/// and moved tasks are left alone but still count as (uncarried) parents.
/// Blank and indented prose lines keep the current nesting, any other line
/// clears it.
fn carry_forward(file: &mut TodoFile, links: &Links) -> Vec<CarriedTask> {
    let mut carried = Vec::new();
    // (indent, carried) for each open ancestor level
    let mut ancestors: Vec<(usize, bool)> = Vec::new();

    for idx in 0..file.lines.len() {
        let line = &file.lines[idx];
        let Some(task) = parse_task_line(line, idx + 1) else {
            let continuation = !ancestors.is_empty() && !leading_whitespace(line).is_empty();
            if !is_blank(line) && !continuation {
                ancestors.clear();
            }
            continue;
        };

        while ancestors.last().is_some_and(|&(indent, _)| indent >= task.indent) {
            ancestors.pop();
        }

        let carry = task.status == TaskStatus::Open
            && (task.is_top_level() || ancestors.last().is_some_and(|&(_, c)| c));

        if carry {
            let (origin_line, fresh) = if task.is_top_level() {
                let moved = with_status(line, TaskStatus::Moved).unwrap_or_else(|| line.clone());
                let origin_line = format!(
                    "{} {}",
                    annotation::strip_moved_to(&moved),
                    annotation::format_moved_to(links.today, links.forward)
                );
                let base = annotation::strip_moved_to(line);
                let fresh = if annotation::has_from(&task.text) {
                    base
                } else {
                    format!(
                        "{} {}",
                        base,
                        annotation::format_from(links.origin, links.backward)
                    )
                };
                (origin_line, fresh)
            } else {
                let origin_line = with_status(line, TaskStatus::Moved).unwrap_or_else(|| line.clone());
                (origin_line, annotation::strip_moved_to(line))
            };
            file.lines[idx] = origin_line;
            carried.push(CarriedTask {
                origin: links.origin,
                line: fresh,
            });
        }

        ancestors.push((task.indent, carry));
    }

    carried
}

/// Append carried tasks to today's file under a fresh section header.
fn append_carried(file: &mut TodoFile, header: &str, carried: &[CarriedTask]) {
    if file.lines.last().is_some_and(|l| !is_blank(l)) {
        file.push_line("");
    }
    file.push_line(header);
    for task in carried {
        file.push_line(task.line.clone());
    }
    file.trailing_newline = true;
}

/// Move every open task from past daily files into today's file.
///
/// Today's file must already exist. Files whose directories are not a date,
/// and files dated today or later, are skipped. With `dry_run` nothing is
/// written and the report shows what would have moved.
pub fn migrate(
    journal: &Journal,
    today: DayKey,
    dry_run: bool,
) -> Result<MigrationReport, MigrateError> {
    let _lock = journal.lock()?;

    let today_path = journal.todo_path(today);
    if !today_path.exists() {
        return Err(MigrateError::TodayMissing(today_path));
    }
    let today_dir = today_path.parent().unwrap_or(journal.root()).to_path_buf();

    let mut carried_all = Vec::new();
    let mut files = Vec::new();

    for entry in journal.resolver.list_todo_files() {
        if entry.path == today_path {
            continue;
        }
        let Some(origin) = entry.day else {
            tracing::debug!(path = %entry.path.display(), "skipping: path is not a date");
            continue;
        };
        if origin >= today {
            tracing::debug!(path = %entry.path.display(), day = %origin, "skipping: not in the past");
            continue;
        }

        let origin_dir = entry.path.parent().unwrap_or(journal.root());
        let forward = relative_path(origin_dir, &today_path);
        let backward = relative_path(&today_dir, &entry.path);
        let links = Links {
            origin,
            today,
            forward: &forward,
            backward: &backward,
        };

        let mut file = daily_io::read_todo(&entry.path)?;
        let carried = carry_forward(&mut file, &links);
        if carried.is_empty() {
            continue;
        }
        tracing::info!(day = %origin, count = carried.len(), "carrying tasks forward");
        if !dry_run {
            daily_io::write_todo(journal.root(), &entry.path, &file)?;
        }
        files.push(entry.path);
        carried_all.extend(carried);
    }

    if !carried_all.is_empty() && !dry_run {
        let mut today_file = daily_io::read_todo(&today_path)?;
        append_carried(&mut today_file, &journal.sections.previous_header, &carried_all);
        daily_io::write_todo(journal.root(), &today_path, &today_file)?;
    }

    tracing::info!(migrated = carried_all.len(), dry_run, "migration finished");
    Ok(MigrationReport {
        today,
        migrated: carried_all.len(),
        files,
        tasks: carried_all,
        dry_run,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parse::{parse_todo, serialize_todo};
    use pretty_assertions::assert_eq;

    fn run(source: &str) -> (String, Vec<String>) {
        let forward = PathBuf::from("../06/todo.md");
        let backward = PathBuf::from("../05/todo.md");
        let links = Links {
            origin: DayKey::parse("2024-03-05").unwrap(),
            today: DayKey::parse("2024-03-06").unwrap(),
            forward: &forward,
            backward: &backward,
        };
        let mut file = parse_todo(source);
        let carried = carry_forward(&mut file, &links);
        (
            serialize_todo(&file),
            carried.into_iter().map(|c| c.line).collect(),
        )
    }

    #[test]
    fn test_parent_and_children_move_together() {
        let (origin, carried) = run("# To Do\n- [ ] Parent\n  - [ ] Child A\n  - [ ] Child B\n");
        assert_eq!(
            origin,
            "# To Do\n\
             - [>] Parent (Moved to [2024-03-06](../06/todo.md))\n\
             \x20\x20- [>] Child A\n\
             \x20\x20- [>] Child B\n"
        );
        assert_eq!(
            carried,
            vec![
                "- [ ] Parent (From [2024-03-05](../05/todo.md))",
                "  - [ ] Child A",
                "  - [ ] Child B",
            ]
        );
    }

    #[test]
    fn test_done_parent_keeps_open_child() {
        let source = "- [x] Finished\n  - [ ] Leftover\n";
        let (origin, carried) = run(source);
        assert_eq!(origin, source);
        assert!(carried.is_empty());
    }

    #[test]
    fn test_done_and_moved_children_untouched() {
        let (origin, carried) = run("- [ ] P\n  - [x] done\n  - [>] gone\n  - [ ] open\n");
        assert_eq!(
            origin,
            "- [>] P (Moved to [2024-03-06](../06/todo.md))\n  - [x] done\n  - [>] gone\n  - [>] open\n"
        );
        assert_eq!(carried.len(), 2);
        assert_eq!(carried[1], "  - [ ] open");
    }

    #[test]
    fn test_existing_from_annotation_is_kept() {
        let (origin, carried) = run("- [ ] Old task (From [2024-03-01](../01/todo.md))\n");
        assert_eq!(
            origin,
            "- [>] Old task (From [2024-03-01](../01/todo.md)) (Moved to [2024-03-06](../06/todo.md))\n"
        );
        assert_eq!(carried, vec!["- [ ] Old task (From [2024-03-01](../01/todo.md))"]);
    }

    #[test]
    fn test_prose_resets_parent() {
        let (_, carried) = run("- [ ] Parent\nSome notes\n  - [ ] Orphan\n");
        assert_eq!(carried, vec!["- [ ] Parent (From [2024-03-05](../05/todo.md))"]);
    }

    #[test]
    fn test_blank_and_indented_prose_keep_parent() {
        let (_, carried) = run("- [ ] Parent\n  details here\n\n  - [ ] Child\n");
        assert_eq!(carried.len(), 2);
        assert_eq!(carried[1], "  - [ ] Child");
    }

    #[test]
    fn test_grandchildren_follow_nearest_ancestor() {
        let (origin, carried) = run(
            "- [ ] Top\n  - [x] Done child\n    - [ ] Under done\n  - [ ] Open child\n    - [ ] Under open\n",
        );
        assert_eq!(
            carried,
            vec![
                "- [ ] Top (From [2024-03-05](../05/todo.md))",
                "  - [ ] Open child",
                "    - [ ] Under open",
            ]
        );
        assert!(origin.contains("    - [ ] Under done\n"));
    }

    #[test]
    fn test_append_carried_adds_section() {
        let mut today = parse_todo("# To Do\n- [ ] fresh");
        let carried = vec![CarriedTask {
            origin: DayKey::parse("2024-03-05").unwrap(),
            line: "- [ ] old".into(),
        }];
        append_carried(&mut today, "## Previous Tasks", &carried);
        assert_eq!(
            serialize_todo(&today),
            "# To Do\n- [ ] fresh\n\n## Previous Tasks\n- [ ] old\n"
        );
    }
}

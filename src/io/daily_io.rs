use std::fs;
use std::path::{Path, PathBuf};

use walkdir::WalkDir;

use crate::io::recovery::{self, RecoveryEntry};
use crate::model::config::LayoutConfig;
use crate::model::day::DayKey;
use crate::model::todo::TodoFile;
use crate::parse::{parse_todo, serialize_todo};

/// Error type for daily file I/O
#[derive(Debug, thiserror::Error)]
pub enum DailyError {
    #[error("could not read {path}: {source}")]
    ReadError {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("could not write {path}: {source}")]
    WriteError {
        path: PathBuf,
        source: std::io::Error,
    },
}

/// A todo file found under the journal root
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DailyEntry {
    pub path: PathBuf,
    /// Day recovered from the path; `None` when the directories are not a date
    pub day: Option<DayKey>,
}

/// Maps days to todo files under an explicit journal root.
#[derive(Debug, Clone)]
pub struct DailyResolver {
    root: PathBuf,
    layout: LayoutConfig,
}

impl DailyResolver {
    pub fn new(root: impl Into<PathBuf>, layout: LayoutConfig) -> Self {
        DailyResolver {
            root: root.into(),
            layout,
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn day_dir(&self, day: DayKey) -> PathBuf {
        self.root.join(day.relative_dir())
    }

    /// Canonical todo path for a day: `<root>/YYYY/MM/DD/todo.md`
    pub fn todo_path(&self, day: DayKey) -> PathBuf {
        self.day_dir(day).join(&self.layout.todo_file)
    }

    /// The file that actually holds a day's tasks: the canonical file if it
    /// exists, otherwise the first legacy name present, otherwise the
    /// canonical path.
    pub fn resolve(&self, day: DayKey) -> PathBuf {
        let canonical = self.todo_path(day);
        if canonical.exists() {
            return canonical;
        }
        let dir = self.day_dir(day);
        self.layout
            .legacy_todo_files
            .iter()
            .map(|name| dir.join(name))
            .find(|p| p.exists())
            .unwrap_or(canonical)
    }

    /// Day a todo file belongs to, from its parent `YYYY/MM/DD` directories
    pub fn day_of(&self, path: &Path) -> Option<DayKey> {
        DayKey::from_dir(path.parent()?)
    }

    /// Every todo file under the root, sorted by path.
    ///
    /// A legacy-named file is listed only when its directory has no
    /// canonical file. Unreadable directories are logged and skipped.
    pub fn list_todo_files(&self) -> Vec<DailyEntry> {
        let mut entries = Vec::new();
        let walker = WalkDir::new(&self.root)
            .sort_by_file_name()
            .into_iter()
            .filter_entry(|e| e.depth() == 0 || !is_hidden(e.file_name()));

        for entry in walker {
            let entry = match entry {
                Ok(entry) => entry,
                Err(e) => {
                    tracing::warn!(error = %e, "skipping unreadable path");
                    continue;
                }
            };
            if !entry.file_type().is_file() {
                continue;
            }
            let Some(name) = entry.file_name().to_str() else {
                continue;
            };
            let is_canonical = name == self.layout.todo_file;
            let is_legacy = self.layout.legacy_todo_files.iter().any(|l| l == name);
            if !is_canonical && !is_legacy {
                continue;
            }
            let path = entry.into_path();
            if is_legacy
                && path
                    .parent()
                    .is_some_and(|dir| dir.join(&self.layout.todo_file).exists())
            {
                continue;
            }
            let day = self.day_of(&path);
            entries.push(DailyEntry { path, day });
        }
        entries
    }
}

fn is_hidden(name: &std::ffi::OsStr) -> bool {
    name.to_str().is_some_and(|s| s.starts_with('.'))
}

/// Read a todo file. A missing file reads as empty.
pub fn read_todo(path: &Path) -> Result<TodoFile, DailyError> {
    match fs::read_to_string(path) {
        Ok(text) => Ok(parse_todo(&text)),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(TodoFile {
            trailing_newline: false,
            ..Default::default()
        }),
        Err(e) => Err(DailyError::ReadError {
            path: path.to_path_buf(),
            source: e,
        }),
    }
}

/// Write a todo file atomically, creating its day directory as needed.
///
/// On failure the content is preserved in the root's recovery log.
pub fn write_todo(root: &Path, path: &Path, file: &TodoFile) -> Result<(), DailyError> {
    let content = serialize_todo(file);
    let result = match path.parent() {
        Some(dir) => fs::create_dir_all(dir),
        None => Ok(()),
    }
    .and_then(|()| recovery::atomic_write(path, content.as_bytes()));

    if let Err(e) = result {
        let target = path.strip_prefix(root).unwrap_or(path);
        recovery::log_recovery(
            root,
            RecoveryEntry {
                timestamp: chrono::Utc::now(),
                description: "todo write failed".to_string(),
                fields: vec![
                    ("Target".to_string(), target.display().to_string()),
                    ("Error".to_string(), e.to_string()),
                ],
                body: content,
            },
        );
        return Err(DailyError::WriteError {
            path: path.to_path_buf(),
            source: e,
        });
    }
    tracing::debug!(path = %path.display(), "wrote todo file");
    Ok(())
}

use std::path::{Path, PathBuf};

use crate::io::daily_io::DailyResolver;
use crate::io::lock::{FileLock, LockError};
use crate::model::config::{Config, SectionConfig};
use crate::model::day::DayKey;

/// A journal root together with the settings every operation needs.
#[derive(Debug, Clone)]
pub struct Journal {
    pub resolver: DailyResolver,
    pub sections: SectionConfig,
}

impl Journal {
    pub fn new(root: impl Into<PathBuf>, config: &Config) -> Self {
        Journal {
            resolver: DailyResolver::new(root, config.layout.clone()),
            sections: config.sections.clone(),
        }
    }

    pub fn root(&self) -> &Path {
        self.resolver.root()
    }

    /// File holding a day's tasks (see [`DailyResolver::resolve`])
    pub fn todo_path(&self, day: DayKey) -> PathBuf {
        self.resolver.resolve(day)
    }

    /// Take the writer lock for this root
    pub fn lock(&self) -> Result<FileLock, LockError> {
        FileLock::acquire_default(self.root())
    }
}

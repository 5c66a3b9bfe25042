use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Configuration from `config.toml`
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Directory holding the `YYYY/MM/DD` tree
    #[serde(default)]
    pub root: Option<PathBuf>,
    #[serde(default)]
    pub layout: LayoutConfig,
    #[serde(default)]
    pub sections: SectionConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LayoutConfig {
    /// File name of each day's todo list
    #[serde(default = "default_todo_file")]
    pub todo_file: String,
    /// Older file names still read (and migrated) when `todo_file` is absent
    #[serde(default = "default_legacy_todo_files")]
    pub legacy_todo_files: Vec<String>,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        LayoutConfig {
            todo_file: default_todo_file(),
            legacy_todo_files: default_legacy_todo_files(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SectionConfig {
    /// Header new top-level tasks are inserted under
    #[serde(default = "default_todo_header")]
    pub todo_header: String,
    /// Header written above tasks carried over by `migrate`
    #[serde(default = "default_previous_header")]
    pub previous_header: String,
}

impl Default for SectionConfig {
    fn default() -> Self {
        SectionConfig {
            todo_header: default_todo_header(),
            previous_header: default_previous_header(),
        }
    }
}

fn default_todo_file() -> String {
    "todo.md".to_string()
}

fn default_legacy_todo_files() -> Vec<String> {
    vec!["todos.md".to_string()]
}

fn default_todo_header() -> String {
    "# To Do".to_string()
}

fn default_previous_header() -> String {
    "## Previous Tasks".to_string()
}

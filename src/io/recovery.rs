use std::fs::OpenOptions;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use tempfile::NamedTempFile;

/// Header written at the top of a new recovery log.
const FILE_HEADER: &str = "\
<!-- daybook recovery log: content that could not be written to its target.
     Copy anything you need back by hand. Safe to delete. -->

---
";

/// A write that failed, with the content it would have written.
#[derive(Debug, Clone)]
pub struct RecoveryEntry {
    pub timestamp: DateTime<Utc>,
    pub description: String,
    pub fields: Vec<(String, String)>,
    pub body: String,
}

pub fn recovery_log_path(root: &Path) -> PathBuf {
    root.join(".recovery.log")
}

/// Write `content` to `path` atomically using a temp file + rename.
pub fn atomic_write(path: &Path, content: &[u8]) -> io::Result<()> {
    let dir = path.parent().unwrap_or(Path::new("."));
    let mut tmp = NamedTempFile::new_in(dir)?;
    tmp.write_all(content)?;
    tmp.flush()?;
    tmp.persist(path).map_err(|e| e.error)?;
    Ok(())
}

impl RecoveryEntry {
    fn to_markdown(&self) -> String {
        let mut out = format!(
            "## {} {}\n\n",
            self.timestamp
                .to_rfc3339_opts(chrono::SecondsFormat::Secs, true),
            self.description,
        );
        for (key, value) in &self.fields {
            out.push_str(&format!("{}: {}\n", key, value));
        }
        if !self.body.is_empty() {
            out.push_str("\n```markdown\n");
            out.push_str(&self.body);
            if !self.body.ends_with('\n') {
                out.push('\n');
            }
            out.push_str("```\n");
        }
        out.push_str("\n---\n");
        out
    }
}

/// Append an entry to the recovery log under `root`.
///
/// Best effort: a failure here is logged and otherwise ignored.
pub fn log_recovery(root: &Path, entry: RecoveryEntry) {
    let path = recovery_log_path(root);
    let is_new = !path.exists();
    let result = OpenOptions::new()
        .create(true)
        .append(true)
        .open(&path)
        .and_then(|mut f| {
            if is_new {
                f.write_all(FILE_HEADER.as_bytes())?;
            }
            f.write_all(entry.to_markdown().as_bytes())
        });
    match result {
        Ok(()) => tracing::warn!(log = %path.display(), "saved unwritten content to recovery log"),
        Err(e) => tracing::error!(log = %path.display(), error = %e, "could not write recovery log"),
    }
}

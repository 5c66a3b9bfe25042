//! Back-link annotations carried on migrated tasks:
//! `(From [YYYY-MM-DD](rel/path))` and `(Moved to [YYYY-MM-DD](rel/path))`.

use std::path::Path;
use std::sync::LazyLock;

use chrono::NaiveDate;
use regex::Regex;

use crate::model::day::DayKey;

/// Marker that identifies a task already carrying a backward link
pub const FROM_MARKER: &str = "(From [";

static FROM_TAG: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\(From \[(\d{4}-\d{2}-\d{2})\]\([^)]+\)\)").unwrap());

static MOVED_TAG: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\(Moved to \[(\d{4}-\d{2}-\d{2})\]\([^)]+\)\)").unwrap());

pub fn has_from(text: &str) -> bool {
    text.contains(FROM_MARKER)
}

pub fn from_date(text: &str) -> Option<NaiveDate> {
    capture_date(&FROM_TAG, text)
}

pub fn moved_to_date(text: &str) -> Option<NaiveDate> {
    capture_date(&MOVED_TAG, text)
}

fn capture_date(re: &Regex, text: &str) -> Option<NaiveDate> {
    let caps = re.captures(text)?;
    NaiveDate::parse_from_str(caps.get(1)?.as_str(), "%Y-%m-%d").ok()
}

/// Remove both annotation kinds and tidy the whitespace they leave behind.
pub fn strip_annotations(text: &str) -> String {
    let text = FROM_TAG.replace_all(text, "");
    let text = MOVED_TAG.replace_all(&text, "");
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Remove only the forward link, keeping everything else verbatim.
pub fn strip_moved_to(text: &str) -> String {
    MOVED_TAG.replace_all(text, "").trim_end().to_string()
}

pub fn format_from(day: DayKey, link: &Path) -> String {
    format!("(From [{}]({}))", day, link_text(link))
}

pub fn format_moved_to(day: DayKey, link: &Path) -> String {
    format!("(Moved to [{}]({}))", day, link_text(link))
}

/// Links are written with `/` separators regardless of platform.
fn link_text(link: &Path) -> String {
    link.components()
        .map(|c| c.as_os_str().to_string_lossy())
        .collect::<Vec<_>>()
        .join("/")
}

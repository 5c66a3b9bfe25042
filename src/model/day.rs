use std::fmt;
use std::path::{Component, Path, PathBuf};

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};

/// A calendar day, addressed on disk as `YYYY/MM/DD`
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DayKey(NaiveDate);

impl DayKey {
    pub fn new(date: NaiveDate) -> Self {
        DayKey(date)
    }

    pub fn from_ymd(year: i32, month: u32, day: u32) -> Option<Self> {
        NaiveDate::from_ymd_opt(year, month, day).map(DayKey)
    }

    /// Parse `YYYY-MM-DD`
    pub fn parse(s: &str) -> Option<Self> {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").ok().map(DayKey)
    }

    /// Relative directory for this day: `YYYY/MM/DD`
    pub fn relative_dir(self) -> PathBuf {
        PathBuf::from(format!("{:04}", self.0.year()))
            .join(format!("{:02}", self.0.month()))
            .join(format!("{:02}", self.0.day()))
    }

    /// Recover the day from the last three directory components of `dir`.
    ///
    /// Every component must be all ASCII digits and the triple must be a
    /// real calendar date.
    pub fn from_dir(dir: &Path) -> Option<Self> {
        let mut parts = dir.components().rev().filter_map(|c| match c {
            Component::Normal(s) => s.to_str(),
            _ => None,
        });
        let day = numeric(parts.next()?)?;
        let month = numeric(parts.next()?)?;
        let year = numeric(parts.next()?)?;
        DayKey::from_ymd(i32::try_from(year).ok()?, month, day)
    }
}

fn numeric(s: &str) -> Option<u32> {
    if s.is_empty() || !s.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    s.parse().ok()
}

impl fmt::Display for DayKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.format("%Y-%m-%d"))
    }
}

impl From<NaiveDate> for DayKey {
    fn from(date: NaiveDate) -> Self {
        DayKey(date)
    }
}

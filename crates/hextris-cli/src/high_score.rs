use std::{
    fs,
    path::{Path, PathBuf},
};

use anyhow::Context as _;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::config_file::APP_DIR;

const SCORES_FILE: &str = "highscores.json";

/// Capacity of the ranking.
pub const MAX_ENTRIES: usize = 10;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HighScoreEntry {
    pub name: String,
    pub lines: u32,
    pub date: DateTime<Utc>,
}

/// Top-10 table ranked by cleared lines; earlier entries win ties.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct HighScoreTable {
    entries: Vec<HighScoreEntry>,
}

impl HighScoreTable {
    #[must_use]
    pub fn entries(&self) -> &[HighScoreEntry] {
        &self.entries
    }

    /// Whether a result would enter the ranking. Zero-line games never
    /// qualify.
    #[must_use]
    pub fn qualifies(&self, lines: u32) -> bool {
        if lines == 0 {
            return false;
        }
        self.entries.len() < MAX_ENTRIES
            || self.entries.last().is_some_and(|entry| lines > entry.lines)
    }

    pub fn insert(&mut self, entry: HighScoreEntry) {
        self.entries.push(entry);
        // Stable sort: an equal result never displaces an older entry.
        self.entries.sort_by(|a, b| b.lines.cmp(&a.lines));
        self.entries.truncate(MAX_ENTRIES);
    }

    pub fn add(&mut self, name: impl Into<String>, lines: u32) {
        self.insert(HighScoreEntry {
            name: name.into(),
            lines,
            date: Utc::now(),
        });
    }
}

/// JSON-backed table at `~/.hextris/highscores.json`.
#[derive(Debug, Clone)]
pub struct HighScoreFile {
    path: PathBuf,
}

impl HighScoreFile {
    pub fn default_location() -> anyhow::Result<Self> {
        let home = std::env::var_os("HOME").context("HOME is not set")?;
        Ok(Self::with_path(
            Path::new(&home).join(APP_DIR).join(SCORES_FILE),
        ))
    }

    #[must_use]
    pub fn with_path(path: PathBuf) -> Self {
        Self { path }
    }

    pub fn load(&self) -> anyhow::Result<HighScoreTable> {
        if !self.path.exists() {
            return Ok(HighScoreTable::default());
        }
        let json = fs::read_to_string(&self.path)
            .with_context(|| format!("failed to read {}", self.path.display()))?;
        serde_json::from_str(&json)
            .with_context(|| format!("malformed high-score file {}", self.path.display()))
    }

    pub fn save(&self, table: &HighScoreTable) -> anyhow::Result<()> {
        if let Some(dir) = self.path.parent() {
            fs::create_dir_all(dir)
                .with_context(|| format!("failed to create {}", dir.display()))?;
        }
        let json = serde_json::to_string_pretty(table)?;
        fs::write(&self.path, json)
            .with_context(|| format!("failed to write {}", self.path.display()))
    }
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone as _;

    use super::*;

    fn entry(name: &str, lines: u32, day: u32) -> HighScoreEntry {
        HighScoreEntry {
            name: name.into(),
            lines,
            date: Utc.with_ymd_and_hms(2026, 8, day, 12, 0, 0).unwrap(),
        }
    }

    #[test]
    fn ranks_by_lines_descending() {
        let mut table = HighScoreTable::default();
        table.insert(entry("ann", 4, 1));
        table.insert(entry("bob", 9, 2));
        table.insert(entry("cid", 6, 3));
        let names: Vec<_> = table.entries().iter().map(|e| e.name.as_str()).collect();
        assert_eq!(names, ["bob", "cid", "ann"]);
    }

    #[test]
    fn equal_results_keep_the_older_entry_first() {
        let mut table = HighScoreTable::default();
        table.insert(entry("first", 5, 1));
        table.insert(entry("second", 5, 2));
        let names: Vec<_> = table.entries().iter().map(|e| e.name.as_str()).collect();
        assert_eq!(names, ["first", "second"]);
    }

    #[test]
    fn table_is_capped_and_qualification_tracks_the_cutoff() {
        let mut table = HighScoreTable::default();
        for i in 0..MAX_ENTRIES {
            table.insert(entry("p", 10 + u32::try_from(i).unwrap(), 1));
        }
        assert_eq!(table.entries().len(), MAX_ENTRIES);
        // Worst entry holds 10 lines.
        assert!(!table.qualifies(10));
        assert!(table.qualifies(11));
        assert!(!table.qualifies(0));

        table.add("q", 25);
        assert_eq!(table.entries().len(), MAX_ENTRIES);
        assert_eq!(table.entries()[0].lines, 25);
        assert!(table.entries().iter().all(|e| e.lines >= 11));
    }

    #[test]
    fn empty_table_qualifies_any_positive_result() {
        let table = HighScoreTable::default();
        assert!(table.qualifies(1));
        assert!(!table.qualifies(0));
    }

    #[test]
    fn file_round_trip() {
        let path = std::env::temp_dir().join(format!(
            "hextris-scores-test-{}/{SCORES_FILE}",
            std::process::id()
        ));
        let file = HighScoreFile::with_path(path.clone());
        assert_eq!(file.load().unwrap(), HighScoreTable::default());

        let mut table = HighScoreTable::default();
        table.insert(entry("ann", 12, 5));
        file.save(&table).unwrap();
        assert_eq!(file.load().unwrap(), table);
        fs::remove_file(&path).unwrap();
    }
}

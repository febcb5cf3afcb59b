use anyhow::{Context, Result};
use chrono::{Duration, NaiveDate};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

use crate::site::warn;

/// Default days of history to retain. The configured window is handed
/// as one value to both the logical prune over `history.json` and the
/// physical sweep over rendered pages.
pub const MAX_DAYS: i64 = 30;

pub const RECORD_DATE_FORMAT: &str = "%Y/%m/%d";
pub const ARTIFACT_DATE_FORMAT: &str = "%Y%m%d";

/// Catalog prices arrive either as an integer amount in yen or as an
/// opaque token such as "要問い合わせ". Both spellings round-trip
/// through the history file unchanged.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Price {
    Yen(i64),
    Token(String),
}

impl Default for Price {
    fn default() -> Self {
        Price::Token("不明".to_string())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Item {
    pub title: String,
    pub url: String,
    #[serde(default)]
    pub image: String,
    #[serde(default)]
    pub price: Price,
    #[serde(default)]
    pub source: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DailyRecord {
    pub date: String,
    #[serde(default)]
    pub filename: String,
    #[serde(default)]
    pub items: Vec<Item>,
}

impl DailyRecord {
    pub fn parsed_date(&self) -> Option<NaiveDate> {
        NaiveDate::parse_from_str(&self.date, RECORD_DATE_FORMAT).ok()
    }
}

/// Daily artifact name for a date. The `.html` spelling is canonical;
/// the janitor additionally recognizes the legacy `.json` spelling so
/// old artifacts still age out.
pub fn artifact_name(date: NaiveDate) -> String {
    format!("recommend_{}.html", date.format(ARTIFACT_DATE_FORMAT))
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RetentionOutcome {
    pub expired: usize,
    pub replaced_today: bool,
}

/// The persisted recommendation history, most-recent-first. Mutated at
/// most once per run (one prune pass, one insert), then read-only.
#[derive(Debug, Clone, Default)]
pub struct HistoryLog {
    pub records: Vec<DailyRecord>,
}

impl HistoryLog {
    /// Load the history file, treating a missing or corrupt file as an
    /// empty history. Load never fails the caller.
    pub fn load(path: &Path) -> Self {
        if !path.exists() {
            return Self::default();
        }

        let raw = match fs::read_to_string(path) {
            Ok(raw) => raw,
            Err(err) => {
                warn::emit(
                    "history_unreadable",
                    "load",
                    &path.display().to_string(),
                    &err.to_string(),
                );
                return Self::default();
            }
        };

        match serde_json::from_str::<Vec<DailyRecord>>(&raw) {
            Ok(records) => Self { records },
            Err(err) => {
                warn::emit(
                    "history_corrupt",
                    "load",
                    &path.display().to_string(),
                    &err.to_string(),
                );
                Self::default()
            }
        }
    }

    /// Rewrite the history file in full, pretty-printed.
    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent()
            && !parent.as_os_str().is_empty()
        {
            fs::create_dir_all(parent)
                .with_context(|| format!("failed to create {}", parent.display()))?;
        }
        let data = serde_json::to_string_pretty(&self.records)?;
        fs::write(path, format!("{data}\n"))
            .with_context(|| format!("failed to write {}", path.display()))
    }

    /// One retention pass: drop records older than `max_days` or with
    /// unparsable dates, replace any surviving record for `today`, and
    /// insert today's record at the front. Relative order of the other
    /// survivors is untouched; the sidebar depends on it.
    pub fn retain_and_insert(
        &mut self,
        today: NaiveDate,
        items: Vec<Item>,
        max_days: i64,
    ) -> RetentionOutcome {
        let cutoff = today - Duration::days(max_days);

        // Age filter runs first so that a same-day record left by an
        // earlier run today is still present for the replace step.
        let before = self.records.len();
        self.records
            .retain(|record| matches!(record.parsed_date(), Some(date) if date >= cutoff));
        let expired = before - self.records.len();

        let with_today = self.records.len();
        self.records
            .retain(|record| record.parsed_date() != Some(today));
        let replaced_today = self.records.len() < with_today;

        self.records.insert(
            0,
            DailyRecord {
                date: today.format(RECORD_DATE_FORMAT).to_string(),
                filename: artifact_name(today),
                items,
            },
        );

        RetentionOutcome {
            expired,
            replaced_today,
        }
    }
}

/// Load the current-selection cache (today's items only). Missing or
/// corrupt files read as empty, same contract as the history load.
pub fn load_current_items(path: &Path) -> Vec<Item> {
    if !path.exists() {
        return Vec::new();
    }
    let raw = match fs::read_to_string(path) {
        Ok(raw) => raw,
        Err(err) => {
            warn::emit(
                "current_unreadable",
                "load",
                &path.display().to_string(),
                &err.to_string(),
            );
            return Vec::new();
        }
    };
    match serde_json::from_str::<Vec<Item>>(&raw) {
        Ok(items) => items,
        Err(err) => {
            warn::emit(
                "current_corrupt",
                "load",
                &path.display().to_string(),
                &err.to_string(),
            );
            Vec::new()
        }
    }
}

pub fn save_current_items(path: &Path, items: &[Item]) -> Result<()> {
    let data = serde_json::to_string_pretty(items)?;
    fs::write(path, format!("{data}\n"))
        .with_context(|| format!("failed to write {}", path.display()))
}

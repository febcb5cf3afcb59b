use chrono::{Duration, NaiveDate};
use regex::Regex;
use std::fs;
use std::path::Path;

use crate::site::history::ARTIFACT_DATE_FORMAT;
use crate::site::warn;

/// Sweep the site directory and delete daily artifacts whose embedded
/// date fell out of the retention window. This is the physical half of
/// the retention rule; the logical half lives in the history retention
/// pass, and both run every invocation with the same `today` and
/// `max_days` or the two representations drift.
///
/// Non-matching filenames are ignored. A matching name whose digits do
/// not form a calendar date is skipped, never deleted.
pub fn cleanup_expired(dir: &Path, today: NaiveDate, max_days: i64) -> usize {
    let cutoff = today - Duration::days(max_days);
    // `.json` is the legacy artifact spelling; still swept so old files age out.
    let pattern = Regex::new(r"^recommend_(\d{8})\.(?:html|json)$").expect("valid artifact regex");

    let read_dir = match fs::read_dir(dir) {
        Ok(read_dir) => read_dir,
        Err(err) => {
            warn::emit(
                "artifact_scan_failed",
                "janitor",
                &dir.display().to_string(),
                &err.to_string(),
            );
            return 0;
        }
    };

    let mut deleted = 0usize;
    for entry in read_dir.flatten() {
        let path = entry.path();
        let Some(name) = path.file_name().and_then(|n| n.to_str()) else {
            continue;
        };
        let Some(caps) = pattern.captures(name) else {
            continue;
        };
        let Ok(file_date) = NaiveDate::parse_from_str(&caps[1], ARTIFACT_DATE_FORMAT) else {
            continue;
        };
        if file_date >= cutoff {
            continue;
        }

        match fs::remove_file(&path) {
            Ok(()) => deleted += 1,
            Err(err) => warn::emit(
                "artifact_delete_failed",
                "janitor",
                name,
                &err.to_string(),
            ),
        }
    }

    deleted
}

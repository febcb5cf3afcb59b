use anyhow::Result;
use chrono::Local;

use crate::commands::CommandReport;
use crate::site::catalog::{CatalogClient, merge_by_url};
use crate::site::config::{catalog_credentials, load_config};
use crate::site::history::{self, HistoryLog};
use crate::site::janitor::cleanup_expired;
use crate::site::paths::resolve_paths;
use crate::site::sampler::sample_items;
use crate::site::warn;

/// Fetch catalog offers for every keyword, rotate today's picks into
/// the 30-day history, refresh the current-selection cache, and sweep
/// expired page artifacts.
pub fn run() -> Result<CommandReport> {
    let paths = resolve_paths()?;
    let config = load_config(&paths)?;
    let credentials = catalog_credentials()?;
    let client = CatalogClient::new(&config.catalog, credentials)?;

    let mut report = CommandReport::new("fetch");
    report.detail(format!("site_dir={}", paths.site_dir.display()));

    let today = Local::now().date_naive();

    let mut batches = Vec::new();
    for keyword in &config.keywords {
        match client.search(keyword) {
            Ok(items) if items.is_empty() => {
                warn::emit("catalog_empty", "fetch", keyword, "no items returned");
                report.detail(format!("keyword {keyword}: 0 items"));
            }
            Ok(items) => {
                report.detail(format!("keyword {keyword}: {} items", items.len()));
                batches.push(items);
            }
            Err(err) => {
                warn::emit("catalog_fetch_failed", "fetch", keyword, &err.to_string());
                report.detail(format!("keyword {keyword}: fetch failed"));
            }
        }
    }

    let pool = merge_by_url(batches);
    report.detail(format!("merged pool: {} unique items", pool.len()));

    if pool.is_empty() {
        // History and current selection stay untouched, but the
        // artifact sweep below still runs every invocation.
        warn::emit("pool_empty", "fetch", "all_keywords", "no items fetched");
        report.detail("no items fetched for any keyword; history not updated");
    } else {
        let picks = sample_items(&pool, config.pick_count);
        report.detail(format!("picked {} items for today", picks.len()));

        let mut log = HistoryLog::load(&paths.history_file);
        let outcome = log.retain_and_insert(today, picks.clone(), config.max_days);
        report.detail(format!(
            "history: {} day(s) retained, {} expired, same-day replaced={}",
            log.records.len(),
            outcome.expired,
            outcome.replaced_today
        ));

        if let Err(err) = log.save(&paths.history_file) {
            warn::emit(
                "history_save_failed",
                "fetch",
                &paths.history_file.display().to_string(),
                &err.to_string(),
            );
            report.issue(format!("failed to persist history: {err}"));
        }

        if let Err(err) = history::save_current_items(&paths.current_file, &picks) {
            warn::emit(
                "current_save_failed",
                "fetch",
                &paths.current_file.display().to_string(),
                &err.to_string(),
            );
            report.issue(format!("failed to persist current selection: {err}"));
        }
    }

    let deleted = cleanup_expired(&paths.site_dir, today, config.max_days);
    report.detail(format!("expired artifacts deleted: {deleted}"));

    Ok(report)
}

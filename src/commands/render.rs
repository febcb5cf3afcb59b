use anyhow::Result;

use crate::commands::CommandReport;
use crate::site::config::describe_keys;
use crate::site::describe::provider_chain;
use crate::site::history::{self, HistoryLog};
use crate::site::paths::resolve_paths;
use crate::site::render::write_page;
use crate::site::sidebar;
use crate::site::warn;

/// Render one page per retained day plus the homepage, all sharing the
/// sidebar fragment built from the persisted history.
pub fn run() -> Result<CommandReport> {
    let paths = resolve_paths()?;
    let mut report = CommandReport::new("render");
    report.detail(format!("site_dir={}", paths.site_dir.display()));

    let log = HistoryLog::load(&paths.history_file);
    let current = history::load_current_items(&paths.current_file);

    let keys = describe_keys();
    if keys.openai.is_none() && keys.google.is_none() {
        warn::emit(
            "describe_keys_missing",
            "render",
            "providers",
            "placeholder descriptions only",
        );
        report.detail("no text-generation keys set; using placeholder descriptions");
    }
    let providers = provider_chain(&keys)?;

    let sidebar_html = sidebar::to_html(&sidebar::build(&log));

    let mut rendered = 0usize;
    for record in &log.records {
        let filename = if record.filename.is_empty() {
            format!("recommend_{}.html", record.date.replace('/', ""))
        } else {
            record.filename.clone()
        };
        let path = paths.site_dir.join(&filename);
        let page_title = format!("{} のおすすめペット商品", record.date);

        match write_page(&path, &page_title, &record.items, &sidebar_html, &providers) {
            Ok(()) => rendered += 1,
            Err(err) => {
                warn::emit("page_write_failed", "render", &filename, &err.to_string());
                report.issue(format!("failed to render {filename}: {err}"));
            }
        }
    }
    report.detail(format!("archive pages rendered: {rendered}"));

    if current.is_empty() {
        warn::emit("current_empty", "render", "index.html", "homepage skipped");
        report.detail("no current selection; homepage not rendered");
    } else {
        let index_path = paths.site_dir.join("index.html");
        match write_page(
            &index_path,
            "今週のおすすめペット商品",
            &current,
            &sidebar_html,
            &providers,
        ) {
            Ok(()) => report.detail("homepage rendered"),
            Err(err) => {
                warn::emit("page_write_failed", "render", "index.html", &err.to_string());
                report.issue(format!("failed to render index.html: {err}"));
            }
        }
    }

    Ok(report)
}

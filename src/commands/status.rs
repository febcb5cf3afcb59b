use anyhow::Result;

use crate::commands::CommandReport;
use crate::site::config::{catalog_credentials, describe_keys, load_config};
use crate::site::paths::resolve_paths;

/// Report resolved paths and configuration readiness without touching
/// the site.
pub fn run() -> Result<CommandReport> {
    let paths = resolve_paths()?;
    let mut report = CommandReport::new("status");

    report.detail(format!("site_dir={}", paths.site_dir.display()));
    report.detail(format!("history_file={}", paths.history_file.display()));
    report.detail(format!("current_file={}", paths.current_file.display()));

    match load_config(&paths) {
        Ok(config) => {
            report.detail(format!("keywords={}", config.keywords.join(",")));
            report.detail(format!("pick_count={}", config.pick_count));
            report.detail(format!("max_days={}", config.max_days));
            report.detail(format!("catalog_endpoint={}", config.catalog.endpoint));
        }
        Err(err) => report.issue(format!("config invalid: {err}")),
    }

    match catalog_credentials() {
        Ok(_) => report.detail("catalog credentials present"),
        Err(err) => report.issue(format!("catalog credentials missing: {err}")),
    }

    let keys = describe_keys();
    match (keys.openai.is_some(), keys.google.is_some()) {
        (false, false) => {
            report.detail("no text-generation keys; descriptions will use the placeholder")
        }
        (openai, google) => report.detail(format!(
            "text-generation keys: openai={openai} google={google}"
        )),
    }

    if !paths.site_dir.exists() {
        report.issue("site dir does not exist");
    }
    if !paths.history_file.exists() {
        report.detail("history file not created yet (first run will create it)");
    }

    Ok(report)
}

use anyhow::{Context, Result};
use std::env;
use std::path::PathBuf;

#[derive(Debug, Clone)]
pub struct SitePaths {
    pub site_dir: PathBuf,
    pub history_file: PathBuf,
    pub current_file: PathBuf,
}

fn env_or_default_path(var: &str, fallback: PathBuf) -> PathBuf {
    match env::var(var) {
        Ok(v) if !v.trim().is_empty() => PathBuf::from(v.trim()),
        _ => fallback,
    }
}

/// Resolve where the generated site lives. Everything (history state,
/// current selection, rendered pages) sits in one flat directory, the
/// way the published site is served.
pub fn resolve_paths() -> Result<SitePaths> {
    let cwd = env::current_dir().context("current directory could not be resolved")?;
    let site_dir = env_or_default_path("PAWPICKS_SITE_DIR", cwd);

    let history_file =
        env_or_default_path("PAWPICKS_HISTORY_FILE", site_dir.join("history.json"));
    let current_file =
        env_or_default_path("PAWPICKS_CURRENT_FILE", site_dir.join("current_week.json"));

    Ok(SitePaths {
        site_dir,
        history_file,
        current_file,
    })
}

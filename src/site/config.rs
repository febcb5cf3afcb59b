use anyhow::{Result, anyhow};
use serde::{Deserialize, Serialize};
use std::env;
use std::fs;
use std::path::PathBuf;

use crate::error::SetupError;
use crate::site::history::MAX_DAYS;
use crate::site::paths::SitePaths;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CatalogConfig {
    pub endpoint: String,
    pub site: String,
    pub service: String,
    pub hits: u32,
    pub sort: String,
}

impl Default for CatalogConfig {
    fn default() -> Self {
        Self {
            endpoint: "https://api.dmm.com/affiliate/v3/ItemList".to_string(),
            site: "DMM.com".to_string(),
            // "mono" keeps the adult catalog out of the results
            service: "mono".to_string(),
            hits: 30,
            sort: "rank".to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SiteConfig {
    pub keywords: Vec<String>,
    pub pick_count: usize,
    /// Retention window in days, handed as one value to both the
    /// history prune and the artifact sweep.
    pub max_days: i64,
    pub catalog: CatalogConfig,
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            keywords: [
                "イヌ関連",
                "ネコ関連",
                "ペット用品",
                "ペット",
                "イヌ",
                "ネコ",
                "おやつ",
                "ペットおもちゃ",
            ]
            .iter()
            .map(ToString::to_string)
            .collect(),
            pick_count: 5,
            max_days: MAX_DAYS,
            catalog: CatalogConfig::default(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
struct PartialSiteConfig {
    keywords: Option<Vec<String>>,
    pick_count: Option<usize>,
    max_days: Option<i64>,
    catalog: Option<CatalogConfig>,
}

fn env_or_usize(var: &str, fallback: usize) -> usize {
    match env::var(var) {
        Ok(v) => v.trim().parse::<usize>().ok().unwrap_or(fallback),
        Err(_) => fallback,
    }
}

fn env_or_i64(var: &str, fallback: i64) -> i64 {
    match env::var(var) {
        Ok(v) => v.trim().parse::<i64>().ok().unwrap_or(fallback),
        Err(_) => fallback,
    }
}

fn env_or_u32(var: &str, fallback: u32) -> u32 {
    match env::var(var) {
        Ok(v) => v.trim().parse::<u32>().ok().unwrap_or(fallback),
        Err(_) => fallback,
    }
}

fn env_or_string(var: &str, fallback: &str) -> String {
    match env::var(var) {
        Ok(v) if !v.trim().is_empty() => v.trim().to_string(),
        _ => fallback.to_string(),
    }
}

fn env_or_csv(var: &str, fallback: &[String]) -> Vec<String> {
    match env::var(var) {
        Ok(v) => {
            let out = v
                .split(',')
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(ToOwned::to_owned)
                .collect::<Vec<_>>();
            if out.is_empty() { fallback.to_vec() } else { out }
        }
        Err(_) => fallback.to_vec(),
    }
}

fn validate(cfg: &SiteConfig) -> Result<()> {
    if cfg.keywords.is_empty() || cfg.keywords.iter().any(|k| k.trim().is_empty()) {
        return Err(anyhow!("invalid keywords: need at least one non-empty keyword"));
    }
    if cfg.pick_count == 0 {
        return Err(anyhow!("invalid pick count: must be >= 1"));
    }
    if cfg.max_days < 1 {
        return Err(anyhow!("invalid max days: must be >= 1"));
    }
    if cfg.catalog.hits == 0 {
        return Err(anyhow!("invalid catalog hits: must be >= 1"));
    }
    if !cfg.catalog.endpoint.starts_with("http") {
        return Err(anyhow!("invalid catalog endpoint: must be an http(s) URL"));
    }
    if cfg.catalog.site.trim().is_empty()
        || cfg.catalog.service.trim().is_empty()
        || cfg.catalog.sort.trim().is_empty()
    {
        return Err(anyhow!("invalid catalog config: site/service/sort cannot be empty"));
    }
    Ok(())
}

fn resolve_config_path(paths: &SitePaths) -> Option<PathBuf> {
    if let Ok(custom) = env::var("PAWPICKS_CONFIG_PATH") {
        let trimmed = custom.trim();
        if !trimmed.is_empty() {
            return Some(PathBuf::from(trimmed));
        }
    }

    let local = paths.site_dir.join("pawpicks.toml");
    if local.exists() {
        return Some(local);
    }

    let home = dirs::home_dir()?;
    Some(home.join(".pawpicks.toml"))
}

fn apply_partial(base: &mut SiteConfig, partial: PartialSiteConfig) {
    if let Some(keywords) = partial.keywords {
        base.keywords = keywords;
    }
    if let Some(pick_count) = partial.pick_count {
        base.pick_count = pick_count;
    }
    if let Some(max_days) = partial.max_days {
        base.max_days = max_days;
    }
    if let Some(catalog) = partial.catalog {
        base.catalog = catalog;
    }
}

fn merge_file_config(base: &mut SiteConfig, paths: &SitePaths) -> Result<()> {
    let Some(path) = resolve_config_path(paths) else {
        return Ok(());
    };
    if !path.exists() {
        return Ok(());
    }

    let raw = fs::read_to_string(&path)?;
    let parsed: PartialSiteConfig = toml::from_str(&raw)
        .map_err(|err| anyhow!("failed to parse config {}: {err}", path.display()))?;
    apply_partial(base, parsed);
    Ok(())
}

pub fn load_config(paths: &SitePaths) -> Result<SiteConfig> {
    let mut cfg = SiteConfig::default();
    merge_file_config(&mut cfg, paths)?;

    cfg.keywords = env_or_csv("PAWPICKS_KEYWORDS", &cfg.keywords);
    cfg.pick_count = env_or_usize("PAWPICKS_PICK_COUNT", cfg.pick_count);
    cfg.max_days = env_or_i64("PAWPICKS_MAX_DAYS", cfg.max_days);
    cfg.catalog.endpoint = env_or_string("PAWPICKS_CATALOG_ENDPOINT", &cfg.catalog.endpoint);
    cfg.catalog.hits = env_or_u32("PAWPICKS_CATALOG_HITS", cfg.catalog.hits);
    cfg.catalog.sort = env_or_string("PAWPICKS_CATALOG_SORT", &cfg.catalog.sort);

    validate(&cfg)?;
    Ok(cfg)
}

#[derive(Debug, Clone)]
pub struct CatalogCredentials {
    pub api_id: String,
    pub affiliate_id: String,
}

fn non_empty_env(var: &str) -> Option<String> {
    match env::var(var) {
        Ok(v) if !v.trim().is_empty() => Some(v.trim().to_string()),
        _ => None,
    }
}

/// Both catalog credentials are required; a missing one is the only
/// failure class that aborts before any work begins.
pub fn catalog_credentials() -> Result<CatalogCredentials, SetupError> {
    let api_id = non_empty_env("DMM_API_ID").ok_or(SetupError::MissingCatalogApiId)?;
    let affiliate_id =
        non_empty_env("DMM_AFFILIATE_ID").ok_or(SetupError::MissingCatalogAffiliateId)?;
    Ok(CatalogCredentials {
        api_id,
        affiliate_id,
    })
}

/// Text-generation keys are optional: with neither set the renderer
/// falls back to the fixed placeholder sentence on every item.
#[derive(Debug, Clone, Default)]
pub struct DescribeKeys {
    pub openai: Option<String>,
    pub google: Option<String>,
}

pub fn describe_keys() -> DescribeKeys {
    DescribeKeys {
        openai: non_empty_env("OPENAI_API_KEY"),
        google: non_empty_env("GOOGLE_API_KEY"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_validate() {
        validate(&SiteConfig::default()).expect("defaults are valid");
    }

    #[test]
    fn zero_pick_count_is_rejected() {
        let cfg = SiteConfig {
            pick_count: 0,
            ..SiteConfig::default()
        };
        assert!(validate(&cfg).is_err());
    }

    #[test]
    fn non_positive_max_days_is_rejected() {
        let cfg = SiteConfig {
            max_days: 0,
            ..SiteConfig::default()
        };
        assert!(validate(&cfg).is_err());
    }

    #[test]
    fn blank_keyword_is_rejected() {
        let cfg = SiteConfig {
            keywords: vec!["ペット".to_string(), "  ".to_string()],
            ..SiteConfig::default()
        };
        assert!(validate(&cfg).is_err());
    }

    #[test]
    fn env_i64_override_parses_or_falls_back() {
        // Variable name is unique to this test, so no cross-test races.
        unsafe { env::set_var("PAWPICKS_TEST_MAX_DAYS", "14") };
        assert_eq!(env_or_i64("PAWPICKS_TEST_MAX_DAYS", 30), 14);

        unsafe { env::set_var("PAWPICKS_TEST_MAX_DAYS", "soon") };
        assert_eq!(env_or_i64("PAWPICKS_TEST_MAX_DAYS", 30), 30);
    }

    #[test]
    fn partial_toml_overrides_only_named_sections() {
        let mut cfg = SiteConfig::default();
        let parsed: PartialSiteConfig =
            toml::from_str("keywords = [\"犬\"]\npick_count = 3\nmax_days = 7\n")
                .expect("parse toml");
        apply_partial(&mut cfg, parsed);

        assert_eq!(cfg.keywords, vec!["犬".to_string()]);
        assert_eq!(cfg.pick_count, 3);
        assert_eq!(cfg.max_days, 7);
        assert_eq!(cfg.catalog.sort, "rank");
    }
}

use anyhow::{Context, Result, bail};
use reqwest::blocking::Client;
use serde::Deserialize;
use std::collections::HashMap;
use std::time::Duration;

use crate::site::config::{CatalogConfig, CatalogCredentials};
use crate::site::history::{Item, Price};

pub struct CatalogClient {
    client: Client,
    config: CatalogConfig,
    credentials: CatalogCredentials,
}

#[derive(Debug, Deserialize)]
struct ItemListResponse {
    result: Option<ItemListResult>,
}

#[derive(Debug, Deserialize, Default)]
struct ItemListResult {
    #[serde(default)]
    items: Vec<RawItem>,
}

#[derive(Debug, Deserialize, Default)]
struct RawItem {
    title: Option<String>,
    #[serde(rename = "URL")]
    url: Option<String>,
    #[serde(rename = "imageURL")]
    image_url: Option<RawImageUrl>,
    prices: Option<RawPrices>,
}

#[derive(Debug, Deserialize, Default)]
struct RawImageUrl {
    large: Option<String>,
}

#[derive(Debug, Deserialize, Default)]
struct RawPrices {
    price: Option<Price>,
}

fn map_items(parsed: ItemListResponse) -> Vec<Item> {
    let Some(result) = parsed.result else {
        return Vec::new();
    };
    result
        .items
        .into_iter()
        .map(|raw| Item {
            title: raw.title.unwrap_or_else(|| "不明".to_string()),
            url: raw.url.unwrap_or_default(),
            image: raw.image_url.and_then(|i| i.large).unwrap_or_default(),
            price: raw.prices.and_then(|p| p.price).unwrap_or_default(),
            source: "DMM".to_string(),
        })
        .collect()
}

impl CatalogClient {
    pub fn new(config: &CatalogConfig, credentials: CatalogCredentials) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(30))
            .build()
            .context("failed to build catalog HTTP client")?;
        Ok(Self {
            client,
            config: config.clone(),
            credentials,
        })
    }

    /// One keyword-parameterized search. An empty result list is valid:
    /// the keyword simply contributes nothing to the merge pool.
    pub fn search(&self, keyword: &str) -> Result<Vec<Item>> {
        let hits = self.config.hits.to_string();
        let resp = self
            .client
            .get(&self.config.endpoint)
            .query(&[
                ("api_id", self.credentials.api_id.as_str()),
                ("affiliate_id", self.credentials.affiliate_id.as_str()),
                ("site", self.config.site.as_str()),
                ("service", self.config.service.as_str()),
                ("keyword", keyword),
                ("hits", hits.as_str()),
                ("sort", self.config.sort.as_str()),
            ])
            .send()
            .with_context(|| format!("catalog request failed for keyword {keyword}"))?;

        if !resp.status().is_success() {
            let status = resp.status();
            let body = resp
                .text()
                .unwrap_or_else(|_| "<body unavailable>".to_string());
            bail!("catalog returned {status} for keyword {keyword}: {body}");
        }

        let parsed: ItemListResponse = resp
            .json()
            .with_context(|| format!("invalid catalog JSON for keyword {keyword}"))?;
        Ok(map_items(parsed))
    }
}

/// Flatten per-keyword batches into one pool, deduplicated by URL.
/// First occurrence keeps its position; a later duplicate replaces the
/// stored item (last write wins).
pub fn merge_by_url(batches: Vec<Vec<Item>>) -> Vec<Item> {
    let mut pool: Vec<Item> = Vec::new();
    let mut index_by_url: HashMap<String, usize> = HashMap::new();

    for item in batches.into_iter().flatten() {
        match index_by_url.get(&item.url) {
            Some(&slot) => pool[slot] = item,
            None => {
                index_by_url.insert(item.url.clone(), pool.len());
                pool.push(item);
            }
        }
    }

    pool
}

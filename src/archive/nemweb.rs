//! HTTP source for the published MMSDM archive on nemweb.

use std::collections::HashMap;
use std::io::{Cursor, Read};
use std::sync::Arc;
use std::time::{Duration, Instant};

use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue, USER_AGENT};
use tokio::sync::RwLock;
use tracing::{debug, info};

use super::{ArchiveSource, MmsTable};
use crate::config::ArchiveConfig;
use crate::domain::Period;
use crate::error::{ArchiveError, Result};

/// Fetches monthly archive tables over HTTP.
///
/// Tables are published one zip-packaged CSV per table per month. Fetched
/// text is cached per `(period, table)` with a TTL; concurrent fills of one
/// key resolve first-writer-wins, so a key is written once per fill.
pub struct NemwebArchive {
    base_url: String,
    client: reqwest::Client,
    cache: RwLock<HashMap<(Period, MmsTable), CachedTable>>,
    ttl: Duration,
}

#[derive(Clone)]
struct CachedTable {
    fetched_at: Instant,
    text: Arc<str>,
}

impl NemwebArchive {
    pub fn new(config: &ArchiveConfig) -> Result<Self> {
        let mut headers = HeaderMap::new();
        headers.insert(
            USER_AGENT,
            HeaderValue::from_str(&config.user_agent)
                .map_err(|e| ArchiveError::Transport(format!("invalid user agent: {e}")))?,
        );
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.http_timeout_seconds))
            .default_headers(headers)
            .build()?;

        Ok(Self {
            base_url: config.base_url.trim_end_matches('/').to_string(),
            client,
            cache: RwLock::new(HashMap::new()),
            ttl: Duration::from_secs(config.cache_ttl_seconds),
        })
    }

    fn table_url(&self, period: Period, table: MmsTable) -> String {
        format!(
            "{}/{}/MMSDM_{}_{:02}/MMSDM_Historical_Data_SQLLoader/DATA/PUBLIC_DVD_{}_{}010000.zip",
            self.base_url,
            period.year(),
            period.year(),
            period.month(),
            table,
            period.archive_stamp(),
        )
    }

    async fn download(&self, period: Period, table: MmsTable) -> Result<String> {
        let url = self.table_url(period, table);
        debug!(%url, "fetching archive table");

        let resp = self.client.get(&url).send().await?;
        if resp.status() == reqwest::StatusCode::NOT_FOUND {
            return Err(ArchiveError::not_found(
                "fetch_table",
                format!("{table} {period}"),
            ));
        }
        if !resp.status().is_success() {
            return Err(ArchiveError::Transport(format!(
                "archive returned HTTP {} for {url}",
                resp.status()
            )));
        }

        let body = resp.bytes().await?;
        unpack_report(table, &body)
    }
}

/// Extract the single CSV packaged in a monthly archive zip.
fn unpack_report(table: MmsTable, body: &[u8]) -> Result<String> {
    let mut archive = zip::ZipArchive::new(Cursor::new(body))
        .map_err(|e| ArchiveError::parse(table.to_string(), format!("not a zip archive: {e}")))?;
    if archive.len() == 0 {
        return Err(ArchiveError::parse(table.to_string(), "empty zip archive"));
    }
    let mut file = archive
        .by_index(0)
        .map_err(|e| ArchiveError::parse(table.to_string(), format!("unreadable zip entry: {e}")))?;
    let mut text = String::new();
    file.read_to_string(&mut text)
        .map_err(|e| ArchiveError::parse(table.to_string(), format!("unreadable zip entry: {e}")))?;
    Ok(text)
}

#[async_trait]
impl ArchiveSource for NemwebArchive {
    async fn fetch_table(&self, period: Period, table: MmsTable) -> Result<String> {
        let key = (period, table);
        {
            let cache = self.cache.read().await;
            if let Some(entry) = cache.get(&key) {
                if entry.fetched_at.elapsed() < self.ttl {
                    debug!(%period, %table, "archive table served from cache");
                    return Ok(entry.text.to_string());
                }
            }
        }

        let text = self.download(period, table).await?;
        info!(%period, %table, bytes = text.len(), "fetched archive table");

        let mut cache = self.cache.write().await;
        let entry = cache
            .entry(key)
            .and_modify(|entry| {
                if entry.fetched_at.elapsed() >= self.ttl {
                    *entry = CachedTable {
                        fetched_at: Instant::now(),
                        text: Arc::from(text.as_str()),
                    };
                }
            })
            .or_insert_with(|| CachedTable {
                fetched_at: Instant::now(),
                text: Arc::from(text.as_str()),
            });
        Ok(entry.text.to_string())
    }
}

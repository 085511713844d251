//! Cache-first asset retrieval for offline use.
//!
//! Mirrors the lifecycle of an installable web app's asset cache: `install`
//! pre-populates the named cache with the root assets, `activate` drops caches
//! left over from older versions, and `fetch` serves cached copies before
//! touching the network. When both miss, a plain-text offline notice is
//! synthesized instead of an error.

mod network;

use rusqlite::{params, Connection, OptionalExtension};
use thiserror::Error;
use tracing::{debug, info, warn};

pub use network::{HttpNetwork, Network};

/// Name of the cache this build reads and writes.
pub const CACHE_NAME: &str = "hymnal-cache-v1";

/// Assets stored on install.
pub const ROOT_ASSETS: &[&str] = &[
    "/",
    "/index.html",
    "/manifest.json",
    "/logo-192.png",
    "/logo-512.png",
];

/// Body of the response synthesized when neither cache nor network answers.
pub const OFFLINE_MESSAGE: &str = "You are offline. Some features may not be available.";

#[derive(Debug, Error)]
pub enum CacheError {
    #[error("cache database error: {0}")]
    Database(#[from] rusqlite::Error),
    #[error("network error: {0}")]
    Http(#[from] reqwest::Error),
    #[error("invalid request: {0}")]
    InvalidRequest(String),
    #[error("{url} answered with status {status}")]
    BadStatus { url: String, status: u16 },
    #[error("network unreachable")]
    Unreachable,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssetRequest {
    pub method: String,
    /// Path (or absolute URL) of the asset, used verbatim as the cache key.
    pub url: String,
}

impl AssetRequest {
    pub fn get(url: impl Into<String>) -> Self {
        Self {
            method: "GET".to_string(),
            url: url.into(),
        }
    }

    fn is_get(&self) -> bool {
        self.method.eq_ignore_ascii_case("GET")
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResponseKind {
    /// Same-origin response. Only these are ever cached.
    Basic,
    /// Cross-origin response.
    Cors,
    /// Built locally rather than fetched.
    Synthesized,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssetResponse {
    pub status: u16,
    pub content_type: Option<String>,
    pub body: Vec<u8>,
    pub kind: ResponseKind,
}

impl AssetResponse {
    /// The placeholder returned when the asset is unreachable.
    pub fn offline() -> Self {
        Self {
            status: 200,
            content_type: Some("text/plain".to_string()),
            body: OFFLINE_MESSAGE.as_bytes().to_vec(),
            kind: ResponseKind::Synthesized,
        }
    }

    pub fn is_offline_placeholder(&self) -> bool {
        self.kind == ResponseKind::Synthesized
    }

    pub fn text(&self) -> String {
        String::from_utf8_lossy(&self.body).into_owned()
    }
}

pub struct OfflineCache<N: Network> {
    conn: Connection,
    network: N,
    cache_name: String,
}

impl<N: Network> OfflineCache<N> {
    /// Wrap a connection whose schema was prepared by `ensure_schema`.
    pub fn new(conn: Connection, network: N) -> Self {
        Self::with_name(conn, network, CACHE_NAME)
    }

    pub fn with_name(conn: Connection, network: N, cache_name: &str) -> Self {
        Self {
            conn,
            network,
            cache_name: cache_name.to_string(),
        }
    }

    /// Fetch and store every root asset. Nothing is stored unless all of them
    /// succeed.
    pub fn install(&self) -> Result<usize, CacheError> {
        let mut fetched = Vec::with_capacity(ROOT_ASSETS.len());
        for url in ROOT_ASSETS {
            let request = AssetRequest::get(*url);
            let response = self.network.fetch(&request)?;
            if response.status != 200 {
                return Err(CacheError::BadStatus {
                    url: url.to_string(),
                    status: response.status,
                });
            }
            fetched.push((request, response));
        }

        let tx = self.conn.unchecked_transaction()?;
        for (request, response) in &fetched {
            put(&tx, &self.cache_name, request, response)?;
        }
        tx.commit()?;

        info!(cache = %self.cache_name, assets = fetched.len(), "asset cache installed");
        Ok(fetched.len())
    }

    /// Whether every root asset is present in the current cache.
    pub fn is_installed(&self) -> Result<bool, CacheError> {
        for url in ROOT_ASSETS {
            if self.lookup(&AssetRequest::get(*url))?.is_none() {
                return Ok(false);
            }
        }
        Ok(true)
    }

    /// Delete every cache whose name differs from the current one.
    pub fn activate(&self) -> Result<usize, CacheError> {
        let removed = self.conn.execute(
            "DELETE FROM asset_cache WHERE cache_name <> ?1",
            params![self.cache_name],
        )?;
        if removed > 0 {
            info!(removed, "stale cached assets removed");
        }
        Ok(removed)
    }

    /// Serve `request` cache-first, falling back to the network and finally to
    /// the offline placeholder. Never fails.
    pub fn fetch(&self, request: &AssetRequest) -> AssetResponse {
        match self.lookup(request) {
            Ok(Some(cached)) => {
                debug!(url = %request.url, "cache hit");
                return cached;
            }
            Ok(None) => {}
            Err(err) => warn!(url = %request.url, error = %err, "cache lookup failed"),
        }

        match self.network.fetch(request) {
            Ok(response) => {
                if request.is_get() && response.status == 200 && response.kind == ResponseKind::Basic {
                    if let Err(err) = put(&self.conn, &self.cache_name, request, &response) {
                        warn!(url = %request.url, error = %err, "failed to cache asset");
                    }
                }
                response
            }
            Err(err) => {
                debug!(url = %request.url, error = %err, "network fetch failed");
                AssetResponse::offline()
            }
        }
    }

    /// Cached copy of `request`, if any. Only GET requests match.
    pub fn lookup(&self, request: &AssetRequest) -> Result<Option<AssetResponse>, CacheError> {
        if !request.is_get() {
            return Ok(None);
        }
        let cached = self
            .conn
            .query_row(
                "SELECT status, content_type, body FROM asset_cache
                 WHERE cache_name = ?1 AND url = ?2",
                params![self.cache_name, request.url],
                |row| {
                    Ok(AssetResponse {
                        status: row.get(0)?,
                        content_type: row.get(1)?,
                        body: row.get(2)?,
                        kind: ResponseKind::Basic,
                    })
                },
            )
            .optional()?;
        Ok(cached)
    }
}

fn put(
    conn: &Connection,
    cache_name: &str,
    request: &AssetRequest,
    response: &AssetResponse,
) -> Result<(), CacheError> {
    conn.execute(
        "INSERT INTO asset_cache (cache_name, url, status, content_type, body)
         VALUES (?1, ?2, ?3, ?4, ?5)
         ON CONFLICT(cache_name, url) DO UPDATE SET
             status = excluded.status,
             content_type = excluded.content_type,
             body = excluded.body",
        params![
            cache_name,
            request.url,
            response.status,
            response.content_type,
            response.body
        ],
    )?;
    Ok(())
}

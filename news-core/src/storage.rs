use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use tokio::sync::RwLock;
use tracing::{debug, warn};

use crate::models::NewsPage;

/// A cached page plus the instant it was stored.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CacheEntry {
    pub payload: NewsPage,
    pub stored_at: DateTime<Utc>,
}

impl CacheEntry {
    pub fn new(payload: NewsPage) -> Self {
        Self {
            payload,
            stored_at: Utc::now(),
        }
    }

    /// Age check performed at read time; stale entries are ignored, never purged.
    pub fn is_fresh(&self, max_age: Duration) -> bool {
        Utc::now() - self.stored_at <= max_age
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
struct CacheData {
    // cache key -> stored entry
    entries: HashMap<String, CacheEntry>,
}

/// Key-value store for cached pages, optionally persisted as JSON on disk.
#[derive(Debug, Clone)]
pub struct CacheStore {
    inner: Arc<RwLock<CacheData>>,
    path: Option<PathBuf>,
}

impl CacheStore {
    pub fn in_memory() -> Self {
        Self {
            inner: Arc::new(RwLock::new(CacheData::default())),
            path: None,
        }
    }

    /// Load a store backed by the given JSON file, falling back to its temp
    /// copy when the main file is corrupted.
    pub async fn load_from(path: impl AsRef<Path>) -> Self {
        let path = path.as_ref().to_path_buf();
        let data = match tokio::fs::read(&path).await {
            Ok(bytes) => match serde_json::from_slice::<CacheData>(&bytes) {
                Ok(data) => data,
                Err(err) => {
                    warn!(error = %err, path = %path.display(), "failed to parse cache store, trying tmp fallback");
                    let tmp = path.with_extension("json.tmp");
                    match tokio::fs::read(&tmp).await {
                        Ok(tmp_bytes) => {
                            serde_json::from_slice::<CacheData>(&tmp_bytes).unwrap_or_default()
                        }
                        Err(_) => CacheData::default(),
                    }
                }
            },
            Err(_) => CacheData::default(),
        };
        Self {
            inner: Arc::new(RwLock::new(data)),
            path: Some(path),
        }
    }

    pub async fn get(&self, key: &str) -> Option<CacheEntry> {
        let inner = self.inner.read().await;
        inner.entries.get(key).cloned()
    }

    /// Overwrite the entry under `key` and persist the store.
    pub async fn set(&self, key: &str, entry: CacheEntry) {
        let mut inner = self.inner.write().await;
        inner.entries.insert(key.to_owned(), entry);
        drop(inner);
        if let Err(err) = self.persist().await {
            warn!(%err, "failed to persist news cache");
        }
    }

    async fn persist(&self) -> Result<(), std::io::Error> {
        if let Some(path) = &self.path {
            let inner = self.inner.read().await;
            let bytes = serde_json::to_vec_pretty(&*inner).expect("serialize cache data");
            drop(inner);
            if let Some(parent) = path.parent() {
                tokio::fs::create_dir_all(parent).await.ok();
            }
            let tmp = path.with_extension("json.tmp");
            tokio::fs::write(&tmp, &bytes).await?;
            tokio::fs::rename(&tmp, path).await?;
        } else {
            debug!("cache store is in-memory only; skipping persist");
        }
        Ok(())
    }
}

/// Default on-disk location for the cache store.
pub fn default_store_path() -> Option<PathBuf> {
    dirs::cache_dir().map(|dir| dir.join("readnews").join("news_cache.json"))
}

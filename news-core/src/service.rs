use chrono::Duration;
use tracing::{debug, warn};

use crate::client::NewsApiClient;
use crate::error::FetchError;
use crate::models::{ErrorInfo, NewsPage, NewsQuery, SourceInfo};
use crate::storage::{CacheEntry, CacheStore};

/// Single cache slot: only the most recent successful page is retained,
/// whatever its query shape. Last writer wins.
pub const LATEST_NEWS_CACHE_KEY: &str = "cached_latest_news";

const CACHE_EXPIRY_MINUTES: i64 = 30;

/// Fetch orchestrator: delegates to the upstream client and serves the
/// cached snapshot when the live call fails.
pub struct NewsService {
    client: NewsApiClient,
    cache: CacheStore,
}

impl NewsService {
    pub fn new(client: NewsApiClient, cache: CacheStore) -> Self {
        Self { client, cache }
    }

    /// Fetch the current page of news for `query`.
    ///
    /// Recoverable upstream failures degrade to the cached snapshot (or an
    /// empty page) annotated with error metadata; only invalid requests come
    /// back as errors. The cache write happens after the fetch resolves, so
    /// an abandoned call stores nothing.
    pub async fn latest_news(&self, query: &NewsQuery) -> Result<NewsPage, FetchError> {
        match self.client.fetch_page(query).await {
            Ok(page) => {
                debug!(items = page.items.len(), page = page.page, "fetched news page");
                self.cache
                    .set(LATEST_NEWS_CACHE_KEY, CacheEntry::new(page.clone()))
                    .await;
                Ok(page)
            }
            Err(err) if err.is_recoverable() => Ok(self.degraded_page(query, &err).await),
            Err(err) => Err(err),
        }
    }

    /// List the upstream source directory.
    pub async fn sources(&self) -> Result<Vec<SourceInfo>, FetchError> {
        self.client.fetch_sources().await
    }

    async fn degraded_page(&self, query: &NewsQuery, err: &FetchError) -> NewsPage {
        let info = ErrorInfo::from(err);
        match self.cache.get(LATEST_NEWS_CACHE_KEY).await {
            Some(entry) if entry.is_fresh(Duration::minutes(CACHE_EXPIRY_MINUTES)) => {
                warn!(code = info.code, "news fetch failed; serving cached snapshot");
                let mut page = entry.payload;
                page.is_from_cache = true;
                page.cache_timestamp = Some(entry.stored_at);
                page.error = Some(info);
                page
            }
            _ => {
                warn!(code = info.code, "news fetch failed with no usable cache");
                let mut page = NewsPage::empty(query.page, query.page_size);
                page.error = Some(info);
                page
            }
        }
    }
}

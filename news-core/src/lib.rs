pub mod client;
pub mod config;
pub mod error;
pub mod models;
pub mod service;
pub mod storage;

pub use client::NewsApiClient;
pub use config::NewsApiConfig;
pub use error::{ConfigError, FetchError};
pub use models::{
    ErrorInfo, NewsFilters, NewsItem, NewsPage, NewsQuery, SortOrder, SourceInfo, SourceRef,
    DEFAULT_CATEGORY, NEWS_CATEGORIES, UNKNOWN_AUTHOR, UNKNOWN_SOURCE,
};
pub use service::{NewsService, LATEST_NEWS_CACHE_KEY};
pub use storage::{default_store_path, CacheEntry, CacheStore};

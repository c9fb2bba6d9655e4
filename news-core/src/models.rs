use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

/// Author sentinel for upstream records that carry none.
pub const UNKNOWN_AUTHOR: &str = "Unknown author";
/// Source-name sentinel for upstream records that carry none.
pub const UNKNOWN_SOURCE: &str = "Unknown source";
/// Category applied to records the upstream left uncategorized.
pub const DEFAULT_CATEGORY: &str = "general";

/// Category vocabulary offered by the upstream provider.
pub const NEWS_CATEGORIES: &[&str] = &[
    "business",
    "entertainment",
    "general",
    "health",
    "science",
    "sports",
    "technology",
];

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct SourceRef {
    pub id: Option<String>,
    pub name: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct NewsItem {
    pub id: String,
    pub title: String,
    pub description: String,
    pub content: String,
    pub author: String,
    pub published_at: DateTime<Utc>,
    pub source: SourceRef,
    pub url: String,
    pub image_url: Option<String>,
    pub category: String,
}

/// Entry of the upstream source directory.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct SourceInfo {
    pub id: String,
    pub name: String,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortOrder {
    /// Upstream default ordering; no sort parameter is sent.
    #[default]
    All,
    Newest,
    Relevance,
    Popularity,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct NewsFilters {
    pub search_query: Option<String>,
    pub categories: Vec<String>,
    pub sources: Vec<String>,
    pub from: Option<NaiveDate>,
    pub to: Option<NaiveDate>,
    pub sort: SortOrder,
}

/// Pagination plus filter set; structural equality identifies a request.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct NewsQuery {
    pub page: u32,
    pub page_size: u32,
    pub filters: NewsFilters,
}

impl NewsQuery {
    pub fn new(page: u32, page_size: u32) -> Self {
        Self {
            page,
            page_size,
            filters: NewsFilters::default(),
        }
    }

    pub fn with_filters(mut self, filters: NewsFilters) -> Self {
        self.filters = filters;
        self
    }
}

impl Default for NewsQuery {
    fn default() -> Self {
        Self::new(1, 10)
    }
}

/// Error metadata attached to a degraded page.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ErrorInfo {
    pub code: u16,
    pub message: String,
}

/// One page of articles plus pagination totals and degradation metadata.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct NewsPage {
    pub items: Vec<NewsItem>,
    pub page: u32,
    pub page_size: u32,
    pub total_pages: u64,
    pub total_items: u64,
    #[serde(default)]
    pub is_from_cache: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cache_timestamp: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<ErrorInfo>,
}

impl NewsPage {
    /// Result shell for failures with nothing usable in the cache.
    pub fn empty(page: u32, page_size: u32) -> Self {
        Self {
            items: Vec::new(),
            page,
            page_size,
            total_pages: 0,
            total_items: 0,
            is_from_cache: false,
            cache_timestamp: None,
            error: None,
        }
    }
}

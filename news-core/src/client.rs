use chrono::{DateTime, Utc};
use reqwest::{Client, StatusCode};
use serde::Deserialize;
use tracing::{debug, warn};

use crate::config::NewsApiConfig;
use crate::error::FetchError;
use crate::models::{
    NewsItem, NewsPage, NewsQuery, SortOrder, SourceInfo, SourceRef, DEFAULT_CATEGORY,
    UNKNOWN_AUTHOR, UNKNOWN_SOURCE,
};

const API_KEY_HEADER: &str = "X-Api-Key";
const USER_AGENT: &str = "ReadNews/0.1";

const SEARCH_ENDPOINT: &str = "everything";
const HEADLINES_ENDPOINT: &str = "top-headlines";
const SOURCES_ENDPOINT: &str = "sources";

// Wire shape of the upstream responses; every article field may be absent.
#[derive(Debug, Deserialize)]
struct RawNewsResponse {
    #[serde(default)]
    articles: Vec<RawArticle>,
    #[serde(rename = "totalResults", default)]
    total_results: u64,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawArticle {
    url: Option<String>,
    title: Option<String>,
    description: Option<String>,
    content: Option<String>,
    author: Option<String>,
    published_at: Option<String>,
    url_to_image: Option<String>,
    category: Option<String>,
    source: Option<RawSource>,
}

#[derive(Debug, Default, Deserialize)]
struct RawSource {
    id: Option<String>,
    name: Option<String>,
}

#[derive(Debug, Deserialize)]
struct RawSourcesResponse {
    #[serde(default)]
    sources: Vec<SourceInfo>,
}

/// Client for the upstream news API; stateless across calls.
pub struct NewsApiClient {
    http: Client,
    config: NewsApiConfig,
}

impl NewsApiClient {
    /// Build a client owning its transport, with the timeout from `config`.
    pub fn new(config: NewsApiConfig) -> Result<Self, FetchError> {
        let http = Client::builder()
            .timeout(config.request_timeout)
            .user_agent(USER_AGENT)
            .build()?;
        Ok(Self::with_client(http, config))
    }

    /// Wrap an externally built transport; timeout policy stays with the caller.
    pub fn with_client(http: Client, config: NewsApiConfig) -> Self {
        Self { http, config }
    }

    /// Fetch one page of articles for `query`.
    pub async fn fetch_page(&self, query: &NewsQuery) -> Result<NewsPage, FetchError> {
        if query.page < 1 {
            return Err(FetchError::InvalidRequest("page must be at least 1".into()));
        }
        if query.page_size < 1 {
            return Err(FetchError::InvalidRequest(
                "page size must be at least 1".into(),
            ));
        }

        let (endpoint, params) = self.build_request(query);
        let raw: RawNewsResponse = self.get_json(endpoint, &params).await?;

        let items = raw
            .articles
            .into_iter()
            .enumerate()
            .map(|(index, article)| map_article(article, index))
            .collect();

        Ok(NewsPage {
            items,
            page: query.page,
            page_size: query.page_size,
            total_pages: raw.total_results.div_ceil(u64::from(query.page_size)),
            total_items: raw.total_results,
            is_from_cache: false,
            cache_timestamp: None,
            error: None,
        })
    }

    /// List the upstream source directory.
    pub async fn fetch_sources(&self) -> Result<Vec<SourceInfo>, FetchError> {
        let mut params = Vec::new();
        if let Some(language) = &self.config.language {
            params.push(("language", language.clone()));
        }
        let raw: RawSourcesResponse = self.get_json(SOURCES_ENDPOINT, &params).await?;
        Ok(raw.sources)
    }

    fn build_request(&self, query: &NewsQuery) -> (&'static str, Vec<(&'static str, String)>) {
        let mut params = vec![
            ("page", query.page.to_string()),
            ("pageSize", query.page_size.to_string()),
        ];

        let filters = &query.filters;
        if !filters.categories.is_empty() {
            params.push(("category", filters.categories.join(",")));
        }
        if !filters.sources.is_empty() {
            params.push(("sources", filters.sources.join(",")));
        }
        if let Some(from) = filters.from {
            params.push(("from", from.to_string()));
        }
        if let Some(to) = filters.to {
            params.push(("to", to.to_string()));
        }

        let search = filters
            .search_query
            .as_deref()
            .map(str::trim)
            .filter(|term| !term.is_empty());

        // Headlines only serve locale-scoped requests; anything with a search
        // term (or without a configured country) goes through the general
        // search, which rejects empty queries.
        let term = match (search, self.config.country.as_deref()) {
            (Some(term), _) => term.to_owned(),
            (None, Some(country)) => {
                params.push(("country", country.to_owned()));
                return (HEADLINES_ENDPOINT, params);
            }
            (None, None) => self.config.fallback_query.clone(),
        };

        params.push(("q", term));
        if let Some(language) = &self.config.language {
            params.push(("language", language.clone()));
        }
        if let Some(sort) = sort_param(query.filters.sort) {
            params.push(("sortBy", sort.to_owned()));
        }
        (SEARCH_ENDPOINT, params)
    }

    async fn get_json<T>(
        &self,
        endpoint: &str,
        params: &[(&'static str, String)],
    ) -> Result<T, FetchError>
    where
        T: serde::de::DeserializeOwned,
    {
        let url = format!(
            "{}/{}",
            self.config.base_url.as_str().trim_end_matches('/'),
            endpoint
        );
        debug!(%endpoint, "requesting news api");

        let response = self
            .http
            .get(&url)
            .header(API_KEY_HEADER, &self.config.api_key)
            .query(params)
            .send()
            .await?;

        let status = response.status();
        if status == StatusCode::TOO_MANY_REQUESTS {
            warn!("news api request quota exhausted");
            return Err(FetchError::RateLimited);
        }

        let body = response.text().await?;
        if !status.is_success() {
            let message = upstream_message(&body).unwrap_or_else(|| {
                status
                    .canonical_reason()
                    .unwrap_or("unexpected status")
                    .to_owned()
            });
            warn!(status = status.as_u16(), %message, "news api returned error status");
            return Err(FetchError::Upstream {
                status: status.as_u16(),
                message,
            });
        }

        Ok(serde_json::from_str(&body)?)
    }
}

/// Best-effort extraction of the message the upstream embeds in error bodies.
fn upstream_message(body: &str) -> Option<String> {
    serde_json::from_str::<serde_json::Value>(body)
        .ok()?
        .get("message")?
        .as_str()
        .map(ToOwned::to_owned)
}

fn sort_param(sort: SortOrder) -> Option<&'static str> {
    match sort {
        SortOrder::All => None,
        SortOrder::Newest => Some("publishedAt"),
        SortOrder::Relevance => Some("relevance"),
        SortOrder::Popularity => Some("popularity"),
    }
}

fn map_article(raw: RawArticle, index: usize) -> NewsItem {
    let url = raw.url.unwrap_or_default();
    let id = if url.is_empty() {
        format!("news-{index}")
    } else {
        url.clone()
    };
    let published_at = raw
        .published_at
        .as_deref()
        .and_then(|value| DateTime::parse_from_rfc3339(value).ok())
        .map(|dt| dt.with_timezone(&Utc))
        .unwrap_or_else(Utc::now);
    let source = raw.source.unwrap_or_default();

    NewsItem {
        id,
        title: raw.title.unwrap_or_default(),
        description: raw.description.unwrap_or_default(),
        content: raw.content.unwrap_or_default(),
        author: raw.author.unwrap_or_else(|| UNKNOWN_AUTHOR.to_owned()),
        published_at,
        source: SourceRef {
            id: source.id,
            name: source.name.unwrap_or_else(|| UNKNOWN_SOURCE.to_owned()),
        },
        url,
        image_url: raw.url_to_image,
        category: raw.category.unwrap_or_else(|| DEFAULT_CATEGORY.to_owned()),
    }
}

use std::env;
use std::time::Duration;

use url::Url;

use crate::error::ConfigError;

/// Production endpoint of the upstream news provider.
pub const DEFAULT_BASE_URL: &str = "https://newsapi.org/v2";

const DEFAULT_FALLBACK_QUERY: &str = "news";
const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 10;

const ENV_API_KEY: &str = "NEWS_API_KEY";
const ENV_BASE_URL: &str = "NEWS_API_BASE_URL";
const ENV_LANGUAGE: &str = "NEWS_API_LANGUAGE";
const ENV_COUNTRY: &str = "NEWS_API_COUNTRY";

/// Connection settings for the upstream news API, injected into the client
/// at construction instead of read from ambient process state.
#[derive(Debug, Clone)]
pub struct NewsApiConfig {
    pub api_key: String,
    pub base_url: Url,
    /// Restrict article language on search requests, e.g. "en".
    pub language: Option<String>,
    /// Headline locale; when set, queries without a search term go to the
    /// headline endpoint for this country instead of the general search.
    pub country: Option<String>,
    /// Search term used when a query carries none; the general-search
    /// endpoint rejects empty queries.
    pub fallback_query: String,
    pub request_timeout: Duration,
}

impl NewsApiConfig {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            base_url: Url::parse(DEFAULT_BASE_URL).expect("default base url is valid"),
            language: None,
            country: None,
            fallback_query: DEFAULT_FALLBACK_QUERY.to_owned(),
            request_timeout: Duration::from_secs(DEFAULT_REQUEST_TIMEOUT_SECS),
        }
    }

    /// Build a configuration from the `NEWS_API_*` environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        let api_key = env::var(ENV_API_KEY).map_err(|_| ConfigError::MissingVar(ENV_API_KEY))?;
        let mut config = Self::new(api_key);
        if let Ok(base_url) = env::var(ENV_BASE_URL) {
            config.base_url = Url::parse(&base_url)?;
        }
        if let Ok(language) = env::var(ENV_LANGUAGE) {
            config.language = Some(language);
        }
        if let Ok(country) = env::var(ENV_COUNTRY) {
            config.country = Some(country);
        }
        Ok(config)
    }

    pub fn with_base_url(mut self, base_url: Url) -> Self {
        self.base_url = base_url;
        self
    }

    pub fn with_language(mut self, language: impl Into<String>) -> Self {
        self.language = Some(language.into());
        self
    }

    pub fn with_country(mut self, country: impl Into<String>) -> Self {
        self.country = Some(country.into());
        self
    }

    pub fn with_fallback_query(mut self, query: impl Into<String>) -> Self {
        self.fallback_query = query.into();
        self
    }

    pub fn with_request_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = timeout;
        self
    }
}

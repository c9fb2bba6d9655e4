use thiserror::Error;

use crate::models::ErrorInfo;

/// Failure classes for a single upstream fetch.
#[derive(Debug, Error)]
pub enum FetchError {
    /// Caller-side parameter problem; never recovered from cache.
    #[error("invalid request: {0}")]
    InvalidRequest(String),
    #[error("news api request quota exhausted")]
    RateLimited,
    #[error("news api returned HTTP {status}: {message}")]
    Upstream { status: u16, message: String },
    #[error("network error: {0}")]
    Network(#[from] reqwest::Error),
    #[error("malformed news api response: {0}")]
    Parse(#[from] serde_json::Error),
}

impl FetchError {
    /// Whether a cached snapshot may stand in for this failure.
    pub fn is_recoverable(&self) -> bool {
        !matches!(self, FetchError::InvalidRequest(_))
    }

    /// Numeric code surfaced to the UI layer.
    pub fn error_code(&self) -> u16 {
        match self {
            FetchError::InvalidRequest(_) => 400,
            FetchError::RateLimited => 429,
            FetchError::Upstream { status, .. } => *status,
            FetchError::Network(_) | FetchError::Parse(_) => 500,
        }
    }
}

impl From<&FetchError> for ErrorInfo {
    fn from(err: &FetchError) -> Self {
        let message = match err {
            FetchError::RateLimited => "News API request limit reached. Please try again later.",
            _ => "Failed to fetch news from the provider. Please try again later.",
        };
        ErrorInfo {
            code: err.error_code(),
            message: message.to_owned(),
        }
    }
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("environment variable {0} is not set")]
    MissingVar(&'static str),
    #[error("invalid base url: {0}")]
    InvalidBaseUrl(#[from] url::ParseError),
}

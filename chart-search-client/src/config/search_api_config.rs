use crate::error_handler::{ConfigError, Result, validate_http_endpoint};

/// Default number of charts requested per page.
pub const DEFAULT_PAGE_SIZE: u32 = 25;

/// Default number of attempts for one search request (first try included).
pub const DEFAULT_RETRY_ATTEMPTS: u32 = 10;

/// Default pause between two attempts, in milliseconds.
pub const DEFAULT_RETRY_BACKOFF_MS: u64 = 2000;

/// Configuration for talking to the chart search API.
///
/// # Fields
///
/// - `endpoint`: API base URL; `/search` and `/search/advanced` are appended.
/// - `timeout_secs`: optional per-request timeout in seconds.
/// - `page_size`: charts per page (`per_page` on the wire).
/// - `retry_attempts`: attempts per request before giving up.
/// - `retry_backoff_ms`: constant pause between attempts.
///
/// # Examples
///
/// ```
/// use chart_search_client::config::search_api_config::SearchApiConfig;
///
/// let cfg = SearchApiConfig::new("http://localhost:8080").unwrap();
/// assert_eq!(cfg.page_size, 25);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchApiConfig {
    /// API base URL (remote or local).
    pub endpoint: String,

    /// Optional request timeout (in seconds).
    pub timeout_secs: Option<u64>,

    /// Charts per page.
    pub page_size: u32,

    /// Attempts per request, first try included.
    pub retry_attempts: u32,

    /// Constant pause between attempts (milliseconds).
    pub retry_backoff_ms: u64,
}

impl SearchApiConfig {
    /// Builds a config with default paging and retry settings.
    ///
    /// # Errors
    /// Returns [`ConfigError::InvalidFormat`] if `endpoint` is not http/https.
    pub fn new(endpoint: impl Into<String>) -> Result<Self> {
        let cfg = Self {
            endpoint: endpoint.into().trim().trim_end_matches('/').to_string(),
            timeout_secs: None,
            page_size: DEFAULT_PAGE_SIZE,
            retry_attempts: DEFAULT_RETRY_ATTEMPTS,
            retry_backoff_ms: DEFAULT_RETRY_BACKOFF_MS,
        };
        cfg.validate()?;
        Ok(cfg)
    }

    /// Validates config values.
    pub fn validate(&self) -> Result<()> {
        validate_http_endpoint("SEARCH_API_URL", &self.endpoint)?;
        if self.page_size == 0 {
            return Err(ConfigError::OutOfRange {
                field: "page_size",
                detail: "expected at least 1",
            }
            .into());
        }
        if self.retry_attempts == 0 {
            return Err(ConfigError::OutOfRange {
                field: "retry_attempts",
                detail: "expected at least 1",
            }
            .into());
        }
        Ok(())
    }
}

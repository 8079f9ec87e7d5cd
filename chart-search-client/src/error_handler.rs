//! Unified error handling for `chart-search-client`.
//!
//! This module exposes a single top-level error type [`SearchApiError`] for the
//! whole library, and groups domain-specific errors in nested enums (e.g.,
//! [`ConfigError`]). Small helpers for reading optional numbers from the
//! environment and validating endpoints return the unified [`Result<T>`] alias.
//!
//! All messages include the tag `[Chart Search]` to simplify attribution in logs.

use reqwest::StatusCode;
use thiserror::Error;

/* ------------------------------------------------------------------------- */
/* Public result alias                                                       */
/* ------------------------------------------------------------------------- */

/// Unified result alias for the entire crate.
pub type Result<T> = std::result::Result<T, SearchApiError>;

/// Maximum number of characters kept from an upstream error body.
const SNIPPET_LIMIT: usize = 240;

/* ------------------------------------------------------------------------- */
/* Top-level error                                                           */
/* ------------------------------------------------------------------------- */

/// Top-level error for the `chart-search-client` crate.
#[non_exhaustive]
#[derive(Debug, Error)]
pub enum SearchApiError {
    /// Configuration/validation errors (startup/readiness).
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// Underlying HTTP transport error (connect, DNS, timeout, reset).
    #[error("[Chart Search] transport error: {0}")]
    HttpTransport(#[from] reqwest::Error),

    /// Upstream answered with a non-successful HTTP status.
    #[error("[Chart Search] {0}")]
    HttpStatus(HttpError),

    /// The response body did not have the expected page shape.
    #[error("[Chart Search] failed to decode response: {0}")]
    Decode(String),
}

/// How a failed request should be treated by callers that retry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureClass {
    /// The server refused the request itself (HTTP 400). Retrying cannot help.
    Rejected,
    /// Network trouble, timeouts, 5xx and other statuses. Worth another attempt.
    Transient,
    /// The server answered but the payload broke the page contract.
    Malformed,
}

impl SearchApiError {
    /// Classifies the error for retry decisions.
    ///
    /// Only `400 Bad Request` is a rejection; every other status is transient.
    pub fn class(&self) -> FailureClass {
        match self {
            Self::HttpStatus(e) if e.status == StatusCode::BAD_REQUEST => FailureClass::Rejected,
            Self::HttpStatus(_) | Self::HttpTransport(_) => FailureClass::Transient,
            Self::Decode(_) => FailureClass::Malformed,
            Self::Config(_) => FailureClass::Rejected,
        }
    }
}

/// Non-2xx answer from the search API.
#[derive(Debug, Clone, Error)]
#[error("HTTP {status} from {url}: {snippet}")]
pub struct HttpError {
    /// Numeric HTTP status code.
    pub status: StatusCode,
    /// Request URL.
    pub url: String,
    /// Short snippet of the response body (trimmed).
    pub snippet: String,
}

/// Trims an upstream body down to a log-friendly snippet.
pub fn make_snippet(body: &str) -> String {
    body.trim().chars().take(SNIPPET_LIMIT).collect()
}

/* ------------------------------------------------------------------------- */
/* Config errors                                                             */
/* ------------------------------------------------------------------------- */

/// Error enum for environment/config-driven setup.
#[non_exhaustive]
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Required environment variable is missing or empty.
    #[error("[Chart Search] missing required environment variable: {0}")]
    MissingVar(&'static str),

    /// A number failed to parse (like ports, limits, timeouts).
    #[error("[Chart Search] invalid number in {var}: {reason}")]
    InvalidNumber {
        /// Variable name (e.g., `SEARCH_PAGE_SIZE`).
        var: &'static str,
        /// Human-readable reason (e.g., `expected u32`).
        reason: &'static str,
    },

    /// Value had the wrong format (e.g., invalid URL).
    #[error("[Chart Search] invalid format in {var}: {reason}")]
    InvalidFormat {
        /// Variable name (e.g., `SEARCH_API_URL`).
        var: &'static str,
        /// Explanation (e.g., `must start with http:// or https://`).
        reason: &'static str,
    },

    /// A numeric field was outside of the allowed range.
    #[error("[Chart Search] {field} is out of range: {detail}")]
    OutOfRange {
        /// Field name (e.g., `page_size`).
        field: &'static str,
        /// Description of the expected range.
        detail: &'static str,
    },
}

/* ------------------------------------------------------------------------- */
/* Env helpers (return unified `Result<T>`)                                  */
/* ------------------------------------------------------------------------- */

/// Parses an optional `u32` from env (`Ok(None)` if unset/empty).
///
/// # Errors
/// Returns [`ConfigError::InvalidNumber`] if the variable is set but not a valid `u32`.
pub fn env_opt_u32(name: &'static str) -> Result<Option<u32>> {
    match std::env::var(name) {
        Ok(v) if !v.trim().is_empty() => v.trim().parse::<u32>().map(Some).map_err(|_| {
            SearchApiError::from(ConfigError::InvalidNumber {
                var: name,
                reason: "expected u32",
            })
        }),
        _ => Ok(None),
    }
}

/// Parses an optional `u64` from env (`Ok(None)` if unset/empty).
///
/// # Errors
/// Returns [`ConfigError::InvalidNumber`] if the variable is set but not a valid `u64`.
pub fn env_opt_u64(name: &'static str) -> Result<Option<u64>> {
    match std::env::var(name) {
        Ok(v) if !v.trim().is_empty() => v.trim().parse::<u64>().map(Some).map_err(|_| {
            SearchApiError::from(ConfigError::InvalidNumber {
                var: name,
                reason: "expected u64",
            })
        }),
        _ => Ok(None),
    }
}

/* ------------------------------------------------------------------------- */
/* Validation helpers (return unified `Result<T>`)                           */
/* ------------------------------------------------------------------------- */

/// Validates that an HTTP endpoint starts with `http://` or `https://`.
///
/// # Errors
/// Returns [`ConfigError::InvalidFormat`] when the string does not start with
/// a valid HTTP scheme.
pub fn validate_http_endpoint(var: &'static str, value: &str) -> Result<()> {
    let value = value.trim();
    if value.starts_with("http://") || value.starts_with("https://") {
        Ok(())
    } else {
        Err(ConfigError::InvalidFormat {
            var,
            reason: "must start with http:// or https://",
        }
        .into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn status_error(status: StatusCode) -> SearchApiError {
        SearchApiError::HttpStatus(HttpError {
            status,
            url: "http://localhost/search".into(),
            snippet: String::new(),
        })
    }

    #[test]
    fn only_bad_request_is_rejected() {
        assert_eq!(
            status_error(StatusCode::BAD_REQUEST).class(),
            FailureClass::Rejected
        );
        assert_eq!(
            status_error(StatusCode::TOO_MANY_REQUESTS).class(),
            FailureClass::Transient
        );
        assert_eq!(
            status_error(StatusCode::NOT_FOUND).class(),
            FailureClass::Transient
        );
        assert_eq!(
            status_error(StatusCode::BAD_GATEWAY).class(),
            FailureClass::Transient
        );
        assert_eq!(
            SearchApiError::Decode("missing field `found`".into()).class(),
            FailureClass::Malformed
        );
    }

    #[test]
    fn snippet_is_trimmed_and_capped() {
        let body = format!("  {}  ", "x".repeat(500));
        let s = make_snippet(&body);
        assert_eq!(s.len(), SNIPPET_LIMIT);
        assert!(s.starts_with('x'));
    }

    #[test]
    fn endpoint_scheme_is_checked() {
        assert!(validate_http_endpoint("SEARCH_API_URL", "https://api.example.com").is_ok());
        assert!(validate_http_endpoint("SEARCH_API_URL", "ftp://api.example.com").is_err());
    }
}

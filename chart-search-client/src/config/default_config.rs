//! Search API config loaded strictly from environment variables.
//!
//! # Environment variables
//!
//! - `SEARCH_API_URL` or `SEARCH_API_PORT` = endpoint (mandatory)
//! - `SEARCH_TIMEOUT_SECS`     = optional request timeout (u64)
//! - `SEARCH_PAGE_SIZE`        = optional page size (u32, default 25)
//! - `SEARCH_RETRY_ATTEMPTS`   = optional attempts per request (u32, default 10)
//! - `SEARCH_RETRY_BACKOFF_MS` = optional pause between attempts (u64, default 2000)

use crate::{
    config::search_api_config::SearchApiConfig,
    error_handler::{ConfigError, Result, env_opt_u32, env_opt_u64},
};

/// Resolves the search API endpoint strictly from environment.
///
/// Precedence:
/// 1. `SEARCH_API_URL` if present and non-empty
/// 2. `SEARCH_API_PORT` → `http://localhost:{port}`
///
/// # Errors
///
/// - [`ConfigError::MissingVar`] if both are missing
/// - [`ConfigError::InvalidNumber`] if `SEARCH_API_PORT` is invalid
fn search_endpoint() -> Result<String> {
    if let Ok(url) = std::env::var("SEARCH_API_URL") {
        if !url.trim().is_empty() {
            return Ok(url);
        }
    }
    if let Ok(port) = std::env::var("SEARCH_API_PORT") {
        if !port.trim().is_empty() {
            let port = port
                .trim()
                .parse::<u16>()
                .map_err(|_| ConfigError::InvalidNumber {
                    var: "SEARCH_API_PORT",
                    reason: "expected u16 (1..=65535)",
                })?;
            return Ok(format!("http://localhost:{port}"));
        }
    }
    Err(ConfigError::MissingVar("SEARCH_API_URL or SEARCH_API_PORT").into())
}

/// Constructs the search API config from the environment.
///
/// # Defaults
/// - `timeout_secs = None` (client default of 30 s)
/// - `page_size = 25`
/// - `retry_attempts = 10`
/// - `retry_backoff_ms = 2000`
pub fn config_from_env() -> Result<SearchApiConfig> {
    let mut cfg = SearchApiConfig::new(search_endpoint()?)?;

    cfg.timeout_secs = env_opt_u64("SEARCH_TIMEOUT_SECS")?;
    if let Some(page_size) = env_opt_u32("SEARCH_PAGE_SIZE")? {
        cfg.page_size = page_size;
    }
    if let Some(attempts) = env_opt_u32("SEARCH_RETRY_ATTEMPTS")? {
        cfg.retry_attempts = attempts;
    }
    if let Some(backoff) = env_opt_u64("SEARCH_RETRY_BACKOFF_MS")? {
        cfg.retry_backoff_ms = backoff;
    }

    cfg.validate()?;
    Ok(cfg)
}

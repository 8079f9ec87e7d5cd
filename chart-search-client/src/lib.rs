//! HTTP client for the chart search API.
//!
//! - [`services::search_api_service::SearchApiService`] sends one request per
//!   call to `/search` or `/search/advanced`.
//! - [`model`] holds the wire vocabulary (instruments, filters, charts, pages).
//! - [`config`] builds [`config::search_api_config::SearchApiConfig`] by hand or
//!   from the environment.
//! - [`error_handler`] is the unified error type and its retry classification.
//! - [`telemetry`] provides a tracing layer scoped to the search crates.

pub mod config;
pub mod error_handler;
pub mod model;
pub mod services;
pub mod telemetry;

pub use error_handler::{FailureClass, SearchApiError};
pub use reqwest::StatusCode;

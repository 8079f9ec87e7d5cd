//! Thin client for the chart search API.
//!
//! Endpoints are derived from `SearchApiConfig::endpoint`:
//! - `POST {endpoint}/search`: free-text search
//! - `POST {endpoint}/search/advanced`: field-level search
//!
//! Both accept a single instrument per call. One call is made per
//! [`SearchApiService::search`]; retrying is left to the caller.
//!
//! # Examples
//!
//! ```no_run
//! use chart_search_client::config::search_api_config::SearchApiConfig;
//! use chart_search_client::model::{Instrument, PageRequest, SearchFilters, SearchKind};
//! use chart_search_client::services::search_api_service::SearchApiService;
//!
//! # #[tokio::main]
//! # async fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let svc = SearchApiService::new(SearchApiConfig::new("http://localhost:8080")?)?;
//!
//! let page = svc
//!     .search(&PageRequest {
//!         kind: SearchKind::Text("megalovania".into()),
//!         instrument: Some(Instrument::Guitar),
//!         filters: SearchFilters::default(),
//!         sort: None,
//!         page: 1,
//!         per_page: 25,
//!     })
//!     .await?;
//! println!("found {} charts", page.total_found);
//! # Ok(()) }
//! ```

use std::time::{Duration, Instant};

use serde::Serialize;
use tracing::{debug, error, instrument};

use crate::{
    config::search_api_config::SearchApiConfig,
    error_handler::{HttpError, Result, SearchApiError, make_snippet},
    model::{
        AdvancedFilter, Difficulty, DrumType, Instrument, PageRequest, SearchKind, SearchPage,
        SortSpec, page::SearchResponse,
    },
};

/// Value sent in the `source` field of free-text searches.
const SOURCE_TAG: &str = "bridge";

/// Client for the chart search API.
///
/// Initialized with a full [`SearchApiConfig`]. Reuses one HTTP client with a
/// configurable timeout.
#[derive(Debug, Clone)]
pub struct SearchApiService {
    client: reqwest::Client,
    cfg: SearchApiConfig,
    url_search: String,
    url_advanced: String,
}

impl SearchApiService {
    /// Creates a new [`SearchApiService`] from the given config.
    ///
    /// # Errors
    /// - [`SearchApiError::Config`] if the config does not validate
    /// - [`SearchApiError::HttpTransport`] if the HTTP client cannot be built
    pub fn new(cfg: SearchApiConfig) -> Result<Self> {
        cfg.validate()?;

        let timeout = cfg
            .timeout_secs
            .map(Duration::from_secs)
            .unwrap_or_else(|| Duration::from_secs(30));

        let client = reqwest::Client::builder()
            .timeout(timeout)
            .gzip(true)
            .brotli(true)
            .build()?;

        let base = cfg.endpoint.trim_end_matches('/').to_string();
        let url_search = format!("{base}/search");
        let url_advanced = format!("{base}/search/advanced");

        debug!(endpoint = %cfg.endpoint, timeout_secs = timeout.as_secs(), "SearchApiService initialized");

        Ok(Self {
            client,
            cfg,
            url_search,
            url_advanced,
        })
    }

    pub fn config(&self) -> &SearchApiConfig {
        &self.cfg
    }

    /// Sends one search request and decodes one page.
    ///
    /// # Errors
    /// - [`SearchApiError::HttpStatus`] for non-2xx responses
    /// - [`SearchApiError::HttpTransport`] for network failures and timeouts
    /// - [`SearchApiError::Decode`] if the body is not a search page
    #[instrument(skip_all, fields(instrument = ?req.instrument, page = req.page))]
    pub async fn search(&self, req: &PageRequest) -> Result<SearchPage> {
        let started = Instant::now();

        let request = match &req.kind {
            SearchKind::Text(text) => {
                debug!("POST {}", self.url_search);
                self.client
                    .post(&self.url_search)
                    .json(&TextSearchBody::from_request(req, text))
            }
            SearchKind::Advanced(filter) => {
                debug!("POST {}", self.url_advanced);
                self.client
                    .post(&self.url_advanced)
                    .json(&AdvancedSearchBody::from_request(req, filter))
            }
        };

        let resp = request.send().await?;

        if !resp.status().is_success() {
            let status = resp.status();
            let url = resp.url().to_string();
            let text = resp.text().await.unwrap_or_default();
            let snippet = make_snippet(&text);

            error!(
                %status,
                %url,
                %snippet,
                latency_ms = started.elapsed().as_millis(),
                "search returned non-success status"
            );

            return Err(SearchApiError::HttpStatus(HttpError {
                status,
                url,
                snippet,
            }));
        }

        // A body cut short by a timeout or reset is a transport error, not a
        // malformed page.
        let body = resp.bytes().await?;
        let out: SearchResponse = serde_json::from_slice(&body).map_err(|e| {
            SearchApiError::Decode(format!("serde error: {e}; expected `{{ data, found }}`"))
        })?;
        let page = out.into_page(req);

        debug!(
            found = page.total_found,
            returned = page.entries.len(),
            latency_ms = started.elapsed().as_millis(),
            "search page received"
        );

        Ok(page)
    }
}

/* ==========================
HTTP payloads
========================== */

/// Request body for `/search`.
#[derive(Debug, Serialize)]
struct TextSearchBody<'a> {
    search: &'a str,
    per_page: u32,
    page: u32,
    instrument: Option<Instrument>,
    difficulty: Option<Difficulty>,
    #[serde(rename = "drumType")]
    drum_type: Option<DrumType>,
    #[serde(rename = "drumsReviewed")]
    drums_reviewed: bool,
    sort: Option<SortSpec>,
    source: &'static str,
}

impl<'a> TextSearchBody<'a> {
    fn from_request(req: &PageRequest, text: &'a str) -> Self {
        Self {
            search: text,
            per_page: req.per_page,
            page: req.page,
            instrument: req.instrument,
            difficulty: req.filters.difficulty,
            drum_type: req.filters.drum_type,
            drums_reviewed: req.filters.drums_reviewed,
            sort: req.sort,
            source: SOURCE_TAG,
        }
    }
}

/// Request body for `/search/advanced`; the filter's fields sit at top level.
#[derive(Debug, Serialize)]
struct AdvancedSearchBody<'a> {
    per_page: u32,
    page: u32,
    instrument: Option<Instrument>,
    difficulty: Option<Difficulty>,
    #[serde(rename = "drumType")]
    drum_type: Option<DrumType>,
    #[serde(rename = "drumsReviewed")]
    drums_reviewed: bool,
    sort: Option<SortSpec>,
    #[serde(flatten)]
    filter: &'a AdvancedFilter,
}

impl<'a> AdvancedSearchBody<'a> {
    fn from_request(req: &PageRequest, filter: &'a AdvancedFilter) -> Self {
        Self {
            per_page: req.per_page,
            page: req.page,
            instrument: req.instrument,
            difficulty: req.filters.difficulty,
            drum_type: req.filters.drum_type,
            drums_reviewed: req.filters.drums_reviewed,
            sort: req.sort,
            filter,
        }
    }
}

//! Crate-wide error type for the search engine.

use chart_search_client::{SearchApiError, model::Instrument};
use thiserror::Error;

/// Convenient alias for engine results.
pub type SearchResult<T> = Result<T, SearchError>;

/// Terminal failure of one logical search.
///
/// Executor failures travel through the orchestrator unchanged; the snapshot
/// manager never fails.
#[derive(Debug, Error)]
pub enum SearchError {
    /// The API refused the request itself (HTTP 400). Not retried.
    #[error("[Chart Search] request rejected (instrument: {instrument:?}): {source}")]
    ClientRejected {
        instrument: Option<Instrument>,
        #[source]
        source: SearchApiError,
    },

    /// Transient failures outlasted the retry budget.
    #[error("[Chart Search] request failed after {attempts} attempts (instrument: {instrument:?}): {source}")]
    RequestExhausted {
        instrument: Option<Instrument>,
        attempts: u32,
        #[source]
        source: SearchApiError,
    },

    /// A page broke the merge contract (undecodable body, bad paging).
    #[error("[Chart Search] aggregation inconsistency: {0}")]
    AggregationInconsistency(String),
}

impl SearchError {
    pub fn is_client_rejected(&self) -> bool {
        matches!(self, Self::ClientRejected { .. })
    }

    pub fn is_exhausted(&self) -> bool {
        matches!(self, Self::RequestExhausted { .. })
    }
}

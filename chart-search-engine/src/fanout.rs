//! Turns one logical query into one or many executor calls.
//!
//! The search API filters by a single instrument per call, so a search over
//! several instruments is a client-side union: one concurrent call per
//! instrument, joined before merging.

use futures::future::try_join_all;
use tracing::{debug, info, instrument};

use crate::{
    aggregate::{self, MergedResult},
    backend::SearchBackend,
    errors::SearchResult,
    executor::{RequestExecutor, RetryPolicy},
    query::{RequestPlan, SearchQuery},
};

/// Runs queries against a backend.
///
/// Holds no search state; concurrent `run` calls are independent.
pub struct Orchestrator<B> {
    backend: B,
    policy: RetryPolicy,
}

impl<B: SearchBackend> Orchestrator<B> {
    pub fn new(backend: B, policy: RetryPolicy) -> Self {
        Self { backend, policy }
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    pub fn policy(&self) -> RetryPolicy {
        self.policy
    }

    /// Fetches and merges one page of `query`.
    ///
    /// Instrument pages are merged in declaration order regardless of which
    /// call finishes first. When any call fails terminally the whole run fails
    /// with that error and the remaining calls are dropped.
    #[instrument(skip_all, fields(page = query.page, advanced = query.is_advanced()))]
    pub async fn run(&self, query: &SearchQuery) -> SearchResult<MergedResult> {
        let executor = RequestExecutor::new(&self.backend, self.policy);

        let pages = match query.facets.plan() {
            RequestPlan::Single(instrument) => {
                debug!(?instrument, "single request");
                vec![executor.execute(query, instrument).await?]
            }
            RequestPlan::FanOut(instruments) => {
                debug!(count = instruments.len(), ?instruments, "fanning out per instrument");
                let calls = instruments
                    .iter()
                    .map(|&instrument| executor.execute(query, Some(instrument)));
                try_join_all(calls).await?
            }
        };

        let merged = aggregate::merge(pages)?;
        info!(
            found = merged.total_found,
            returned = merged.entries.len(),
            page_count = merged.page_count,
            "search completed"
        );
        Ok(merged)
    }
}

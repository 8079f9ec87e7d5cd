//! Single-request execution with a fixed retry budget.

use std::time::Duration;

use chart_search_client::{
    FailureClass,
    config::search_api_config::{
        DEFAULT_RETRY_ATTEMPTS, DEFAULT_RETRY_BACKOFF_MS, SearchApiConfig,
    },
    model::{Instrument, SearchPage},
};
use tracing::{debug, error, instrument, warn};

use crate::{
    backend::SearchBackend,
    errors::{SearchError, SearchResult},
    query::SearchQuery,
};

/// Attempts per request and the constant pause between them.
///
/// The budget counts attempts, the first one included. There is no
/// exponential growth.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    pub max_attempts: u32,
    pub backoff: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: DEFAULT_RETRY_ATTEMPTS,
            backoff: Duration::from_millis(DEFAULT_RETRY_BACKOFF_MS),
        }
    }
}

impl RetryPolicy {
    pub fn from_config(cfg: &SearchApiConfig) -> Self {
        Self {
            max_attempts: cfg.retry_attempts,
            backoff: Duration::from_millis(cfg.retry_backoff_ms),
        }
    }
}

/// Issues one logical request for one instrument, retrying transient failures.
///
/// Each [`RequestExecutor::execute`] call has its own budget.
pub struct RequestExecutor<'a, B: ?Sized> {
    backend: &'a B,
    policy: RetryPolicy,
}

impl<'a, B: SearchBackend + ?Sized> RequestExecutor<'a, B> {
    pub fn new(backend: &'a B, policy: RetryPolicy) -> Self {
        Self { backend, policy }
    }

    /// Fetches one page of `query` constrained to `instrument`.
    ///
    /// # Errors
    /// - [`SearchError::ClientRejected`] on HTTP 400, without waiting
    /// - [`SearchError::RequestExhausted`] once the attempt budget is spent
    /// - [`SearchError::AggregationInconsistency`] if the body is not a page
    #[instrument(skip_all, fields(instrument = ?instrument, page = query.page))]
    pub async fn execute(
        &self,
        query: &SearchQuery,
        instrument: Option<Instrument>,
    ) -> SearchResult<SearchPage> {
        let req = query.page_request(instrument);
        let max_attempts = self.policy.max_attempts.max(1);
        let mut attempt: u32 = 1;

        loop {
            let err = match self.backend.search_page(&req).await {
                Ok(page) => {
                    debug!(attempt, found = page.total_found, "page fetched");
                    return Ok(page);
                }
                Err(err) => err,
            };

            match err.class() {
                FailureClass::Rejected => {
                    warn!(attempt, error = %err, "search request rejected");
                    return Err(SearchError::ClientRejected {
                        instrument,
                        source: err,
                    });
                }
                FailureClass::Malformed => {
                    error!(attempt, error = %err, "search response is not a page");
                    return Err(SearchError::AggregationInconsistency(err.to_string()));
                }
                FailureClass::Transient if attempt >= max_attempts => {
                    error!(attempt, error = %err, "retry budget exhausted");
                    return Err(SearchError::RequestExhausted {
                        instrument,
                        attempts: attempt,
                        source: err,
                    });
                }
                FailureClass::Transient => {
                    warn!(
                        attempt,
                        max_attempts,
                        backoff_ms = self.policy.backoff.as_millis(),
                        error = %err,
                        "transient search failure, retrying"
                    );
                    tokio::time::sleep(self.policy.backoff).await;
                    attempt += 1;
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use tokio::time::Instant;

    use super::*;
    use crate::test_support::{Reply, ScriptedBackend};

    fn guitar_query() -> SearchQuery {
        SearchQuery::text("megalovania")
    }

    #[tokio::test(start_paused = true)]
    async fn succeeds_on_the_last_attempt() {
        let mut replies = vec![Reply::Status(503); 9];
        replies.push(Reply::charts(&[(1, Some(10))]));
        let backend = ScriptedBackend::new().script(Some(Instrument::Guitar), replies);

        let started = Instant::now();
        let page = RequestExecutor::new(&backend, RetryPolicy::default())
            .execute(&guitar_query(), Some(Instrument::Guitar))
            .await
            .unwrap();

        assert_eq!(page.entries.len(), 1);
        assert_eq!(backend.call_count(), 10);
        assert_eq!(started.elapsed(), Duration::from_millis(9 * 2000));
    }

    #[tokio::test(start_paused = true)]
    async fn gives_up_after_ten_attempts() {
        let backend = ScriptedBackend::new().script(None, vec![Reply::Status(500)]);

        let err = RequestExecutor::new(&backend, RetryPolicy::default())
            .execute(&guitar_query(), None)
            .await
            .unwrap_err();

        match err {
            SearchError::RequestExhausted { attempts, instrument, .. } => {
                assert_eq!(attempts, 10);
                assert_eq!(instrument, None);
            }
            other => panic!("unexpected error: {other:?}"),
        }
        assert_eq!(backend.call_count(), 10);
    }

    #[tokio::test(start_paused = true)]
    async fn bad_request_fails_without_waiting() {
        let backend = ScriptedBackend::new().script(None, vec![Reply::Status(400)]);

        let started = Instant::now();
        let err = RequestExecutor::new(&backend, RetryPolicy::default())
            .execute(&guitar_query(), None)
            .await
            .unwrap_err();

        assert!(err.is_client_rejected());
        assert_eq!(backend.call_count(), 1);
        assert_eq!(started.elapsed(), Duration::ZERO);
    }

    #[tokio::test(start_paused = true)]
    async fn rejection_after_transient_failures_stops_immediately() {
        let backend = ScriptedBackend::new().script(
            None,
            vec![Reply::Status(502), Reply::Status(429), Reply::Status(400)],
        );

        let err = RequestExecutor::new(&backend, RetryPolicy::default())
            .execute(&guitar_query(), None)
            .await
            .unwrap_err();

        assert!(err.is_client_rejected());
        assert_eq!(backend.call_count(), 3);
    }

    #[tokio::test]
    async fn malformed_page_is_not_retried() {
        let backend = ScriptedBackend::new().script(None, vec![Reply::Malformed]);

        let err = RequestExecutor::new(&backend, RetryPolicy::default())
            .execute(&guitar_query(), None)
            .await
            .unwrap_err();

        assert!(matches!(err, SearchError::AggregationInconsistency(_)));
        assert_eq!(backend.call_count(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn policy_follows_config() {
        let mut cfg = SearchApiConfig::new("http://localhost:8080").unwrap();
        cfg.retry_attempts = 2;
        cfg.retry_backoff_ms = 50;
        let policy = RetryPolicy::from_config(&cfg);
        let backend = ScriptedBackend::new().script(None, vec![Reply::Status(503)]);

        let started = Instant::now();
        let err = RequestExecutor::new(&backend, policy)
            .execute(&guitar_query(), None)
            .await
            .unwrap_err();

        assert!(err.is_exhausted());
        assert_eq!(backend.call_count(), 2);
        assert_eq!(started.elapsed(), Duration::from_millis(50));
    }
}

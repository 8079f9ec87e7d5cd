//! Inbound facade held by the UI layer.
//!
//! A [`SearchSession`] owns the snapshot, the current page counter, and the
//! last successful query. Every operation takes `&mut self`, so at most one
//! search is in flight per session and a slow response can never overwrite a
//! newer one.

use chart_search_client::{
    config::search_api_config::{DEFAULT_PAGE_SIZE, SearchApiConfig},
    error_handler::Result as ClientResult,
    model::{AdvancedFilter, SearchFilters, SearchKind, SortSpec},
    services::search_api_service::SearchApiService,
};
use tracing::{debug, info, warn};

use crate::{
    backend::SearchBackend,
    errors::SearchResult,
    executor::RetryPolicy,
    fanout::Orchestrator,
    query::{FacetSelector, SearchQuery},
    snapshot::{Notification, Snapshot, SnapshotManager},
};

/// Remembered UI choices applied to free-text searches.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SearchPreferences {
    pub facets: FacetSelector,
    pub filters: SearchFilters,
    pub sort: Option<SortSpec>,
}

pub struct SearchSession<B> {
    orchestrator: Orchestrator<B>,
    snapshots: SnapshotManager,
    preferences: SearchPreferences,
    page_size: u32,
    current_page: u32,
    last_query: Option<SearchQuery>,
}

impl SearchSession<SearchApiService> {
    /// Session over the HTTP API, with retry and paging taken from `cfg`.
    pub fn from_config(cfg: SearchApiConfig) -> ClientResult<Self> {
        let policy = RetryPolicy::from_config(&cfg);
        let page_size = cfg.page_size;
        let service = SearchApiService::new(cfg)?;
        Ok(Self::new(service, policy).with_page_size(page_size))
    }
}

impl<B: SearchBackend> SearchSession<B> {
    pub fn new(backend: B, policy: RetryPolicy) -> Self {
        Self {
            orchestrator: Orchestrator::new(backend, policy),
            snapshots: SnapshotManager::new(),
            preferences: SearchPreferences::default(),
            page_size: DEFAULT_PAGE_SIZE,
            current_page: 1,
            last_query: None,
        }
    }

    pub fn with_page_size(mut self, page_size: u32) -> Self {
        self.page_size = page_size.max(1);
        self
    }

    pub fn with_preferences(mut self, preferences: SearchPreferences) -> Self {
        self.preferences = preferences;
        self
    }

    /// Runs `query` as a fresh search (page 1) or as the next page.
    ///
    /// On failure the snapshot, page counter and last query stay as they were.
    pub async fn run_search(
        &mut self,
        query: SearchQuery,
        is_next_page: bool,
    ) -> SearchResult<Notification> {
        let page = if is_next_page {
            self.current_page + 1
        } else {
            1
        };
        let query = query.at_page(page);

        let merged = match self.orchestrator.run(&query).await {
            Ok(merged) => merged,
            Err(err) => {
                warn!(page, error = %err, "search failed, keeping previous results");
                return Err(err);
            }
        };

        self.current_page = page;
        let notification = self.snapshots.apply(merged, is_next_page);
        self.last_query = Some(query);

        info!(
            page,
            ?notification,
            shown = self.snapshots.snapshot().entry_count(),
            "search applied"
        );
        Ok(notification)
    }

    /// Free-text search using the session preferences. Blank text searches
    /// for everything.
    pub async fn search(&mut self, text: &str, is_next_page: bool) -> SearchResult<Notification> {
        let query = self.preferred(SearchQuery::text(text));
        self.run_search(query, is_next_page).await
    }

    /// Structured search over `facets`, using the preferred filters and sort.
    pub async fn advanced_search(
        &mut self,
        filter: AdvancedFilter,
        facets: FacetSelector,
        is_next_page: bool,
    ) -> SearchResult<Notification> {
        let query = self.preferred(SearchQuery::advanced(filter)).with_facets(facets);
        self.run_search(query, is_next_page).await
    }

    /// Fetches the page after the current one of the last query.
    ///
    /// Returns `Ok(None)` when there is no query yet or the last page was not
    /// full.
    pub async fn next_page(&mut self) -> SearchResult<Option<Notification>> {
        if !self.snapshots.has_more_pages() {
            debug!("no more pages");
            return Ok(None);
        }
        let Some(query) = self.last_query.clone() else {
            return Ok(None);
        };
        self.run_search(query, true).await.map(Some)
    }

    /// Re-runs the last query from page 1 with the current preferences.
    ///
    /// Free-text searches pick up preferred instruments, filters and sort;
    /// advanced searches keep their instruments. Without a previous query this
    /// runs the default search.
    pub async fn reload(&mut self) -> SearchResult<Notification> {
        let query = match self.last_query.clone() {
            None => self.preferred(SearchQuery::text("")),
            Some(last) => match last.kind {
                SearchKind::Text(ref text) => self.preferred(SearchQuery::text(text.clone())),
                SearchKind::Advanced(_) => last
                    .with_filters(self.preferences.filters.clone())
                    .with_sort(self.preferences.sort),
            },
        };
        self.run_search(query, false).await
    }

    fn preferred(&self, query: SearchQuery) -> SearchQuery {
        query
            .with_facets(self.preferences.facets.clone())
            .with_filters(self.preferences.filters.clone())
            .with_sort(self.preferences.sort)
            .with_page_size(self.page_size)
    }

    pub fn preferences(&self) -> &SearchPreferences {
        &self.preferences
    }

    /// Mutable preferences; changes apply to the next search or reload.
    pub fn preferences_mut(&mut self) -> &mut SearchPreferences {
        &mut self.preferences
    }

    pub fn snapshot(&self) -> &Snapshot {
        self.snapshots.snapshot()
    }

    pub fn has_more_pages(&self) -> bool {
        self.snapshots.has_more_pages()
    }

    pub fn current_page(&self) -> u32 {
        self.current_page
    }

    pub fn last_query(&self) -> Option<&SearchQuery> {
        self.last_query.as_ref()
    }

    pub fn is_default_search(&self) -> bool {
        self.last_query
            .as_ref()
            .is_none_or(SearchQuery::is_default_search)
    }

    pub fn is_advanced_search(&self) -> bool {
        self.last_query.as_ref().is_some_and(SearchQuery::is_advanced)
    }

    pub fn backend(&self) -> &B {
        self.orchestrator.backend()
    }
}

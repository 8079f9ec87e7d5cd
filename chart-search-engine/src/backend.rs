use std::{future::Future, pin::Pin, sync::Arc};

use chart_search_client::{
    SearchApiError,
    model::{PageRequest, SearchPage},
    services::search_api_service::SearchApiService,
};

/// Future returned by [`SearchBackend::search_page`].
pub type BackendFuture<'a> =
    Pin<Box<dyn Future<Output = Result<SearchPage, SearchApiError>> + Send + 'a>>;

/// Anything that answers one single-instrument page request.
///
/// [`SearchApiService`] is the production implementation; tests plug in
/// scripted backends.
pub trait SearchBackend: Send + Sync {
    /// Performs exactly one attempt. Retrying is the executor's job.
    fn search_page<'a>(&'a self, req: &'a PageRequest) -> BackendFuture<'a>;
}

impl SearchBackend for SearchApiService {
    fn search_page<'a>(&'a self, req: &'a PageRequest) -> BackendFuture<'a> {
        Box::pin(self.search(req))
    }
}

impl<T: SearchBackend + ?Sized> SearchBackend for Arc<T> {
    fn search_page<'a>(&'a self, req: &'a PageRequest) -> BackendFuture<'a> {
        (**self).search_page(req)
    }
}

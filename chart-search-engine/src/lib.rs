//! Search orchestration for the chart catalog.
//!
//! A [`query::SearchQuery`] is fanned out by the [`fanout::Orchestrator`] into
//! one call per selected instrument (or a single unfiltered call). Each call
//! goes through the [`executor::RequestExecutor`] with a fixed retry budget.
//! The pages are joined and merged by [`aggregate`], and the
//! [`snapshot::SnapshotManager`] decides whether the caller should replace,
//! extend or keep its visible list.
//!
//! [`session::SearchSession`] ties the pieces together for a UI layer.

pub mod aggregate;
pub mod backend;
pub mod errors;
pub mod executor;
pub mod fanout;
pub mod query;
pub mod session;
pub mod snapshot;

#[cfg(test)]
mod test_support;

pub use aggregate::{GroupKey, MergedResult, ResultGroup};
pub use backend::SearchBackend;
pub use errors::{SearchError, SearchResult};
pub use executor::{RequestExecutor, RetryPolicy};
pub use fanout::Orchestrator;
pub use query::{FacetSelector, SearchQuery};
pub use session::{SearchPreferences, SearchSession};
pub use snapshot::{Notification, Snapshot, SnapshotManager};

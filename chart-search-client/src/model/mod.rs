//! Wire model shared by the client and its callers.

pub mod chart;
pub mod filters;
pub mod page;

pub use chart::ChartEntry;
pub use filters::{
    AdvancedFilter, Difficulty, DrumType, Instrument, SearchFilters, SortColumn, SortDirection,
    SortSpec, TextFilter,
};
pub use page::{PageRequest, SearchKind, SearchPage};

//! Immutable description of one logical search.

use chart_search_client::{
    config::search_api_config::DEFAULT_PAGE_SIZE,
    model::{AdvancedFilter, Instrument, PageRequest, SearchFilters, SearchKind, SortSpec},
};

/// Query text meaning "everything, newest first".
pub const WILDCARD: &str = "*";

/// Which instruments a search is constrained to.
///
/// `Any` always wins: a selection that mentions "any instrument" anywhere is
/// treated as unconstrained.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum FacetSelector {
    #[default]
    Any,
    /// Ordered, distinct instruments. Order decides merge precedence.
    Specific(Vec<Instrument>),
}

impl FacetSelector {
    /// Builds a selector from UI values where `None` stands for "any".
    ///
    /// Empty input or any `None` yields [`FacetSelector::Any`]; duplicates keep
    /// their first position.
    pub fn from_values<I>(values: I) -> Self
    where
        I: IntoIterator<Item = Option<Instrument>>,
    {
        let mut out = Vec::new();
        for v in values {
            match v {
                None => return Self::Any,
                Some(i) if !out.contains(&i) => out.push(i),
                Some(_) => {}
            }
        }
        if out.is_empty() {
            Self::Any
        } else {
            Self::Specific(out)
        }
    }

    /// Selector over concrete instruments only; empty input yields `Any`.
    pub fn specific<I>(values: I) -> Self
    where
        I: IntoIterator<Item = Instrument>,
    {
        Self::from_values(values.into_iter().map(Some))
    }

    /// Decides the request shape for this selector.
    pub fn plan(&self) -> RequestPlan {
        match self {
            Self::Any => RequestPlan::Single(None),
            Self::Specific(values) => {
                let mut distinct: Vec<Instrument> = Vec::with_capacity(values.len());
                for v in values {
                    if !distinct.contains(v) {
                        distinct.push(*v);
                    }
                }
                match distinct.as_slice() {
                    [] => RequestPlan::Single(None),
                    [only] => RequestPlan::Single(Some(*only)),
                    _ => RequestPlan::FanOut(distinct),
                }
            }
        }
    }
}

/// How many physical requests a query turns into.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RequestPlan {
    /// One request; `None` means no instrument constraint.
    Single(Option<Instrument>),
    /// One concurrent request per instrument, in declaration order.
    FanOut(Vec<Instrument>),
}

/// A logical search: text or structured criteria, instruments, sort, paging.
#[derive(Debug, Clone, PartialEq)]
pub struct SearchQuery {
    pub kind: SearchKind,
    pub facets: FacetSelector,
    pub sort: Option<SortSpec>,
    pub filters: SearchFilters,
    /// 1-based page number.
    pub page: u32,
    pub page_size: u32,
}

impl SearchQuery {
    /// Free-text search on page 1. Blank text becomes [`WILDCARD`].
    pub fn text(text: impl Into<String>) -> Self {
        let text = text.into();
        let text = if text.trim().is_empty() {
            WILDCARD.to_string()
        } else {
            text
        };
        Self::with_kind(SearchKind::Text(text))
    }

    /// Structured search on page 1.
    pub fn advanced(filter: AdvancedFilter) -> Self {
        Self::with_kind(SearchKind::Advanced(filter))
    }

    fn with_kind(kind: SearchKind) -> Self {
        Self {
            kind,
            facets: FacetSelector::Any,
            sort: None,
            filters: SearchFilters::default(),
            page: 1,
            page_size: DEFAULT_PAGE_SIZE,
        }
    }

    pub fn with_facets(mut self, facets: FacetSelector) -> Self {
        self.facets = facets;
        self
    }

    pub fn with_sort(mut self, sort: Option<SortSpec>) -> Self {
        self.sort = sort;
        self
    }

    pub fn with_filters(mut self, filters: SearchFilters) -> Self {
        self.filters = filters;
        self
    }

    pub fn with_page_size(mut self, page_size: u32) -> Self {
        self.page_size = page_size;
        self
    }

    /// Same query on another page (clamped to 1).
    pub fn at_page(&self, page: u32) -> Self {
        Self {
            page: page.max(1),
            ..self.clone()
        }
    }

    /// True for the wildcard text search shown before the user types anything.
    pub fn is_default_search(&self) -> bool {
        matches!(&self.kind, SearchKind::Text(t) if t == WILDCARD)
    }

    pub fn is_advanced(&self) -> bool {
        matches!(self.kind, SearchKind::Advanced(_))
    }

    /// The physical request for one instrument of this query.
    pub fn page_request(&self, instrument: Option<Instrument>) -> PageRequest {
        PageRequest {
            kind: self.kind.clone(),
            instrument,
            filters: self.filters.clone(),
            sort: self.sort,
            page: self.page,
            per_page: self.page_size,
        }
    }
}

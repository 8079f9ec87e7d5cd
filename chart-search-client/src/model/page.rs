use serde::Deserialize;

use crate::model::{AdvancedFilter, ChartEntry, Instrument, SearchFilters, SortSpec};

/// What to search for.
#[derive(Debug, Clone, PartialEq)]
pub enum SearchKind {
    /// Free text matched by `/search`; `*` returns the newest charts.
    Text(String),
    /// Field-level criteria matched by `/search/advanced`.
    Advanced(AdvancedFilter),
}

/// One physical request: a single instrument (or none) for a single page.
#[derive(Debug, Clone, PartialEq)]
pub struct PageRequest {
    pub kind: SearchKind,
    pub instrument: Option<Instrument>,
    pub filters: SearchFilters,
    pub sort: Option<SortSpec>,
    pub page: u32,
    pub per_page: u32,
}

/// One instrument's answer for one page.
#[derive(Debug, Clone, PartialEq)]
pub struct SearchPage {
    pub entries: Vec<ChartEntry>,
    pub total_found: u64,
    pub page: u32,
    pub page_size: u32,
}

/// Response body of both search endpoints.
///
/// The advanced endpoint omits `page` and `per_page`; they are filled from the
/// request that produced the response.
#[derive(Debug, Deserialize)]
pub(crate) struct SearchResponse {
    data: Vec<ChartEntry>,
    found: u64,
    #[serde(default)]
    page: Option<u32>,
    #[serde(default)]
    per_page: Option<u32>,
}

impl SearchResponse {
    pub(crate) fn into_page(self, req: &PageRequest) -> SearchPage {
        SearchPage {
            entries: self.data,
            total_found: self.found,
            page: self.page.unwrap_or(req.page),
            page_size: self.per_page.unwrap_or(req.per_page),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request(page: u32) -> PageRequest {
        PageRequest {
            kind: SearchKind::Advanced(AdvancedFilter::default()),
            instrument: None,
            filters: SearchFilters::default(),
            sort: None,
            page,
            per_page: 25,
        }
    }

    #[test]
    fn advanced_response_takes_paging_from_request() {
        let raw = r#"{ "data": [ { "chartId": 1, "songId": 10 } ], "found": 1 }"#;
        let resp: SearchResponse = serde_json::from_str(raw).unwrap();
        let page = resp.into_page(&request(3));
        assert_eq!(page.page, 3);
        assert_eq!(page.page_size, 25);
        assert_eq!(page.total_found, 1);
        assert_eq!(page.entries[0].song_id, Some(10));
    }

    #[test]
    fn server_paging_wins_when_present() {
        let raw = r#"{ "data": [], "found": 0, "page": 2, "pages": 0, "per_page": 10 }"#;
        let resp: SearchResponse = serde_json::from_str(raw).unwrap();
        let page = resp.into_page(&request(1));
        assert_eq!((page.page, page.page_size), (2, 10));
    }

    #[test]
    fn missing_found_fails_to_decode() {
        let raw = r#"{ "data": [] }"#;
        assert!(serde_json::from_str::<SearchResponse>(raw).is_err());
    }
}

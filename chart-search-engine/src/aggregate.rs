//! Merging per-instrument pages and grouping charts by song.

use std::collections::{HashMap, HashSet};

use chart_search_client::model::{ChartEntry, SearchPage};
use tracing::debug;

use crate::errors::{SearchError, SearchResult};

/// Key charts are grouped under.
///
/// Charts of a known song share [`GroupKey::Song`]. A chart without a song is
/// alone in [`GroupKey::Ungrouped`], so it can never land in a real song's
/// group, even when the numbers coincide.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GroupKey {
    Song(i64),
    Ungrouped(i64),
}

impl GroupKey {
    pub fn of(entry: &ChartEntry) -> Self {
        match entry.song_id {
            Some(song) => Self::Song(song),
            None => Self::Ungrouped(entry.chart_id),
        }
    }

    /// Signed display tag: the song id, or the negated chart id.
    ///
    /// `i64::MIN` has no positive counterpart and is returned unchanged.
    pub fn tag(&self) -> i64 {
        match *self {
            Self::Song(song) => song,
            Self::Ungrouped(chart) => chart.wrapping_neg(),
        }
    }
}

/// Charts sharing one [`GroupKey`], in first-seen order.
#[derive(Debug, Clone, PartialEq)]
pub struct ResultGroup {
    key: GroupKey,
    entries: Vec<ChartEntry>,
}

impl ResultGroup {
    pub fn key(&self) -> GroupKey {
        self.key
    }

    pub fn entries(&self) -> &[ChartEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// One logical page built from one or more instrument pages.
#[derive(Debug, Clone, PartialEq)]
pub struct MergedResult {
    pub entries: Vec<ChartEntry>,
    pub total_found: u64,
    pub page: u32,
    pub page_size: u32,
    pub page_count: u64,
}

impl MergedResult {
    pub fn groups(&self) -> Vec<ResultGroup> {
        group(&self.entries)
    }
}

/// Merges pages given in instrument declaration order.
///
/// A single page keeps its entries and `total_found` as reported. Several
/// pages are concatenated, de-duplicated by chart id (earliest page wins) and
/// re-counted: `total_found` becomes the number of distinct charts.
///
/// # Errors
/// [`SearchError::AggregationInconsistency`] for an empty input, a zero page
/// size, or pages that disagree on page number or size.
pub fn merge(mut pages: Vec<SearchPage>) -> SearchResult<MergedResult> {
    let Some(first) = pages.first() else {
        return Err(SearchError::AggregationInconsistency(
            "no pages to merge".into(),
        ));
    };
    let (page, page_size) = (first.page, first.page_size);

    if page_size == 0 {
        return Err(SearchError::AggregationInconsistency(
            "page size is zero".into(),
        ));
    }
    if let Some(odd) = pages
        .iter()
        .find(|p| p.page != page || p.page_size != page_size)
    {
        return Err(SearchError::AggregationInconsistency(format!(
            "pages disagree on paging: page {page}/size {page_size} vs page {}/size {}",
            odd.page, odd.page_size
        )));
    }

    if pages.len() == 1 {
        let single = pages.swap_remove(0);
        return Ok(MergedResult {
            page_count: single.total_found.div_ceil(u64::from(page_size)),
            entries: single.entries,
            total_found: single.total_found,
            page,
            page_size,
        });
    }

    let raw_len: usize = pages.iter().map(|p| p.entries.len()).sum();
    let mut seen = HashSet::with_capacity(raw_len);
    let entries: Vec<ChartEntry> = pages
        .into_iter()
        .flat_map(|p| p.entries)
        .filter(|e| seen.insert(e.chart_id))
        .collect();

    let total_found = entries.len() as u64;
    debug!(
        raw = raw_len,
        distinct = entries.len(),
        "merged instrument pages"
    );

    Ok(MergedResult {
        entries,
        total_found,
        page,
        page_size,
        page_count: total_found.div_ceil(u64::from(page_size)),
    })
}

/// Partitions entries by [`GroupKey`], keeping first-seen order of groups and
/// of entries inside each group.
pub fn group(entries: &[ChartEntry]) -> Vec<ResultGroup> {
    let mut index: HashMap<GroupKey, usize> = HashMap::new();
    let mut groups: Vec<ResultGroup> = Vec::new();

    for entry in entries {
        let key = GroupKey::of(entry);
        let slot = *index.entry(key).or_insert_with(|| {
            groups.push(ResultGroup {
                key,
                entries: Vec::new(),
            });
            groups.len() - 1
        });
        groups[slot].entries.push(entry.clone());
    }

    groups
}

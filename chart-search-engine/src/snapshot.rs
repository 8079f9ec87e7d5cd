//! Cumulative, paged, grouped view of search results.

use std::collections::HashSet;

use chart_search_client::model::ChartEntry;
use tracing::debug;

use crate::aggregate::{MergedResult, ResultGroup};

/// What the caller should do with its visible result list.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Notification {
    /// A new result set; drop what is shown and render the snapshot.
    Replace,
    /// Another page; add the new groups at the end.
    Append,
    /// Nothing changed; keep the current view (and scroll position).
    Suppressed,
}

/// Results accumulated since the last [`Notification::Replace`].
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Snapshot {
    last: Option<MergedResult>,
    groups: Vec<ResultGroup>,
}

impl Snapshot {
    /// Most recent merged page applied to the snapshot.
    pub fn last_result(&self) -> Option<&MergedResult> {
        self.last.as_ref()
    }

    pub fn groups(&self) -> &[ResultGroup] {
        &self.groups
    }

    /// All charts in display order.
    pub fn entries(&self) -> impl Iterator<Item = &ChartEntry> {
        self.groups.iter().flat_map(|g| g.entries().iter())
    }

    pub fn entry_count(&self) -> usize {
        self.groups.iter().map(ResultGroup::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.last.is_none()
    }
}

/// Sole writer of the [`Snapshot`].
#[derive(Debug, Default)]
pub struct SnapshotManager {
    snapshot: Snapshot,
}

impl SnapshotManager {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn snapshot(&self) -> &Snapshot {
        &self.snapshot
    }

    /// Folds a merged page into the snapshot.
    ///
    /// For a fresh search the result is compared to the previous one by chart
    /// id set and total; an identical result is suppressed and the snapshot is
    /// left as is. Next-page results are appended without cross-page dedup.
    pub fn apply(&mut self, merged: MergedResult, is_next_page: bool) -> Notification {
        if is_next_page {
            let groups = merged.groups();
            debug!(groups = groups.len(), page = merged.page, "appending page");
            self.snapshot.groups.extend(groups);
            self.snapshot.last = Some(merged);
            return Notification::Append;
        }

        if let Some(prev) = &self.snapshot.last {
            if same_result(prev, &merged) {
                debug!(found = merged.total_found, "results unchanged, suppressing");
                return Notification::Suppressed;
            }
        }

        debug!(found = merged.total_found, "replacing results");
        self.snapshot.groups = merged.groups();
        self.snapshot.last = Some(merged);
        Notification::Replace
    }

    /// True when the last fetched page was full, so another may exist.
    pub fn has_more_pages(&self) -> bool {
        match &self.snapshot.last {
            Some(last) => {
                self.snapshot.entry_count() as u64
                    == u64::from(last.page) * u64::from(last.page_size)
            }
            None => false,
        }
    }
}

/// Same chart ids (order-insensitive) and same total.
fn same_result(prev: &MergedResult, next: &MergedResult) -> bool {
    if prev.total_found != next.total_found {
        return false;
    }
    let a: HashSet<i64> = prev.entries.iter().map(|e| e.chart_id).collect();
    let b: HashSet<i64> = next.entries.iter().map(|e| e.chart_id).collect();
    a == b
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::aggregate::GroupKey;

    fn merged(ids: &[(i64, Option<i64>)], total: u64, page: u32, page_size: u32) -> MergedResult {
        MergedResult {
            entries: ids.iter().map(|&(c, s)| ChartEntry::new(c, s)).collect(),
            total_found: total,
            page,
            page_size,
            page_count: total.div_ceil(u64::from(page_size)),
        }
    }

    fn ids(snapshot: &Snapshot) -> Vec<i64> {
        snapshot.entries().map(|e| e.chart_id).collect()
    }

    #[test]
    fn first_search_replaces() {
        let mut mgr = SnapshotManager::new();
        let n = mgr.apply(merged(&[], 0, 1, 25), false);
        assert_eq!(n, Notification::Replace);
        assert!(!mgr.snapshot().is_empty());
        assert_eq!(mgr.snapshot().entry_count(), 0);
    }

    #[test]
    fn identical_refresh_is_suppressed_and_untouched() {
        let mut mgr = SnapshotManager::new();
        mgr.apply(merged(&[(1, Some(9)), (2, None)], 2, 1, 25), false);
        let before = mgr.snapshot().clone();
        let groups_ptr = mgr.snapshot().groups().as_ptr();

        let n = mgr.apply(merged(&[(2, None), (1, Some(9))], 2, 1, 25), false);

        assert_eq!(n, Notification::Suppressed);
        assert_eq!(mgr.snapshot(), &before);
        assert_eq!(mgr.snapshot().groups().as_ptr(), groups_ptr);
        assert_eq!(ids(mgr.snapshot()), vec![1, 2], "previous order kept");
    }

    #[test]
    fn different_total_or_ids_replace() {
        let mut mgr = SnapshotManager::new();
        mgr.apply(merged(&[(1, None), (2, None)], 2, 1, 25), false);

        assert_eq!(
            mgr.apply(merged(&[(1, None), (2, None)], 3, 1, 25), false),
            Notification::Replace
        );
        assert_eq!(
            mgr.apply(merged(&[(1, None), (3, None)], 3, 1, 25), false),
            Notification::Replace
        );
        assert_eq!(ids(mgr.snapshot()), vec![1, 3]);
    }

    #[test]
    fn next_pages_accumulate_in_order() {
        let mut mgr = SnapshotManager::new();
        mgr.apply(merged(&[(1, Some(10)), (2, None)], 6, 1, 2), false);

        for (page, chunk) in [(2u32, [(3, Some(10)), (4, None)]), (3, [(5, Some(11)), (6, Some(11))])] {
            assert_eq!(mgr.apply(merged(&chunk, 6, page, 2), true), Notification::Append);
        }

        assert_eq!(ids(mgr.snapshot()), vec![1, 2, 3, 4, 5, 6]);
        let keys: Vec<i64> = mgr.snapshot().groups().iter().map(|g| g.key().tag()).collect();
        // Song 10 spans two pages and appears as two groups.
        assert_eq!(keys, vec![10, -2, 10, -4, 11]);
        assert_eq!(mgr.snapshot().last_result().map(|r| r.page), Some(3));
    }

    #[test]
    fn three_appends_of_k_entries_hold_three_k() {
        let mut mgr = SnapshotManager::new();
        let k = 4i64;
        for round in 0..3 {
            let chunk: Vec<(i64, Option<i64>)> =
                (0..k).map(|i| (round * k + i + 1, Some(round))).collect();
            mgr.apply(merged(&chunk, 100, round as u32 + 1, k as u32), true);
        }
        assert_eq!(mgr.snapshot().entry_count(), 12);
        assert_eq!(ids(mgr.snapshot()), (1..=12).collect::<Vec<_>>());
        assert_eq!(mgr.snapshot().groups().len(), 3);
        assert_eq!(mgr.snapshot().groups()[2].key(), GroupKey::Song(2));
    }

    #[test]
    fn more_pages_only_after_a_full_page() {
        let mut mgr = SnapshotManager::new();
        assert!(!mgr.has_more_pages());

        mgr.apply(merged(&[(1, None), (2, None)], 5, 1, 2), false);
        assert!(mgr.has_more_pages());

        mgr.apply(merged(&[(3, None)], 5, 2, 2), true);
        assert!(!mgr.has_more_pages());
    }
}

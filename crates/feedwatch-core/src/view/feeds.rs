// ── Feeds view ──

use serde::Serialize;
use strum::{Display, EnumIter, EnumString};

use super::StaleGuard;
use super::page::{PAGE_SIZE, page_count, paginate};
use super::search::matches_search;
use crate::model::{Feed, FeedStatus};

/// Sort order for feed listings. `Id` keeps generator order.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Display, EnumString, EnumIter)]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
pub enum FeedSort {
    #[default]
    Id,
    Name,
    Status,
    Size,
    LastGenerated,
}

/// Search and status filter plus sort order for feeds.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FeedFilter {
    pub search: String,
    /// `None` means all statuses.
    pub status: Option<FeedStatus>,
    pub sort: FeedSort,
}

impl FeedFilter {
    pub fn matches(&self, feed: &Feed) -> bool {
        matches_search(
            &self.search,
            [feed.name.as_str(), feed.client.as_str(), feed.id.as_str()],
        ) && self.status.is_none_or(|s| feed.status == s)
    }

    /// Filter then sort. The input order is preserved for `FeedSort::Id`.
    pub fn apply(&self, feeds: &[Feed]) -> Vec<Feed> {
        let mut out: Vec<Feed> = feeds.iter().filter(|f| self.matches(f)).cloned().collect();
        match self.sort {
            FeedSort::Id => {}
            FeedSort::Name => out.sort_by(|a, b| natural_key(&a.name).cmp(&natural_key(&b.name))),
            FeedSort::Status => out.sort_by_key(|f| f.status),
            FeedSort::Size => out.sort_by(|a, b| b.size_mb.cmp(&a.size_mb)),
            FeedSort::LastGenerated => out.sort_by(|a, b| b.last_generated.cmp(&a.last_generated)),
        }
        out
    }
}

/// Splits a trailing number off so `Daily Report 10` sorts after `Daily Report 9`.
fn natural_key(name: &str) -> (String, u64) {
    let digits = name.len() - name.trim_end_matches(|c: char| c.is_ascii_digit()).len();
    let (prefix, number) = name.split_at(name.len() - digits);
    (prefix.to_lowercase(), number.parse().unwrap_or(0))
}

/// Counters over the unfiltered feed collection.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FeedSummary {
    pub total: usize,
    pub active: usize,
    pub delayed: usize,
    /// Feeds in the `error` state.
    pub failed: usize,
    pub total_size_mb: u64,
}

impl FeedSummary {
    pub fn from_feeds(feeds: &[Feed]) -> Self {
        feeds.iter().fold(
            Self {
                total: feeds.len(),
                ..Self::default()
            },
            |mut acc, feed| {
                acc.active += usize::from(feed.status == FeedStatus::Active);
                acc.delayed += usize::from(feed.is_delayed);
                acc.failed += usize::from(feed.is_failed());
                acc.total_size_mb += feed.size_mb;
                acc
            },
        )
    }
}

/// Stateful feeds listing: latest source, filter, and current page.
///
/// The page resets to 1 whenever the search term, the status filter, or the
/// source collection changes.
#[derive(Debug, Clone)]
pub struct FeedsView {
    source: Vec<Feed>,
    filter: FeedFilter,
    filtered: Vec<Feed>,
    page: usize,
    page_size: usize,
    guard: StaleGuard,
}

impl Default for FeedsView {
    fn default() -> Self {
        Self {
            source: Vec::new(),
            filter: FeedFilter::default(),
            filtered: Vec::new(),
            page: 1,
            page_size: PAGE_SIZE,
            guard: StaleGuard::default(),
        }
    }
}

impl FeedsView {
    pub fn new(filter: FeedFilter) -> Self {
        let mut view = Self {
            filter,
            ..Self::default()
        };
        view.recompute();
        view
    }

    /// Replace the source if `seq` is newer than the last applied result.
    pub fn apply_update(&mut self, seq: u64, feeds: Vec<Feed>) -> bool {
        if !self.guard.accept(seq) {
            return false;
        }
        self.set_source(feeds);
        true
    }

    pub fn set_source(&mut self, feeds: Vec<Feed>) {
        self.source = feeds;
        self.recompute();
        self.page = 1;
    }

    pub fn set_search(&mut self, search: impl Into<String>) {
        let search = search.into();
        if search != self.filter.search {
            self.filter.search = search;
            self.recompute();
            self.page = 1;
        }
    }

    pub fn set_status(&mut self, status: Option<FeedStatus>) {
        if status != self.filter.status {
            self.filter.status = status;
            self.recompute();
            self.page = 1;
        }
    }

    pub fn set_sort(&mut self, sort: FeedSort) {
        if sort != self.filter.sort {
            self.filter.sort = sort;
            self.recompute();
        }
    }

    /// Jump to a 1-based page. Out-of-range pages are allowed and show nothing.
    pub fn set_page(&mut self, page: usize) {
        self.page = page.max(1);
    }

    /// Advance one page, stopping at the last.
    pub fn next_page(&mut self) {
        if self.page < self.page_count() {
            self.page += 1;
        }
    }

    pub fn prev_page(&mut self) {
        self.page = self.page.saturating_sub(1).max(1);
    }

    // ── Accessors ────────────────────────────────────────────────────

    pub fn filter(&self) -> &FeedFilter {
        &self.filter
    }

    pub fn source(&self) -> &[Feed] {
        &self.source
    }

    pub fn filtered(&self) -> &[Feed] {
        &self.filtered
    }

    /// Rows on the current page.
    pub fn visible(&self) -> &[Feed] {
        paginate(&self.filtered, self.page, self.page_size)
    }

    pub fn page(&self) -> usize {
        self.page
    }

    pub fn page_count(&self) -> usize {
        page_count(self.filtered.len(), self.page_size)
    }

    pub fn summary(&self) -> FeedSummary {
        FeedSummary::from_feeds(&self.source)
    }

    fn recompute(&mut self) {
        self.filtered = self.filter.apply(&self.source);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mock::MockGenerator;
    use chrono::Utc;
    use pretty_assertions::assert_eq;

    fn feeds() -> Vec<Feed> {
        MockGenerator::new(Some(17)).generate_feeds(Utc::now())
    }

    #[test]
    fn search_is_case_insensitive_over_name_client_and_id() {
        let feeds = feeds();
        let filter = FeedFilter {
            search: "client a".into(),
            ..FeedFilter::default()
        };
        let hits = filter.apply(&feeds);
        assert!(hits.iter().all(|f| f.client.to_lowercase().contains("client a")));
        assert_eq!(
            hits.len(),
            feeds.iter().filter(|f| f.client == "Client A").count()
        );

        let by_id = FeedFilter {
            search: "FEED-007".into(),
            ..FeedFilter::default()
        };
        assert_eq!(by_id.apply(&feeds).len(), 1);

        assert_eq!(FeedFilter::default().apply(&feeds), feeds);
    }

    #[test]
    fn blank_search_is_not_treated_as_empty() {
        let mut view = FeedsView::default();
        view.set_source(feeds());
        view.set_search("   ");
        assert!(view.filtered().is_empty());
        view.set_search("client a ");
        assert!(view.filtered().is_empty());
    }

    #[test]
    fn status_filter_and_idempotence() {
        let feeds = feeds();
        let filter = FeedFilter {
            status: Some(FeedStatus::Error),
            ..FeedFilter::default()
        };
        let once = filter.apply(&feeds);
        assert!(once.iter().all(|f| f.status == FeedStatus::Error));
        assert_eq!(filter.apply(&once), once);
    }

    #[test]
    fn summary_ignores_filters() {
        let feeds = feeds();
        let mut view = FeedsView::default();
        view.set_source(feeds.clone());
        let unfiltered = view.summary();

        view.set_status(Some(FeedStatus::Pending));
        view.set_search("zzz");
        assert!(view.filtered().is_empty());
        assert_eq!(view.summary(), unfiltered);
        assert_eq!(unfiltered.total, 25);
        assert_eq!(unfiltered.total_size_mb, feeds.iter().map(|f| f.size_mb).sum::<u64>());
    }

    #[test]
    fn paging_through_twenty_five_feeds() {
        let mut view = FeedsView::default();
        view.set_source(feeds());
        assert_eq!(view.page_count(), 3);
        assert_eq!(view.visible().len(), 10);
        view.next_page();
        assert_eq!(view.visible().len(), 10);
        view.next_page();
        assert_eq!(view.visible().len(), 5);
        view.next_page();
        assert_eq!(view.page(), 3);
        view.set_page(4);
        assert!(view.visible().is_empty());
        view.prev_page();
        assert_eq!(view.page(), 3);
    }

    #[test]
    fn page_resets_on_search_status_and_source_change() {
        let mut view = FeedsView::default();
        view.set_source(feeds());

        view.set_page(3);
        view.set_search("daily");
        assert_eq!(view.page(), 1);

        view.set_page(2);
        view.set_status(Some(FeedStatus::Active));
        assert_eq!(view.page(), 1);

        view.set_status(None);
        view.set_page(2);
        view.set_source(feeds());
        assert_eq!(view.page(), 1);

        view.set_page(2);
        view.set_sort(FeedSort::Size);
        assert_eq!(view.page(), 2);
    }

    #[test]
    fn stale_updates_are_ignored() {
        let mut view = FeedsView::default();
        let fresh = feeds();
        assert!(view.apply_update(5, fresh.clone()));
        assert!(!view.apply_update(4, Vec::new()));
        assert_eq!(view.source(), fresh.as_slice());
    }

    #[test]
    fn name_sort_is_numeric_aware() {
        let mut view = FeedsView::new(FeedFilter {
            sort: FeedSort::Name,
            ..FeedFilter::default()
        });
        view.set_source(feeds());
        let names: Vec<&str> = view.filtered().iter().map(|f| f.name.as_str()).collect();
        assert_eq!(names[0], "Daily Report 1");
        assert_eq!(names[8], "Daily Report 9");
        assert_eq!(names[9], "Daily Report 10");
    }

    #[test]
    fn size_sort_is_descending() {
        let filter = FeedFilter {
            sort: FeedSort::Size,
            ..FeedFilter::default()
        };
        let sorted = filter.apply(&feeds());
        assert!(sorted.windows(2).all(|w| w[0].size_mb >= w[1].size_mb));
    }
}

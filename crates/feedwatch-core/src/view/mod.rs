// ── Derived view computation ──
//
// Pure functions and small state holders that turn a fetched collection
// into what a screen shows: search, categorical filters, sorting,
// pagination, and summary counters. Summaries always read the unfiltered
// source.

pub mod alerts;
pub mod dashboard;
pub mod feeds;
pub mod format;
pub mod page;
pub mod search;

pub use alerts::{AlertFilter, AlertSummary, AlertsView};
pub use dashboard::{DashboardData, RECENT_ALERT_COUNT};
pub use feeds::{FeedFilter, FeedSort, FeedSummary, FeedsView};
pub use format::{format_size_mb, format_timestamp};
pub use page::{PAGE_SIZE, page_count, paginate};
pub use search::matches_search;

/// Rejects results older than the newest one already applied.
///
/// Sequence numbers come from [`crate::poll::next_sequence`], so results
/// from different pollers of the same view compare correctly.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StaleGuard {
    latest: Option<u64>,
}

impl StaleGuard {
    /// Returns `true` and records `seq` if it is newer than anything seen.
    pub fn accept(&mut self, seq: u64) -> bool {
        match self.latest {
            Some(latest) if seq <= latest => false,
            _ => {
                self.latest = Some(seq);
                true
            }
        }
    }

    pub fn latest(&self) -> Option<u64> {
        self.latest
    }
}

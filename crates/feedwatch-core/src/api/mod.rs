// ── Data access facade ──
//
// `FeedApi` is the seam between consumers and whatever produces feed data.
// `MockFeedApi` is the in-memory implementation; a real HTTP backend
// would implement the same trait.

mod mock;

pub use mock::MockFeedApi;

use std::future::Future;

use crate::command::{Command, CommandResult};
use crate::error::CoreError;
use crate::model::{Alert, Client, DashboardStats, Feed, FeedPerformance};

/// Async read operations plus a single command entry point.
///
/// Implementations are cheap to clone and safe to share between
/// polling tasks.
pub trait FeedApi: Clone + Send + Sync + 'static {
    fn get_feeds(&self) -> impl Future<Output = Result<Vec<Feed>, CoreError>> + Send;

    /// Alerts ordered newest first.
    fn get_alerts(&self) -> impl Future<Output = Result<Vec<Alert>, CoreError>> + Send;

    fn get_clients(&self) -> impl Future<Output = Result<Vec<Client>, CoreError>> + Send;

    fn get_dashboard_stats(&self) -> impl Future<Output = Result<DashboardStats, CoreError>> + Send;

    /// Daily records ordered oldest first.
    fn get_feed_performance(
        &self,
    ) -> impl Future<Output = Result<Vec<FeedPerformance>, CoreError>> + Send;

    fn execute(
        &self,
        command: Command,
    ) -> impl Future<Output = Result<CommandResult, CoreError>> + Send;

    // ── Provided ─────────────────────────────────────────────────────

    fn acknowledge_alert(
        &self,
        alert_id: &str,
    ) -> impl Future<Output = Result<CommandResult, CoreError>> + Send {
        self.execute(Command::acknowledge(alert_id))
    }

    /// Look up one feed by id.
    fn get_feed(&self, id: &str) -> impl Future<Output = Result<Feed, CoreError>> + Send {
        async move {
            self.get_feeds()
                .await?
                .into_iter()
                .find(|f| f.id == id)
                .ok_or_else(|| CoreError::feed_not_found(id))
        }
    }
}

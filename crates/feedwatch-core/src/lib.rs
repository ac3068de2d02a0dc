//! Data layer for the feedwatch monitoring dashboard.
//!
//! This crate owns the domain model and everything a UI needs to show the
//! state of a feed generation and transfer pipeline:
//!
//! - **[`FeedApi`]**: async data-access facade. [`MockFeedApi`] serves
//!   randomized data after a simulated delay, either regenerated per call or
//!   from one shared dataset with stable identities.
//!
//! - **[`MockGenerator`]**: seeded generator for feeds, alerts, clients,
//!   dashboard stats, and the trailing performance window.
//!
//! - **[`view`]**: search, filter, sort, pagination, and summary rules, plus
//!   stateful [`FeedsView`] / [`AlertsView`] holders with stale-result
//!   guards and optimistic acknowledgment.
//!
//! - **[`poll`]**: cancellable per-view polling tasks with bounded retry.
//!
//! - **[`Command`]**: typed mutations (alert acknowledgment).

pub mod api;
pub mod command;
pub mod config;
pub mod error;
pub mod mock;
pub mod model;
pub mod poll;
pub mod view;

// ── Primary re-exports ──────────────────────────────────────────────
pub use api::{FeedApi, MockFeedApi};
pub use command::{Command, CommandResult};
pub use config::{ApiConfig, DatasetMode, LatencyProfile, PollConfig, RetryPolicy};
pub use error::CoreError;
pub use mock::{Dataset, MockGenerator, SharedDataset};
pub use poll::{PollGuard, PollSettings, PollUpdate, PolledView, spawn_poller};
pub use view::{
    AlertFilter, AlertSummary, AlertsView, DashboardData, FeedFilter, FeedSort, FeedSummary,
    FeedsView,
};

// Re-export model types at the crate root for ergonomics.
pub use model::{
    Alert, AlertType, Client, ClientStatus, DashboardStats, Feed, FeedPerformance, FeedStatus,
    Severity, StatusBreakdown,
};

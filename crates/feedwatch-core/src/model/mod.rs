// ── Feed monitoring domain model ──
//
// Canonical types shared by the mock generator, the data-access facade,
// and the derived-view layer. Wire names follow the camelCase JSON shape
// the dashboard has always consumed.

pub mod alert;
pub mod client;
pub mod feed;
pub mod stats;

// ── Re-exports ──────────────────────────────────────────────────────

pub use alert::{Alert, AlertType, Severity};
pub use client::{Client, ClientStatus};
pub use feed::{Feed, FeedStatus};
pub use stats::{DashboardStats, FeedPerformance, StatusBreakdown};

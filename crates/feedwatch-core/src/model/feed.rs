// ── Feed domain types ──

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter, EnumString};

/// Lifecycle state of a feed.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    PartialOrd,
    Ord,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    EnumIter,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
pub enum FeedStatus {
    Active,
    Inactive,
    Error,
    Pending,
}

/// A scheduled data-generation-and-transfer unit.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Feed {
    pub id: String,
    pub name: String,
    pub description: String,
    pub status: FeedStatus,
    pub last_generated: DateTime<Utc>,
    pub last_transferred: DateTime<Utc>,
    /// Time of day as `HH:MM`.
    pub scheduled_time: String,
    /// Owning client name.
    pub client: String,
    #[serde(rename = "size")]
    pub size_mb: u64,
    pub format: String,
    /// Minutes.
    pub generation_time: u32,
    /// Minutes.
    pub transfer_time: u32,
    pub is_delayed: bool,
    /// Minutes; zero unless `is_delayed`.
    pub delayed_by: u32,
}

impl Feed {
    /// `true` when the feed is in the `error` state.
    pub fn is_failed(&self) -> bool {
        self.status == FeedStatus::Error
    }
}

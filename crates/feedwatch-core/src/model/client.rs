// ── Client domain types ──

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter, EnumString};

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumString, EnumIter,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
pub enum ClientStatus {
    Active,
    Inactive,
}

/// A downstream recipient of feed transfers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Client {
    pub id: String,
    pub name: String,
    pub feeds_count: u32,
    /// Never exceeds `feeds_count`.
    pub active_feeds: u32,
    /// Cumulative MB transferred.
    #[serde(rename = "totalTransferSize")]
    pub total_transfer_mb: u64,
    pub last_activity: DateTime<Utc>,
    pub status: ClientStatus,
}

impl Client {
    pub fn is_active(&self) -> bool {
        self.status == ClientStatus::Active
    }
}

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Outcome of one offline-queue drain.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct SyncReport {
    pub synced_count: u32,
    pub failed_count: u32,
    pub pending_count: u32,
}

impl SyncReport {
    pub fn new(synced_count: u32, failed_count: u32, pending_count: u32) -> Self {
        Self {
            synced_count,
            failed_count,
            pending_count,
        }
    }
}

/// Point-in-time view of the coordinator's unsettled work.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct SyncStatusSnapshot {
    pub is_syncing: bool,
    pub pending_count: usize,
    pub queued_count: usize,
    pub has_unsaved_changes: bool,
    pub last_sync: Option<DateTime<Utc>>,
}

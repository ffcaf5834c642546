use serde::{Deserialize, Serialize};

/// Per-entry replay state: `Queued → InFlight → {Synced | Queued | Failed}`.
/// Only `Queued` and `Failed` are ever persisted; the others are transient.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum QueueEntryStatus {
    Queued,
    InFlight,
    Synced,
    Failed,
    Unknown(String),
}

impl QueueEntryStatus {
    pub fn as_str(&self) -> &str {
        match self {
            QueueEntryStatus::Queued => "queued",
            QueueEntryStatus::InFlight => "in_flight",
            QueueEntryStatus::Synced => "synced",
            QueueEntryStatus::Failed => "failed",
            QueueEntryStatus::Unknown(value) => value.as_str(),
        }
    }
}

impl From<&str> for QueueEntryStatus {
    fn from(value: &str) -> Self {
        match value {
            "queued" => QueueEntryStatus::Queued,
            "in_flight" => QueueEntryStatus::InFlight,
            "synced" => QueueEntryStatus::Synced,
            "failed" => QueueEntryStatus::Failed,
            other => QueueEntryStatus::Unknown(other.to_string()),
        }
    }
}

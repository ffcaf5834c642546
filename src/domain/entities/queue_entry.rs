use crate::domain::entities::OperationRecord;
use crate::domain::value_objects::QueueEntryStatus;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// An operation parked in the durable offline queue.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct QueuedOperation {
    pub record: OperationRecord,
    pub status: QueueEntryStatus,
    pub retry_count: u32,
    pub error_message: Option<String>,
    pub queued_at: DateTime<Utc>,
}

impl QueuedOperation {
    pub fn new(record: OperationRecord) -> Self {
        Self {
            record,
            status: QueueEntryStatus::Queued,
            retry_count: 0,
            error_message: None,
            queued_at: Utc::now(),
        }
    }

    pub fn mark_failed_attempt(&mut self, error: String, max_retries: u32) {
        self.retry_count += 1;
        self.error_message = Some(error);
        self.status = if self.retry_count >= max_retries {
            QueueEntryStatus::Failed
        } else {
            QueueEntryStatus::Queued
        };
    }

    pub fn is_exhausted(&self) -> bool {
        self.status == QueueEntryStatus::Failed
    }
}

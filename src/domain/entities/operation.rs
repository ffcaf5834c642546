use crate::domain::entities::Resume;
use crate::domain::value_objects::{OperationId, OperationKind, ResumeId, ResumePayload};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One dispatched mutation. Held in the pending map from dispatch until the
/// remote call resolves; moved into the offline queue on connectivity loss.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct OperationRecord {
    pub operation_id: OperationId,
    pub kind: OperationKind,
    pub target_id: Option<ResumeId>,
    pub payload: ResumePayload,
    pub previous_snapshot: Option<Resume>,
    pub timestamp: DateTime<Utc>,
}

impl OperationRecord {
    pub fn new(
        kind: OperationKind,
        target_id: Option<ResumeId>,
        payload: ResumePayload,
        previous_snapshot: Option<Resume>,
    ) -> Self {
        Self {
            operation_id: OperationId::generate(),
            kind,
            target_id,
            payload,
            previous_snapshot,
            timestamp: Utc::now(),
        }
    }
}

use crate::domain::entities::Resume;
use crate::domain::value_objects::{OperationKind, ResumeId};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Record of a committed mutation, kept so the user can reverse it with a
/// compensating operation (delete for create, restore for update, recreate
/// for delete).
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct UndoEntry {
    pub kind: OperationKind,
    pub target_id: ResumeId,
    pub previous_snapshot: Option<Resume>,
    pub new_snapshot: Option<Resume>,
    pub timestamp: DateTime<Utc>,
}

impl UndoEntry {
    pub fn new(
        kind: OperationKind,
        target_id: ResumeId,
        previous_snapshot: Option<Resume>,
        new_snapshot: Option<Resume>,
    ) -> Self {
        Self {
            kind,
            target_id,
            previous_snapshot,
            new_snapshot,
            timestamp: Utc::now(),
        }
    }
}

use crate::domain::value_objects::ResumeId;
use async_trait::async_trait;

/// Asks the user before a destructive operation. The optimistic removal
/// happens only after this answers true.
#[async_trait]
pub trait ConfirmationGate: Send + Sync {
    async fn confirm_delete(&self, id: &ResumeId) -> bool;
}

/// Gate that never asks. For embeddings that render their own confirmation
/// UI before calling the coordinator.
pub struct AutoConfirm;

#[async_trait]
impl ConfirmationGate for AutoConfirm {
    async fn confirm_delete(&self, _id: &ResumeId) -> bool {
        true
    }
}

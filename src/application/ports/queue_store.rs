use crate::domain::entities::QueuedOperation;
use crate::shared::error::AppError;
use async_trait::async_trait;

/// Durable, ordered storage for the offline queue. Survives restarts.
#[async_trait]
pub trait QueuePersistence: Send + Sync {
    /// All entries in original insertion order.
    async fn read_queue(&self) -> Result<Vec<QueuedOperation>, AppError>;

    /// Replace the persisted list with `entries`, preserving their order.
    async fn write_queue(&self, entries: &[QueuedOperation]) -> Result<(), AppError>;
}

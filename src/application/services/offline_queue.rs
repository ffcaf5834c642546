use crate::application::ports::{Notifier, QueuePersistence, RemoteError, RemoteResumeService, ResumeCache};
use crate::domain::entities::{OperationRecord, QueuedOperation, SyncReport};
use crate::domain::value_objects::{OperationId, OperationKind, QueueEntryStatus};
use crate::shared::error::{AppError, Result};
use std::sync::Arc;
use tokio::sync::Mutex;

/// Durable FIFO of operations that could not reach the remote. Entries are
/// replayed in original insertion order when connectivity returns; replay
/// never re-applies optimistic writes, it only records authoritative results.
pub struct OfflineQueueService {
    store: Arc<dyn QueuePersistence>,
    remote: Arc<dyn RemoteResumeService>,
    cache: Arc<dyn ResumeCache>,
    notifier: Arc<dyn Notifier>,
    drain_guard: Mutex<()>,
    // serializes every read-modify-write of the persisted list; an enqueue
    // arriving mid-drain waits and appends after the drain's write instead
    // of being overwritten by it
    store_lock: Mutex<()>,
    max_retries: u32,
}

impl OfflineQueueService {
    pub fn new(
        store: Arc<dyn QueuePersistence>,
        remote: Arc<dyn RemoteResumeService>,
        cache: Arc<dyn ResumeCache>,
        notifier: Arc<dyn Notifier>,
        max_retries: u32,
    ) -> Self {
        Self {
            store,
            remote,
            cache,
            notifier,
            drain_guard: Mutex::new(()),
            store_lock: Mutex::new(()),
            max_retries,
        }
    }

    /// Append an operation to the durable queue. Blocks while a drain holds
    /// the store, so the append lands after the drain's write.
    pub async fn enqueue(&self, record: OperationRecord) -> Result<()> {
        let _store = self.store_lock.lock().await;
        let mut queue = self.store.read_queue().await?;
        tracing::debug!(
            operation_id = %record.operation_id,
            kind = %record.kind,
            position = queue.len(),
            "queueing operation for offline replay"
        );
        queue.push(QueuedOperation::new(record));
        self.store.write_queue(&queue).await
    }

    pub async fn queued_count(&self) -> Result<usize> {
        Ok(self.store.read_queue().await?.len())
    }

    /// Replay the queue in insertion order. Entries that fail stay queued in
    /// their original position; entries that have exhausted their retries are
    /// kept (marked failed) but skipped. A drain already in progress is not
    /// re-entered.
    pub async fn drain(&self) -> Result<SyncReport> {
        let _guard = match self.drain_guard.try_lock() {
            Ok(guard) => guard,
            Err(_) => return Ok(SyncReport::default()),
        };
        // held until `remaining` is written back; see `store_lock`
        let _store = self.store_lock.lock().await;

        let queue = self.store.read_queue().await?;
        if queue.is_empty() {
            return Ok(SyncReport::default());
        }

        let drain_key = OperationId::generate();
        self.notifier.loading(
            &format!("Processing {} offline operation(s)...", queue.len()),
            &drain_key,
        );

        let mut remaining = Vec::new();
        let mut synced = 0u32;
        let mut failed = 0u32;

        for mut entry in queue {
            if entry.is_exhausted() {
                remaining.push(entry);
                continue;
            }

            entry.status = QueueEntryStatus::InFlight;
            match self.replay(&entry.record).await {
                Ok(()) => {
                    tracing::debug!(operation_id = %entry.record.operation_id, "queued operation synced");
                    synced += 1;
                }
                Err(err) => {
                    tracing::warn!(
                        operation_id = %entry.record.operation_id,
                        retry_count = entry.retry_count + 1,
                        error = %err,
                        "queued operation failed to sync"
                    );
                    failed += 1;
                    entry.mark_failed_attempt(err.to_string(), self.max_retries);
                    remaining.push(entry);
                }
            }
        }

        self.store.write_queue(&remaining).await?;

        if failed > 0 {
            self.notifier
                .error(&format!("{failed} operation(s) failed to sync"), &drain_key);
        } else {
            self.notifier
                .success(&format!("{synced} operation(s) synced"), &drain_key);
        }

        Ok(SyncReport::new(synced, failed, remaining.len() as u32))
    }

    /// Perform one queued operation against the remote and fold the
    /// authoritative result into the cache. The optimistic effect was already
    /// rolled back at enqueue time, so no speculative write happens here.
    async fn replay(&self, record: &OperationRecord) -> std::result::Result<(), RemoteError> {
        match record.kind {
            // Duplicates were materialized into a creation payload when queued.
            OperationKind::Create | OperationKind::Duplicate => {
                let created = self.remote.create(record.payload.clone()).await?;
                self.cache.insert(created.confirmed()).await;
            }
            OperationKind::Update => {
                let target = Self::target_of(record)?;
                let updated = self.remote.update(target, record.payload.clone()).await?;
                self.cache.replace(target, updated.confirmed()).await;
            }
            OperationKind::Delete => {
                let target = Self::target_of(record)?;
                self.remote.delete(target).await?;
                self.cache.remove(target).await;
            }
        }
        Ok(())
    }

    fn target_of(
        record: &OperationRecord,
    ) -> std::result::Result<&crate::domain::value_objects::ResumeId, RemoteError> {
        record.target_id.as_ref().ok_or_else(|| RemoteError::Rejected {
            status: None,
            message: format!(
                "queued {} operation {} has no target id",
                record.kind, record.operation_id
            ),
        })
    }
}

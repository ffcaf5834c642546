use crate::application::ports::{
    ConfirmationGate, Notifier, RemoteResumeService, ResumeCache,
};
use crate::application::services::{OfflineQueueService, UndoStack};
use crate::domain::entities::{OperationRecord, Resume, SyncReport, SyncStatusSnapshot, UndoEntry};
use crate::domain::value_objects::{
    CacheKey, OperationId, OperationKind, ResumeId, ResumePayload,
};
use crate::shared::config::CoordinatorConfig;
use crate::shared::error::{AppError, Result};
use chrono::{DateTime, Duration, Utc};
use futures::future::join_all;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::{Mutex, OwnedMutexGuard, RwLock};


/// Options bag recognized by every mutation.
#[derive(Debug, Clone)]
pub struct MutationOptions {
    /// Apply the speculative cache write before the remote call.
    pub optimistic: bool,
    /// Emit user-facing progress and result notifications.
    pub notify: bool,
    /// Push an undo entry once the mutation commits.
    pub undoable: bool,
    /// Ask the confirmation gate before a delete.
    pub confirmation: bool,
    /// How an update payload combines with cached fields.
    pub merge_strategy: crate::domain::value_objects::MergeStrategy,
    /// Explicit title for a duplicate; derived from the source otherwise.
    pub new_title: Option<String>,
}

impl Default for MutationOptions {
    fn default() -> Self {
        Self {
            optimistic: true,
            notify: true,
            undoable: true,
            confirmation: true,
            merge_strategy: crate::domain::value_objects::MergeStrategy::Overwrite,
            new_title: None,
        }
    }
}

impl MutationOptions {
    /// No speculative write, no notifications, no confirmation prompt.
    pub fn silent() -> Self {
        Self {
            optimistic: false,
            notify: false,
            undoable: false,
            confirmation: false,
            ..Self::default()
        }
    }
}

/// Coordinates optimistic mutations against the resume cache: speculative
/// write first, remote call second, then commit (authoritative entity) or
/// rollback (exact pre-mutation snapshot). Connectivity failures are rolled
/// back and parked in the offline queue for replay.
///
/// Operations on the same target are serialized so a later dispatch always
/// snapshots the settled result of the earlier one; distinct targets proceed
/// independently.
pub struct MutationService {
    cache: Arc<dyn ResumeCache>,
    remote: Arc<dyn RemoteResumeService>,
    notifier: Arc<dyn Notifier>,
    confirmation: Arc<dyn ConfirmationGate>,
    queue: Arc<OfflineQueueService>,
    pending: RwLock<HashMap<OperationId, OperationRecord>>,
    undo: UndoStack,
    undo_in_flight: Mutex<()>,
    target_locks: Mutex<HashMap<String, Arc<Mutex<()>>>>,
    last_sync: RwLock<Option<DateTime<Utc>>>,
    config: CoordinatorConfig,
}

impl MutationService {
    pub fn new(
        cache: Arc<dyn ResumeCache>,
        remote: Arc<dyn RemoteResumeService>,
        notifier: Arc<dyn Notifier>,
        confirmation: Arc<dyn ConfirmationGate>,
        queue: Arc<OfflineQueueService>,
        config: CoordinatorConfig,
    ) -> Self {
        let undo = UndoStack::new(config.undo.max_entries);
        Self {
            cache,
            remote,
            notifier,
            confirmation,
            queue,
            pending: RwLock::new(HashMap::new()),
            undo,
            undo_in_flight: Mutex::new(()),
            target_locks: Mutex::new(HashMap::new()),
            last_sync: RwLock::new(None),
            config,
        }
    }

    pub fn offline_queue(&self) -> &Arc<OfflineQueueService> {
        &self.queue
    }

    // ===== create =====

    pub async fn create(&self, payload: ResumePayload, options: MutationOptions) -> Result<Resume> {
        if !options.optimistic {
            let created = self.remote.create(payload).await.map_err(AppError::from)?;
            let created = created.confirmed();
            self.cache.insert(created.clone()).await;
            return Ok(created);
        }

        let optimistic = Resume::synthesized(&payload, Utc::now());
        let pending_id = optimistic.id.clone();
        let _guard = self.target_guard(&pending_id).await;

        let record = OperationRecord::new(
            OperationKind::Create,
            Some(pending_id.clone()),
            payload.clone(),
            None,
        );
        let op_id = record.operation_id.clone();
        self.track(record).await;

        self.cache.insert(optimistic).await;
        self.cache.invalidate(&CacheKey::dashboard_stats()).await;
        self.cache.invalidate(&CacheKey::resume_count()).await;
        if options.notify {
            self.notifier.loading("Creating resume...", &op_id);
        }

        match self.remote.create(payload).await {
            Ok(created) => {
                let created = created.confirmed();
                self.cache.replace(&pending_id, created.clone()).await;
                self.untrack(&op_id).await;
                if options.undoable {
                    self.undo
                        .push(UndoEntry::new(
                            OperationKind::Create,
                            created.id.clone(),
                            None,
                            Some(created.clone()),
                        ))
                        .await;
                }
                self.mark_synced().await;
                if options.notify {
                    self.notifier.success("Resume created successfully!", &op_id);
                }
                Ok(created)
            }
            Err(err) => {
                self.cache.remove(&pending_id).await;
                let record = self.untrack(&op_id).await;
                self.requeue_if_retryable(err.is_connectivity(), record).await;
                if options.notify {
                    self.notifier.error("Failed to create resume", &op_id);
                }
                tracing::warn!(operation_id = %op_id, error = %err, "create rolled back");
                Err(err.into())
            }
        }
    }

    // ===== update =====

    pub async fn update(
        &self,
        id: &ResumeId,
        payload: ResumePayload,
        options: MutationOptions,
    ) -> Result<Resume> {
        let _guard = self.target_guard(id).await;

        let snapshot = self
            .cache
            .get(id)
            .await
            .ok_or_else(|| AppError::NotFound(format!("Resume {id} not found in cache")))?;

        if !options.optimistic {
            let updated = self
                .remote
                .update(id, payload)
                .await
                .map_err(AppError::from)?;
            let updated = updated.confirmed();
            self.cache.replace(id, updated.clone()).await;
            return Ok(updated);
        }

        let record = OperationRecord::new(
            OperationKind::Update,
            Some(id.clone()),
            payload.clone(),
            Some(snapshot.clone()),
        );
        let op_id = record.operation_id.clone();
        self.track(record).await;

        let speculative = snapshot.apply_update(&payload, options.merge_strategy, Utc::now());
        self.cache.replace(id, speculative).await;
        if options.notify {
            self.notifier.loading("Saving changes...", &op_id);
        }

        match self.remote.update(id, payload).await {
            Ok(updated) => {
                let updated = updated.confirmed();
                self.cache.replace(id, updated.clone()).await;
                self.untrack(&op_id).await;
                if options.undoable {
                    self.undo
                        .push(UndoEntry::new(
                            OperationKind::Update,
                            id.clone(),
                            Some(snapshot),
                            Some(updated.clone()),
                        ))
                        .await;
                }
                self.mark_synced().await;
                if options.notify {
                    self.notifier.success("Changes saved!", &op_id);
                }
                Ok(updated)
            }
            Err(err) => {
                // exact pre-mutation snapshot, never a partial state
                self.cache.replace(id, snapshot).await;
                let record = self.untrack(&op_id).await;
                self.requeue_if_retryable(err.is_connectivity(), record).await;
                if options.notify {
                    self.notifier.error("Failed to save changes", &op_id);
                }
                tracing::warn!(operation_id = %op_id, target = %id, error = %err, "update rolled back");
                Err(err.into())
            }
        }
    }

    // ===== delete =====

    /// Returns `Ok(false)` when the confirmation gate declines; nothing was
    /// touched in that case.
    pub async fn delete(&self, id: &ResumeId, options: MutationOptions) -> Result<bool> {
        if options.confirmation && !self.confirmation.confirm_delete(id).await {
            tracing::debug!(target = %id, "delete declined by confirmation gate");
            return Ok(false);
        }

        let _guard = self.target_guard(id).await;

        let snapshot = self
            .cache
            .get(id)
            .await
            .ok_or_else(|| AppError::NotFound(format!("Resume {id} not found in cache")))?;

        if !options.optimistic {
            self.remote.delete(id).await.map_err(AppError::from)?;
            self.cache.remove(id).await;
            return Ok(true);
        }

        let record = OperationRecord::new(
            OperationKind::Delete,
            Some(id.clone()),
            ResumePayload::empty(),
            Some(snapshot.clone()),
        );
        let op_id = record.operation_id.clone();
        self.track(record).await;

        self.cache.remove(id).await;
        self.cache.invalidate(&CacheKey::dashboard_stats()).await;
        self.cache.invalidate(&CacheKey::resume_count()).await;
        if options.notify {
            self.notifier.loading("Deleting resume...", &op_id);
        }

        match self.remote.delete(id).await {
            Ok(()) => {
                self.untrack(&op_id).await;
                if options.undoable {
                    self.undo
                        .push(UndoEntry::new(
                            OperationKind::Delete,
                            id.clone(),
                            Some(snapshot),
                            None,
                        ))
                        .await;
                }
                self.mark_synced().await;
                if options.notify {
                    if options.undoable {
                        self.notifier.success_undoable("Resume deleted", &op_id);
                    } else {
                        self.notifier.success("Resume deleted", &op_id);
                    }
                }
                Ok(true)
            }
            Err(err) => {
                self.cache.insert(snapshot).await;
                let record = self.untrack(&op_id).await;
                self.requeue_if_retryable(err.is_connectivity(), record).await;
                if options.notify {
                    self.notifier.error("Failed to delete resume", &op_id);
                }
                tracing::warn!(operation_id = %op_id, target = %id, error = %err, "delete rolled back");
                Err(err.into())
            }
        }
    }

    // ===== duplicate =====

    /// Create sourced from the current cache snapshot of `id`; server
    /// identity is stripped so the remote assigns a fresh one.
    pub async fn duplicate(&self, id: &ResumeId, options: MutationOptions) -> Result<Resume> {
        let _guard = self.target_guard(id).await;

        let source = self
            .cache
            .get(id)
            .await
            .ok_or_else(|| AppError::NotFound(format!("Resume {id} not found in cache")))?;

        if !options.optimistic {
            let duplicated = self
                .remote
                .duplicate(id, options.new_title.clone())
                .await
                .map_err(AppError::from)?;
            let duplicated = duplicated.confirmed();
            self.cache.insert(duplicated.clone()).await;
            return Ok(duplicated);
        }

        let copy = source.duplicated(options.new_title.as_deref(), Utc::now());
        let pending_id = copy.id.clone();
        // Queued as a materialized creation payload so offline replay does
        // not depend on the source still existing.
        let record = OperationRecord::new(
            OperationKind::Duplicate,
            Some(pending_id.clone()),
            copy.to_creation_payload(),
            None,
        );
        let op_id = record.operation_id.clone();
        self.track(record).await;

        self.cache.insert(copy).await;
        if options.notify {
            self.notifier.loading("Duplicating resume...", &op_id);
        }

        match self.remote.duplicate(id, options.new_title.clone()).await {
            Ok(duplicated) => {
                let duplicated = duplicated.confirmed();
                self.cache.replace(&pending_id, duplicated.clone()).await;
                self.untrack(&op_id).await;
                if options.undoable {
                    // compensation for a committed duplicate is a delete
                    self.undo
                        .push(UndoEntry::new(
                            OperationKind::Create,
                            duplicated.id.clone(),
                            None,
                            Some(duplicated.clone()),
                        ))
                        .await;
                }
                self.mark_synced().await;
                if options.notify {
                    self.notifier.success("Resume duplicated!", &op_id);
                }
                Ok(duplicated)
            }
            Err(err) => {
                self.cache.remove(&pending_id).await;
                let record = self.untrack(&op_id).await;
                self.requeue_if_retryable(err.is_connectivity(), record).await;
                if options.notify {
                    self.notifier.error("Failed to duplicate resume", &op_id);
                }
                tracing::warn!(operation_id = %op_id, source = %id, error = %err, "duplicate rolled back");
                Err(err.into())
            }
        }
    }

    // ===== batch update =====

    /// Apply N updates as one logical unit. Remote calls run concurrently;
    /// if any of them fails every member is reverted to its pre-batch
    /// snapshot. Partial commits never happen.
    pub async fn batch_update(
        &self,
        updates: Vec<(ResumeId, ResumePayload)>,
        options: MutationOptions,
    ) -> Result<Vec<Resume>> {
        if updates.is_empty() {
            return Ok(Vec::new());
        }

        // lock targets in sorted order so two overlapping batches cannot
        // deadlock each other
        let mut keys: Vec<String> = updates.iter().map(|(id, _)| id.to_string()).collect();
        keys.sort();
        keys.dedup();
        let mut guards = Vec::with_capacity(keys.len());
        for key in keys {
            guards.push(self.target_guard_by_key(key).await);
        }

        // snapshot everything before the first write; a missing target fails
        // the whole batch untouched
        let mut snapshots = Vec::with_capacity(updates.len());
        for (id, _) in &updates {
            let snapshot = self
                .cache
                .get(id)
                .await
                .ok_or_else(|| AppError::NotFound(format!("Resume {id} not found in cache")))?;
            snapshots.push(snapshot);
        }

        let batch_key = OperationId::generate();
        let mut op_ids = Vec::with_capacity(updates.len());

        if options.optimistic {
            for ((id, payload), snapshot) in updates.iter().zip(&snapshots) {
                let record = OperationRecord::new(
                    OperationKind::Update,
                    Some(id.clone()),
                    payload.clone(),
                    Some(snapshot.clone()),
                );
                op_ids.push(record.operation_id.clone());
                self.track(record).await;

                let speculative = snapshot.apply_update(payload, options.merge_strategy, Utc::now());
                self.cache.replace(id, speculative).await;
            }
            if options.notify {
                self.notifier.loading(
                    &format!("Updating {} resume(s)...", updates.len()),
                    &batch_key,
                );
            }
        }

        let results = join_all(
            updates
                .iter()
                .map(|(id, payload)| self.remote.update(id, payload.clone())),
        )
        .await;

        let first_error = results.iter().find_map(|r| r.as_ref().err().cloned());

        match first_error {
            None => {
                let mut committed = Vec::with_capacity(results.len());
                for ((id, _), result) in updates.iter().zip(results) {
                    // all results are Ok here
                    let updated = result.map_err(AppError::from)?.confirmed();
                    self.cache.replace(id, updated.clone()).await;
                    committed.push(updated);
                }
                for op_id in &op_ids {
                    self.untrack(op_id).await;
                }
                self.mark_synced().await;
                if options.optimistic && options.notify {
                    self.notifier.success(
                        &format!("{} resume(s) updated!", committed.len()),
                        &batch_key,
                    );
                }
                Ok(committed)
            }
            Some(err) => {
                if options.optimistic {
                    for ((id, _), snapshot) in updates.iter().zip(snapshots) {
                        self.cache.replace(id, snapshot).await;
                    }
                    for op_id in &op_ids {
                        self.untrack(op_id).await;
                    }
                    if options.notify {
                        self.notifier.error("Batch update failed", &batch_key);
                    }
                }
                tracing::warn!(batch = %batch_key, error = %err, "batch update rolled back");
                Err(err.into())
            }
        }
    }

    // ===== undo =====

    /// Pop the most recent undo entry and perform its compensating remote
    /// operation. On failure the entry goes back onto the stack. Strictly
    /// sequential: a second undo waits for the first.
    pub async fn undo_last(&self) -> Result<()> {
        let _in_flight = self.undo_in_flight.lock().await;

        let Some(entry) = self.undo.pop().await else {
            self.notifier.info("Nothing to undo");
            return Ok(());
        };

        let key = OperationId::generate();
        match self.compensate(&entry).await {
            Ok(message) => {
                self.notifier.success(message, &key);
                Ok(())
            }
            Err(err) => {
                self.undo.restore(entry).await;
                self.notifier.error("Failed to undo operation", &key);
                tracing::warn!(error = %err, "undo failed; entry restored");
                Err(err)
            }
        }
    }

    pub async fn can_undo(&self) -> bool {
        !self.undo.is_empty().await
    }

    async fn compensate(&self, entry: &UndoEntry) -> Result<&'static str> {
        let _guard = self.target_guard(&entry.target_id).await;
        match entry.kind {
            OperationKind::Create | OperationKind::Duplicate => {
                self.remote
                    .delete(&entry.target_id)
                    .await
                    .map_err(AppError::from)?;
                self.cache.remove(&entry.target_id).await;
                Ok("Creation undone")
            }
            OperationKind::Update => {
                let previous = entry.previous_snapshot.as_ref().ok_or_else(|| {
                    AppError::Internal("undo entry is missing its previous snapshot".to_string())
                })?;
                self.remote
                    .update(&entry.target_id, previous.to_update_payload())
                    .await
                    .map_err(AppError::from)?;
                self.cache.replace(&entry.target_id, previous.clone()).await;
                Ok("Changes reverted")
            }
            OperationKind::Delete => {
                let previous = entry.previous_snapshot.as_ref().ok_or_else(|| {
                    AppError::Internal("undo entry is missing its previous snapshot".to_string())
                })?;
                let restored = self
                    .remote
                    .create(previous.to_creation_payload())
                    .await
                    .map_err(AppError::from)?;
                self.cache.insert(restored.confirmed()).await;
                Ok("Resume restored")
            }
        }
    }

    // ===== offline queue =====

    /// Explicitly park an operation for replay once connectivity returns.
    pub async fn queue_offline(&self, record: OperationRecord) -> Result<()> {
        self.queue.enqueue(record).await?;
        self.notifier
            .info("Operation queued for when you're back online");
        Ok(())
    }

    pub async fn drain_offline_queue(&self) -> Result<SyncReport> {
        let report = self.queue.drain().await?;
        if report.synced_count > 0 {
            self.mark_synced().await;
        }
        Ok(report)
    }

    // ===== status and cleanup =====

    pub async fn sync_status(&self) -> Result<SyncStatusSnapshot> {
        let pending_count = self.pending.read().await.len();
        let queued_count = self.queue.queued_count().await?;
        Ok(SyncStatusSnapshot {
            is_syncing: pending_count > 0,
            pending_count,
            queued_count,
            has_unsaved_changes: pending_count > 0 || queued_count > 0,
            last_sync: *self.last_sync.read().await,
        })
    }

    /// Drop every cached entry still flagged optimistic and clear the
    /// pending map. Called on shutdown; a flagged entry with no pending or
    /// queued operation left is an orphan.
    pub async fn cleanup_optimistic(&self) -> Result<usize> {
        let list = self.cache.list().await;
        let before = list.len();
        let kept: Vec<Resume> = list.into_iter().filter(|r| !r.is_optimistic).collect();
        let removed = before - kept.len();
        self.cache.set_list(kept).await;
        self.pending.write().await.clear();
        if removed > 0 {
            tracing::info!(removed, "dropped leftover optimistic entries");
        }
        Ok(removed)
    }

    /// Remove optimistic entries older than the configured TTL. These are
    /// zombies from dispatches whose resolution never landed.
    pub async fn prune_stale_optimistic(&self) -> Result<usize> {
        let cutoff = Utc::now() - Duration::seconds(self.config.cache.optimistic_ttl_secs as i64);
        let list = self.cache.list().await;
        let before = list.len();
        let kept: Vec<Resume> = list
            .into_iter()
            .filter(|r| !(r.is_optimistic && r.created_at < cutoff))
            .collect();
        let removed = before - kept.len();
        self.cache.set_list(kept).await;
        Ok(removed)
    }

    // ===== internals =====

    async fn track(&self, record: OperationRecord) {
        self.pending
            .write()
            .await
            .insert(record.operation_id.clone(), record);
    }

    async fn untrack(&self, op_id: &OperationId) -> Option<OperationRecord> {
        self.pending.write().await.remove(op_id)
    }

    async fn requeue_if_retryable(&self, retryable: bool, record: Option<OperationRecord>) {
        if !retryable {
            return;
        }
        let Some(record) = record else { return };
        if let Err(err) = self.queue.enqueue(record).await {
            tracing::error!(error = %err, "failed to persist operation to the offline queue");
        }
    }

    async fn mark_synced(&self) {
        *self.last_sync.write().await = Some(Utc::now());
    }

    async fn target_guard(&self, id: &ResumeId) -> OwnedMutexGuard<()> {
        self.target_guard_by_key(id.to_string()).await
    }

    async fn target_guard_by_key(&self, key: String) -> OwnedMutexGuard<()> {
        let lock = {
            let mut locks = self.target_locks.lock().await;
            // a lock only referenced by the map belongs to a settled
            // operation; sweep those so pending-id keys don't accumulate
            locks.retain(|_, lock| Arc::strong_count(lock) > 1);
            locks
                .entry(key)
                .or_insert_with(|| Arc::new(Mutex::new(())))
                .clone()
        };
        lock.lock_owned().await
    }

    #[cfg(test)]
    pub(crate) async fn target_lock_count(&self) -> usize {
        self.target_locks.lock().await.len()
    }
}

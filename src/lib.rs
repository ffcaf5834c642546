//! Optimistic mutation coordinator for the resume builder client.
//!
//! Applies speculative cache writes immediately, reconciles them against the
//! remote service, and keeps an undo stack plus a durable offline queue for
//! operations dispatched without connectivity.

pub mod application;
pub mod domain;
pub mod infrastructure;
pub mod shared;

pub use application::services::{
    LifecycleEvent, LifecycleState, MutationOptions, MutationService, OfflineQueueService,
    SyncLifecycle,
};
pub use domain::entities::{
    OperationRecord, QueuedOperation, Resume, SyncReport, SyncStatusSnapshot, UndoEntry,
};
pub use domain::value_objects::{
    CacheKey, MergeStrategy, OperationId, OperationKind, QueueEntryStatus, ResumeId, ResumePayload,
};
pub use shared::{AppError, CoordinatorConfig, Result};

#![allow(unused_imports)]

pub mod entities;
pub mod value_objects;

pub use entities::{OperationRecord, QueuedOperation, Resume, SyncReport, UndoEntry};
pub use value_objects::{
    CacheKey, MergeStrategy, OperationId, OperationKind, QueueEntryStatus, ResumeId, ResumePayload,
};

pub mod lifecycle;
pub mod mutation_service;
pub mod offline_queue;
pub mod undo_stack;

#[cfg(test)]
pub(crate) mod test_support;

pub use lifecycle::{LifecycleEvent, LifecycleState, SyncLifecycle};
pub use mutation_service::{MutationOptions, MutationService};
pub use offline_queue::OfflineQueueService;
pub use undo_stack::UndoStack;

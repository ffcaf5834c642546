pub mod operation;
pub mod queue_entry;
pub mod resume;
pub mod sync_report;
pub mod undo_entry;

pub use operation::OperationRecord;
pub use queue_entry::QueuedOperation;
pub use resume::Resume;
pub use sync_report::{SyncReport, SyncStatusSnapshot};
pub use undo_entry::UndoEntry;

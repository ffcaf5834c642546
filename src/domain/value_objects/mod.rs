pub mod cache_key;
pub mod merge_strategy;
pub mod operation_id;
pub mod operation_kind;
pub mod payload;
pub mod queue_status;
pub mod resume_id;

pub use cache_key::CacheKey;
pub use merge_strategy::MergeStrategy;
pub use operation_id::OperationId;
pub use operation_kind::OperationKind;
pub use payload::ResumePayload;
pub use queue_status::QueueEntryStatus;
pub use resume_id::{PendingToken, ResumeId};

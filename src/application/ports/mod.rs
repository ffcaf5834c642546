pub mod cache;
pub mod confirmation;
pub mod notifier;
pub mod queue_store;
pub mod remote;

pub use cache::ResumeCache;
pub use confirmation::{AutoConfirm, ConfirmationGate};
pub use notifier::Notifier;
pub use queue_store::QueuePersistence;
pub use remote::{RemoteError, RemoteResumeService};

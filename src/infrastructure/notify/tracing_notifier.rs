use crate::application::ports::Notifier;
use crate::domain::value_objects::OperationId;

/// Notifier that routes user-facing messages to the log. Headless hosts and
/// services use this; UI hosts supply their own toast-backed implementation.
#[derive(Debug, Default)]
pub struct TracingNotifier;

impl Notifier for TracingNotifier {
    fn loading(&self, message: &str, key: &OperationId) {
        tracing::info!(operation = %key, "{message}");
    }

    fn success(&self, message: &str, key: &OperationId) {
        tracing::info!(operation = %key, "{message}");
    }

    fn error(&self, message: &str, key: &OperationId) {
        tracing::error!(operation = %key, "{message}");
    }

    fn info(&self, message: &str) {
        tracing::info!("{message}");
    }

    fn success_undoable(&self, message: &str, key: &OperationId) {
        tracing::info!(operation = %key, undoable = true, "{message}");
    }
}

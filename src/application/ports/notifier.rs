use crate::domain::value_objects::OperationId;

/// User-notification sink. Keyed by operation id so a loading notification
/// is replaced in place by its terminal resolution.
pub trait Notifier: Send + Sync {
    fn loading(&self, message: &str, key: &OperationId);
    fn success(&self, message: &str, key: &OperationId);
    fn error(&self, message: &str, key: &OperationId);
    fn info(&self, message: &str);

    /// Terminal success that should render an "undo" affordance (deletes).
    fn success_undoable(&self, message: &str, key: &OperationId) {
        self.success(message, key);
    }
}

use crate::domain::entities::UndoEntry;
use tokio::sync::Mutex;

/// Bounded LIFO of committed mutations. The original kept this unbounded;
/// the cap keeps long editing sessions from accumulating snapshots forever.
pub struct UndoStack {
    entries: Mutex<Vec<UndoEntry>>,
    max_entries: usize,
}

impl UndoStack {
    pub fn new(max_entries: usize) -> Self {
        Self {
            entries: Mutex::new(Vec::new()),
            max_entries,
        }
    }

    pub async fn push(&self, entry: UndoEntry) {
        let mut entries = self.entries.lock().await;
        if entries.len() >= self.max_entries {
            entries.remove(0);
        }
        entries.push(entry);
    }

    pub async fn pop(&self) -> Option<UndoEntry> {
        self.entries.lock().await.pop()
    }

    /// Put a popped entry back after its compensating operation failed.
    pub async fn restore(&self, entry: UndoEntry) {
        self.entries.lock().await.push(entry);
    }

    pub async fn len(&self) -> usize {
        self.entries.lock().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.entries.lock().await.is_empty()
    }
}

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CoordinatorConfig {
    pub undo: UndoConfig,
    pub queue: QueueConfig,
    pub cache: CacheConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UndoConfig {
    /// Oldest entries are dropped once the stack reaches this many.
    pub max_entries: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QueueConfig {
    /// Replay attempts per queued operation before it is parked as failed.
    pub max_retries: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CacheConfig {
    /// Optimistic entries older than this are considered orphaned.
    pub optimistic_ttl_secs: u64,
}

impl Default for CoordinatorConfig {
    fn default() -> Self {
        Self {
            undo: UndoConfig { max_entries: 50 },
            queue: QueueConfig { max_retries: 3 },
            cache: CacheConfig {
                optimistic_ttl_secs: 300, // 5 minutes
            },
        }
    }
}

impl CoordinatorConfig {
    pub fn from_env() -> Self {
        let mut cfg = Self::default();

        if let Ok(v) = std::env::var("RESUME_SYNC_UNDO_MAX") {
            if let Ok(n) = v.parse() {
                cfg.undo.max_entries = n;
            }
        }
        if let Ok(v) = std::env::var("RESUME_SYNC_MAX_RETRIES") {
            if let Ok(n) = v.parse() {
                cfg.queue.max_retries = n;
            }
        }
        if let Ok(v) = std::env::var("RESUME_SYNC_OPTIMISTIC_TTL_SECS") {
            if let Ok(n) = v.parse() {
                cfg.cache.optimistic_ttl_secs = n;
            }
        }

        cfg
    }
}

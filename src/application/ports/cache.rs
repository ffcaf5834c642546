use crate::domain::entities::Resume;
use crate::domain::value_objects::{CacheKey, ResumeId};
use async_trait::async_trait;

/// Cache port for the resume collection. Injected so tests can fake it;
/// the coordinator never touches a module-level cache.
#[async_trait]
pub trait ResumeCache: Send + Sync {
    /// Full collection, newest first.
    async fn list(&self) -> Vec<Resume>;

    /// Replace the whole collection.
    async fn set_list(&self, resumes: Vec<Resume>);

    /// Look up one resume by id.
    async fn get(&self, id: &ResumeId) -> Option<Resume>;

    /// Insert at the front of the collection.
    async fn insert(&self, resume: Resume);

    /// Replace the entry currently stored under `id`. The replacement may
    /// carry a different id (pending id confirmed by the server). No-op when
    /// `id` is absent.
    async fn replace(&self, id: &ResumeId, resume: Resume);

    /// Remove and return the entry stored under `id`.
    async fn remove(&self, id: &ResumeId) -> Option<Resume>;

    /// Mark a derived key (stats, counts) as needing a refetch.
    async fn invalidate(&self, key: &CacheKey);
}

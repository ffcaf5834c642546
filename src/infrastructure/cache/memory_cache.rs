use crate::application::ports::ResumeCache;
use crate::domain::entities::Resume;
use crate::domain::value_objects::{CacheKey, ResumeId};
use async_trait::async_trait;
use std::collections::HashSet;
use tokio::sync::RwLock;

struct CacheInner {
    resumes: Vec<Resume>,
    invalidated: HashSet<CacheKey>,
}

/// List-shaped in-memory cache. Order is display order: new entries go to
/// the front, replacements keep their position.
pub struct InMemoryResumeCache {
    inner: RwLock<CacheInner>,
}

impl InMemoryResumeCache {
    pub fn new() -> Self {
        Self::seeded(Vec::new())
    }

    pub fn seeded(resumes: Vec<Resume>) -> Self {
        Self {
            inner: RwLock::new(CacheInner {
                resumes,
                invalidated: HashSet::new(),
            }),
        }
    }

    /// Keys invalidated since the last call. Hosts poll this to know which
    /// derived views (stats, counts) need a refetch.
    pub async fn take_invalidated(&self) -> HashSet<CacheKey> {
        let mut inner = self.inner.write().await;
        std::mem::take(&mut inner.invalidated)
    }
}

impl Default for InMemoryResumeCache {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ResumeCache for InMemoryResumeCache {
    async fn list(&self) -> Vec<Resume> {
        self.inner.read().await.resumes.clone()
    }

    async fn set_list(&self, resumes: Vec<Resume>) {
        self.inner.write().await.resumes = resumes;
    }

    async fn get(&self, id: &ResumeId) -> Option<Resume> {
        self.inner
            .read()
            .await
            .resumes
            .iter()
            .find(|r| r.id == *id)
            .cloned()
    }

    async fn insert(&self, resume: Resume) {
        self.inner.write().await.resumes.insert(0, resume);
    }

    async fn replace(&self, id: &ResumeId, replacement: Resume) {
        let mut inner = self.inner.write().await;
        // the replacement may carry a different id (pending -> confirmed)
        if let Some(slot) = inner.resumes.iter_mut().find(|r| r.id == *id) {
            *slot = replacement;
        }
    }

    async fn remove(&self, id: &ResumeId) -> Option<Resume> {
        let mut inner = self.inner.write().await;
        let position = inner.resumes.iter().position(|r| r.id == *id)?;
        Some(inner.resumes.remove(position))
    }

    async fn invalidate(&self, key: &CacheKey) {
        self.inner.write().await.invalidated.insert(key.clone());
    }
}

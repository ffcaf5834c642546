use crate::domain::value_objects::ResumeId;
use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CacheKey(String);

impl CacheKey {
    pub fn new(value: String) -> Result<Self, String> {
        if value.trim().is_empty() {
            return Err("Cache key cannot be empty".to_string());
        }
        Ok(Self(value))
    }

    /// The user's resume collection.
    pub fn resume_list() -> Self {
        Self("resumes:list".to_string())
    }

    /// A single resume looked up by id.
    pub fn resume(id: &ResumeId) -> Self {
        Self(format!("resume:{id}"))
    }

    pub fn dashboard_stats() -> Self {
        Self("stats:dashboard".to_string())
    }

    pub fn resume_count() -> Self {
        Self("stats:resume_count".to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for CacheKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

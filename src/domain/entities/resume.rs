use crate::domain::value_objects::{MergeStrategy, ResumeId, ResumePayload};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

pub const STATUS_DRAFT: &str = "draft";

/// A resume as the cache sees it. `fields` holds the arbitrary domain
/// content (sections, personal info, theme); the rest is lifecycle.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Resume {
    pub id: ResumeId,
    pub title: String,
    pub status: String,
    pub version: u32,
    pub is_optimistic: bool,
    pub fields: Map<String, Value>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Resume {
    /// Speculative entity for an optimistic create. Carries a pending id
    /// until the server answers with the authoritative one.
    pub fn synthesized(payload: &ResumePayload, now: DateTime<Utc>) -> Self {
        let fields = payload.as_object().clone();
        Self {
            id: ResumeId::pending(),
            title: payload.title().unwrap_or("Untitled resume").to_string(),
            status: STATUS_DRAFT.to_string(),
            version: 1,
            is_optimistic: true,
            fields,
            created_at: now,
            updated_at: now,
        }
    }

    /// The entity as it should look after an optimistic update.
    pub fn apply_update(
        &self,
        payload: &ResumePayload,
        strategy: MergeStrategy,
        now: DateTime<Utc>,
    ) -> Self {
        let fields = match strategy {
            MergeStrategy::Overwrite => payload.as_object().clone(),
            MergeStrategy::Merge => {
                let mut merged = self.fields.clone();
                for (key, value) in payload.as_object() {
                    merged.insert(key.clone(), value.clone());
                }
                merged
            }
        };
        Self {
            id: self.id.clone(),
            title: payload.title().unwrap_or(&self.title).to_string(),
            status: self.status.clone(),
            version: self.version + 1,
            is_optimistic: true,
            fields,
            created_at: self.created_at,
            updated_at: now,
        }
    }

    /// Speculative copy of this resume, stripped of server identity.
    pub fn duplicated(&self, new_title: Option<&str>, now: DateTime<Utc>) -> Self {
        let title = new_title
            .map(str::to_string)
            .unwrap_or_else(|| format!("{} (Copy)", self.title));
        Self {
            id: ResumeId::pending(),
            title,
            status: self.status.clone(),
            version: 1,
            is_optimistic: true,
            fields: self.fields.clone(),
            created_at: now,
            updated_at: now,
        }
    }

    /// Payload for (re)creating this resume remotely. Carries no id fields,
    /// so the server assigns fresh identity.
    pub fn to_creation_payload(&self) -> ResumePayload {
        let mut map = self.fields.clone();
        map.remove("id");
        map.remove("_id");
        map.insert("title".to_string(), Value::String(self.title.clone()));
        map.insert("status".to_string(), Value::String(self.status.clone()));
        ResumePayload::from_map(map)
    }

    /// Payload that reverts a remote entity to this snapshot's content.
    pub fn to_update_payload(&self) -> ResumePayload {
        let mut map = self.fields.clone();
        map.insert("title".to_string(), Value::String(self.title.clone()));
        ResumePayload::from_map(map)
    }

    pub fn confirmed(mut self) -> Self {
        self.is_optimistic = false;
        self
    }
}

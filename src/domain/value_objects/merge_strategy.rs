use serde::{Deserialize, Serialize};

/// How an update payload combines with the cached entity's fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MergeStrategy {
    /// Replace the field map with the payload.
    #[default]
    Overwrite,
    /// Union of existing fields and payload; payload wins on conflicts.
    Merge,
}

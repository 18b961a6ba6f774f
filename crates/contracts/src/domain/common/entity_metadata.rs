use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Lifecycle timestamps of an aggregate instance, set by the store
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EntityMetadata {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub modified_at: Option<DateTime<Utc>>,
}

impl EntityMetadata {
    /// Stamp a freshly inserted record
    pub fn created(now: DateTime<Utc>) -> Self {
        Self {
            created_at: Some(now),
            modified_at: Some(now),
        }
    }

    /// Advance the modification timestamp
    pub fn touch(&mut self, now: DateTime<Utc>) {
        self.modified_at = Some(now);
    }
}

use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};

/// One successful generation. Never mutated once created.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GeneratedImage {
    pub id: String,
    /// Remote URL or inline `data:` URI.
    pub url: String,
    pub prompt: String,
    pub style: String,
    pub created_at: String,
}

impl GeneratedImage {
    pub fn new(
        id: String,
        url: String,
        prompt: String,
        style: String,
        created_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            url,
            prompt,
            style,
            created_at: created_at.to_rfc3339_opts(SecondsFormat::Millis, true),
        }
    }

    pub fn is_inline(&self) -> bool {
        self.url.starts_with("data:")
    }
}

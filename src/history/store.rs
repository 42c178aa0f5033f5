use anyhow::Result;
use chrono::{DateTime, Utc};
use tracing::{debug, warn};

use crate::history::{GeneratedImage, KeyValueStore};

pub const DEFAULT_HISTORY_KEY: &str = "imageHistory";
pub const DEFAULT_HISTORY_LIMIT: usize = 5;

/// Newest-first list of generated images, capped at `limit` entries and
/// mirrored in full to a single key of a [`KeyValueStore`].
#[derive(Debug)]
pub struct HistoryStore {
    entries: Vec<GeneratedImage>,
    limit: usize,
    storage: KeyValueStore,
    key: String,
}

impl HistoryStore {
    pub fn new(storage: KeyValueStore, key: impl Into<String>, limit: usize) -> Self {
        Self {
            entries: Vec::new(),
            limit: limit.max(1),
            storage,
            key: key.into(),
        }
    }

    pub fn limit(&self) -> usize {
        self.limit
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn entries(&self) -> &[GeneratedImage] {
        &self.entries
    }

    pub fn select(&self, id: &str) -> Option<&GeneratedImage> {
        self.entries.iter().find(|image| image.id == id)
    }

    /// Timestamp-based id that is always greater than the newest entry's id.
    pub fn next_id(&self, now: DateTime<Utc>) -> String {
        let millis = u64::try_from(now.timestamp_millis()).unwrap_or_default();
        let newest = self
            .entries
            .first()
            .and_then(|image| image.id.parse::<u64>().ok())
            .unwrap_or_default();
        if millis > newest {
            millis.to_string()
        } else {
            (newest + 1).to_string()
        }
    }

    pub async fn record(&mut self, image: GeneratedImage) -> Result<()> {
        self.entries.insert(0, image);
        self.entries.truncate(self.limit);
        self.persist().await
    }

    /// Replaces the in-memory list with whatever the store holds. An
    /// unreadable entry yields an empty history and is left on disk as is.
    pub async fn restore(&mut self) -> Result<()> {
        let Some(bytes) = self.storage.get(&self.key).await? else {
            self.entries = Vec::new();
            return Ok(());
        };
        let mut restored = match serde_json::from_slice::<Vec<GeneratedImage>>(&bytes) {
            Ok(entries) => entries,
            Err(err) => {
                warn!("failed to parse image history under {:?}: {}", self.key, err);
                Vec::new()
            }
        };
        restored.truncate(self.limit);
        debug!("restored {} history entries", restored.len());
        self.entries = restored;
        Ok(())
    }

    pub async fn clear(&mut self) -> Result<()> {
        self.entries.clear();
        self.storage.remove(&self.key).await
    }

    async fn persist(&self) -> Result<()> {
        let payload = serde_json::to_vec(&self.entries)?;
        self.storage.put(&self.key, &payload).await
    }
}

pub mod api;
pub mod config;
pub mod error;
pub mod history;
pub mod relay;
pub mod style;
pub mod web_pages;

use anyhow::Result;
use tracing::info;

pub use api::{AppState, router};
pub use config::Config;
pub use error::RelayError;

use history::{DEFAULT_HISTORY_KEY, HistoryStore, KeyValueStore};
use relay::InferenceClient;

/// Builds the relay client and restores persisted history.
pub async fn build_state(config: &Config) -> Result<AppState> {
    let relay = InferenceClient::new(
        config.api_url.clone(),
        config.api_key.clone(),
        config.request_timeout,
    )?;
    let storage = KeyValueStore::new(config.history_dir.clone());
    let mut history = HistoryStore::new(storage, DEFAULT_HISTORY_KEY, config.history_limit);
    history.restore().await?;
    info!(
        "restored {} of at most {} history entries from {}",
        history.len(),
        history.limit(),
        config.history_dir.display()
    );
    Ok(AppState::new(relay, history, config.theme))
}

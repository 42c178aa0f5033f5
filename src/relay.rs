//! Prompt relay to the text-to-image inference provider.

use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use base64::{Engine, engine::general_purpose::STANDARD as BASE64};
use reqwest::Client;
use serde::Serialize;
use tokio::sync::{OwnedSemaphorePermit, Semaphore};
use tracing::{debug, info, warn};
use url::Url;

use crate::error::RelayError;
use crate::style::enhance_prompt;

pub const NEGATIVE_PROMPT: &str =
    "blurry, bad anatomy, bad hands, cropped, worst quality, low quality";
const DATA_URI_MIME: &str = "image/jpeg";

#[derive(Debug, Serialize)]
struct InferenceRequest<'a> {
    inputs: &'a str,
    parameters: InferenceParameters<'a>,
}

#[derive(Debug, Serialize)]
struct InferenceParameters<'a> {
    negative_prompt: &'a str,
}

#[derive(Debug, Clone)]
pub struct InferenceClient {
    client: Client,
    api_url: Url,
    api_key: Option<String>,
}

impl InferenceClient {
    pub fn new(api_url: Url, api_key: Option<String>, timeout: Duration) -> anyhow::Result<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .context("failed to build inference HTTP client")?;
        Ok(Self {
            client,
            api_url,
            api_key: api_key.filter(|key| !key.trim().is_empty()),
        })
    }

    pub fn is_configured(&self) -> bool {
        self.api_key.is_some()
    }

    /// Generates one image and returns it as a `data:` URI. Makes exactly
    /// one outbound call, and none at all when the key or prompt is missing.
    pub async fn generate(&self, prompt: &str, style: &str) -> Result<String, RelayError> {
        let api_key = self.api_key.as_deref().ok_or(RelayError::Configuration)?;
        if prompt.is_empty() {
            return Err(RelayError::Validation);
        }

        let enhanced = enhance_prompt(prompt, style);
        debug!("sending generation request: {enhanced:?}");

        let response = self
            .client
            .post(self.api_url.clone())
            .bearer_auth(api_key)
            .json(&InferenceRequest {
                inputs: &enhanced,
                parameters: InferenceParameters {
                    negative_prompt: NEGATIVE_PROMPT,
                },
            })
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            warn!("inference API error: {status} {body}");
            return Err(RelayError::Upstream { status });
        }

        let bytes = response.bytes().await?;
        info!("received {} image bytes from inference API", bytes.len());
        Ok(to_data_uri(&bytes))
    }
}

pub fn to_data_uri(bytes: &[u8]) -> String {
    format!("data:{DATA_URI_MIME};base64,{}", BASE64.encode(bytes))
}

/// Splits a base64 `data:` URI into its mime type and decoded payload.
pub fn decode_data_uri(uri: &str) -> Option<(String, Vec<u8>)> {
    let rest = uri.strip_prefix("data:")?;
    let (meta, payload) = rest.split_once(',')?;
    let mime = meta.strip_suffix(";base64")?;
    let bytes = BASE64.decode(payload).ok()?;
    let mime = if mime.is_empty() { "application/octet-stream" } else { mime };
    Some((mime.to_string(), bytes))
}

/// Lets one generation run at a time; a second caller is turned away, not queued.
#[derive(Debug, Clone)]
pub struct GenerationGuard {
    permits: Arc<Semaphore>,
}

impl GenerationGuard {
    pub fn new() -> Self {
        Self {
            permits: Arc::new(Semaphore::new(1)),
        }
    }

    pub fn try_acquire(&self) -> Result<OwnedSemaphorePermit, RelayError> {
        self.permits
            .clone()
            .try_acquire_owned()
            .map_err(|_| RelayError::Busy)
    }

    pub fn is_busy(&self) -> bool {
        self.permits.available_permits() == 0
    }
}

impl Default for GenerationGuard {
    fn default() -> Self {
        Self::new()
    }
}

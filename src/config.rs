use std::env;
use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Result, anyhow, bail};
use url::Url;

use crate::history::DEFAULT_HISTORY_LIMIT;
use crate::web_pages::Theme;

pub const DEFAULT_API_URL: &str =
    "https://api-inference.huggingface.co/models/stabilityai/stable-diffusion-xl-base-1.0";
const DEFAULT_PORT: u16 = 3000;
const DEFAULT_TIMEOUT_SECS: u64 = 120;

#[derive(Debug, Clone)]
pub struct Config {
    pub api_url: Url,
    pub api_key: Option<String>,
    pub port: u16,
    pub history_dir: PathBuf,
    pub history_limit: usize,
    pub request_timeout: Duration,
    pub theme: Theme,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|name| env::var(name).ok())
    }

    /// Builds the config from any variable source. Blank values count as unset.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let var = |name: &str| lookup(name).filter(|value| !value.trim().is_empty());

        let api_url = match var("HUGGINGFACE_API_URL") {
            Some(raw) => validate_http_url(&raw)?,
            None => validate_http_url(DEFAULT_API_URL)?,
        };
        let api_key = var("HUGGINGFACE_API_KEY").map(|value| value.trim().to_string());
        let port = var("PORT")
            .and_then(|value| value.trim().parse::<u16>().ok())
            .unwrap_or(DEFAULT_PORT);
        let history_dir = var("HISTORY_DIR")
            .map(PathBuf::from)
            .unwrap_or_else(default_history_dir);
        let history_limit = var("HISTORY_LIMIT")
            .and_then(|value| value.trim().parse::<usize>().ok())
            .unwrap_or(DEFAULT_HISTORY_LIMIT)
            .max(1);
        let request_timeout = var("REQUEST_TIMEOUT_SECS")
            .and_then(|value| value.trim().parse::<u64>().ok())
            .filter(|secs| *secs > 0)
            .map(Duration::from_secs)
            .unwrap_or(Duration::from_secs(DEFAULT_TIMEOUT_SECS));
        let theme = var("UI_THEME")
            .and_then(|value| Theme::parse(value.trim()))
            .unwrap_or_default();

        Ok(Self {
            api_url,
            api_key,
            port,
            history_dir,
            history_limit,
            request_timeout,
            theme,
        })
    }

    pub fn bind_address(&self) -> String {
        format!("0.0.0.0:{}", self.port)
    }
}

fn default_history_dir() -> PathBuf {
    let mut base = dirs::data_dir().unwrap_or_else(|| PathBuf::from("."));
    base.push("image-gen-relay");
    base
}

pub fn validate_http_url(raw: &str) -> Result<Url> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        bail!("inference URL must not be empty");
    }
    let parsed =
        Url::parse(trimmed).map_err(|err| anyhow!("invalid inference URL {trimmed:?}: {err}"))?;
    match parsed.scheme() {
        "http" | "https" => Ok(parsed),
        scheme => bail!("inference URL must use http or https, got {scheme}"),
    }
}

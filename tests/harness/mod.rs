//! In-process test server backed by a temp history directory.
#![allow(dead_code)]

use std::net::SocketAddr;
use std::path::PathBuf;
use std::time::Duration;

use anyhow::Result;
use image_gen_relay::{Config, build_state, router, web_pages::Theme};
use reqwest::{Client, Response};
use serde_json::Value;
use tempfile::TempDir;
use tokio::task::JoinHandle;
use url::Url;

pub struct TestApp {
    pub addr: SocketAddr,
    pub client: Client,
    pub history_dir: PathBuf,
    server: JoinHandle<()>,
    _temp_dir: Option<TempDir>,
}

pub struct TestAppBuilder {
    api_url: String,
    api_key: Option<String>,
    history_limit: usize,
    timeout: Duration,
    history_dir: Option<PathBuf>,
}

impl TestAppBuilder {
    pub fn new(api_url: impl Into<String>) -> Self {
        Self {
            api_url: api_url.into(),
            api_key: Some("hf_test_key".to_string()),
            history_limit: 5,
            timeout: Duration::from_secs(5),
            history_dir: None,
        }
    }

    pub fn without_api_key(mut self) -> Self {
        self.api_key = None;
        self
    }

    pub fn history_limit(mut self, limit: usize) -> Self {
        self.history_limit = limit;
        self
    }

    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Reuse an existing history directory, e.g. to simulate a restart.
    pub fn history_dir(mut self, dir: PathBuf) -> Self {
        self.history_dir = Some(dir);
        self
    }

    pub async fn start(self) -> Result<TestApp> {
        let (history_dir, temp_dir) = match self.history_dir {
            Some(dir) => (dir, None),
            None => {
                let temp_dir = TempDir::new()?;
                (temp_dir.path().to_path_buf(), Some(temp_dir))
            }
        };
        let config = Config {
            api_url: Url::parse(&self.api_url)?,
            api_key: self.api_key,
            port: 0,
            history_dir: history_dir.clone(),
            history_limit: self.history_limit,
            request_timeout: self.timeout,
            theme: Theme::Classic,
        };
        let state = build_state(&config).await?;
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await?;
        let addr = listener.local_addr()?;
        let server = tokio::spawn(async move {
            let _ = axum::serve(listener, router(state)).await;
        });

        Ok(TestApp {
            addr,
            client: Client::builder().timeout(Duration::from_secs(10)).build()?,
            history_dir,
            server,
            _temp_dir: temp_dir,
        })
    }
}

impl TestApp {
    pub fn url(&self, path: &str) -> String {
        format!("http://{}{}", self.addr, path)
    }

    pub async fn get(&self, path: &str) -> Result<Response> {
        Ok(self.client.get(self.url(path)).send().await?)
    }

    pub async fn delete(&self, path: &str) -> Result<Response> {
        Ok(self.client.delete(self.url(path)).send().await?)
    }

    pub async fn generate(&self, body: Value) -> Result<Response> {
        Ok(self
            .client
            .post(self.url("/api/generate"))
            .json(&body)
            .send()
            .await?)
    }

    pub async fn history(&self) -> Result<Vec<Value>> {
        Ok(self.get("/api/history").await?.json().await?)
    }
}

impl Drop for TestApp {
    fn drop(&mut self) {
        self.server.abort();
    }
}

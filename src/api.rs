//! HTTP routes: generation, history, health and the UI page.

use std::sync::Arc;

use anyhow::anyhow;
use axum::{
    Json, Router,
    body::Bytes,
    extract::{Path, State},
    http::{StatusCode, header},
    response::{IntoResponse, Redirect, Response},
    routing::{get, post},
};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use tokio::sync::RwLock;
use tower_http::trace::TraceLayer;
use tracing::{info, warn};

use crate::error::RelayError;
use crate::history::{GeneratedImage, HistoryStore};
use crate::relay::{GenerationGuard, InferenceClient, decode_data_uri};
use crate::style::Style;
use crate::web_pages::{self, Theme};

/// Shared application state. The history store is owned here and handed to
/// every handler; nothing else holds it.
#[derive(Clone)]
pub struct AppState {
    pub relay: Arc<InferenceClient>,
    pub history: Arc<RwLock<HistoryStore>>,
    pub guard: GenerationGuard,
    pub theme: Theme,
}

impl AppState {
    pub fn new(relay: InferenceClient, history: HistoryStore, theme: Theme) -> Self {
        Self {
            relay: Arc::new(relay),
            history: Arc::new(RwLock::new(history)),
            guard: GenerationGuard::new(),
            theme,
        }
    }
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(web_pages::index_page))
        .route("/health", get(health))
        .route("/api/generate", post(generate))
        .route("/api/history", get(list_history).delete(clear_history))
        .route("/api/history/{id}", get(get_history_item))
        .route("/api/history/{id}/download", get(download_history_item))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

#[derive(Debug, Deserialize)]
pub struct GenerateRequest {
    pub prompt: Option<String>,
    pub style: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateResponse {
    pub image_url: String,
    pub id: String,
}

#[derive(Serialize)]
struct HealthResponse {
    status: &'static str,
    busy: bool,
}

async fn health(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        busy: state.guard.is_busy(),
    })
}

async fn generate(
    State(state): State<AppState>,
    body: Bytes,
) -> Result<Json<GenerateResponse>, RelayError> {
    if !state.relay.is_configured() {
        return Err(RelayError::Configuration);
    }
    // Parsed regardless of Content-Type; only unreadable JSON is rejected.
    let request: GenerateRequest = serde_json::from_slice(&body)
        .map_err(|err| anyhow!("invalid request body: {err}"))?;
    let prompt = request.prompt.unwrap_or_default();
    let style = request
        .style
        .unwrap_or_else(|| Style::default().tag().to_string());
    if prompt.is_empty() {
        return Err(RelayError::Validation);
    }

    let _permit = state.guard.try_acquire()?;
    let image_url = state.relay.generate(&prompt, &style).await?;

    let now = Utc::now();
    let mut history = state.history.write().await;
    let id = history.next_id(now);
    let image = GeneratedImage::new(id.clone(), image_url.clone(), prompt, style, now);
    if let Err(err) = history.record(image).await {
        warn!("failed to persist image history: {err:#}");
    }
    info!("generated image {id}");

    Ok(Json(GenerateResponse { image_url, id }))
}

async fn list_history(State(state): State<AppState>) -> Json<Vec<GeneratedImage>> {
    let history = state.history.read().await;
    Json(history.entries().to_vec())
}

async fn get_history_item(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<GeneratedImage>, RelayError> {
    let history = state.history.read().await;
    history
        .select(&id)
        .cloned()
        .map(Json)
        .ok_or(RelayError::NotFound)
}

async fn download_history_item(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Response, RelayError> {
    let image = {
        let history = state.history.read().await;
        history.select(&id).cloned().ok_or(RelayError::NotFound)?
    };
    if !image.is_inline() {
        return Ok(Redirect::temporary(&image.url).into_response());
    }
    let (mime_type, bytes) = decode_data_uri(&image.url)
        .ok_or_else(|| anyhow!("history entry {id} holds a malformed data URI"))?;
    let disposition = format!(
        "attachment; filename=\"ai-image-{}.{}\"",
        image.id,
        extension_for_mime(&mime_type)
    );
    Ok((
        StatusCode::OK,
        [
            (header::CONTENT_TYPE, mime_type),
            (header::CONTENT_DISPOSITION, disposition),
        ],
        bytes,
    )
        .into_response())
}

async fn clear_history(State(state): State<AppState>) -> Result<StatusCode, RelayError> {
    let mut history = state.history.write().await;
    history.clear().await?;
    info!("image history cleared");
    Ok(StatusCode::NO_CONTENT)
}

fn extension_for_mime(mime_type: &str) -> &'static str {
    match mime_type.to_lowercase().as_str() {
        "image/jpeg" | "image/jpg" => "jpg",
        "image/png" => "png",
        "image/webp" => "webp",
        "image/gif" => "gif",
        "image/bmp" => "bmp",
        "image/avif" => "avif",
        _ => "bin",
    }
}

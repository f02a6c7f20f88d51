//! HTTP route handlers.
//!
//! All handlers are thin; room logic stays in the room state machine and
//! these endpoints only cover the HTTP conveniences around it: health, the
//! Google Drive audio proxy, and oEmbed title lookup.

use axum::{
    body::Body,
    extract::{Query, State},
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use serde::Deserialize;
use serde_json::json;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::api::ws::ws_handler;
use crate::api::AppState;
use crate::classifier::is_youtube_host;
use crate::error::{UnisonError, UnisonResult};

/// Upstream base for the Google Drive direct-download relay.
const DRIVE_DOWNLOAD_URL: &str = "https://drive.google.com/uc";

/// YouTube oEmbed endpoint used for title lookup.
const YOUTUBE_OEMBED_URL: &str = "https://www.youtube.com/oembed";

// ─────────────────────────────────────────────────────────────────────────────
// Request Types
// ─────────────────────────────────────────────────────────────────────────────

#[derive(Deserialize)]
struct AudioProxyQuery {
    /// Google Drive file id.
    id: String,
}

#[derive(Deserialize)]
struct TrackTitleQuery {
    url: String,
}

// ─────────────────────────────────────────────────────────────────────────────
// Router
// ─────────────────────────────────────────────────────────────────────────────

/// Creates the Axum router with all routes.
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health_check))
        .route("/api/audio-proxy", get(audio_proxy))
        .route("/api/track-title", get(track_title))
        .route("/ws", get(ws_handler))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

// ─────────────────────────────────────────────────────────────────────────────
// Handlers
// ─────────────────────────────────────────────────────────────────────────────

/// Liveness probe with room/connection counts.
async fn health_check(State(state): State<AppState>) -> impl IntoResponse {
    Json(json!({
        "status": "ok",
        "rooms": state.rooms.room_count(),
        "connections": state.ws_manager.connection_count(),
    }))
}

/// Relays a Google Drive direct download so browser audio elements can play
/// Drive-hosted files without hitting CORS walls.
///
/// Drive answers interstitial HTML instead of bytes for files that need a
/// confirmation step; that case is reported as an upstream error rather than
/// streamed through as a corrupt "audio" body.
async fn audio_proxy(
    State(state): State<AppState>,
    Query(query): Query<AudioProxyQuery>,
) -> UnisonResult<Response> {
    if !state.config.enable_audio_proxy {
        return Err(UnisonError::Disabled("audio proxy".into()));
    }
    if query.id.trim().is_empty() {
        return Err(UnisonError::InvalidRequest("missing file id".into()));
    }

    let upstream = state
        .http
        .get(DRIVE_DOWNLOAD_URL)
        .query(&[("export", "download"), ("id", query.id.as_str())])
        .send()
        .await?;

    if !upstream.status().is_success() {
        log::warn!("[Proxy] Drive returned {} for {}", upstream.status(), query.id);
        return Err(UnisonError::Upstream(format!(
            "origin returned {}",
            upstream.status()
        )));
    }

    let content_type = upstream
        .headers()
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .unwrap_or("application/octet-stream")
        .to_string();
    if content_type.starts_with("text/html") {
        log::warn!("[Proxy] Drive served interstitial HTML for {}", query.id);
        return Err(UnisonError::Upstream(
            "origin returned HTML instead of audio".into(),
        ));
    }

    let mut response = Response::builder()
        .status(StatusCode::OK)
        .header(header::CONTENT_TYPE, content_type);
    if let Some(len) = upstream.content_length() {
        response = response.header(header::CONTENT_LENGTH, len);
    }
    response
        .body(Body::from_stream(upstream.bytes_stream()))
        .map_err(|e| UnisonError::Internal(e.to_string()))
}

/// Resolves a human-readable title for a shared URL.
///
/// YouTube URLs go through the public oEmbed endpoint; everything else (and
/// any lookup failure) falls back to the classifier's label so the endpoint
/// always answers with *some* title.
async fn track_title(
    State(state): State<AppState>,
    Query(query): Query<TrackTitleQuery>,
) -> UnisonResult<Json<serde_json::Value>> {
    if !state.config.enable_title_lookup {
        return Err(UnisonError::Disabled("title lookup".into()));
    }

    if let Some(title) = lookup_youtube_title(&state, &query.url).await {
        return Ok(Json(json!({ "title": title })));
    }

    let fallback = state.rooms.classifier().classify(&query.url).display_name;
    Ok(Json(json!({ "title": fallback })))
}

/// Fetches a YouTube title via oEmbed. Any failure yields `None`; the caller
/// falls back to a classifier label.
async fn lookup_youtube_title(state: &AppState, url: &str) -> Option<String> {
    let parsed = reqwest::Url::parse(url).ok()?;
    if !is_youtube_host(parsed.host_str()?) {
        return None;
    }

    let response = state
        .http
        .get(YOUTUBE_OEMBED_URL)
        .query(&[("url", url), ("format", "json")])
        .send()
        .await
        .ok()?;
    if !response.status().is_success() {
        log::debug!("[Title] oEmbed returned {} for {}", response.status(), url);
        return None;
    }

    let body: serde_json::Value = response.json().await.ok()?;
    body.get("title")
        .and_then(|t| t.as_str())
        .map(str::to_string)
}

//! HTTP/WebSocket API layer.
//!
//! Thin handlers that delegate to the room state machine. This module
//! provides router construction and server startup.

use std::sync::Arc;

use thiserror::Error;

use crate::classifier::TrackClassifier;
use crate::config::Config;
use crate::room::RoomStore;

pub mod http;
pub mod ws;
pub mod ws_connection;

pub use ws_connection::WsConnectionManager;

/// Errors that can occur when starting or running the server.
#[derive(Debug, Error)]
pub enum ServerError {
    /// Failed to bind to a TCP port.
    #[error("Failed to bind to port: {0}")]
    Bind(#[from] std::io::Error),

    /// No available ports in the specified range.
    #[error("No available ports in range {start}-{end}")]
    NoAvailablePort { start: u16, end: u16 },
}

/// Shared application state for the API layer.
///
/// A thin handle bundle; all room logic lives behind [`RoomStore`].
#[derive(Clone)]
pub struct AppState {
    /// Registry of live rooms.
    pub rooms: Arc<RoomStore>,
    /// Tracks active WebSocket connections.
    pub ws_manager: Arc<WsConnectionManager>,
    /// Outbound HTTP client for title lookups and the audio proxy.
    pub http: reqwest::Client,
    /// Application configuration.
    pub config: Arc<Config>,
}

/// Builder for constructing an `AppState`.
#[derive(Default)]
pub struct AppStateBuilder {
    rooms: Option<Arc<RoomStore>>,
    classifier: Option<Arc<dyn TrackClassifier>>,
    ws_manager: Option<Arc<WsConnectionManager>>,
    http: Option<reqwest::Client>,
    config: Option<Arc<Config>>,
}

impl AppStateBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets a pre-built room store. Overrides [`classifier`](Self::classifier).
    pub fn rooms(mut self, rooms: Arc<RoomStore>) -> Self {
        self.rooms = Some(rooms);
        self
    }

    /// Sets the classifier used when the builder constructs the room store.
    pub fn classifier(mut self, classifier: Arc<dyn TrackClassifier>) -> Self {
        self.classifier = Some(classifier);
        self
    }

    /// Sets the WebSocket connection manager.
    pub fn ws_manager(mut self, manager: Arc<WsConnectionManager>) -> Self {
        self.ws_manager = Some(manager);
        self
    }

    /// Sets the outbound HTTP client.
    pub fn http(mut self, client: reqwest::Client) -> Self {
        self.http = Some(client);
        self
    }

    /// Sets the configuration.
    pub fn config(mut self, config: Arc<Config>) -> Self {
        self.config = Some(config);
        self
    }

    /// Builds the `AppState`, defaulting anything unset.
    pub fn build(self) -> AppState {
        let rooms = self.rooms.unwrap_or_else(|| {
            let classifier = self
                .classifier
                .unwrap_or_else(|| Arc::new(crate::classifier::BasicClassifier));
            Arc::new(RoomStore::new(classifier))
        });
        AppState {
            rooms,
            ws_manager: self
                .ws_manager
                .unwrap_or_else(|| Arc::new(WsConnectionManager::new())),
            http: self.http.unwrap_or_default(),
            config: self.config.unwrap_or_default(),
        }
    }
}

impl AppState {
    /// Creates a new builder for constructing an `AppState`.
    pub fn builder() -> AppStateBuilder {
        AppStateBuilder::new()
    }
}

async fn find_available_port(
    start: u16,
    end: u16,
) -> Result<(u16, tokio::net::TcpListener), ServerError> {
    for port in start..=end {
        let addr = std::net::SocketAddr::from(([0, 0, 0, 0], port));
        match tokio::net::TcpListener::bind(&addr).await {
            Ok(listener) => return Ok((port, listener)),
            Err(_) => continue,
        }
    }
    Err(ServerError::NoAvailablePort { start, end })
}

/// Starts the HTTP server on the configured or auto-discovered port.
pub async fn start_server(state: AppState) -> Result<(), ServerError> {
    let preferred_port = state.config.preferred_port;
    let (port, listener) = if preferred_port > 0 {
        let addr = std::net::SocketAddr::from(([0, 0, 0, 0], preferred_port));
        (preferred_port, tokio::net::TcpListener::bind(&addr).await?)
    } else {
        find_available_port(3000, 3010).await?
    };

    log::info!("Server listening on http://0.0.0.0:{}", port);
    let app = http::create_router(state);
    axum::serve(listener, app).await?;
    Ok(())
}

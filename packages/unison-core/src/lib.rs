//! Unison Core - shared library for Unison.
//!
//! This crate provides the core functionality for Unison, a shared-listening
//! system where participants grouped into rooms queue audio from heterogeneous
//! sources (direct files, embeddable third-party players) and keep their
//! independently-clocked local players converged on the same track and
//! position. It is used by the headless server binary and by client hosts
//! that embed the synchronizer.
//!
//! # Architecture
//!
//! The crate is organized into several modules:
//!
//! - [`protocol`]: Wire message catalog and shared data model
//! - [`room`]: Per-room authoritative state machine (roster, queue, chat, history)
//! - [`scheduler`]: Wall-clock stamping of transport events
//! - [`api`]: HTTP/WebSocket surface
//! - [`classifier`]: URL-to-track-source classification
//! - [`client`]: Client-side synchronizer and the playable abstraction
//! - [`error`]: Centralized error types
//!
//! # Abstraction Traits
//!
//! The crate defines several traits to decouple core logic from host-specific
//! implementations:
//!
//! - [`TrackClassifier`](classifier::TrackClassifier): URL classification
//! - [`Playable`](client::Playable): uniform playback control surface
//! - [`AudioElement`](client::AudioElement) / [`EmbedWidget`](client::EmbedWidget):
//!   the host-side bindings a client app provides for its native player and
//!   embedded widgets
//!
//! Server-side defaults are provided for everything the standalone server
//! needs; client hosts supply their own playback bindings.

#![warn(clippy::all)]

pub mod api;
pub mod classifier;
pub mod client;
pub mod config;
pub mod error;
pub mod protocol;
pub mod room;
pub mod scheduler;
pub mod utils;

// Re-export commonly used types at the crate root
pub use api::{start_server, AppState, AppStateBuilder, ServerError, WsConnectionManager};
pub use classifier::{BasicClassifier, TrackClassifier, TrackSource};
pub use config::Config;
pub use error::{UnisonError, UnisonResult};
pub use protocol::{
    ChatEntry, ChatKind, ClientCommand, ConnectionId, HistoryItem, Participant, QueueItem, RoomId,
    ServerEvent, TrackKind,
};
pub use room::{Room, RoomOutbound, RoomStore};
pub use utils::now_millis;

// Re-export client types
pub use client::{
    AudioElement, BackendNotice, BackendSet, ClientSynchronizer, EmbedWidget, Playable,
    PlayerError, PlayerResult,
};

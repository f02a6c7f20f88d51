//! The playable abstraction: one control surface over heterogeneous
//! playback backends.
//!
//! These traits enable dependency injection for testability and modularity:
//! the synchronizer depends on [`Playable`] rather than concrete players,
//! and concrete players depend on the host-binding traits ([`AudioElement`],
//! [`EmbedWidget`]) rather than any particular SDK.

use async_trait::async_trait;
use thiserror::Error;
use tokio::sync::mpsc;

/// Errors surfaced by playback backends.
#[derive(Debug, Error)]
pub enum PlayerError {
    /// The URL cannot be handled by this backend.
    #[error("Unsupported URL: {0}")]
    UnsupportedUrl(String),

    /// The underlying player or widget reported a failure.
    #[error("Backend failure: {0}")]
    Backend(String),

    /// The backend has no track loaded.
    #[error("No track loaded")]
    NotLoaded,
}

/// Convenient Result alias for playback operations.
pub type PlayerResult<T> = Result<T, PlayerError>;

/// Notices backends push to the synchronizer.
#[derive(Debug, Clone, PartialEq)]
pub enum BackendNotice {
    /// The loaded track played to its natural end.
    Finished,
}

/// Sender half backends use to notify the synchronizer.
pub type NoticeSender = mpsc::UnboundedSender<BackendNotice>;

// ─────────────────────────────────────────────────────────────────────────────
// Playable
// ─────────────────────────────────────────────────────────────────────────────

/// Uniform playback control surface.
///
/// All positions are milliseconds. `position_ms`/`duration_ms` are async
/// because embedded widgets only answer position queries asynchronously;
/// file backends simply answer immediately.
#[async_trait]
pub trait Playable: Send + Sync {
    /// Loads a track and prepares it to play from `start_position_ms`.
    async fn load(&self, url: &str, start_position_ms: u64) -> PlayerResult<()>;

    /// Starts or resumes playback.
    async fn play(&self) -> PlayerResult<()>;

    /// Pauses playback, keeping the loaded track and position.
    async fn pause(&self) -> PlayerResult<()>;

    /// Seeks to an absolute position within the loaded track.
    async fn seek_to(&self, position_ms: u64) -> PlayerResult<()>;

    /// Current playback position.
    async fn position_ms(&self) -> PlayerResult<u64>;

    /// Duration of the loaded track, when known.
    async fn duration_ms(&self) -> PlayerResult<Option<u64>>;

    /// Sets the local output volume (0..=100). Never crosses the wire.
    async fn set_volume(&self, volume: u8) -> PlayerResult<()>;

    /// Stops playback and unloads the track.
    async fn stop(&self) -> PlayerResult<()>;

    /// Whether this backend needs the synchronizer's position poll to detect
    /// track completion (embeds do; native file playback reports it itself).
    fn needs_position_poll(&self) -> bool {
        false
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Host Bindings
// ─────────────────────────────────────────────────────────────────────────────

/// The host application's native audio sink (an `<audio>` element or its
/// platform equivalent). Implemented outside this crate.
#[async_trait]
pub trait AudioElement: Send + Sync {
    /// Points the element at a source URL without starting playback.
    async fn set_source(&self, url: &str) -> PlayerResult<()>;

    async fn play(&self) -> PlayerResult<()>;

    async fn pause(&self) -> PlayerResult<()>;

    /// Seeks to an absolute position.
    async fn set_position_ms(&self, position_ms: u64) -> PlayerResult<()>;

    async fn position_ms(&self) -> PlayerResult<u64>;

    /// Duration, once the element has loaded metadata.
    async fn duration_ms(&self) -> PlayerResult<Option<u64>>;

    /// Sets output volume (0..=100).
    async fn set_volume(&self, volume: u8) -> PlayerResult<()>;

    /// Unloads the current source.
    async fn unload(&self) -> PlayerResult<()>;
}

/// An embedded third-party player widget (YouTube iframe, SoundCloud
/// widget). Implemented outside this crate over the vendor SDK.
///
/// Widgets expose no completion callback reliable enough to depend on, so
/// the synchronizer detects track end by polling [`position_ms`]
/// (Self::position_ms) against [`duration_ms`](Self::duration_ms).
#[async_trait]
pub trait EmbedWidget: Send + Sync {
    /// Loads the widget with a track (a video id for YouTube, a track URL
    /// for SoundCloud).
    async fn load(&self, resource: &str) -> PlayerResult<()>;

    async fn play(&self) -> PlayerResult<()>;

    async fn pause(&self) -> PlayerResult<()>;

    async fn seek_to(&self, position_ms: u64) -> PlayerResult<()>;

    async fn position_ms(&self) -> PlayerResult<u64>;

    async fn duration_ms(&self) -> PlayerResult<Option<u64>>;

    async fn set_volume(&self, volume: u8) -> PlayerResult<()>;

    /// Stops and blanks the widget.
    async fn unload(&self) -> PlayerResult<()>;
}

//! Client-side core: the playable abstraction and the synchronizer that
//! keeps a local player converged on the room's authoritative state.
//!
//! Nothing here renders UI. Hosts implement the [`AudioElement`] and
//! [`EmbedWidget`] bindings over their platform players, wire the
//! synchronizer to a WebSocket, and render its watch mirrors.

pub mod backends;
pub mod playable;
pub mod synchronizer;

#[cfg(test)]
pub(crate) mod testing;

pub use backends::{
    extract_youtube_video_id, BackendSet, FilePlayable, SoundCloudPlayable, YouTubePlayable,
};
pub use playable::{
    AudioElement, BackendNotice, EmbedWidget, NoticeSender, Playable, PlayerError, PlayerResult,
};
pub use synchronizer::{ClientSynchronizer, NowPlaying, EMBED_POLL_INTERVAL};

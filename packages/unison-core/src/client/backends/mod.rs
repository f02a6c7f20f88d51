//! Playback backends and the set that switches between them.

mod file;
mod soundcloud;
mod youtube;

pub use file::FilePlayable;
pub use soundcloud::SoundCloudPlayable;
pub use youtube::{extract_youtube_video_id, YouTubePlayable};

use std::sync::Arc;

use tokio::sync::Mutex;

use crate::client::playable::{Playable, PlayerResult};
use crate::protocol::TrackKind;

/// The three backends plus the invariant that at most one is active.
///
/// Switching always stops the outgoing backend before handing out the
/// incoming one, so two sources never sound at once.
pub struct BackendSet {
    file: Arc<dyn Playable>,
    youtube: Arc<dyn Playable>,
    soundcloud: Arc<dyn Playable>,
    active: Mutex<Option<TrackKind>>,
}

impl BackendSet {
    pub fn new(
        file: Arc<dyn Playable>,
        youtube: Arc<dyn Playable>,
        soundcloud: Arc<dyn Playable>,
    ) -> Self {
        Self {
            file,
            youtube,
            soundcloud,
            active: Mutex::new(None),
        }
    }

    fn backend(&self, kind: TrackKind) -> &Arc<dyn Playable> {
        match kind {
            TrackKind::File => &self.file,
            TrackKind::Youtube => &self.youtube,
            TrackKind::Soundcloud => &self.soundcloud,
        }
    }

    /// Stops whatever is active, then marks `kind` active and returns its
    /// backend. The caller loads/plays the returned backend.
    pub async fn activate(&self, kind: TrackKind) -> PlayerResult<Arc<dyn Playable>> {
        let mut active = self.active.lock().await;
        if let Some(current) = *active {
            if current != kind {
                self.backend(current).stop().await?;
            }
        }
        *active = Some(kind);
        Ok(Arc::clone(self.backend(kind)))
    }

    /// Stops the active backend, if any, and clears the active mark.
    pub async fn stop_active(&self) -> PlayerResult<()> {
        let mut active = self.active.lock().await;
        if let Some(current) = active.take() {
            self.backend(current).stop().await?;
        }
        Ok(())
    }

    /// The currently active backend, if any.
    pub async fn active(&self) -> Option<(TrackKind, Arc<dyn Playable>)> {
        let active = self.active.lock().await;
        active.map(|kind| (kind, Arc::clone(self.backend(kind))))
    }
}

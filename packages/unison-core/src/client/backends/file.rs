//! Direct-file backend over the host's native audio element.

use std::sync::Arc;

use async_trait::async_trait;

use crate::client::playable::{
    AudioElement, BackendNotice, NoticeSender, Playable, PlayerResult,
};

/// Plays direct audio file URLs through an [`AudioElement`].
///
/// The native element reports completion itself: the host calls
/// [`notify_ended`](Self::notify_ended) from its "ended" callback, so this
/// backend never needs the position poll.
pub struct FilePlayable {
    element: Arc<dyn AudioElement>,
    notices: NoticeSender,
}

impl FilePlayable {
    pub fn new(element: Arc<dyn AudioElement>, notices: NoticeSender) -> Self {
        Self { element, notices }
    }

    /// Forwards the host element's "ended" event to the synchronizer.
    pub fn notify_ended(&self) {
        let _ = self.notices.send(BackendNotice::Finished);
    }
}

#[async_trait]
impl Playable for FilePlayable {
    async fn load(&self, url: &str, start_position_ms: u64) -> PlayerResult<()> {
        self.element.set_source(url).await?;
        if start_position_ms > 0 {
            self.element.set_position_ms(start_position_ms).await?;
        }
        Ok(())
    }

    async fn play(&self) -> PlayerResult<()> {
        self.element.play().await
    }

    async fn pause(&self) -> PlayerResult<()> {
        self.element.pause().await
    }

    async fn seek_to(&self, position_ms: u64) -> PlayerResult<()> {
        self.element.set_position_ms(position_ms).await
    }

    async fn position_ms(&self) -> PlayerResult<u64> {
        self.element.position_ms().await
    }

    async fn duration_ms(&self) -> PlayerResult<Option<u64>> {
        self.element.duration_ms().await
    }

    async fn set_volume(&self, volume: u8) -> PlayerResult<()> {
        self.element.set_volume(volume.min(100)).await
    }

    async fn stop(&self) -> PlayerResult<()> {
        self.element.pause().await?;
        self.element.unload().await
    }
}

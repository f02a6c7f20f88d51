//! SoundCloud backend over the embedded widget.

use std::sync::Arc;

use async_trait::async_trait;

use crate::client::playable::{EmbedWidget, Playable, PlayerResult};

/// Plays SoundCloud track URLs through an [`EmbedWidget`].
///
/// The widget takes the full track URL (not an id) and only answers
/// position/duration queries asynchronously, which is why the whole
/// [`Playable`] surface is async.
pub struct SoundCloudPlayable {
    widget: Arc<dyn EmbedWidget>,
}

impl SoundCloudPlayable {
    pub fn new(widget: Arc<dyn EmbedWidget>) -> Self {
        Self { widget }
    }
}

#[async_trait]
impl Playable for SoundCloudPlayable {
    async fn load(&self, url: &str, start_position_ms: u64) -> PlayerResult<()> {
        self.widget.load(url).await?;
        if start_position_ms > 0 {
            self.widget.seek_to(start_position_ms).await?;
        }
        Ok(())
    }

    async fn play(&self) -> PlayerResult<()> {
        self.widget.play().await
    }

    async fn pause(&self) -> PlayerResult<()> {
        self.widget.pause().await
    }

    async fn seek_to(&self, position_ms: u64) -> PlayerResult<()> {
        self.widget.seek_to(position_ms).await
    }

    async fn position_ms(&self) -> PlayerResult<u64> {
        self.widget.position_ms().await
    }

    async fn duration_ms(&self) -> PlayerResult<Option<u64>> {
        self.widget.duration_ms().await
    }

    async fn set_volume(&self, volume: u8) -> PlayerResult<()> {
        self.widget.set_volume(volume.min(100)).await
    }

    async fn stop(&self) -> PlayerResult<()> {
        self.widget.unload().await
    }

    fn needs_position_poll(&self) -> bool {
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::testing::FakeEmbedWidget;

    #[tokio::test]
    async fn load_passes_full_url_and_seeks() {
        let widget = Arc::new(FakeEmbedWidget::default());
        let playable = SoundCloudPlayable::new(Arc::clone(&widget) as Arc<dyn EmbedWidget>);
        playable
            .load("https://soundcloud.com/artist/track", 15_000)
            .await
            .unwrap();
        assert_eq!(
            widget.loaded(),
            Some("https://soundcloud.com/artist/track".to_string())
        );
        assert_eq!(widget.position(), 15_000);
    }

    #[tokio::test]
    async fn embeds_need_the_position_poll() {
        let widget = Arc::new(FakeEmbedWidget::default());
        let playable = SoundCloudPlayable::new(widget);
        assert!(playable.needs_position_poll());
    }
}

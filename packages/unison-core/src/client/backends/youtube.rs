//! YouTube backend over the embedded iframe player.

use std::sync::Arc;

use async_trait::async_trait;

use crate::client::playable::{EmbedWidget, Playable, PlayerError, PlayerResult};

/// Plays YouTube URLs through an [`EmbedWidget`].
///
/// `load` extracts the video id from the shared URL and rejects anything
/// that is not a recognizable video link. The widget has no trustworthy
/// completion callback, so the synchronizer polls position.
pub struct YouTubePlayable {
    widget: Arc<dyn EmbedWidget>,
}

impl YouTubePlayable {
    pub fn new(widget: Arc<dyn EmbedWidget>) -> Self {
        Self { widget }
    }
}

#[async_trait]
impl Playable for YouTubePlayable {
    async fn load(&self, url: &str, start_position_ms: u64) -> PlayerResult<()> {
        let video_id = extract_youtube_video_id(url)
            .ok_or_else(|| PlayerError::UnsupportedUrl(url.to_string()))?;
        self.widget.load(&video_id).await?;
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

/// Extracts the 11-character video id from the URL shapes YouTube hands out:
/// `youtu.be/<id>`, `watch?v=<id>`, and `/embed/<id>`.
pub fn extract_youtube_video_id(url: &str) -> Option<String> {
    let parsed = reqwest::Url::parse(url).ok()?;
    let host = parsed.host_str()?;

    let id = match host {
        "youtu.be" | "www.youtu.be" => parsed
            .path_segments()
            .and_then(|mut segments| segments.next())
            .map(str::to_string),
        "youtube.com" | "www.youtube.com" => {
            if parsed.path() == "/watch" {
                parsed
                    .query_pairs()
                    .find(|(k, _)| k == "v")
                    .map(|(_, v)| v.into_owned())
            } else if let Some(rest) = parsed.path().strip_prefix("/embed/") {
                Some(rest.trim_end_matches('/').to_string())
            } else {
                None
            }
        }
        _ => None,
    };
    id.filter(|id| !id.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::testing::FakeEmbedWidget;

    #[test]
    fn extracts_id_from_all_supported_shapes() {
        for url in [
            "https://youtu.be/dQw4w9WgXcQ",
            "https://www.youtube.com/watch?v=dQw4w9WgXcQ",
            "https://www.youtube.com/watch?v=dQw4w9WgXcQ&t=30s",
            "https://www.youtube.com/embed/dQw4w9WgXcQ",
        ] {
            assert_eq!(
                extract_youtube_video_id(url).as_deref(),
                Some("dQw4w9WgXcQ"),
                "failed for {}",
                url
            );
        }
    }

    #[test]
    fn rejects_non_video_urls() {
        assert!(extract_youtube_video_id("https://www.youtube.com/feed/subscriptions").is_none());
        assert!(extract_youtube_video_id("https://example.com/watch?v=abc").is_none());
        assert!(extract_youtube_video_id("https://youtu.be/").is_none());
        assert!(extract_youtube_video_id("not a url").is_none());
    }

    #[tokio::test]
    async fn load_passes_video_id_to_widget() {
        let widget = Arc::new(FakeEmbedWidget::default());
        let playable = YouTubePlayable::new(Arc::clone(&widget) as Arc<dyn EmbedWidget>);
        playable
            .load("https://youtu.be/dQw4w9WgXcQ", 0)
            .await
            .unwrap();
        assert_eq!(widget.loaded(), Some("dQw4w9WgXcQ".to_string()));
    }

    #[tokio::test]
    async fn load_rejects_a_channel_url() {
        let widget = Arc::new(FakeEmbedWidget::default());
        let playable = YouTubePlayable::new(widget);
        let err = playable
            .load("https://www.youtube.com/@somechannel", 0)
            .await
            .unwrap_err();
        assert!(matches!(err, PlayerError::UnsupportedUrl(_)));
    }

    #[tokio::test]
    async fn load_with_start_position_seeks_the_widget() {
        let widget = Arc::new(FakeEmbedWidget::default());
        let playable = YouTubePlayable::new(Arc::clone(&widget) as Arc<dyn EmbedWidget>);
        playable
            .load("https://youtu.be/dQw4w9WgXcQ", 30_000)
            .await
            .unwrap();
        assert_eq!(widget.position(), 30_000);
    }
}

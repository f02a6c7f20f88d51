//! Shared fakes for client-side tests.

use async_trait::async_trait;
use parking_lot::Mutex;

use crate::client::playable::{AudioElement, EmbedWidget, PlayerError, PlayerResult};

#[derive(Default)]
struct ElementState {
    source: Option<String>,
    position_ms: u64,
    duration_ms: Option<u64>,
    playing: bool,
    volume: u8,
}

/// In-memory stand-in for the host's native audio element.
#[derive(Default)]
pub struct FakeAudioElement {
    state: Mutex<ElementState>,
}

impl FakeAudioElement {
    pub fn source(&self) -> Option<String> {
        self.state.lock().source.clone()
    }

    pub fn is_playing(&self) -> bool {
        self.state.lock().playing
    }

    pub fn volume(&self) -> u8 {
        self.state.lock().volume
    }
}

#[async_trait]
impl AudioElement for FakeAudioElement {
    async fn set_source(&self, url: &str) -> PlayerResult<()> {
        let mut state = self.state.lock();
        state.source = Some(url.to_string());
        state.position_ms = 0;
        Ok(())
    }

    async fn play(&self) -> PlayerResult<()> {
        let mut state = self.state.lock();
        if state.source.is_none() {
            return Err(PlayerError::NotLoaded);
        }
        state.playing = true;
        Ok(())
    }

    async fn pause(&self) -> PlayerResult<()> {
        self.state.lock().playing = false;
        Ok(())
    }

    async fn set_position_ms(&self, position_ms: u64) -> PlayerResult<()> {
        self.state.lock().position_ms = position_ms;
        Ok(())
    }

    async fn position_ms(&self) -> PlayerResult<u64> {
        Ok(self.state.lock().position_ms)
    }

    async fn duration_ms(&self) -> PlayerResult<Option<u64>> {
        Ok(self.state.lock().duration_ms)
    }

    async fn set_volume(&self, volume: u8) -> PlayerResult<()> {
        self.state.lock().volume = volume;
        Ok(())
    }

    async fn unload(&self) -> PlayerResult<()> {
        let mut state = self.state.lock();
        state.source = None;
        state.playing = false;
        state.position_ms = 0;
        Ok(())
    }
}

#[derive(Default)]
struct WidgetState {
    loaded: Option<String>,
    position_ms: u64,
    duration_ms: Option<u64>,
    playing: bool,
    volume: u8,
}

/// In-memory stand-in for an embedded player widget.
#[derive(Default)]
pub struct FakeEmbedWidget {
    state: Mutex<WidgetState>,
}

impl FakeEmbedWidget {
    pub fn loaded(&self) -> Option<String> {
        self.state.lock().loaded.clone()
    }

    pub fn position(&self) -> u64 {
        self.state.lock().position_ms
    }

    pub fn is_playing(&self) -> bool {
        self.state.lock().playing
    }

    pub fn volume(&self) -> u8 {
        self.state.lock().volume
    }

    pub fn set_duration(&self, duration_ms: u64) {
        self.state.lock().duration_ms = Some(duration_ms);
    }
}

#[async_trait]
impl EmbedWidget for FakeEmbedWidget {
    async fn load(&self, resource: &str) -> PlayerResult<()> {
        let mut state = self.state.lock();
        state.loaded = Some(resource.to_string());
        state.position_ms = 0;
        Ok(())
    }

    async fn play(&self) -> PlayerResult<()> {
        let mut state = self.state.lock();
        if state.loaded.is_none() {
            return Err(PlayerError::NotLoaded);
        }
        state.playing = true;
        Ok(())
    }

    async fn pause(&self) -> PlayerResult<()> {
        self.state.lock().playing = false;
        Ok(())
    }

    async fn seek_to(&self, position_ms: u64) -> PlayerResult<()> {
        self.state.lock().position_ms = position_ms;
        Ok(())
    }

    async fn position_ms(&self) -> PlayerResult<u64> {
        Ok(self.state.lock().position_ms)
    }

    async fn duration_ms(&self) -> PlayerResult<Option<u64>> {
        Ok(self.state.lock().duration_ms)
    }

    async fn set_volume(&self, volume: u8) -> PlayerResult<()> {
        self.state.lock().volume = volume;
        Ok(())
    }

    async fn unload(&self) -> PlayerResult<()> {
        let mut state = self.state.lock();
        state.loaded = None;
        state.playing = false;
        state.position_ms = 0;
        Ok(())
    }
}

//! Core configuration shared by the server binary and embedding hosts.

use serde::{Deserialize, Serialize};

/// Runtime configuration for the API layer.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Port to bind. `0` selects the first free port in the fallback range.
    pub preferred_port: u16,
    /// Whether `/api/track-title` performs oEmbed lookups. When disabled the
    /// endpoint answers 404 and clients fall back to classifier labels.
    pub enable_title_lookup: bool,
    /// Whether `/api/audio-proxy` relays Google Drive downloads.
    pub enable_audio_proxy: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            preferred_port: 3000,
            enable_title_lookup: true,
            enable_audio_proxy: true,
        }
    }
}

//! Server configuration.
//!
//! Supports loading from YAML files with environment variable overrides.

use std::path::Path;

use anyhow::{Context, Result};
use serde::Deserialize;

/// Server configuration loaded from YAML with environment overrides.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Port to bind the HTTP server to.
    /// Override: `UNISON_BIND_PORT`
    pub bind_port: u16,

    /// Enable the `/api/track-title` oEmbed lookup endpoint.
    /// Override: `UNISON_TITLE_LOOKUP`
    pub title_lookup: bool,

    /// Enable the `/api/audio-proxy` Google Drive relay.
    /// Override: `UNISON_AUDIO_PROXY`
    pub audio_proxy: bool,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_port: 3000,
            title_lookup: true,
            audio_proxy: true,
        }
    }
}

impl ServerConfig {
    /// Loads configuration from a YAML file, then applies environment overrides.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let mut config = if let Some(path) = path {
            let content = std::fs::read_to_string(path)
                .with_context(|| format!("Failed to read config file: {}", path.display()))?;
            serde_yaml::from_str(&content)
                .with_context(|| format!("Failed to parse config file: {}", path.display()))?
        } else {
            Self::default()
        };

        config.apply_env_overrides();
        Ok(config)
    }

    /// Applies environment variable overrides to the configuration.
    fn apply_env_overrides(&mut self) {
        if let Ok(val) = std::env::var("UNISON_BIND_PORT") {
            if let Ok(port) = val.parse() {
                self.bind_port = port;
            }
        }

        if let Ok(val) = std::env::var("UNISON_TITLE_LOOKUP") {
            if let Ok(enabled) = val.parse() {
                self.title_lookup = enabled;
            }
        }

        if let Ok(val) = std::env::var("UNISON_AUDIO_PROXY") {
            if let Ok(enabled) = val.parse() {
                self.audio_proxy = enabled;
            }
        }
    }

    /// Converts to unison-core's Config type.
    pub fn to_core_config(&self) -> unison_core::Config {
        unison_core::Config {
            preferred_port: self.bind_port,
            enable_title_lookup: self.title_lookup,
            enable_audio_proxy: self.audio_proxy,
        }
    }
}

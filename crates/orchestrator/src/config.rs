// crates/orchestrator/src/config.rs
//! Orchestrator configuration.

use std::time::Duration;

use studio_client::PollConfig;

/// Configuration shared by the orchestrator and every generation module.
#[derive(Debug, Clone)]
pub struct StudioConfig {
    /// Base URL of the generation service (`STUDIO_API_URL`).
    pub api_url: String,
    /// Text-to-speech provider id, required by audio overviews
    /// (`STUDIO_TTS_PROVIDER`). None = not configured.
    pub tts_provider: Option<String>,
    /// Video render provider id, required by video overviews
    /// (`STUDIO_RENDER_PROVIDER`).
    pub render_provider: Option<String>,
    /// Poll timing. Production defaults; tests compress to milliseconds.
    pub poll: PollConfig,
    /// Grace window during which an optimistic local write outranks a
    /// server snapshot that doesn't reflect it yet.
    pub touch_grace: Duration,
}

impl Default for StudioConfig {
    fn default() -> Self {
        Self {
            api_url: std::env::var("STUDIO_API_URL")
                .unwrap_or_else(|_| "http://127.0.0.1:8787/api/studio".to_string()),
            tts_provider: std::env::var("STUDIO_TTS_PROVIDER").ok(),
            render_provider: std::env::var("STUDIO_RENDER_PROVIDER").ok(),
            poll: PollConfig::default(),
            touch_grace: Duration::from_secs(3),
        }
    }
}

impl StudioConfig {
    /// Config pointed at an explicit URL, with both providers configured.
    /// Intended for tests and the example binary.
    pub fn for_url(api_url: impl Into<String>) -> Self {
        Self {
            api_url: api_url.into(),
            tts_provider: Some("builtin".into()),
            render_provider: Some("builtin".into()),
            poll: PollConfig::default(),
            touch_grace: Duration::from_secs(3),
        }
    }
}

//! Text-to-speech for reading quotes aloud.
//!
//! Defines the `SpeechSynthesizer` trait and an ElevenLabs-compatible HTTP
//! implementation. Synthesis is optional: when no API key is configured the
//! route answers `503` instead of calling out.

pub mod elevenlabs;
pub mod routes;

use async_trait::async_trait;
use serde::Deserialize;

pub use elevenlabs::ElevenLabsClient;
pub use routes::router;

/// Content type assumed when the provider doesn't send one
pub const DEFAULT_AUDIO_TYPE: &str = "audio/mpeg";

/// Body of `POST /api/tts`
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SpeechRequest {
    #[serde(default)]
    pub text: String,
    /// Overrides the configured default voice
    #[serde(default)]
    pub voice_id: Option<String>,
}

/// Encoded audio returned by a synthesizer
#[derive(Debug, Clone, PartialEq)]
pub struct SynthesizedAudio {
    pub content_type: String,
    pub bytes: Vec<u8>,
}

#[derive(Debug, thiserror::Error)]
pub enum SpeechError {
    #[error("Speech synthesis is not configured")]
    NotConfigured,

    #[error("Invalid provider URL: {0}")]
    InvalidUrl(String),

    #[error("Speech provider request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Speech provider returned {status}: {message}")]
    Provider { status: u16, message: String },
}

/// Abstraction over text-to-speech providers.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait SpeechSynthesizer: Send + Sync {
    async fn synthesize(&self, request: &SpeechRequest) -> Result<SynthesizedAudio, SpeechError>;
}

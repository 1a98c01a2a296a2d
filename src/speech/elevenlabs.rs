//! ElevenLabs text-to-speech client.
//!
//! Single request per call, no retries: the caller treats speech as a
//! best-effort extra and reports provider failures straight back.

use async_trait::async_trait;
use reqwest::header::{ACCEPT, CONTENT_TYPE};
use reqwest::{Client, Url};
use serde::Serialize;
use std::time::Duration;
use tracing::{debug, warn};

use super::{SpeechError, SpeechRequest, SpeechSynthesizer, SynthesizedAudio, DEFAULT_AUDIO_TYPE};
use crate::config::SpeechConfig;

const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

#[derive(Debug, Serialize)]
struct TtsBody<'a> {
    text: &'a str,
    model_id: &'a str,
}

pub struct ElevenLabsClient {
    http: Client,
    base_url: Url,
    api_key: String,
    voice_id: String,
    model_id: String,
}

impl ElevenLabsClient {
    pub fn new(config: &SpeechConfig) -> Result<Self, SpeechError> {
        let http = Client::builder().timeout(REQUEST_TIMEOUT).build()?;
        let base_url = Url::parse(&config.base_url)
            .map_err(|e| SpeechError::InvalidUrl(format!("{}: {e}", config.base_url)))?;

        Ok(Self {
            http,
            base_url,
            api_key: config.api_key.clone(),
            voice_id: config.voice_id.clone(),
            model_id: config.model_id.clone(),
        })
    }

    /// Voice used when a request doesn't name one (or names a blank one)
    fn resolve_voice<'a>(&'a self, request: &'a SpeechRequest) -> &'a str {
        request
            .voice_id
            .as_deref()
            .map(str::trim)
            .filter(|v| !v.is_empty())
            .unwrap_or(&self.voice_id)
    }

    /// `{base}/v1/text-to-speech/{voice}`, with the voice id percent-encoded
    pub fn speech_url(&self, voice_id: &str) -> Result<Url, SpeechError> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| SpeechError::InvalidUrl(self.base_url.to_string()))?
            .pop_if_empty()
            .extend(["v1", "text-to-speech", voice_id]);
        Ok(url)
    }
}

#[async_trait]
impl SpeechSynthesizer for ElevenLabsClient {
    async fn synthesize(&self, request: &SpeechRequest) -> Result<SynthesizedAudio, SpeechError> {
        let voice_id = self.resolve_voice(request);
        let url = self.speech_url(voice_id)?;

        debug!(voice_id, chars = request.text.len(), "ElevenLabs synthesis request");

        let response = self
            .http
            .post(url)
            .header("xi-api-key", &self.api_key)
            .header(ACCEPT, DEFAULT_AUDIO_TYPE)
            .json(&TtsBody {
                text: &request.text,
                model_id: &self.model_id,
            })
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            warn!(status = %status, voice_id, "ElevenLabs rejected synthesis request");
            return Err(SpeechError::Provider {
                status: status.as_u16(),
                message,
            });
        }

        let content_type = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .unwrap_or(DEFAULT_AUDIO_TYPE)
            .to_string();
        let bytes = response.bytes().await?;

        Ok(SynthesizedAudio {
            content_type,
            bytes: bytes.to_vec(),
        })
    }
}

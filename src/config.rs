//! Configuration from environment variables.
//!
//! `main` loads a `.env` file first (if present), so every value here can be
//! set either way. Secrets are only read from the environment.

use anyhow::{Context, Result};
use std::path::PathBuf;

const DEFAULT_HOST: &str = "0.0.0.0";
const DEFAULT_PORT: u16 = 8787;
const DEFAULT_LOG_PATH: &str = "data/estimate-log.json";
const DEFAULT_VOICE_ID: &str = "21m00Tcm4TlvDq8ikWAM";
const DEFAULT_MODEL_ID: &str = "eleven_monolingual_v1";
const DEFAULT_SPEECH_BASE_URL: &str = "https://api.elevenlabs.io";

/// Top-level application configuration.
#[derive(Debug, Clone)]
pub struct Config {
    pub host: String,
    pub port: u16,
    /// Activity log file; `None` keeps the log in memory
    pub log_path: Option<PathBuf>,
    /// Present only when an API key is configured
    pub speech: Option<SpeechConfig>,
}

#[derive(Clone)]
pub struct SpeechConfig {
    pub api_key: String,
    pub voice_id: String,
    pub model_id: String,
    pub base_url: String,
}

// Keep the API key out of logs
impl std::fmt::Debug for SpeechConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SpeechConfig")
            .field("api_key", &"<redacted>")
            .field("voice_id", &self.voice_id)
            .field("model_id", &self.model_id)
            .field("base_url", &self.base_url)
            .finish()
    }
}

impl Config {
    /// Load configuration from the process environment.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load configuration through an arbitrary key lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).map(|v| v.trim().to_string());

        let host = get("HOST")
            .filter(|h| !h.is_empty())
            .unwrap_or_else(|| DEFAULT_HOST.to_string());

        let port = match get("PORT").filter(|p| !p.is_empty()) {
            Some(raw) => raw
                .parse::<u16>()
                .with_context(|| format!("Invalid PORT: {raw}"))?,
            None => DEFAULT_PORT,
        };

        let log_path = match get("ESTIMATE_LOG_PATH") {
            Some(p) if p.is_empty() => None,
            Some(p) => Some(PathBuf::from(p)),
            None => Some(PathBuf::from(DEFAULT_LOG_PATH)),
        };

        let speech = get("ELEVENLABS_API_KEY")
            .filter(|k| !k.is_empty())
            .map(|api_key| SpeechConfig {
                api_key,
                voice_id: get("ELEVENLABS_VOICE_ID")
                    .filter(|v| !v.is_empty())
                    .unwrap_or_else(|| DEFAULT_VOICE_ID.to_string()),
                model_id: get("ELEVENLABS_MODEL_ID")
                    .filter(|v| !v.is_empty())
                    .unwrap_or_else(|| DEFAULT_MODEL_ID.to_string()),
                base_url: get("ELEVENLABS_BASE_URL")
                    .filter(|v| !v.is_empty())
                    .unwrap_or_else(|| DEFAULT_SPEECH_BASE_URL.to_string()),
            });

        Ok(Self {
            host,
            port,
            log_path,
            speech,
        })
    }

    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn load(vars: &[(&str, &str)]) -> Result<Config> {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Config::from_lookup(|key| map.get(key).cloned())
    }

    #[test]
    fn test_defaults() {
        let cfg = load(&[]).unwrap();
        assert_eq!(cfg.bind_addr(), "0.0.0.0:8787");
        assert_eq!(cfg.log_path, Some(PathBuf::from(DEFAULT_LOG_PATH)));
        assert!(cfg.speech.is_none());
    }

    #[test]
    fn test_overrides() {
        let cfg = load(&[
            ("HOST", "127.0.0.1"),
            ("PORT", " 3000 "),
            ("ESTIMATE_LOG_PATH", "/var/log/estimates.json"),
            ("ELEVENLABS_API_KEY", "secret"),
            ("ELEVENLABS_VOICE_ID", "voice-7"),
        ])
        .unwrap();

        assert_eq!(cfg.bind_addr(), "127.0.0.1:3000");
        assert_eq!(cfg.log_path, Some(PathBuf::from("/var/log/estimates.json")));

        let speech = cfg.speech.unwrap();
        assert_eq!(speech.api_key, "secret");
        assert_eq!(speech.voice_id, "voice-7");
        assert_eq!(speech.model_id, DEFAULT_MODEL_ID);
        assert_eq!(speech.base_url, DEFAULT_SPEECH_BASE_URL);
    }

    #[test]
    fn test_empty_log_path_means_memory() {
        let cfg = load(&[("ESTIMATE_LOG_PATH", "")]).unwrap();
        assert!(cfg.log_path.is_none());
    }

    #[test]
    fn test_blank_api_key_disables_speech() {
        let cfg = load(&[("ELEVENLABS_API_KEY", "   ")]).unwrap();
        assert!(cfg.speech.is_none());
    }

    #[test]
    fn test_invalid_port() {
        let err = load(&[("PORT", "eighty")]).unwrap_err();
        assert!(err.to_string().contains("Invalid PORT"));
    }

    #[test]
    fn test_speech_config_debug_redacts_key() {
        let cfg = load(&[("ELEVENLABS_API_KEY", "super-secret")]).unwrap();
        let printed = format!("{:?}", cfg);
        assert!(!printed.contains("super-secret"));
        assert!(printed.contains("<redacted>"));
    }
}

//! Estimate Web: Axum backend for yard-service quotes.
//!
//! Library crate exposing all modules for use by integration tests
//! and the binary entry point.

pub mod activity;
pub mod config;
pub mod error;
pub mod estimate;
pub mod speech;

use axum::{
    http::{header, Method},
    routing::get,
    Json, Router,
};
use serde_json::{json, Value};
use std::sync::Arc;
use tower_http::{
    compression::CompressionLayer,
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};
use tracing::info;

use activity::{EventLog, JsonFileLog, MemoryLog};
use config::Config;
use speech::{ElevenLabsClient, SpeechSynthesizer};

/// Shared state handed to every route handler
#[derive(Clone)]
pub struct AppState {
    pub events: Arc<dyn EventLog>,
    /// `None` when no speech provider is configured
    pub speech: Option<Arc<dyn SpeechSynthesizer>>,
}

impl AppState {
    /// Wire up the activity log and speech provider from configuration
    pub fn from_config(config: &Config) -> anyhow::Result<Self> {
        let events: Arc<dyn EventLog> = match &config.log_path {
            Some(path) => {
                info!(path = %path.display(), "Activity log on disk");
                Arc::new(JsonFileLog::new(path.clone()))
            }
            None => {
                info!("Activity log in memory");
                Arc::new(MemoryLog::new())
            }
        };

        let speech: Option<Arc<dyn SpeechSynthesizer>> = match &config.speech {
            Some(speech_config) => {
                info!(voice_id = %speech_config.voice_id, "Speech synthesis enabled");
                let client = ElevenLabsClient::new(speech_config)?;
                Some(Arc::new(client))
            }
            None => {
                info!("No ELEVENLABS_API_KEY set, speech synthesis disabled");
                None
            }
        };

        Ok(Self { events, speech })
    }
}

/// Build the Axum router with all routes and middleware.
pub fn build_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::POST])
        .allow_headers([header::CONTENT_TYPE]);

    Router::new()
        .merge(estimate::router())
        .merge(activity::router())
        .merge(speech::router())
        .route("/health", get(health))
        .layer(CompressionLayer::new())
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}

async fn health() -> Json<Value> {
    Json(json!({
        "status": "ok",
        "version": env!("CARGO_PKG_VERSION"),
    }))
}

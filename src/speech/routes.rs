//! Text-to-speech route handler

use axum::{
    body::Bytes,
    extract::State,
    http::header,
    response::{IntoResponse, Response},
    routing::post,
    Router,
};
use tracing::info;

use super::{SpeechError, SpeechRequest};
use crate::error::{AppError, Result};
use crate::AppState;

pub fn router() -> Router<AppState> {
    Router::new().route("/api/tts", post(synthesize))
}

/// Convert text to audio via the configured provider
pub async fn synthesize(State(state): State<AppState>, body: Bytes) -> Result<Response> {
    let request: SpeechRequest = serde_json::from_slice(&body)
        .map_err(|e| AppError::Validation(format!("Invalid speech request: {e}")))?;

    if request.text.trim().is_empty() {
        return Err(AppError::Validation("Text is required".to_string()));
    }

    let speech = state.speech.as_ref().ok_or(SpeechError::NotConfigured)?;
    let audio = speech.synthesize(&request).await?;

    info!(
        chars = request.text.len(),
        bytes = audio.bytes.len(),
        content_type = %audio.content_type,
        "Speech synthesized"
    );

    Ok(([(header::CONTENT_TYPE, audio.content_type)], audio.bytes).into_response())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::activity::MemoryLog;
    use crate::speech::{MockSpeechSynthesizer, SpeechSynthesizer, SynthesizedAudio};
    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use std::sync::Arc;
    use tower::ServiceExt;

    fn state_with(speech: Option<MockSpeechSynthesizer>) -> AppState {
        AppState {
            events: Arc::new(MemoryLog::new()),
            speech: speech.map(|s| Arc::new(s) as Arc<dyn SpeechSynthesizer>),
        }
    }

    fn tts_request(body: &str) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri("/api/tts")
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    async fn error_type(resp: Response) -> String {
        let body = axum::body::to_bytes(resp.into_body(), 10_000).await.unwrap();
        let json: serde_json::Value = serde_json::from_slice(&body).unwrap();
        json["error_type"].as_str().unwrap_or_default().to_string()
    }

    #[tokio::test]
    async fn test_tts_returns_audio() {
        let mut mock = MockSpeechSynthesizer::new();
        mock.expect_synthesize()
            .withf(|req| req.text == "Estimate: ~$75." && req.voice_id.as_deref() == Some("v1"))
            .times(1)
            .returning(|_| {
                Ok(SynthesizedAudio {
                    content_type: "audio/mpeg".to_string(),
                    bytes: vec![0xFF, 0xFB, 0x90],
                })
            });

        let app = router().with_state(state_with(Some(mock)));
        let resp = app
            .oneshot(tts_request(r#"{"text":"Estimate: ~$75.","voiceId":"v1"}"#))
            .await
            .unwrap();

        assert_eq!(resp.status(), StatusCode::OK);
        assert_eq!(resp.headers()[header::CONTENT_TYPE], "audio/mpeg");
        let body = axum::body::to_bytes(resp.into_body(), 10_000).await.unwrap();
        assert_eq!(&body[..], &[0xFF_u8, 0xFB, 0x90][..]);
    }

    #[tokio::test]
    async fn test_tts_without_provider_is_unavailable() {
        let app = router().with_state(state_with(None));
        let resp = app.oneshot(tts_request(r#"{"text":"hello"}"#)).await.unwrap();

        assert_eq!(resp.status(), StatusCode::SERVICE_UNAVAILABLE);
        assert_eq!(error_type(resp).await, "SpeechUnavailable");
    }

    #[tokio::test]
    async fn test_tts_blank_text_is_rejected() {
        let mut mock = MockSpeechSynthesizer::new();
        mock.expect_synthesize().times(0);

        let app = router().with_state(state_with(Some(mock)));
        let resp = app.oneshot(tts_request(r#"{"text":"   "}"#)).await.unwrap();

        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
        assert_eq!(error_type(resp).await, "ValidationError");
    }

    #[tokio::test]
    async fn test_tts_malformed_body_is_rejected() {
        let app = router().with_state(state_with(None));
        let resp = app.oneshot(tts_request("{text:")).await.unwrap();

        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
        assert_eq!(error_type(resp).await, "ValidationError");
    }

    #[tokio::test]
    async fn test_tts_provider_failure_is_bad_gateway() {
        let mut mock = MockSpeechSynthesizer::new();
        mock.expect_synthesize().returning(|_| {
            Err(SpeechError::Provider {
                status: 401,
                message: "invalid api key".to_string(),
            })
        });

        let app = router().with_state(state_with(Some(mock)));
        let resp = app.oneshot(tts_request(r#"{"text":"hello"}"#)).await.unwrap();

        assert_eq!(resp.status(), StatusCode::BAD_GATEWAY);
        assert_eq!(error_type(resp).await, "SpeechProvider");
    }
}

//! Speak HTTP Handler

use axum::{extract::State, Json};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use crate::application::{PlaybackOutcome, SpeakCommand};
use crate::domain::voice::DEFAULT_SAMPLE_TEXT;
use crate::infrastructure::http::dto::ApiResponse;
use crate::infrastructure::http::error::ApiError;
use crate::infrastructure::http::state::AppState;

#[derive(Debug, Deserialize)]
pub struct SpeakRequest {
    pub voice_id: String,
    #[serde(default = "default_text")]
    pub text: String,
    #[serde(default)]
    pub speed: Option<f32>,
}

fn default_text() -> String {
    DEFAULT_SAMPLE_TEXT.to_string()
}

#[derive(Debug, Serialize)]
pub struct SpeakResponse {
    pub voice_id: String,
    pub voice_name: String,
    #[serde(flatten)]
    pub outcome: PlaybackOutcome,
}

/// 单音色试听，播放结束后返回
pub async fn speak(
    State(state): State<Arc<AppState>>,
    Json(req): Json<SpeakRequest>,
) -> Result<Json<ApiResponse<SpeakResponse>>, ApiError> {
    let response = state
        .speak_handler
        .handle(SpeakCommand {
            voice_id: req.voice_id,
            text: req.text,
            speed: req.speed,
        })
        .await?;

    Ok(Json(ApiResponse::success(SpeakResponse {
        voice_id: response.voice_id,
        voice_name: response.voice_name,
        outcome: response.outcome,
    })))
}

//! Batch HTTP Handlers

use axum::{extract::State, Json};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use crate::application::{GetBatchStatus, PlayAllCommand, PlayAllResponse, StopAllCommand};
use crate::application::batch::BatchPhase;
use crate::domain::voice::PlayMode;
use crate::infrastructure::http::dto::ApiResponse;
use crate::infrastructure::http::error::ApiError;
use crate::infrastructure::http::handlers::voice::resolve_mode;
use crate::infrastructure::http::state::AppState;

// ============================================================================
// DTOs
// ============================================================================

#[derive(Debug, Default, Deserialize)]
pub struct PlayAllRequest {
    pub mode: Option<String>,
    pub text: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum PlayAllActionResponse {
    Started { total: usize, mode: PlayMode },
    Stopped,
}

#[derive(Debug, Serialize)]
pub struct StopResponse {
    pub stopped: bool,
}

#[derive(Debug, Serialize)]
pub struct BatchStatusResponse {
    pub phase: BatchPhase,
    pub running: bool,
    pub current_voice_id: Option<String>,
    pub current_voice_name: Option<String>,
    pub position: Option<usize>,
    pub total: usize,
    pub progress: f64,
    pub cancel_requested: bool,
}

// ============================================================================
// Handlers
// ============================================================================

/// 批量试听开关：空闲时开始，运行中则停止
pub async fn play_all(
    State(state): State<Arc<AppState>>,
    body: Option<Json<PlayAllRequest>>,
) -> Result<Json<ApiResponse<PlayAllActionResponse>>, ApiError> {
    let req = body.map(|Json(req)| req).unwrap_or_default();
    let mode = resolve_mode(req.mode.as_deref(), state.default_mode)?;

    let response = state.play_all_handler.handle(PlayAllCommand {
        mode,
        text: req.text,
    })?;

    let data = match response {
        PlayAllResponse::Started { total, mode } => PlayAllActionResponse::Started { total, mode },
        PlayAllResponse::Stopped => PlayAllActionResponse::Stopped,
    };
    Ok(Json(ApiResponse::success(data)))
}

/// 停止批量试听
pub async fn stop_all(State(state): State<Arc<AppState>>) -> Json<ApiResponse<StopResponse>> {
    let response = state.stop_all_handler.handle(StopAllCommand);
    Json(ApiResponse::success(StopResponse {
        stopped: response.stopped,
    }))
}

/// 批量试听状态
pub async fn batch_status(State(state): State<Arc<AppState>>) -> Json<ApiResponse<BatchStatusResponse>> {
    let status = state.get_batch_status_handler.handle(GetBatchStatus);
    Json(ApiResponse::success(BatchStatusResponse {
        phase: status.phase,
        running: status.running,
        current_voice_id: status.current_voice_id,
        current_voice_name: status.current_voice_name,
        position: status.position,
        total: status.total,
        progress: status.progress,
        cancel_requested: status.cancel_requested,
    }))
}

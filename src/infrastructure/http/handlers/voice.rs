//! Voice HTTP Handlers

use axum::{
    extract::{Query, State},
    Json,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use crate::application::{GetVoice, ListVoices, VoiceResponse as VoiceView};
use crate::domain::voice::{PlayMode, VoiceType};
use crate::infrastructure::http::dto::ApiResponse;
use crate::infrastructure::http::error::ApiError;
use crate::infrastructure::http::state::AppState;

// ============================================================================
// DTOs
// ============================================================================

#[derive(Debug, Serialize)]
pub struct VoiceResponse {
    pub id: String,
    pub name: String,
    pub description: String,
    #[serde(rename = "type")]
    pub voice_type: VoiceType,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub use_cases: Option<String>,
    pub is_top: bool,
}

impl From<VoiceView> for VoiceResponse {
    fn from(view: VoiceView) -> Self {
        Self {
            id: view.id,
            name: view.name,
            description: view.description,
            voice_type: view.voice_type,
            use_cases: view.use_cases,
            is_top: view.is_top,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct VoiceListResponse {
    pub mode: PlayMode,
    pub total: usize,
    pub voices: Vec<VoiceResponse>,
}

#[derive(Debug, Deserialize)]
pub struct ListVoicesParams {
    pub mode: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct GetVoiceRequest {
    pub id: String,
}

/// 解析模式参数，缺省时使用配置的默认模式
pub(super) fn resolve_mode(raw: Option<&str>, default: PlayMode) -> Result<PlayMode, ApiError> {
    match raw {
        None => Ok(default),
        Some(s) if s.trim().is_empty() => Ok(default),
        Some(s) => s
            .parse()
            .map_err(|e: crate::domain::voice::VoiceError| ApiError::BadRequest(e.to_string())),
    }
}

// ============================================================================
// Handlers
// ============================================================================

/// 按模式列出音色
pub async fn list_voices(
    State(state): State<Arc<AppState>>,
    Query(params): Query<ListVoicesParams>,
) -> Result<Json<ApiResponse<VoiceListResponse>>, ApiError> {
    let mode = resolve_mode(params.mode.as_deref(), state.default_mode)?;

    let voices: Vec<VoiceResponse> = state
        .list_voices_handler
        .handle(ListVoices { mode })
        .into_iter()
        .map(VoiceResponse::from)
        .collect();

    Ok(Json(ApiResponse::success(VoiceListResponse {
        mode,
        total: voices.len(),
        voices,
    })))
}

/// 获取音色详情
pub async fn get_voice(
    State(state): State<Arc<AppState>>,
    Json(req): Json<GetVoiceRequest>,
) -> Result<Json<ApiResponse<VoiceResponse>>, ApiError> {
    let voice = state
        .get_voice_handler
        .handle(GetVoice { voice_id: req.id })?;

    Ok(Json(ApiResponse::success(VoiceResponse::from(voice))))
}

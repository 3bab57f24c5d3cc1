//! HTTP Routes
//!
//! API Endpoints:
//! - /api/ping              GET   健康检查
//! - /api/voice/list        GET   按模式列出音色（?mode=all|top|hd）
//! - /api/voice/get         POST  获取音色详情
//! - /api/speak             POST  单音色试听，播放结束后返回
//! - /api/batch/play_all    POST  批量试听开关
//! - /api/batch/stop        POST  停止批量试听
//! - /api/batch/status      GET   批量试听状态
//! - /ws/events             WS    进度与警告事件

use axum::{
    routing::{get, post},
    Router,
};
use std::sync::Arc;

use super::handlers;
use super::state::AppState;

/// 创建所有路由
pub fn create_routes() -> Router<Arc<AppState>> {
    Router::new()
        .nest("/api", api_routes())
        .route("/ws/events", get(handlers::events_websocket_handler))
}

/// API 路由
fn api_routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/ping", get(handlers::ping))
        .route("/speak", post(handlers::speak))
        .nest("/voice", voice_routes())
        .nest("/batch", batch_routes())
}

/// Voice 路由
fn voice_routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/get", post(handlers::get_voice))
        .route("/list", get(handlers::list_voices))
}

/// Batch 路由
fn batch_routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/play_all", post(handlers::play_all))
        .route("/stop", post(handlers::stop_all))
        .route("/status", get(handlers::batch_status))
}

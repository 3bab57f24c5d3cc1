//! HTTP Error Handling
//!
//! 业务错误统一返回 HTTP 200，错误码放在 errno 中

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;

use crate::application::ApplicationError;

/// 统一错误响应格式
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub errno: i32,
    pub error: String,
    pub data: Option<()>,
}

impl ErrorResponse {
    pub fn new(errno: i32, error: impl Into<String>) -> Self {
        Self {
            errno,
            error: error.into(),
            data: None,
        }
    }
}

/// 错误码定义
pub mod errno {
    pub const BAD_REQUEST: i32 = 400;
    pub const NOT_FOUND: i32 = 404;
    pub const CONFLICT: i32 = 409;
    pub const INTERNAL_ERROR: i32 = 500;
    pub const SERVICE_UNAVAILABLE: i32 = 503;
}

/// API 错误
#[derive(Debug)]
pub enum ApiError {
    NotFound(String),
    BadRequest(String),
    Internal(String),
    Conflict(String),
    ServiceUnavailable(String),
}

impl ApiError {
    /// 错误码与消息
    pub fn parts(&self) -> (i32, &str) {
        match self {
            ApiError::NotFound(msg) => (errno::NOT_FOUND, msg),
            ApiError::BadRequest(msg) => (errno::BAD_REQUEST, msg),
            ApiError::Conflict(msg) => (errno::CONFLICT, msg),
            ApiError::Internal(msg) => (errno::INTERNAL_ERROR, msg),
            ApiError::ServiceUnavailable(msg) => (errno::SERVICE_UNAVAILABLE, msg),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (code, msg) = self.parts();

        // 上游或内部故障记 error，调用方问题记 warn
        if code >= errno::INTERNAL_ERROR {
            tracing::error!(errno = code, error = %msg, "Request failed");
        } else {
            tracing::warn!(errno = code, error = %msg, "Request rejected");
        }

        // 业务错误统一返回 200
        (StatusCode::OK, Json(ErrorResponse::new(code, msg))).into_response()
    }
}

impl From<ApplicationError> for ApiError {
    fn from(e: ApplicationError) -> Self {
        match e {
            ApplicationError::NotFound { resource_type, id } => {
                ApiError::NotFound(format!("{} not found: {}", resource_type, id))
            }
            ApplicationError::ValidationError(msg) => ApiError::BadRequest(msg),
            ApplicationError::InvalidState(msg) => ApiError::Conflict(msg),
            ApplicationError::ExternalServiceError(msg) => ApiError::ServiceUnavailable(msg),
            ApplicationError::InternalError(msg) => ApiError::Internal(msg),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::to_bytes;

    async fn body_json(error: ApiError) -> (StatusCode, serde_json::Value) {
        let response = error.into_response();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    #[tokio::test]
    async fn test_errors_use_envelope() {
        let (status, json) = body_json(ApiError::BadRequest("bad".to_string())).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["errno"], errno::BAD_REQUEST);
        assert_eq!(json["error"], "bad");
        assert!(json["data"].is_null());
    }

    #[tokio::test]
    async fn test_application_error_mapping() {
        let not_found = ApiError::from(ApplicationError::not_found("Voice", "nobody"));
        let (_, json) = body_json(not_found).await;
        assert_eq!(json["errno"], errno::NOT_FOUND);
        assert_eq!(json["error"], "Voice not found: nobody");

        let busy = ApiError::from(ApplicationError::invalid_state("busy"));
        let (_, json) = body_json(busy).await;
        assert_eq!(json["errno"], errno::CONFLICT);

        let upstream = ApiError::from(ApplicationError::ExternalServiceError(
            "Network error: Unable to connect to Azure API".to_string(),
        ));
        let (_, json) = body_json(upstream).await;
        assert_eq!(json["errno"], errno::SERVICE_UNAVAILABLE);
        assert_eq!(json["error"], "Network error: Unable to connect to Azure API");
    }
}

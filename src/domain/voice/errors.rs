//! Voice Context - Errors

use thiserror::Error;

#[derive(Debug, Error)]
pub enum VoiceError {
    #[error("音色不存在: {0}")]
    NotFound(String),

    #[error("无效的音色 ID: {0:?}")]
    InvalidId(String),

    #[error("音色 ID 重复: {0}")]
    Duplicate(String),

    #[error("无效的试听模式: {0}")]
    InvalidPlayMode(String),
}

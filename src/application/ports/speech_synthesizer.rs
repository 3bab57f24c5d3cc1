//! Speech Synthesizer Port - TTS 合成抽象
//!
//! 一次调用 = 一次 HTTP 往返，具体实现在 infrastructure/adapters 层

use async_trait::async_trait;
use std::ops::RangeInclusive;
use thiserror::Error;

use super::AudioFormat;
use crate::domain::voice::VoiceId;

/// 合成错误
///
/// `Display` 的内容即为用户可见的提示，批量试听中原样记录为该音色的警告
#[derive(Debug, Error)]
pub enum SynthesisError {
    #[error("Network error: {0}")]
    NetworkError(String),

    #[error("Request was aborted or timed out")]
    Timeout,

    /// 服务端返回的非 2xx 响应，消息已格式化
    #[error("{0}")]
    ServiceError(String),

    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    #[error("{0}")]
    Other(String),
}

/// 服务端接受的语速范围
pub const SPEED_RANGE: RangeInclusive<f32> = 0.25..=4.0;

/// 合成请求
#[derive(Debug, Clone)]
pub struct SynthesisRequest {
    pub voice_id: VoiceId,
    pub text: String,
    /// 语速，1.0 为正常
    pub speed: f32,
}

impl SynthesisRequest {
    pub fn new(voice_id: VoiceId, text: impl Into<String>) -> Self {
        Self {
            voice_id,
            text: text.into(),
            speed: 1.0,
        }
    }

    pub fn with_speed(mut self, speed: f32) -> Self {
        self.speed = speed;
        self
    }
}

/// 合成结果（原始音频字节）
#[derive(Debug, Clone)]
pub struct SynthesizedAudio {
    pub data: Vec<u8>,
    pub format: AudioFormat,
}

/// Speech Synthesizer Port
#[async_trait]
pub trait SpeechSynthesizerPort: Send + Sync {
    /// 合成一段语音，可能挂起任意时长
    async fn generate(&self, request: SynthesisRequest) -> Result<SynthesizedAudio, SynthesisError>;

    /// 检查服务是否可用
    async fn health_check(&self) -> bool {
        true // 默认实现
    }
}

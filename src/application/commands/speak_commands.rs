//! Speak Commands - 单音色试听

use crate::application::playback::PlaybackOutcome;

/// 单音色试听命令
#[derive(Debug, Clone)]
pub struct SpeakCommand {
    pub voice_id: String,
    pub text: String,
    /// 缺省时使用配置的语速
    pub speed: Option<f32>,
}

/// 单音色试听响应
#[derive(Debug, Clone)]
pub struct SpeakResponse {
    pub voice_id: String,
    pub voice_name: String,
    pub outcome: PlaybackOutcome,
}

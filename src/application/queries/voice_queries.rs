//! Voice Queries - 音色目录查询

use crate::domain::voice::PlayMode;

/// 获取音色详情查询
#[derive(Debug, Clone)]
pub struct GetVoice {
    pub voice_id: String,
}

/// 按模式列出音色查询
#[derive(Debug, Clone, Default)]
pub struct ListVoices {
    pub mode: PlayMode,
}

//! Audio Store Port - 音频句柄的签发与释放
//!
//! 合成得到的音频字节登记后换取一个不透明句柄，句柄释放后数据即被丢弃。
//! 具体实现在 infrastructure/memory 层

use serde::{Deserialize, Serialize};
use std::sync::Arc;
use thiserror::Error;
use uuid::Uuid;

use super::SynthesizedAudio;

/// 音频格式
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AudioFormat {
    #[default]
    Mp3,
    Wav,
}

impl AudioFormat {
    pub fn extension(&self) -> &'static str {
        match self {
            AudioFormat::Mp3 => "mp3",
            AudioFormat::Wav => "wav",
        }
    }

    pub fn mime_type(&self) -> &'static str {
        match self {
            AudioFormat::Mp3 => "audio/mpeg",
            AudioFormat::Wav => "audio/wav",
        }
    }
}

/// Audio Store 错误
#[derive(Debug, Error)]
pub enum AudioStoreError {
    #[error("Audio handle not found: {0}")]
    NotFound(Uuid),
}

/// 音频句柄
///
/// 不可克隆：句柄只有一个所有者，`AudioStorePort::release` 消费句柄
#[derive(Debug, PartialEq, Eq, Hash)]
pub struct AudioHandle {
    id: Uuid,
    format: AudioFormat,
}

impl AudioHandle {
    pub fn new(format: AudioFormat) -> Self {
        Self {
            id: Uuid::new_v4(),
            format,
        }
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn format(&self) -> AudioFormat {
        self.format
    }
}

/// 已登记的音频数据
#[derive(Debug, Clone)]
pub struct StoredAudio {
    pub data: Arc<[u8]>,
    pub format: AudioFormat,
}

/// Audio Store Port
pub trait AudioStorePort: Send + Sync {
    /// 登记音频并签发句柄
    fn register(&self, audio: SynthesizedAudio) -> AudioHandle;

    /// 按句柄 ID 读取音频
    fn get(&self, handle_id: Uuid) -> Result<StoredAudio, AudioStoreError>;

    /// 释放句柄，返回是否确实释放了数据
    fn release(&self, handle: AudioHandle) -> bool;

    /// 当前存活的句柄数
    fn live_count(&self) -> usize;
}

//! Voice Context - Value Objects

use serde::{Deserialize, Serialize};
use std::str::FromStr;

use super::VoiceError;

/// 音色唯一标识（如 `alloy`、`jade-hardy`）
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct VoiceId(String);

impl VoiceId {
    pub fn new(id: impl Into<String>) -> Result<Self, VoiceError> {
        let id = id.into();
        if id.trim().is_empty() {
            return Err(VoiceError::InvalidId(id));
        }
        Ok(Self(id))
    }

    /// 内置目录使用，id 为编译期常量
    pub(super) fn from_static(id: &'static str) -> Self {
        Self(id.to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for VoiceId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl AsRef<str> for VoiceId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// 音色质量等级
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VoiceType {
    Standard,
    Neural,
    Hd,
}

impl VoiceType {
    pub fn as_str(&self) -> &'static str {
        match self {
            VoiceType::Standard => "standard",
            VoiceType::Neural => "neural",
            VoiceType::Hd => "hd",
        }
    }
}

impl std::fmt::Display for VoiceType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// 批量试听的音色子集
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PlayMode {
    /// 全部音色
    #[default]
    All,
    /// 推荐音色（`is_top`）
    Top,
    /// HD 音色
    Hd,
}

impl PlayMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            PlayMode::All => "all",
            PlayMode::Top => "top",
            PlayMode::Hd => "hd",
        }
    }
}

impl FromStr for PlayMode {
    type Err = VoiceError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "all" => Ok(PlayMode::All),
            "top" => Ok(PlayMode::Top),
            "hd" => Ok(PlayMode::Hd),
            other => Err(VoiceError::InvalidPlayMode(other.to_string())),
        }
    }
}

impl std::fmt::Display for PlayMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

//! Configuration Types
//!
//! 定义所有配置结构体

use serde::Deserialize;
use std::collections::HashSet;
use std::time::Duration;

use crate::application::batch::BatchConfig;
use crate::domain::voice::PlayMode;
use crate::domain::AzureCredentials;

/// 应用主配置
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AppConfig {
    /// 服务器配置
    #[serde(default)]
    pub server: ServerConfig,

    /// 语音合成配置
    #[serde(default)]
    pub tts: TtsConfig,

    /// Azure OpenAI 凭据
    #[serde(default)]
    pub azure: AzureCredentials,

    /// 批量试听配置
    #[serde(default)]
    pub batch: BatchSettings,

    /// 日志配置
    #[serde(default)]
    pub log: LogConfig,
}

/// 服务器配置
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    /// 监听地址
    #[serde(default = "default_host")]
    pub host: String,

    /// 监听端口
    #[serde(default = "default_port")]
    pub port: u16,
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    5060
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

impl ServerConfig {
    /// 获取服务器地址
    pub fn addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

/// 合成器实现
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TtsProvider {
    /// Azure OpenAI
    #[default]
    Azure,
    /// 本地静音合成（开发用）
    Fake,
}

impl TtsProvider {
    pub fn as_str(&self) -> &'static str {
        match self {
            TtsProvider::Azure => "azure",
            TtsProvider::Fake => "fake",
        }
    }
}

/// 语音合成配置
#[derive(Debug, Clone, Deserialize)]
pub struct TtsConfig {
    #[serde(default)]
    pub provider: TtsProvider,

    /// 请求超时时间（秒）
    #[serde(default = "default_tts_timeout")]
    pub timeout_secs: u64,

    /// Fake 合成器配置
    #[serde(default)]
    pub fake: FakeTtsSettings,
}

fn default_tts_timeout() -> u64 {
    60
}

impl Default for TtsConfig {
    fn default() -> Self {
        Self {
            provider: TtsProvider::default(),
            timeout_secs: default_tts_timeout(),
            fake: FakeTtsSettings::default(),
        }
    }
}

/// Fake 合成器配置
#[derive(Debug, Clone, Deserialize)]
pub struct FakeTtsSettings {
    /// 模拟合成延迟（毫秒）
    #[serde(default = "default_fake_latency")]
    pub latency_ms: u64,

    /// 生成音频时长（毫秒）
    #[serde(default = "default_fake_duration")]
    pub duration_ms: u64,

    /// 始终失败的音色
    #[serde(default)]
    pub failing_voices: Vec<String>,
}

fn default_fake_latency() -> u64 {
    200
}

fn default_fake_duration() -> u64 {
    1500
}

impl Default for FakeTtsSettings {
    fn default() -> Self {
        Self {
            latency_ms: default_fake_latency(),
            duration_ms: default_fake_duration(),
            failing_voices: Vec::new(),
        }
    }
}

impl FakeTtsSettings {
    pub fn failing_set(&self) -> HashSet<String> {
        self.failing_voices.iter().cloned().collect()
    }
}

/// 批量试听配置
#[derive(Debug, Clone, Deserialize)]
pub struct BatchSettings {
    /// 两次播放之间的间隔（毫秒）
    #[serde(default = "default_settle_delay")]
    pub settle_delay_ms: u64,

    /// 加载/播放超时（毫秒）
    #[serde(default = "default_load_timeout")]
    pub load_timeout_ms: u64,

    /// 语速
    #[serde(default = "default_speed")]
    pub speed: f32,

    /// 未指定时的试听子集
    #[serde(default)]
    pub default_mode: PlayMode,
}

fn default_settle_delay() -> u64 {
    500
}

fn default_load_timeout() -> u64 {
    10_000
}

fn default_speed() -> f32 {
    1.0
}

impl Default for BatchSettings {
    fn default() -> Self {
        Self {
            settle_delay_ms: default_settle_delay(),
            load_timeout_ms: default_load_timeout(),
            speed: default_speed(),
            default_mode: PlayMode::default(),
        }
    }
}

impl BatchSettings {
    pub fn load_timeout(&self) -> Duration {
        Duration::from_millis(self.load_timeout_ms)
    }

    /// 转换为编排器参数
    pub fn to_batch_config(&self) -> BatchConfig {
        BatchConfig {
            settle_delay: Duration::from_millis(self.settle_delay_ms),
            speed: self.speed,
        }
    }
}

/// 日志配置
#[derive(Debug, Clone, Deserialize)]
pub struct LogConfig {
    /// 日志级别
    #[serde(default = "default_log_level")]
    pub level: String,

    /// 是否启用 JSON 格式
    #[serde(default)]
    pub json: bool,
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            json: false,
        }
    }
}

//! 批量试听运行状态与结果

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use thiserror::Error;

use crate::domain::voice::VoiceId;

/// 默认沉淀间隔（两次播放之间）
pub const DEFAULT_SETTLE_DELAY: Duration = Duration::from_millis(500);

/// 运行阶段
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BatchPhase {
    #[default]
    Idle,
    Generating,
    Playing,
}

impl BatchPhase {
    pub fn as_str(&self) -> &'static str {
        match self {
            BatchPhase::Idle => "idle",
            BatchPhase::Generating => "generating",
            BatchPhase::Playing => "playing",
        }
    }
}

/// 可观察的运行状态（每个编排器恰好一份）
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct BatchRunState {
    pub phase: BatchPhase,
    pub current_voice_id: Option<VoiceId>,
    /// 当前音色在本次运行中的位置（从 1 开始）
    pub position: Option<usize>,
    pub total: usize,
    /// [0, 1]
    pub progress: f64,
    pub cancel_requested: bool,
}

impl BatchRunState {
    pub fn is_active(&self) -> bool {
        self.phase != BatchPhase::Idle
    }
}

/// 终止结果
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum BatchOutcome {
    Completed { total: usize },
    Cancelled,
}

/// 警告发生的阶段
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WarningStage {
    Synthesis,
    Playback,
}

/// 单个音色的非致命失败
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BatchWarning {
    pub voice_id: VoiceId,
    pub stage: WarningStage,
    pub message: String,
    pub at: DateTime<Utc>,
}

impl BatchWarning {
    pub fn new(voice_id: VoiceId, stage: WarningStage, message: impl Into<String>) -> Self {
        Self {
            voice_id,
            stage,
            message: message.into(),
            at: Utc::now(),
        }
    }
}

/// 一次运行的报告
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BatchReport {
    pub outcome: BatchOutcome,
    pub warnings: Vec<BatchWarning>,
}

impl BatchReport {
    pub fn is_cancelled(&self) -> bool {
        matches!(self.outcome, BatchOutcome::Cancelled)
    }
}

/// 启动前置条件错误
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BatchError {
    #[error("No voices to play")]
    EmptyVoiceSet,

    #[error("Please enter some text to speak")]
    BlankText,

    #[error("A batch run is already active; cancellation requested")]
    Busy,
}

/// 运行参数
#[derive(Debug, Clone)]
pub struct BatchConfig {
    pub settle_delay: Duration,
    pub speed: f32,
}

impl Default for BatchConfig {
    fn default() -> Self {
        Self {
            settle_delay: DEFAULT_SETTLE_DELAY,
            speed: 1.0,
        }
    }
}

//! Event Publisher Implementation
//!
//! 批量试听进度、警告与结束事件的广播

use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tokio::sync::broadcast;

use crate::application::batch::{BatchOutcome, BatchPhase, BatchWarning, WarningStage};

/// 推送事件类型
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "event", content = "data")]
pub enum BatchEvent {
    /// 进度变更（每个音色、每个阶段一次）
    Progress {
        phase: BatchPhase,
        #[serde(skip_serializing_if = "Option::is_none")]
        voice_id: Option<String>,
        progress: f64,
    },
    /// 单个音色的非致命失败
    Warning {
        voice_id: String,
        stage: WarningStage,
        message: String,
    },
    /// 批量试听结束（每次运行恰好一次）
    Finished {
        outcome: BatchOutcome,
        warnings: usize,
    },
    /// 单音色试听结束
    SpeechFinished {
        voice_id: String,
        outcome: String,
    },
}

/// 事件发布器
pub struct EventPublisher {
    channel: broadcast::Sender<BatchEvent>,
}

impl EventPublisher {
    pub fn new() -> Self {
        Self::with_capacity(100)
    }

    pub fn with_capacity(capacity: usize) -> Self {
        let (tx, _) = broadcast::channel(capacity);
        Self { channel: tx }
    }

    pub fn arc(self) -> Arc<Self> {
        Arc::new(self)
    }

    /// 订阅所有事件
    pub fn subscribe(&self) -> broadcast::Receiver<BatchEvent> {
        self.channel.subscribe()
    }

    /// 发布进度事件
    pub fn publish_progress(&self, phase: BatchPhase, voice_id: Option<&str>, progress: f64) {
        self.publish(BatchEvent::Progress {
            phase,
            voice_id: voice_id.map(str::to_string),
            progress,
        });
    }

    /// 发布警告事件
    pub fn publish_warning(&self, warning: &BatchWarning) {
        self.publish(BatchEvent::Warning {
            voice_id: warning.voice_id.to_string(),
            stage: warning.stage,
            message: warning.message.clone(),
        });
    }

    /// 发布批量试听结束事件
    pub fn publish_batch_finished(&self, outcome: BatchOutcome, warnings: usize) {
        self.publish(BatchEvent::Finished { outcome, warnings });
    }

    /// 发布单音色试听结束事件
    pub fn publish_speech_finished(&self, voice_id: &str, outcome: &str) {
        self.publish(BatchEvent::SpeechFinished {
            voice_id: voice_id.to_string(),
            outcome: outcome.to_string(),
        });
    }

    fn publish(&self, event: BatchEvent) {
        if let Err(e) = self.channel.send(event) {
            tracing::trace!(error = %e, "Failed to publish event (no receivers)");
        }
    }
}

impl Default for EventPublisher {
    fn default() -> Self {
        Self::new()
    }
}

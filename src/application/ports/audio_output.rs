//! Audio Output Port - 单个可复用的播放原语
//!
//! 加载与播放都是"触发"操作，结果通过事件流异步通知。
//! 每次加载返回一个 `LoadTicket`，事件携带对应的 ticket，
//! 订阅方据此过滤掉属于早先加载的迟到事件。

use std::time::Duration;
use thiserror::Error;
use tokio::sync::broadcast;

use super::AudioHandle;

/// 输出原语错误
#[derive(Debug, Error)]
pub enum OutputError {
    #[error("Audio source unavailable: {0}")]
    SourceUnavailable(String),

    #[error("Stale load ticket: {0}")]
    StaleTicket(u64),

    #[error("Output device error: {0}")]
    DeviceError(String),
}

/// 加载票据，单调递增
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct LoadTicket(pub u64);

impl std::fmt::Display for LoadTicket {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// 输出原语事件
#[derive(Debug, Clone, PartialEq)]
pub enum OutputEvent {
    /// 已就绪，可开始播放
    Ready {
        ticket: LoadTicket,
        duration: Option<Duration>,
    },
    /// 自然播放结束
    Ended { ticket: LoadTicket },
    /// 加载或播放出错
    Error { ticket: LoadTicket, message: String },
}

impl OutputEvent {
    pub fn ticket(&self) -> LoadTicket {
        match self {
            OutputEvent::Ready { ticket, .. }
            | OutputEvent::Ended { ticket }
            | OutputEvent::Error { ticket, .. } => *ticket,
        }
    }
}

/// Audio Output Port
///
/// 同一时刻只允许一个调用方驱动（由 `PlaybackController` 保证）
pub trait AudioOutputPort: Send + Sync {
    /// 注册事件监听，丢弃 Receiver 即注销
    fn subscribe(&self) -> broadcast::Receiver<OutputEvent>;

    /// 当前注册的监听数
    fn listener_count(&self) -> usize;

    /// 设置音源并触发加载，取代任何未完成的加载
    fn load(&self, handle: &AudioHandle) -> Result<LoadTicket, OutputError>;

    /// 开始播放已就绪的音源
    fn play(&self, ticket: LoadTicket) -> Result<(), OutputError>;

    /// 停止并丢弃当前音源
    fn stop(&self);
}

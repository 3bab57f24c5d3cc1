//! 应用层 - 用例编排
//!
//! 包含：
//! - ports: 六边形架构端口定义（SpeechSynthesizer、AudioStore、AudioOutput）
//! - playback: 单路播放控制器
//! - batch: 两阶段批量试听编排
//! - commands: CQRS 命令及处理器
//! - queries: CQRS 查询及处理器
//! - error: 应用层错误定义

pub mod batch;
pub mod commands;
pub mod error;
pub mod playback;
pub mod ports;
pub mod queries;

#[cfg(test)]
pub(crate) mod testing;

// Re-exports
pub use batch::{
    BatchConfig, BatchError, BatchOrchestrator, BatchOutcome, BatchPhase, BatchReport,
    BatchRunState, BatchWarning, WarningStage,
};

pub use commands::{
    PlayAllCommand,
    PlayAllResponse,
    SpeakCommand,
    SpeakResponse,
    StopAllCommand,
    StopAllResponse,
    // Handlers
    handlers::{PlayAllHandler, SpeakHandler, StopAllHandler},
};

pub use error::ApplicationError;

pub use playback::{PlaybackController, PlaybackOutcome, PlaybackState};

pub use ports::{
    AudioFormat, AudioHandle, AudioOutputPort, AudioStoreError, AudioStorePort, LoadTicket,
    OutputError, OutputEvent, SpeechSynthesizerPort, StoredAudio, SynthesisError,
    SynthesisRequest, SynthesizedAudio,
};

pub use queries::{
    GetBatchStatus,
    GetVoice,
    ListVoices,
    // Handlers
    handlers::{BatchStatusResponse, GetBatchStatusHandler, GetVoiceHandler, ListVoicesHandler, VoiceResponse},
};

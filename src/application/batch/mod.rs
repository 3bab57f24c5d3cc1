//! 应用层 - 批量试听编排

mod audio_map;
mod orchestrator;
mod state;

pub use audio_map::GeneratedAudioMap;
pub use orchestrator::BatchOrchestrator;
pub use state::{
    BatchConfig, BatchError, BatchOutcome, BatchPhase, BatchReport, BatchRunState, BatchWarning,
    WarningStage, DEFAULT_SETTLE_DELAY,
};

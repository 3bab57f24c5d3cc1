//! Application State
//!
//! 包含所有 Command/Query Handlers 的应用状态

use std::sync::Arc;

use crate::application::{
    // Command handlers
    PlayAllHandler, SpeakHandler, StopAllHandler,
    // Query handlers
    GetBatchStatusHandler, GetVoiceHandler, ListVoicesHandler,
    // Core
    AudioStorePort, BatchOrchestrator, PlaybackController, SpeechSynthesizerPort,
};
use crate::domain::voice::{PlayMode, VoiceCatalog};
use crate::infrastructure::events::EventPublisher;

/// 应用状态
pub struct AppState {
    // ========== Core ==========
    pub synthesizer: Arc<dyn SpeechSynthesizerPort>,
    pub orchestrator: Arc<BatchOrchestrator>,
    pub event_publisher: Arc<EventPublisher>,
    /// 请求未指定模式时使用
    pub default_mode: PlayMode,

    // ========== Command Handlers ==========
    pub speak_handler: SpeakHandler,
    pub play_all_handler: PlayAllHandler,
    pub stop_all_handler: StopAllHandler,

    // ========== Query Handlers ==========
    pub get_voice_handler: GetVoiceHandler,
    pub list_voices_handler: ListVoicesHandler,
    pub get_batch_status_handler: GetBatchStatusHandler,
}

impl AppState {
    /// 创建应用状态
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        catalog: Arc<VoiceCatalog>,
        synthesizer: Arc<dyn SpeechSynthesizerPort>,
        audio_store: Arc<dyn AudioStorePort>,
        playback: Arc<PlaybackController>,
        orchestrator: Arc<BatchOrchestrator>,
        event_publisher: Arc<EventPublisher>,
        default_speed: f32,
        default_mode: PlayMode,
    ) -> Self {
        Self {
            synthesizer: synthesizer.clone(),
            orchestrator: orchestrator.clone(),
            event_publisher: event_publisher.clone(),
            default_mode,

            // Command handlers
            speak_handler: SpeakHandler::new(
                catalog.clone(),
                synthesizer,
                audio_store,
                playback,
                orchestrator.clone(),
                event_publisher,
                default_speed,
            ),
            play_all_handler: PlayAllHandler::new(catalog.clone(), orchestrator.clone()),
            stop_all_handler: StopAllHandler::new(orchestrator.clone()),

            // Query handlers
            get_voice_handler: GetVoiceHandler::new(catalog.clone()),
            list_voices_handler: ListVoicesHandler::new(catalog.clone()),
            get_batch_status_handler: GetBatchStatusHandler::new(catalog, orchestrator),
        }
    }
}

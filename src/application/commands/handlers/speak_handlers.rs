//! Speak Command Handler - 单音色试听

use std::sync::Arc;
use tokio::sync::Mutex;

use crate::application::batch::BatchOrchestrator;
use crate::application::commands::{SpeakCommand, SpeakResponse};
use crate::application::error::ApplicationError;
use crate::application::playback::{PlaybackController, PlaybackOutcome};
use crate::application::ports::{
    AudioHandle, AudioStorePort, SpeechSynthesizerPort, SynthesisRequest, SPEED_RANGE,
};
use crate::domain::voice::VoiceCatalog;
use crate::infrastructure::events::EventPublisher;

/// Speak Handler
///
/// 只保留最近一次试听的音频句柄，新的试听开始前释放旧句柄
pub struct SpeakHandler {
    catalog: Arc<VoiceCatalog>,
    synthesizer: Arc<dyn SpeechSynthesizerPort>,
    audio_store: Arc<dyn AudioStorePort>,
    playback: Arc<PlaybackController>,
    orchestrator: Arc<BatchOrchestrator>,
    event_publisher: Arc<EventPublisher>,
    default_speed: f32,
    last_speech: Mutex<Option<AudioHandle>>,
}

impl SpeakHandler {
    pub fn new(
        catalog: Arc<VoiceCatalog>,
        synthesizer: Arc<dyn SpeechSynthesizerPort>,
        audio_store: Arc<dyn AudioStorePort>,
        playback: Arc<PlaybackController>,
        orchestrator: Arc<BatchOrchestrator>,
        event_publisher: Arc<EventPublisher>,
        default_speed: f32,
    ) -> Self {
        Self {
            catalog,
            synthesizer,
            audio_store,
            playback,
            orchestrator,
            event_publisher,
            default_speed,
            last_speech: Mutex::new(None),
        }
    }

    pub async fn handle(&self, cmd: SpeakCommand) -> Result<SpeakResponse, ApplicationError> {
        let text = cmd.text.trim();
        if text.is_empty() {
            return Err(ApplicationError::validation("Please enter some text to speak"));
        }

        let speed = cmd.speed.unwrap_or(self.default_speed);
        if !SPEED_RANGE.contains(&speed) {
            return Err(ApplicationError::validation(format!(
                "Speed must be between {} and {}",
                SPEED_RANGE.start(),
                SPEED_RANGE.end()
            )));
        }

        let voice = self.catalog.get(&cmd.voice_id)?;

        if self.orchestrator.is_running() {
            return Err(ApplicationError::invalid_state(
                "A batch run is in progress, stop it first",
            ));
        }

        // 串行化试听，同时持有"最近一次"句柄的所有权
        let mut last = self.last_speech.lock().await;
        if let Some(previous) = last.take() {
            self.audio_store.release(previous);
        }

        let request = SynthesisRequest::new(voice.id().clone(), text).with_speed(speed);
        let audio = self.synthesizer.generate(request).await.map_err(|e| {
            tracing::warn!(voice_id = %voice.id(), error = %e, "Speech synthesis failed");
            ApplicationError::from(e)
        })?;

        // 先交给 last_speech 再播放，请求中途被丢弃时句柄仍会在下一次试听时释放
        let handle = last.insert(self.audio_store.register(audio));
        let outcome = self.playback.play_and_wait(handle).await;

        let label = match &outcome {
            PlaybackOutcome::Finished => "finished",
            PlaybackOutcome::Failed(_) => "failed",
            PlaybackOutcome::TimedOut => "timed_out",
        };
        self.event_publisher
            .publish_speech_finished(voice.id().as_str(), label);

        tracing::info!(
            voice_id = %voice.id(),
            speed = speed,
            outcome = label,
            "Speech played"
        );

        Ok(SpeakResponse {
            voice_id: voice.id().to_string(),
            voice_name: voice.name().to_string(),
            outcome,
        })
    }
}

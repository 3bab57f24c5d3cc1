//! Batch Orchestrator - 两阶段批量试听
//!
//! 先按顺序为每个音色合成同一段文本，再按相同顺序逐个播放。
//! 取消只在检查点生效，正在进行的合成或播放会自然结束。

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

use super::audio_map::GeneratedAudioMap;
use super::state::{
    BatchConfig, BatchError, BatchOutcome, BatchPhase, BatchReport, BatchRunState, BatchWarning,
    WarningStage,
};
use crate::application::playback::{PlaybackController, PlaybackOutcome};
use crate::application::ports::{AudioStorePort, SpeechSynthesizerPort, SynthesisRequest};
use crate::domain::voice::{Voice, VoiceId};
use crate::infrastructure::events::EventPublisher;

/// Batch Orchestrator
pub struct BatchOrchestrator {
    synthesizer: Arc<dyn SpeechSynthesizerPort>,
    audio_store: Arc<dyn AudioStorePort>,
    playback: Arc<PlaybackController>,
    event_publisher: Arc<EventPublisher>,
    config: BatchConfig,
    state: watch::Sender<BatchRunState>,
    /// 当前运行的取消令牌，None 表示空闲
    active: Mutex<Option<CancellationToken>>,
}

impl BatchOrchestrator {
    pub fn new(
        synthesizer: Arc<dyn SpeechSynthesizerPort>,
        audio_store: Arc<dyn AudioStorePort>,
        playback: Arc<PlaybackController>,
        event_publisher: Arc<EventPublisher>,
        config: BatchConfig,
    ) -> Self {
        let (state, _) = watch::channel(BatchRunState::default());
        Self {
            synthesizer,
            audio_store,
            playback,
            event_publisher,
            config,
            state,
            active: Mutex::new(None),
        }
    }

    pub fn config(&self) -> &BatchConfig {
        &self.config
    }

    /// 状态快照
    pub fn state(&self) -> BatchRunState {
        self.state.borrow().clone()
    }

    pub fn phase(&self) -> BatchPhase {
        self.state.borrow().phase
    }

    pub fn current_voice_id(&self) -> Option<VoiceId> {
        self.state.borrow().current_voice_id.clone()
    }

    pub fn progress(&self) -> f64 {
        self.state.borrow().progress
    }

    pub fn is_running(&self) -> bool {
        self.lock_active().is_some()
    }

    pub fn subscribe(&self) -> watch::Receiver<BatchRunState> {
        self.state.subscribe()
    }

    /// 运行批量试听直至完成或取消
    pub async fn start(&self, voices: Vec<Voice>, text: &str) -> Result<BatchReport, BatchError> {
        let token = self.begin(&voices, text)?;
        Ok(self.execute(voices, text, token).await)
    }

    /// 同步完成前置检查并登记运行后，在后台任务中执行
    pub fn spawn(
        self: &Arc<Self>,
        voices: Vec<Voice>,
        text: String,
    ) -> Result<JoinHandle<BatchReport>, BatchError> {
        let token = self.begin(&voices, &text)?;
        let orchestrator = Arc::clone(self);
        Ok(tokio::spawn(async move {
            orchestrator.execute(voices, &text, token).await
        }))
    }

    /// 请求取消当前运行，返回是否有运行被通知
    pub fn cancel(&self) -> bool {
        let active = self.lock_active();
        match active.as_ref() {
            Some(token) => {
                token.cancel();
                self.state.send_modify(|state| state.cancel_requested = true);
                tracing::info!("Batch run cancellation requested");
                true
            }
            None => false,
        }
    }

    fn begin(&self, voices: &[Voice], text: &str) -> Result<CancellationToken, BatchError> {
        if voices.is_empty() {
            return Err(BatchError::EmptyVoiceSet);
        }
        if text.trim().is_empty() {
            return Err(BatchError::BlankText);
        }

        let mut active = self.lock_active();
        if let Some(token) = active.as_ref() {
            token.cancel();
            self.state.send_modify(|state| state.cancel_requested = true);
            tracing::info!("Start requested while a batch run is active, cancelling it");
            return Err(BatchError::Busy);
        }

        let token = CancellationToken::new();
        *active = Some(token.clone());
        self.state.send_replace(BatchRunState {
            phase: BatchPhase::Generating,
            total: voices.len(),
            ..BatchRunState::default()
        });
        Ok(token)
    }

    async fn execute(&self, voices: Vec<Voice>, text: &str, token: CancellationToken) -> BatchReport {
        let mut audio = GeneratedAudioMap::new(self.audio_store.clone());
        let mut guard = RunGuard {
            orchestrator: self,
            warnings: Vec::new(),
            closed: false,
        };
        let total = voices.len();
        let steps = (total * 2) as f64;

        tracing::info!(total = total, text_len = text.len(), "Batch run started");

        // 阶段一：合成
        for (index, voice) in voices.iter().enumerate() {
            if token.is_cancelled() {
                return self.close(guard, &mut audio, BatchOutcome::Cancelled);
            }
            self.enter_step(BatchPhase::Generating, voice.id(), index, index as f64 / steps);

            let request =
                SynthesisRequest::new(voice.id().clone(), text).with_speed(self.config.speed);
            match self.synthesizer.generate(request).await {
                Ok(generated) => {
                    let handle = self.audio_store.register(generated);
                    audio.insert(voice.id().clone(), handle);
                }
                Err(e) => {
                    self.warn(
                        &mut guard.warnings,
                        BatchWarning::new(voice.id().clone(), WarningStage::Synthesis, e.to_string()),
                    );
                }
            }
        }

        if token.is_cancelled() {
            return self.close(guard, &mut audio, BatchOutcome::Cancelled);
        }

        // 阶段二：播放
        for (index, voice) in voices.iter().enumerate() {
            if token.is_cancelled() {
                return self.close(guard, &mut audio, BatchOutcome::Cancelled);
            }
            self.enter_step(
                BatchPhase::Playing,
                voice.id(),
                index,
                (total + index) as f64 / steps,
            );

            let Some(handle) = audio.get(voice.id()) else {
                tracing::debug!(voice_id = %voice.id(), "No audio generated, skipping playback");
                continue;
            };

            match self.playback.play_and_wait(handle).await {
                PlaybackOutcome::Finished => {}
                PlaybackOutcome::Failed(reason) => {
                    self.warn(
                        &mut guard.warnings,
                        BatchWarning::new(voice.id().clone(), WarningStage::Playback, reason),
                    );
                }
                PlaybackOutcome::TimedOut => {
                    self.warn(
                        &mut guard.warnings,
                        BatchWarning::new(
                            voice.id().clone(),
                            WarningStage::Playback,
                            "Playback timed out",
                        ),
                    );
                }
            }

            tokio::time::sleep(self.config.settle_delay).await;
        }

        self.close(guard, &mut audio, BatchOutcome::Completed { total })
    }

    fn enter_step(&self, phase: BatchPhase, voice_id: &VoiceId, index: usize, progress: f64) {
        self.state.send_modify(|state| {
            state.phase = phase;
            state.current_voice_id = Some(voice_id.clone());
            state.position = Some(index + 1);
            state.progress = progress;
        });
        self.event_publisher
            .publish_progress(phase, Some(voice_id.as_str()), progress);
        tracing::debug!(
            phase = phase.as_str(),
            voice_id = %voice_id,
            progress = progress,
            "Batch step"
        );
    }

    fn warn(&self, warnings: &mut Vec<BatchWarning>, warning: BatchWarning) {
        tracing::warn!(
            voice_id = %warning.voice_id,
            stage = ?warning.stage,
            message = %warning.message,
            "Voice skipped"
        );
        self.event_publisher.publish_warning(&warning);
        warnings.push(warning);
    }

    /// 完成与取消共用的唯一收尾路径
    fn close(
        &self,
        mut guard: RunGuard<'_>,
        audio: &mut GeneratedAudioMap,
        outcome: BatchOutcome,
    ) -> BatchReport {
        let warnings = std::mem::take(&mut guard.warnings);
        let released = audio.release_all();
        let progress = match outcome {
            BatchOutcome::Completed { .. } => 1.0,
            BatchOutcome::Cancelled => 0.0,
        };
        guard.close(progress);

        tracing::info!(
            outcome = ?outcome,
            warnings = warnings.len(),
            released = released,
            "Batch run finished"
        );
        self.event_publisher
            .publish_batch_finished(outcome, warnings.len());

        BatchReport { outcome, warnings }
    }

    /// 清空运行槽位并回到 Idle（与 `begin` 在同一把锁下，避免覆盖新运行的状态）
    fn reset(&self, progress: f64) {
        let mut active = self.lock_active();
        active.take();
        self.state.send_replace(BatchRunState {
            progress,
            ..BatchRunState::default()
        });
    }

    fn lock_active(&self) -> MutexGuard<'_, Option<CancellationToken>> {
        self.active.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

/// 运行期守卫：任务被中止时仍然释放运行槽位并发布结束事件
struct RunGuard<'a> {
    orchestrator: &'a BatchOrchestrator,
    warnings: Vec<BatchWarning>,
    closed: bool,
}

impl RunGuard<'_> {
    fn close(mut self, progress: f64) {
        self.closed = true;
        self.orchestrator.reset(progress);
    }
}

impl Drop for RunGuard<'_> {
    fn drop(&mut self) {
        if !self.closed {
            tracing::warn!(
                warnings = self.warnings.len(),
                "Batch run aborted before reaching a checkpoint"
            );
            self.orchestrator.reset(0.0);
            self.orchestrator
                .event_publisher
                .publish_batch_finished(BatchOutcome::Cancelled, self.warnings.len());
        }
    }
}

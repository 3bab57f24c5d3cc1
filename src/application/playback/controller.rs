//! Playback Controller - 将事件驱动的输出原语包装为可等待的"播放至结束"
//!
//! 状态机: Idle → Loading → {Ready → Playing → Finished | LoadError → Failed | Timeout → TimedOut} → Idle

use serde::Serialize;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{broadcast, watch, Mutex};
use tokio::time::Instant;

use crate::application::ports::{AudioHandle, AudioOutputPort, LoadTicket, OutputEvent};

/// 默认加载超时
pub const DEFAULT_LOAD_TIMEOUT: Duration = Duration::from_millis(10_000);

/// 单次播放的结果
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "outcome", content = "reason", rename_all = "snake_case")]
pub enum PlaybackOutcome {
    Finished,
    Failed(String),
    TimedOut,
}

impl PlaybackOutcome {
    pub fn is_finished(&self) -> bool {
        matches!(self, PlaybackOutcome::Finished)
    }
}

/// 控制器状态
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PlaybackState {
    Idle,
    Loading,
    Playing,
}

/// 等待阶段内收到的信号
enum Signal {
    Ready(Option<Duration>),
    Ended,
    Error(String),
}

/// Playback Controller
///
/// 独占一个 `AudioOutputPort`，任何时刻最多一个 `play_and_wait` 在驱动它
pub struct PlaybackController {
    output: Arc<dyn AudioOutputPort>,
    /// single-flight
    flight: Mutex<()>,
    state: watch::Sender<PlaybackState>,
    load_timeout: Duration,
}

impl PlaybackController {
    pub fn new(output: Arc<dyn AudioOutputPort>) -> Self {
        Self::with_timeout(output, DEFAULT_LOAD_TIMEOUT)
    }

    pub fn with_timeout(output: Arc<dyn AudioOutputPort>, load_timeout: Duration) -> Self {
        let (state, _) = watch::channel(PlaybackState::Idle);
        Self {
            output,
            flight: Mutex::new(()),
            state,
            load_timeout,
        }
    }

    pub fn state(&self) -> PlaybackState {
        *self.state.borrow()
    }

    pub fn load_timeout(&self) -> Duration {
        self.load_timeout
    }

    /// 输出原语上当前的监听数（空闲时应为 0）
    pub fn listener_count(&self) -> usize {
        self.output.listener_count()
    }

    /// 播放并等待结束、出错或超时
    ///
    /// 每次调用恰好产生一个结果，返回前注销本次注册的监听
    pub async fn play_and_wait(&self, handle: &AudioHandle) -> PlaybackOutcome {
        let _flight = self.flight.lock().await;

        let mut events = self.output.subscribe();
        let outcome = self.drive(handle, &mut events).await;
        drop(events);

        self.state.send_replace(PlaybackState::Idle);

        tracing::debug!(handle_id = %handle.id(), outcome = ?outcome, "Playback finished");
        outcome
    }

    async fn drive(
        &self,
        handle: &AudioHandle,
        events: &mut broadcast::Receiver<OutputEvent>,
    ) -> PlaybackOutcome {
        self.state.send_replace(PlaybackState::Loading);

        let ticket = match self.output.load(handle) {
            Ok(ticket) => ticket,
            Err(e) => return PlaybackOutcome::Failed(e.to_string()),
        };
        let deadline = Instant::now() + self.load_timeout;

        // 等待就绪
        let duration = loop {
            match tokio::time::timeout_at(deadline, next_signal(events, ticket)).await {
                Err(_) => {
                    tracing::warn!(ticket = %ticket, "Audio load timed out");
                    self.output.stop();
                    return PlaybackOutcome::TimedOut;
                }
                Ok(Signal::Ready(duration)) => break duration,
                Ok(Signal::Error(message)) => return PlaybackOutcome::Failed(message),
                // 未就绪前的结束事件没有意义
                Ok(Signal::Ended) => continue,
            }
        };

        self.state.send_replace(PlaybackState::Playing);
        if let Err(e) = self.output.play(ticket) {
            return PlaybackOutcome::Failed(e.to_string());
        }

        // 播放看门狗：片段时长 + 加载超时
        let watchdog = Instant::now() + duration.unwrap_or_default() + self.load_timeout;
        loop {
            match tokio::time::timeout_at(watchdog, next_signal(events, ticket)).await {
                Err(_) => {
                    tracing::warn!(ticket = %ticket, "Playback never reported completion");
                    self.output.stop();
                    return PlaybackOutcome::TimedOut;
                }
                Ok(Signal::Ended) => return PlaybackOutcome::Finished,
                Ok(Signal::Error(message)) => return PlaybackOutcome::Failed(message),
                Ok(Signal::Ready(_)) => continue,
            }
        }
    }
}

/// 读取属于 `ticket` 的下一个事件，忽略其他加载的迟到事件
async fn next_signal(events: &mut broadcast::Receiver<OutputEvent>, ticket: LoadTicket) -> Signal {
    loop {
        match events.recv().await {
            Ok(event) if event.ticket() != ticket => {
                tracing::trace!(expected = %ticket, got = %event.ticket(), "Ignoring stale output event");
            }
            Ok(OutputEvent::Ready { duration, .. }) => return Signal::Ready(duration),
            Ok(OutputEvent::Ended { .. }) => return Signal::Ended,
            Ok(OutputEvent::Error { message, .. }) => return Signal::Error(message),
            Err(broadcast::error::RecvError::Lagged(skipped)) => {
                tracing::warn!(skipped = skipped, "Output event listener lagged");
            }
            Err(broadcast::error::RecvError::Closed) => {
                return Signal::Error("Audio output closed".to_string());
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::ports::AudioFormat;
    use crate::application::testing::{Script, ScriptedOutput};

    fn controller(output: &Arc<ScriptedOutput>) -> PlaybackController {
        PlaybackController::new(output.clone())
    }

    #[tokio::test(start_paused = true)]
    async fn test_finished() {
        let output = Arc::new(ScriptedOutput::new());
        let controller = controller(&output);
        let handle = AudioHandle::new(AudioFormat::Mp3);

        let outcome = controller.play_and_wait(&handle).await;

        assert_eq!(outcome, PlaybackOutcome::Finished);
        assert_eq!(output.plays(), 1);
        assert_eq!(controller.listener_count(), 0);
        assert_eq!(controller.state(), PlaybackState::Idle);
    }

    #[tokio::test(start_paused = true)]
    async fn test_load_error_fails() {
        let output = Arc::new(ScriptedOutput::with_script(vec![Script::FailLoad(
            "decode error".to_string(),
        )]));
        let controller = controller(&output);

        let outcome = controller
            .play_and_wait(&AudioHandle::new(AudioFormat::Mp3))
            .await;

        assert_eq!(outcome, PlaybackOutcome::Failed("decode error".to_string()));
        assert_eq!(output.plays(), 0);
        assert_eq!(controller.listener_count(), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_load_timeout() {
        let output = Arc::new(ScriptedOutput::with_script(vec![Script::Hang]));
        let controller = controller(&output);

        let started = Instant::now();
        let outcome = controller
            .play_and_wait(&AudioHandle::new(AudioFormat::Mp3))
            .await;

        assert_eq!(outcome, PlaybackOutcome::TimedOut);
        assert!(started.elapsed() >= DEFAULT_LOAD_TIMEOUT);
        assert_eq!(output.stops(), 1);
        assert_eq!(controller.listener_count(), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_late_events_do_not_leak_into_next_call() {
        // 第一次加载在超时之后才就绪，其迟到的 Ready 落在第二次调用的等待期内，
        // 若被误认，会在第二个音源就绪前调用 play 而失败
        let output = Arc::new(ScriptedOutput::with_script(vec![
            Script::LateReady(DEFAULT_LOAD_TIMEOUT + Duration::from_millis(50)),
            Script::Finish {
                ready_after: Duration::from_millis(200),
                play_for: Duration::from_millis(100),
            },
        ]));
        let controller = controller(&output);

        let first = controller
            .play_and_wait(&AudioHandle::new(AudioFormat::Mp3))
            .await;
        assert_eq!(first, PlaybackOutcome::TimedOut);
        assert_eq!(controller.listener_count(), 0);

        let second = controller
            .play_and_wait(&AudioHandle::new(AudioFormat::Mp3))
            .await;
        assert_eq!(second, PlaybackOutcome::Finished);
        assert_eq!(output.plays(), 1);
        assert_eq!(controller.listener_count(), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_playback_watchdog() {
        let output = Arc::new(ScriptedOutput::with_script(vec![Script::NeverEnds]));
        let controller = controller(&output);

        let outcome = controller
            .play_and_wait(&AudioHandle::new(AudioFormat::Mp3))
            .await;

        assert_eq!(outcome, PlaybackOutcome::TimedOut);
        assert_eq!(output.plays(), 1);
        assert_eq!(controller.listener_count(), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_concurrent_calls_are_serialized() {
        let output = Arc::new(ScriptedOutput::new());
        let controller = Arc::new(controller(&output));

        let a = {
            let controller = controller.clone();
            tokio::spawn(async move {
                controller
                    .play_and_wait(&AudioHandle::new(AudioFormat::Mp3))
                    .await
            })
        };
        let b = {
            let controller = controller.clone();
            tokio::spawn(async move {
                controller
                    .play_and_wait(&AudioHandle::new(AudioFormat::Mp3))
                    .await
            })
        };

        assert!(a.await.unwrap().is_finished());
        assert!(b.await.unwrap().is_finished());
        assert_eq!(output.max_concurrent_loads(), 1);
    }
}

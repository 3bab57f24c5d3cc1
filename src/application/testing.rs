//! 测试替身：可编排的合成器与输出原语

use async_trait::async_trait;
use std::collections::{HashMap, HashSet, VecDeque};
use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::sync::{broadcast, Notify};
use uuid::Uuid;

use crate::application::ports::{
    AudioFormat, AudioHandle, AudioOutputPort, LoadTicket, OutputError, OutputEvent,
    SpeechSynthesizerPort, SynthesisError, SynthesisRequest, SynthesizedAudio,
};
use crate::domain::voice::{Voice, VoiceCatalog};

/// 按 id 从内置目录取音色（保持传入顺序）
pub(crate) fn catalog_voices(ids: &[&str]) -> Vec<Voice> {
    let catalog = VoiceCatalog::builtin();
    ids.iter()
        .map(|id| catalog.get(id).cloned().expect("voice in builtin catalog"))
        .collect()
}

/// 记录调用顺序的合成器
pub(crate) struct RecordingSynthesizer {
    calls: Mutex<Vec<String>>,
    failing: HashSet<String>,
    latency: Duration,
    pub entered: Notify,
}

impl RecordingSynthesizer {
    pub fn new() -> Self {
        Self {
            calls: Mutex::new(Vec::new()),
            failing: HashSet::new(),
            latency: Duration::from_millis(50),
            entered: Notify::new(),
        }
    }

    pub fn failing(mut self, ids: &[&str]) -> Self {
        self.failing = ids.iter().map(|s| s.to_string()).collect();
        self
    }

    pub fn with_latency(mut self, latency: Duration) -> Self {
        self.latency = latency;
        self
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl SpeechSynthesizerPort for RecordingSynthesizer {
    async fn generate(&self, request: SynthesisRequest) -> Result<SynthesizedAudio, SynthesisError> {
        let id = request.voice_id.to_string();
        self.calls.lock().unwrap().push(id.clone());
        self.entered.notify_one();

        tokio::time::sleep(self.latency).await;

        if self.failing.contains(&id) {
            return Err(SynthesisError::ServiceError(format!(
                "Azure API error (500 Internal Server Error): {} unavailable",
                id
            )));
        }
        Ok(SynthesizedAudio {
            data: vec![0u8; 32],
            format: AudioFormat::Mp3,
        })
    }
}

/// 单次加载的行为
#[derive(Debug, Clone)]
pub(crate) enum Script {
    /// 正常就绪并播放
    Finish {
        ready_after: Duration,
        play_for: Duration,
    },
    /// 加载失败
    FailLoad(String),
    /// 永不就绪
    Hang,
    /// 在给定延迟后才就绪（通常晚于超时）
    LateReady(Duration),
    /// 就绪但播放后不报告结束
    NeverEnds,
}

impl Script {
    pub fn finish() -> Self {
        Script::Finish {
            ready_after: Duration::from_millis(10),
            play_for: Duration::from_millis(100),
        }
    }
}

/// 按脚本发出事件的输出原语
pub(crate) struct ScriptedOutput {
    events: broadcast::Sender<OutputEvent>,
    script: Mutex<VecDeque<Script>>,
    /// ticket -> 播放时长（None 表示不会结束）
    pending: Mutex<HashMap<u64, Option<Duration>>>,
    /// 已发出 Ready 的 ticket
    ready: Arc<Mutex<HashSet<u64>>>,
    next_ticket: AtomicU64,
    loads: Mutex<Vec<Uuid>>,
    plays: AtomicUsize,
    stops: AtomicUsize,
    active: Arc<AtomicUsize>,
    max_active: AtomicUsize,
}

impl ScriptedOutput {
    pub fn new() -> Self {
        Self::with_script(Vec::new())
    }

    /// 脚本用完后按 `Script::finish()` 处理
    pub fn with_script(script: Vec<Script>) -> Self {
        let (events, _) = broadcast::channel(16);
        Self {
            events,
            script: Mutex::new(script.into()),
            pending: Mutex::new(HashMap::new()),
            ready: Arc::new(Mutex::new(HashSet::new())),
            next_ticket: AtomicU64::new(0),
            loads: Mutex::new(Vec::new()),
            plays: AtomicUsize::new(0),
            stops: AtomicUsize::new(0),
            active: Arc::new(AtomicUsize::new(0)),
            max_active: AtomicUsize::new(0),
        }
    }

    pub fn loads(&self) -> Vec<Uuid> {
        self.loads.lock().unwrap().clone()
    }

    pub fn plays(&self) -> usize {
        self.plays.load(Ordering::SeqCst)
    }

    pub fn stops(&self) -> usize {
        self.stops.load(Ordering::SeqCst)
    }

    pub fn max_concurrent_loads(&self) -> usize {
        self.max_active.load(Ordering::SeqCst)
    }

    fn emit_after(&self, delay: Duration, event: OutputEvent, settle: bool) {
        let events = self.events.clone();
        let active = self.active.clone();
        let ready = self.ready.clone();
        tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            if settle {
                decrement(&active);
            }
            if let OutputEvent::Ready { ticket, .. } = &event {
                ready.lock().unwrap().insert(ticket.0);
            }
            let _ = events.send(event);
        });
    }
}

fn decrement(counter: &AtomicUsize) {
    let _ = counter.fetch_update(Ordering::SeqCst, Ordering::SeqCst, |n| n.checked_sub(1));
}

impl AudioOutputPort for ScriptedOutput {
    fn subscribe(&self) -> broadcast::Receiver<OutputEvent> {
        self.events.subscribe()
    }

    fn listener_count(&self) -> usize {
        self.events.receiver_count()
    }

    fn load(&self, handle: &AudioHandle) -> Result<LoadTicket, OutputError> {
        let ticket = LoadTicket(self.next_ticket.fetch_add(1, Ordering::SeqCst) + 1);
        self.loads.lock().unwrap().push(handle.id());

        let now_active = self.active.fetch_add(1, Ordering::SeqCst) + 1;
        self.max_active.fetch_max(now_active, Ordering::SeqCst);

        let script = self
            .script
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(Script::finish);

        match script {
            Script::Finish {
                ready_after,
                play_for,
            } => {
                self.pending.lock().unwrap().insert(ticket.0, Some(play_for));
                self.emit_after(
                    ready_after,
                    OutputEvent::Ready {
                        ticket,
                        duration: Some(play_for),
                    },
                    false,
                );
            }
            Script::FailLoad(message) => {
                self.emit_after(
                    Duration::from_millis(1),
                    OutputEvent::Error { ticket, message },
                    true,
                );
            }
            Script::Hang => {}
            Script::LateReady(after) => {
                let play_for = Duration::from_millis(100);
                self.pending.lock().unwrap().insert(ticket.0, Some(play_for));
                self.emit_after(
                    after,
                    OutputEvent::Ready {
                        ticket,
                        duration: Some(play_for),
                    },
                    false,
                );
            }
            Script::NeverEnds => {
                self.pending.lock().unwrap().insert(ticket.0, None);
                self.emit_after(
                    Duration::from_millis(10),
                    OutputEvent::Ready {
                        ticket,
                        duration: Some(Duration::from_millis(100)),
                    },
                    false,
                );
            }
        }

        Ok(ticket)
    }

    fn play(&self, ticket: LoadTicket) -> Result<(), OutputError> {
        self.plays.fetch_add(1, Ordering::SeqCst);
        if !self.ready.lock().unwrap().contains(&ticket.0) {
            return Err(OutputError::DeviceError(format!("source {} not ready", ticket)));
        }
        match self.pending.lock().unwrap().remove(&ticket.0) {
            Some(Some(play_for)) => {
                self.emit_after(play_for, OutputEvent::Ended { ticket }, true);
                Ok(())
            }
            Some(None) => Ok(()),
            None => Err(OutputError::StaleTicket(ticket.0)),
        }
    }

    fn stop(&self) {
        self.stops.fetch_add(1, Ordering::SeqCst);
        decrement(&self.active);
    }
}

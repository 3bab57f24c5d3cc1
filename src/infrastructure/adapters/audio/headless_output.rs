//! Headless Audio Output - 无声卡环境下的播放原语
//!
//! 使用 symphonia 探测音频时长作为"加载"，按时长计时作为"播放"。
//! 所有结果都以带 ticket 的事件异步发出。

use std::collections::HashMap;
use std::io::Cursor;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;
use symphonia::core::formats::FormatOptions;
use symphonia::core::io::MediaSourceStream;
use symphonia::core::meta::MetadataOptions;
use symphonia::core::probe::Hint;
use tokio::sync::broadcast;
use tokio::task::JoinHandle;

use crate::application::ports::{
    AudioFormat, AudioHandle, AudioOutputPort, AudioStorePort, LoadTicket, OutputError,
    OutputEvent,
};

/// 解码音频并计算时长
pub fn probe_duration(data: &[u8], format: AudioFormat) -> Result<Duration, String> {
    let cursor = Cursor::new(data.to_vec());
    let mss = MediaSourceStream::new(Box::new(cursor), Default::default());

    let mut hint = Hint::new();
    hint.with_extension(format.extension());

    let probed = symphonia::default::get_probe()
        .format(
            &hint,
            mss,
            &FormatOptions::default(),
            &MetadataOptions::default(),
        )
        .map_err(|e| format!("Probe failed: {}", e))?;

    let mut reader = probed.format;
    let track = reader
        .default_track()
        .ok_or_else(|| "No audio track found".to_string())?;
    let track_id = track.id;
    let sample_rate = track
        .codec_params
        .sample_rate
        .ok_or_else(|| "Unknown sample rate".to_string())?;
    let n_frames = track.codec_params.n_frames;

    // 容器头里带帧数时直接换算，否则逐包累加
    let frames = match n_frames {
        Some(n) => n,
        None => {
            let mut total = 0u64;
            loop {
                match reader.next_packet() {
                    Ok(packet) if packet.track_id() == track_id => total += packet.dur,
                    Ok(_) => continue,
                    Err(symphonia::core::errors::Error::IoError(e))
                        if e.kind() == std::io::ErrorKind::UnexpectedEof =>
                    {
                        break;
                    }
                    Err(e) => return Err(format!("Packet read error: {}", e)),
                }
            }
            total
        }
    };

    if frames == 0 {
        return Err("Audio contains no samples".to_string());
    }
    Ok(Duration::from_micros(frames * 1_000_000 / sample_rate as u64))
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Headless Audio Output
pub struct HeadlessAudioOutput {
    store: Arc<dyn AudioStorePort>,
    events: broadcast::Sender<OutputEvent>,
    next_ticket: AtomicU64,
    /// 已就绪、等待播放的 ticket -> 时长
    loaded: Arc<Mutex<HashMap<u64, Duration>>>,
    /// 正在探测或播放的任务
    tasks: Mutex<Vec<JoinHandle<()>>>,
}

impl HeadlessAudioOutput {
    pub fn new(store: Arc<dyn AudioStorePort>) -> Self {
        let (events, _) = broadcast::channel(64);
        Self {
            store,
            events,
            next_ticket: AtomicU64::new(0),
            loaded: Arc::new(Mutex::new(HashMap::new())),
            tasks: Mutex::new(Vec::new()),
        }
    }

    /// 中止所有任务并丢弃已就绪的音源，返回中止的任务数
    fn abort_all(&self) -> usize {
        let tasks: Vec<_> = lock(&self.tasks).drain(..).collect();
        let pending = tasks.iter().filter(|t| !t.is_finished()).count();
        for task in &tasks {
            task.abort();
        }
        lock(&self.loaded).clear();
        pending
    }

    fn track(&self, task: JoinHandle<()>) {
        let mut tasks = lock(&self.tasks);
        tasks.retain(|t| !t.is_finished());
        tasks.push(task);
    }
}

impl AudioOutputPort for HeadlessAudioOutput {
    fn subscribe(&self) -> broadcast::Receiver<OutputEvent> {
        self.events.subscribe()
    }

    fn listener_count(&self) -> usize {
        self.events.receiver_count()
    }

    fn load(&self, handle: &AudioHandle) -> Result<LoadTicket, OutputError> {
        let audio = self
            .store
            .get(handle.id())
            .map_err(|e| OutputError::SourceUnavailable(e.to_string()))?;
        let ticket = LoadTicket(self.next_ticket.fetch_add(1, Ordering::SeqCst) + 1);

        // 新音源取代未完成的加载与播放
        let superseded = self.abort_all();
        if superseded > 0 {
            tracing::debug!(ticket = %ticket, superseded, "Pending audio work superseded");
        }

        let events = self.events.clone();
        let loaded = self.loaded.clone();
        let task = tokio::spawn(async move {
            let probe = tokio::task::spawn_blocking(move || {
                probe_duration(&audio.data, audio.format)
            })
            .await;

            let event = match probe {
                Ok(Ok(duration)) => {
                    lock(&loaded).insert(ticket.0, duration);
                    OutputEvent::Ready {
                        ticket,
                        duration: Some(duration),
                    }
                }
                Ok(Err(message)) => OutputEvent::Error { ticket, message },
                Err(e) => OutputEvent::Error {
                    ticket,
                    message: format!("Probe task failed: {}", e),
                },
            };
            tracing::debug!(ticket = %ticket, event = ?event, "Audio load settled");
            let _ = events.send(event);
        });
        self.track(task);

        tracing::debug!(ticket = %ticket, handle_id = %handle.id(), "Audio load started");
        Ok(ticket)
    }

    fn play(&self, ticket: LoadTicket) -> Result<(), OutputError> {
        let duration = lock(&self.loaded)
            .remove(&ticket.0)
            .ok_or(OutputError::StaleTicket(ticket.0))?;

        let events = self.events.clone();
        let task = tokio::spawn(async move {
            tokio::time::sleep(duration).await;
            let _ = events.send(OutputEvent::Ended { ticket });
        });
        self.track(task);

        tracing::debug!(ticket = %ticket, duration_ms = duration.as_millis() as u64, "Playback started");
        Ok(())
    }

    fn stop(&self) {
        let aborted = self.abort_all();
        tracing::debug!(aborted, "Audio output stopped");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::ports::SynthesizedAudio;
    use crate::infrastructure::adapters::tts::silent_wav;
    use crate::infrastructure::memory::InMemoryAudioStore;

    fn setup(data: Vec<u8>, format: AudioFormat) -> (HeadlessAudioOutput, AudioHandle, Arc<InMemoryAudioStore>) {
        let store = Arc::new(InMemoryAudioStore::new());
        let handle = store.register(SynthesizedAudio { data, format });
        (HeadlessAudioOutput::new(store.clone()), handle, store)
    }

    #[test]
    fn test_probe_wav_duration() {
        let duration = probe_duration(&silent_wav(250), AudioFormat::Wav).unwrap();
        assert_eq!(duration, Duration::from_millis(250));
    }

    #[test]
    fn test_probe_rejects_garbage() {
        assert!(probe_duration(&[0u8; 64], AudioFormat::Mp3).is_err());
    }

    #[tokio::test]
    async fn test_load_then_play_to_end() {
        let (output, handle, _store) = setup(silent_wav(50), AudioFormat::Wav);
        let mut events = output.subscribe();

        let ticket = output.load(&handle).unwrap();
        assert_eq!(
            events.recv().await.unwrap(),
            OutputEvent::Ready {
                ticket,
                duration: Some(Duration::from_millis(50))
            }
        );

        output.play(ticket).unwrap();
        assert_eq!(events.recv().await.unwrap(), OutputEvent::Ended { ticket });
    }

    #[tokio::test]
    async fn test_tickets_are_monotonic() {
        let (output, handle, _store) = setup(silent_wav(10), AudioFormat::Wav);

        let first = output.load(&handle).unwrap();
        let second = output.load(&handle).unwrap();
        assert!(second > first);
    }

    #[tokio::test]
    async fn test_new_load_supersedes_pending_load() {
        let (output, handle, _store) = setup(silent_wav(20), AudioFormat::Wav);
        let mut events = output.subscribe();

        let first = output.load(&handle).unwrap();
        let second = output.load(&handle).unwrap();

        match events.recv().await.unwrap() {
            OutputEvent::Ready { ticket, .. } => assert_eq!(ticket, second),
            other => panic!("unexpected event: {:?}", other),
        }
        assert!(matches!(
            output.play(first),
            Err(OutputError::StaleTicket(_))
        ));
        output.play(second).unwrap();
        assert_eq!(events.recv().await.unwrap(), OutputEvent::Ended { ticket: second });
    }

    #[tokio::test]
    async fn test_undecodable_audio_reports_error() {
        let (output, handle, _store) = setup(vec![1u8; 128], AudioFormat::Mp3);
        let mut events = output.subscribe();

        let ticket = output.load(&handle).unwrap();
        match events.recv().await.unwrap() {
            OutputEvent::Error { ticket: t, .. } => assert_eq!(t, ticket),
            other => panic!("unexpected event: {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_unregistered_handle_is_unavailable() {
        let (output, _handle, _store) = setup(silent_wav(10), AudioFormat::Wav);
        let unknown = AudioHandle::new(AudioFormat::Wav);

        assert!(matches!(
            output.load(&unknown),
            Err(OutputError::SourceUnavailable(_))
        ));
    }

    #[tokio::test]
    async fn test_play_unknown_ticket_is_stale() {
        let (output, _handle, _store) = setup(silent_wav(10), AudioFormat::Wav);
        assert!(matches!(
            output.play(LoadTicket(42)),
            Err(OutputError::StaleTicket(42))
        ));
    }

    #[tokio::test]
    async fn test_stop_suppresses_ended() {
        let (output, handle, _store) = setup(silent_wav(200), AudioFormat::Wav);
        let mut events = output.subscribe();

        let ticket = output.load(&handle).unwrap();
        events.recv().await.unwrap();
        output.play(ticket).unwrap();
        output.stop();

        let next = tokio::time::timeout(Duration::from_millis(400), events.recv()).await;
        assert!(next.is_err());
    }
}

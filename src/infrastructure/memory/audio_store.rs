//! In-Memory Audio Store Implementation

use dashmap::DashMap;
use std::sync::Arc;
use uuid::Uuid;

use crate::application::ports::{
    AudioHandle, AudioStoreError, AudioStorePort, StoredAudio, SynthesizedAudio,
};

/// 内存音频存储
pub struct InMemoryAudioStore {
    entries: DashMap<Uuid, StoredAudio>,
}

impl InMemoryAudioStore {
    pub fn new() -> Self {
        Self {
            entries: DashMap::new(),
        }
    }

    pub fn arc(self) -> Arc<Self> {
        Arc::new(self)
    }

    /// 当前占用的字节数
    pub fn total_bytes(&self) -> usize {
        self.entries.iter().map(|e| e.value().data.len()).sum()
    }
}

impl Default for InMemoryAudioStore {
    fn default() -> Self {
        Self::new()
    }
}

impl AudioStorePort for InMemoryAudioStore {
    fn register(&self, audio: SynthesizedAudio) -> AudioHandle {
        let handle = AudioHandle::new(audio.format);
        let size = audio.data.len();
        self.entries.insert(
            handle.id(),
            StoredAudio {
                data: Arc::from(audio.data),
                format: audio.format,
            },
        );
        tracing::debug!(handle_id = %handle.id(), size = size, "Audio registered");
        handle
    }

    fn get(&self, handle_id: Uuid) -> Result<StoredAudio, AudioStoreError> {
        self.entries
            .get(&handle_id)
            .map(|entry| entry.value().clone())
            .ok_or(AudioStoreError::NotFound(handle_id))
    }

    fn release(&self, handle: AudioHandle) -> bool {
        let released = self.entries.remove(&handle.id()).is_some();
        tracing::debug!(handle_id = %handle.id(), released = released, "Audio released");
        released
    }

    fn live_count(&self) -> usize {
        self.entries.len()
    }
}

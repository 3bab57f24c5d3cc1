//! Generated Audio Map - 一次运行内生成音频的所有权
//!
//! 运行结束或取消时统一释放，`Drop` 兜底处理中途被中止的任务

use std::collections::HashMap;
use std::sync::Arc;

use crate::application::ports::{AudioHandle, AudioStorePort};
use crate::domain::voice::VoiceId;

pub struct GeneratedAudioMap {
    store: Arc<dyn AudioStorePort>,
    handles: HashMap<VoiceId, AudioHandle>,
}

impl GeneratedAudioMap {
    pub fn new(store: Arc<dyn AudioStorePort>) -> Self {
        Self {
            store,
            handles: HashMap::new(),
        }
    }

    /// 插入句柄，替换的旧句柄立即释放
    pub fn insert(&mut self, voice_id: VoiceId, handle: AudioHandle) {
        if let Some(previous) = self.handles.insert(voice_id, handle) {
            self.store.release(previous);
        }
    }

    pub fn get(&self, voice_id: &VoiceId) -> Option<&AudioHandle> {
        self.handles.get(voice_id)
    }

    pub fn len(&self) -> usize {
        self.handles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.handles.is_empty()
    }

    /// 释放全部句柄，返回释放数量
    pub fn release_all(&mut self) -> usize {
        let mut released = 0;
        for (_, handle) in self.handles.drain() {
            if self.store.release(handle) {
                released += 1;
            }
        }
        released
    }
}

impl Drop for GeneratedAudioMap {
    fn drop(&mut self) {
        if !self.handles.is_empty() {
            let released = self.release_all();
            tracing::debug!(released = released, "Released leftover audio handles on drop");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::ports::{AudioFormat, SynthesizedAudio};
    use crate::infrastructure::memory::InMemoryAudioStore;

    fn audio() -> SynthesizedAudio {
        SynthesizedAudio {
            data: vec![1, 2, 3],
            format: AudioFormat::Mp3,
        }
    }

    fn voice(id: &str) -> VoiceId {
        VoiceId::new(id).unwrap()
    }

    #[test]
    fn test_replace_releases_previous() {
        let store = Arc::new(InMemoryAudioStore::new());
        let mut map = GeneratedAudioMap::new(store.clone());

        map.insert(voice("alloy"), store.register(audio()));
        map.insert(voice("alloy"), store.register(audio()));

        assert_eq!(map.len(), 1);
        assert_eq!(store.live_count(), 1);
    }

    #[test]
    fn test_release_all() {
        let store = Arc::new(InMemoryAudioStore::new());
        let mut map = GeneratedAudioMap::new(store.clone());
        map.insert(voice("alloy"), store.register(audio()));
        map.insert(voice("echo"), store.register(audio()));

        assert_eq!(map.release_all(), 2);
        assert!(map.is_empty());
        assert_eq!(store.live_count(), 0);
    }

    #[test]
    fn test_drop_releases_leftovers() {
        let store = Arc::new(InMemoryAudioStore::new());
        {
            let mut map = GeneratedAudioMap::new(store.clone());
            map.insert(voice("nova"), store.register(audio()));
            assert_eq!(store.live_count(), 1);
        }
        assert_eq!(store.live_count(), 0);
    }
}

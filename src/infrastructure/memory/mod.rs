//! Memory Layer - In-Memory State Management
//!
//! 实现 AudioStore，保存运行期间生成的音频

mod audio_store;

pub use audio_store::InMemoryAudioStore;

//! Audio Output Adapter - 播放原语实现

mod headless_output;

pub use headless_output::{probe_duration, HeadlessAudioOutput};

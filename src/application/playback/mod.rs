//! 应用层 - 播放控制

mod controller;

pub use controller::{PlaybackController, PlaybackOutcome, PlaybackState, DEFAULT_LOAD_TIMEOUT};

//! Voice Context - 音色限界上下文
//!
//! 职责:
//! - 内置音色目录
//! - 试听子集（All / Top / HD）过滤

mod aggregate;
mod catalog;
mod errors;
mod value_objects;

pub use aggregate::Voice;
pub use catalog::{VoiceCatalog, DEFAULT_SAMPLE_TEXT, PLAY_ALL_PRESET_TEXT};
pub use errors::VoiceError;
pub use value_objects::{PlayMode, VoiceId, VoiceType};

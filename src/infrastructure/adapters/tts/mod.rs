//! TTS Adapter - 语音合成客户端实现

mod azure_tts_client;
mod fake_tts_client;

pub use azure_tts_client::{format_error_message, AzureTtsClient, AzureTtsClientConfig};
pub use fake_tts_client::{silent_wav, FakeTtsClient, FakeTtsClientConfig};

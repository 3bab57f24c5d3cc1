//! Application Ports - 出站端口定义
//!
//! 定义应用层与基础设施层的抽象接口

mod audio_output;
mod audio_store;
mod speech_synthesizer;

pub use audio_output::{AudioOutputPort, LoadTicket, OutputError, OutputEvent};
pub use audio_store::{AudioFormat, AudioHandle, AudioStoreError, AudioStorePort, StoredAudio};
pub use speech_synthesizer::{
    SpeechSynthesizerPort, SynthesisError, SynthesisRequest, SynthesizedAudio, SPEED_RANGE,
};

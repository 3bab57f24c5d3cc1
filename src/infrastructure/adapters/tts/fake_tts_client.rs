//! Fake TTS Client - 用于本地开发和测试的合成器
//!
//! 不调用 Azure，按配置返回一段静音 WAV

use async_trait::async_trait;
use std::collections::HashSet;
use std::time::Duration;

use crate::application::ports::{
    AudioFormat, SpeechSynthesizerPort, SynthesisError, SynthesisRequest, SynthesizedAudio,
};

const SAMPLE_RATE: u32 = 16000;

/// Fake TTS Client 配置
#[derive(Debug, Clone)]
pub struct FakeTtsClientConfig {
    /// 模拟合成延迟
    pub latency: Duration,
    /// 生成音频的时长（毫秒，按 1.0 语速）
    pub duration_ms: u64,
    /// 始终失败的音色
    pub failing_voices: HashSet<String>,
}

impl Default for FakeTtsClientConfig {
    fn default() -> Self {
        Self {
            latency: Duration::from_millis(200),
            duration_ms: 1000,
            failing_voices: HashSet::new(),
        }
    }
}

/// Fake TTS Client
pub struct FakeTtsClient {
    config: FakeTtsClientConfig,
}

impl FakeTtsClient {
    pub fn new(config: FakeTtsClientConfig) -> Self {
        tracing::info!(
            latency_ms = config.latency.as_millis() as u64,
            duration_ms = config.duration_ms,
            failing = config.failing_voices.len(),
            "FakeTtsClient initialized"
        );
        Self { config }
    }

    pub fn with_defaults() -> Self {
        Self::new(FakeTtsClientConfig::default())
    }
}

/// 生成静音 WAV：16kHz，单声道，16 位
pub fn silent_wav(duration_ms: u64) -> Vec<u8> {
    let num_channels: u16 = 1;
    let bits_per_sample: u16 = 16;
    let num_samples = (SAMPLE_RATE as u64 * duration_ms / 1000) as usize;

    let data_size = num_samples * (bits_per_sample as usize / 8) * num_channels as usize;
    let file_size = 36 + data_size;

    let mut wav = Vec::with_capacity(44 + data_size);

    // RIFF header
    wav.extend_from_slice(b"RIFF");
    wav.extend_from_slice(&(file_size as u32).to_le_bytes());
    wav.extend_from_slice(b"WAVE");

    // fmt chunk
    wav.extend_from_slice(b"fmt ");
    wav.extend_from_slice(&16u32.to_le_bytes());
    wav.extend_from_slice(&1u16.to_le_bytes()); // PCM
    wav.extend_from_slice(&num_channels.to_le_bytes());
    wav.extend_from_slice(&SAMPLE_RATE.to_le_bytes());
    let byte_rate = SAMPLE_RATE * num_channels as u32 * (bits_per_sample / 8) as u32;
    wav.extend_from_slice(&byte_rate.to_le_bytes());
    let block_align = num_channels * (bits_per_sample / 8);
    wav.extend_from_slice(&block_align.to_le_bytes());
    wav.extend_from_slice(&bits_per_sample.to_le_bytes());

    // data chunk
    wav.extend_from_slice(b"data");
    wav.extend_from_slice(&(data_size as u32).to_le_bytes());
    wav.resize(44 + data_size, 0);

    wav
}

#[async_trait]
impl SpeechSynthesizerPort for FakeTtsClient {
    async fn generate(&self, request: SynthesisRequest) -> Result<SynthesizedAudio, SynthesisError> {
        tracing::debug!(
            voice_id = %request.voice_id,
            text_len = request.text.len(),
            "FakeTtsClient: returning silent audio"
        );

        tokio::time::sleep(self.config.latency).await;

        if self.config.failing_voices.contains(request.voice_id.as_str()) {
            return Err(SynthesisError::ServiceError(format!(
                "Azure API error (404 Not Found): voice {} is not available",
                request.voice_id
            )));
        }

        let duration_ms = (self.config.duration_ms as f32 / request.speed.max(0.25)) as u64;
        Ok(SynthesizedAudio {
            data: silent_wav(duration_ms),
            format: AudioFormat::Wav,
        })
    }
}

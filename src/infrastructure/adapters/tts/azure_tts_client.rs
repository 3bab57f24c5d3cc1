//! Azure TTS Client - 调用 Azure OpenAI 语音合成接口
//!
//! 实现 SpeechSynthesizerPort trait
//!
//! Azure OpenAI API:
//! POST {endpoint}/openai/deployments/{deployment}/audio/speech?api-version={version}
//! Headers: api-key
//! Request: {"model": "...", "input": "...", "voice": "...", "speed": 1.0, "response_format": "mp3"}
//! Response: audio/mpeg binary

use async_trait::async_trait;
use reqwest::Client;
use serde::Serialize;
use std::time::Duration;

use crate::application::ports::{
    AudioFormat, SpeechSynthesizerPort, SynthesisError, SynthesisRequest, SynthesizedAudio,
};
use crate::domain::AzureCredentials;

/// 错误响应正文的最大保留长度
const MAX_ERROR_TEXT_LENGTH: usize = 200;

/// 语音合成请求体 (JSON)
#[derive(Debug, Serialize)]
struct SpeechHttpRequest<'a> {
    model: &'a str,
    input: &'a str,
    voice: &'a str,
    speed: f32,
    response_format: &'static str,
}

/// Azure TTS 客户端配置
#[derive(Debug, Clone)]
pub struct AzureTtsClientConfig {
    pub credentials: AzureCredentials,
    /// 请求超时时间（秒）
    pub timeout_secs: u64,
}

impl AzureTtsClientConfig {
    pub fn new(credentials: AzureCredentials) -> Self {
        Self {
            credentials,
            timeout_secs: 60,
        }
    }

    pub fn with_timeout(mut self, secs: u64) -> Self {
        self.timeout_secs = secs;
        self
    }
}

/// Azure TTS 客户端
pub struct AzureTtsClient {
    client: Client,
    config: AzureTtsClientConfig,
}

impl AzureTtsClient {
    pub fn new(config: AzureTtsClientConfig) -> Result<Self, SynthesisError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| SynthesisError::Other(e.to_string()))?;

        Ok(Self { client, config })
    }

    /// 获取合成 URL（去掉 endpoint 末尾的 `/`）
    fn speech_url(&self) -> String {
        let credentials = &self.config.credentials;
        let endpoint = credentials
            .endpoint
            .strip_suffix('/')
            .unwrap_or(&credentials.endpoint);
        format!(
            "{}/openai/deployments/{}/audio/speech?api-version={}",
            endpoint, credentials.deployment, credentials.api_version
        )
    }
}

/// 将非 2xx 响应格式化为用户可见的错误消息
///
/// JSON 正文取 `error.message` 或 `message`，非 JSON 正文按词边界截断到 200 字符
pub fn format_error_message(status: u16, reason: &str, body: &str) -> String {
    let prefix = format!("Azure API error ({} {})", status, reason);

    match serde_json::from_str::<serde_json::Value>(body) {
        Ok(json) => {
            let message = json
                .pointer("/error/message")
                .and_then(|v| v.as_str())
                .or_else(|| json.get("message").and_then(|v| v.as_str()));
            match message {
                Some(message) => format!("{}: {}", prefix, message),
                None => prefix,
            }
        }
        Err(_) if body.is_empty() => prefix,
        Err(_) => format!("{}: {}", prefix, truncate_at_word(body, MAX_ERROR_TEXT_LENGTH)),
    }
}

fn truncate_at_word(text: &str, max_chars: usize) -> String {
    if text.chars().count() <= max_chars {
        return text.to_string();
    }
    let truncated: String = text.chars().take(max_chars).collect();
    match truncated.rfind(' ') {
        Some(last_space) if last_space > 0 => format!("{}...", &truncated[..last_space]),
        _ => format!("{}...", truncated),
    }
}

fn map_request_error(e: reqwest::Error) -> SynthesisError {
    if e.is_timeout() {
        SynthesisError::Timeout
    } else if e.is_connect() {
        SynthesisError::NetworkError("Unable to connect to Azure API".to_string())
    } else {
        SynthesisError::Other(e.to_string())
    }
}

#[async_trait]
impl SpeechSynthesizerPort for AzureTtsClient {
    async fn generate(&self, request: SynthesisRequest) -> Result<SynthesizedAudio, SynthesisError> {
        let credentials = &self.config.credentials;
        let url = self.speech_url();
        let body = SpeechHttpRequest {
            model: &credentials.deployment,
            input: &request.text,
            voice: request.voice_id.as_str(),
            speed: request.speed,
            response_format: "mp3",
        };

        tracing::debug!(
            url = %url,
            voice_id = %request.voice_id,
            text_len = request.text.len(),
            speed = request.speed,
            "Sending speech request"
        );

        let response = self
            .client
            .post(&url)
            .header("api-key", &credentials.api_key)
            .json(&body)
            .send()
            .await
            .map_err(map_request_error)?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_default();
            let message = format_error_message(
                status.as_u16(),
                status.canonical_reason().unwrap_or_default(),
                &error_text,
            );
            tracing::warn!(voice_id = %request.voice_id, status = status.as_u16(), "Azure API error");
            return Err(SynthesisError::ServiceError(message));
        }

        let data = response
            .bytes()
            .await
            .map_err(|e| SynthesisError::InvalidResponse(format!("Failed to read audio: {}", e)))?
            .to_vec();

        tracing::info!(
            voice_id = %request.voice_id,
            audio_size = data.len(),
            "Speech synthesized"
        );

        Ok(SynthesizedAudio {
            data,
            format: AudioFormat::Mp3,
        })
    }

    async fn health_check(&self) -> bool {
        self.config.credentials.is_valid()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn client(endpoint: &str) -> AzureTtsClient {
        let credentials = AzureCredentials::new(
            endpoint,
            "0123456789abcdef",
            "gpt-4o-mini-tts",
            "2025-03-01-preview",
        );
        AzureTtsClient::new(AzureTtsClientConfig::new(credentials)).unwrap()
    }

    #[test]
    fn test_speech_url() {
        let expected = "https://res.openai.azure.com/openai/deployments/gpt-4o-mini-tts/audio/speech?api-version=2025-03-01-preview";
        assert_eq!(client("https://res.openai.azure.com").speech_url(), expected);
        assert_eq!(client("https://res.openai.azure.com/").speech_url(), expected);
    }

    #[test]
    fn test_error_message_from_nested_json() {
        let body = r#"{"error":{"code":"DeploymentNotFound","message":"The API deployment does not exist."}}"#;
        assert_eq!(
            format_error_message(404, "Not Found", body),
            "Azure API error (404 Not Found): The API deployment does not exist."
        );
    }

    #[test]
    fn test_error_message_from_flat_json() {
        assert_eq!(
            format_error_message(401, "Unauthorized", r#"{"message":"Access denied"}"#),
            "Azure API error (401 Unauthorized): Access denied"
        );
    }

    #[test]
    fn test_error_message_json_without_message() {
        assert_eq!(
            format_error_message(500, "Internal Server Error", r#"{"code":42}"#),
            "Azure API error (500 Internal Server Error)"
        );
    }

    #[test]
    fn test_error_message_plain_text() {
        assert_eq!(
            format_error_message(502, "Bad Gateway", "upstream unavailable"),
            "Azure API error (502 Bad Gateway): upstream unavailable"
        );
        assert_eq!(
            format_error_message(502, "Bad Gateway", ""),
            "Azure API error (502 Bad Gateway)"
        );
    }

    #[test]
    fn test_long_body_truncated_at_word_boundary() {
        let body = "word ".repeat(60);
        let message = format_error_message(503, "Service Unavailable", &body);

        let suffix = message
            .strip_prefix("Azure API error (503 Service Unavailable): ")
            .unwrap();
        assert!(suffix.ends_with("word..."));
        assert!(suffix.chars().count() <= MAX_ERROR_TEXT_LENGTH + 3);
    }

    #[test]
    fn test_long_body_without_spaces() {
        let body = "x".repeat(250);
        let message = format_error_message(500, "Internal Server Error", &body);
        assert!(message.ends_with(&format!("{}...", "x".repeat(200))));
    }

    #[tokio::test]
    async fn test_health_check_reflects_credentials() {
        assert!(client("https://res.openai.azure.com").health_check().await);
        assert!(!client("http://insecure").health_check().await);
    }
}

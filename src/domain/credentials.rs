//! Azure 凭据 - 值对象与字段校验

use serde::{Deserialize, Serialize};

/// API Key 最短长度（短于此视为无效）
const MIN_API_KEY_LEN: usize = 10;

/// Azure OpenAI 凭据
#[derive(Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AzureCredentials {
    /// 资源地址，如 `https://your-resource.openai.azure.com`
    #[serde(default)]
    pub endpoint: String,
    #[serde(default)]
    pub api_key: String,
    /// 部署名，如 `gpt-4o-mini-tts`
    #[serde(default)]
    pub deployment: String,
    /// 如 `2024-02-15-preview`
    #[serde(default)]
    pub api_version: String,
}

impl AzureCredentials {
    pub fn new(
        endpoint: impl Into<String>,
        api_key: impl Into<String>,
        deployment: impl Into<String>,
        api_version: impl Into<String>,
    ) -> Self {
        Self {
            endpoint: endpoint.into(),
            api_key: api_key.into(),
            deployment: deployment.into(),
            api_version: api_version.into(),
        }
    }

    /// 校验所有字段，返回全部错误信息（为空表示有效）
    pub fn validate(&self) -> Vec<String> {
        let mut errors = Vec::new();

        if self.endpoint.is_empty() {
            errors.push("Endpoint is required".to_string());
        } else if !self.endpoint.starts_with("https://") {
            errors.push("Endpoint must start with https://".to_string());
        }

        if self.api_key.is_empty() {
            errors.push("API Key is required".to_string());
        } else if self.api_key.len() < MIN_API_KEY_LEN {
            errors.push("API Key appears to be invalid".to_string());
        }

        if self.deployment.is_empty() {
            errors.push("Deployment name is required".to_string());
        }

        if self.api_version.is_empty() {
            errors.push("API Version is required".to_string());
        }

        errors
    }

    pub fn is_valid(&self) -> bool {
        self.validate().is_empty()
    }
}

// api_key 不进日志
impl std::fmt::Debug for AzureCredentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AzureCredentials")
            .field("endpoint", &self.endpoint)
            .field("api_key", &"***")
            .field("deployment", &self.deployment)
            .field("api_version", &self.api_version)
            .finish()
    }
}

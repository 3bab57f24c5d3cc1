//! Configuration Loader
//!
//! 实现多源配置加载与合并逻辑
//!
//! 优先级（从高到低）：
//! 1. 环境变量
//! 2. 配置文件（config.toml）
//! 3. 默认值

use config::{Config, ConfigError as ConfigCrateError, Environment, File};
use std::path::Path;
use thiserror::Error;

use super::types::{AppConfig, TtsProvider};
use crate::application::ports::SPEED_RANGE;

/// 配置加载错误
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to load configuration: {0}")]
    LoadError(String),

    #[error("Failed to parse configuration: {0}")]
    ParseError(String),

    #[error("Configuration validation failed: {0}")]
    ValidationError(String),
}

impl From<ConfigCrateError> for ConfigError {
    fn from(err: ConfigCrateError) -> Self {
        ConfigError::LoadError(err.to_string())
    }
}

/// 配置文件搜索路径
const CONFIG_FILE_NAMES: &[&str] = &["config", "config.local"];

/// 加载应用配置
///
/// 按优先级从高到低合并配置：
/// 1. 环境变量（前缀 `VSAMPLER_`，层级分隔符 `__`）
/// 2. 配置文件（config.toml 或 config.local.toml）
/// 3. 默认值
///
/// # 环境变量示例
/// - `VSAMPLER_SERVER__PORT=8080`
/// - `VSAMPLER_AZURE__ENDPOINT=https://your-resource.openai.azure.com`
/// - `VSAMPLER_AZURE__API_KEY=...`
/// - `VSAMPLER_TTS__PROVIDER=fake`
pub fn load_config() -> Result<AppConfig, ConfigError> {
    load_config_from_path(None)
}

/// 从指定路径加载配置
///
/// # 参数
/// - `config_path` - 可选的配置文件路径，如果为 None 则使用默认搜索路径
pub fn load_config_from_path(config_path: Option<&Path>) -> Result<AppConfig, ConfigError> {
    let mut builder = Config::builder();

    // 1. 默认值（最低优先级）
    builder = builder
        .set_default("server.host", "0.0.0.0")?
        .set_default("server.port", 5060)?
        .set_default("tts.provider", "azure")?
        .set_default("tts.timeout_secs", 60)?
        .set_default("tts.fake.latency_ms", 200)?
        .set_default("tts.fake.duration_ms", 1500)?
        .set_default("azure.api_version", "2025-03-01-preview")?
        .set_default("azure.deployment", "gpt-4o-mini-tts")?
        .set_default("batch.settle_delay_ms", 500)?
        .set_default("batch.load_timeout_ms", 10_000)?
        .set_default("batch.speed", 1.0)?
        .set_default("batch.default_mode", "all")?
        .set_default("log.level", "info")?
        .set_default("log.json", false)?;

    // 2. 配置文件（如果存在）
    if let Some(path) = config_path {
        builder = builder.add_source(File::from(path).required(true));
    } else {
        for name in CONFIG_FILE_NAMES {
            builder = builder.add_source(File::with_name(name).required(false));
        }
    }

    // 3. 环境变量（最高优先级）
    // 例如: VSAMPLER_AZURE__API_KEY=...
    // 注意: 环境变量名会被转换为小写
    builder = builder.add_source(
        Environment::with_prefix("VSAMPLER")
            .prefix_separator("_")
            .separator("__")
            .try_parsing(true),
    );

    let config = builder.build()?;

    let app_config: AppConfig = config.try_deserialize().map_err(|e| {
        ConfigError::ParseError(format!("Failed to deserialize config: {}", e))
    })?;

    validate_config(&app_config)?;

    Ok(app_config)
}

/// 验证配置有效性
pub fn validate_config(config: &AppConfig) -> Result<(), ConfigError> {
    if config.server.port == 0 {
        return Err(ConfigError::ValidationError(
            "Server port cannot be 0".to_string(),
        ));
    }

    if config.tts.timeout_secs == 0 {
        return Err(ConfigError::ValidationError(
            "TTS timeout cannot be 0".to_string(),
        ));
    }

    if config.batch.load_timeout_ms == 0 {
        return Err(ConfigError::ValidationError(
            "Load timeout cannot be 0".to_string(),
        ));
    }

    if !SPEED_RANGE.contains(&config.batch.speed) {
        return Err(ConfigError::ValidationError(format!(
            "Speed must be between {} and {}",
            SPEED_RANGE.start(),
            SPEED_RANGE.end()
        )));
    }

    // 只有使用 Azure 时才要求凭据
    if config.tts.provider == TtsProvider::Azure {
        let errors = config.azure.validate();
        if !errors.is_empty() {
            return Err(ConfigError::ValidationError(errors.join("; ")));
        }
    }

    Ok(())
}

/// 打印配置信息（用于启动时日志）
pub fn print_config(config: &AppConfig) {
    tracing::info!("=== Application Configuration ===");
    tracing::info!("Server: {}", config.server.addr());
    tracing::info!("TTS Provider: {}", config.tts.provider.as_str());
    tracing::info!("TTS Timeout: {}s", config.tts.timeout_secs);
    if config.tts.provider == TtsProvider::Azure {
        tracing::info!("Azure Endpoint: {}", config.azure.endpoint);
        tracing::info!("Azure Deployment: {}", config.azure.deployment);
        tracing::info!("Azure API Version: {}", config.azure.api_version);
    }
    tracing::info!("Settle Delay: {}ms", config.batch.settle_delay_ms);
    tracing::info!("Load Timeout: {}ms", config.batch.load_timeout_ms);
    tracing::info!("Speed: {}", config.batch.speed);
    tracing::info!("Default Mode: {}", config.batch.default_mode);
    tracing::info!("Log Level: {}", config.log.level);
    tracing::info!("=================================");
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::voice::PlayMode;
    use crate::domain::AzureCredentials;
    use std::io::Write;

    fn valid_config() -> AppConfig {
        let mut config = AppConfig::default();
        config.azure = AzureCredentials::new(
            "https://res.openai.azure.com",
            "0123456789abcdef",
            "gpt-4o-mini-tts",
            "2025-03-01-preview",
        );
        config
    }

    fn write_config(content: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
        file.write_all(content.as_bytes()).unwrap();
        file
    }

    #[test]
    fn test_validation_passes_for_valid_config() {
        assert!(validate_config(&valid_config()).is_ok());
    }

    #[test]
    fn test_validation_error_for_zero_port() {
        let mut config = valid_config();
        config.server.port = 0;
        assert!(validate_config(&config).is_err());
    }

    #[test]
    fn test_validation_error_for_zero_load_timeout() {
        let mut config = valid_config();
        config.batch.load_timeout_ms = 0;
        assert!(validate_config(&config).is_err());
    }

    #[test]
    fn test_validation_error_for_speed() {
        let mut config = valid_config();
        config.batch.speed = 4.5;
        assert!(validate_config(&config).is_err());
        config.batch.speed = 0.25;
        assert!(validate_config(&config).is_ok());
    }

    #[test]
    fn test_validation_reports_credential_messages() {
        let config = AppConfig::default();
        let err = validate_config(&config).unwrap_err().to_string();
        assert!(err.contains("Endpoint is required"));
        assert!(err.contains("API Key is required"));
    }

    #[test]
    fn test_fake_provider_skips_credentials() {
        let mut config = AppConfig::default();
        config.tts.provider = TtsProvider::Fake;
        assert!(validate_config(&config).is_ok());
    }

    #[test]
    fn test_load_from_file() {
        let file = write_config(
            r#"
[server]
port = 8088

[tts]
provider = "fake"

[tts.fake]
latency_ms = 10
failing_voices = ["verse"]

[batch]
settle_delay_ms = 250
default_mode = "hd"
"#,
        );

        let config = load_config_from_path(Some(file.path())).unwrap();

        assert_eq!(config.server.port, 8088);
        assert_eq!(config.tts.provider, TtsProvider::Fake);
        assert_eq!(config.tts.fake.latency_ms, 10);
        assert_eq!(config.tts.fake.duration_ms, 1500);
        assert_eq!(config.tts.fake.failing_voices, vec!["verse"]);
        assert_eq!(config.batch.settle_delay_ms, 250);
        assert_eq!(config.batch.load_timeout_ms, 10_000);
        assert_eq!(config.batch.default_mode, PlayMode::Hd);
        assert_eq!(config.azure.deployment, "gpt-4o-mini-tts");
    }

    #[test]
    fn test_load_from_file_validates() {
        let file = write_config(
            r#"
[tts]
provider = "azure"

[azure]
endpoint = "http://insecure.example.com"
api_key = "0123456789abcdef"
"#,
        );

        let err = load_config_from_path(Some(file.path())).unwrap_err();
        assert!(err.to_string().contains("Endpoint must start with https://"));
    }
}

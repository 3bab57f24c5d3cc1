//! Voice Sampler - Azure OpenAI TTS 音色试听服务

use std::sync::Arc;

use voice_sampler::application::{BatchOrchestrator, PlaybackController, SpeechSynthesizerPort};
use voice_sampler::config::{load_config, print_config, AppConfig, TtsProvider};
use voice_sampler::domain::voice::VoiceCatalog;
use voice_sampler::infrastructure::adapters::{
    AzureTtsClient, AzureTtsClientConfig, FakeTtsClient, FakeTtsClientConfig, HeadlessAudioOutput,
};
use voice_sampler::infrastructure::events::EventPublisher;
use voice_sampler::infrastructure::http::{AppState, HttpServer};
use voice_sampler::infrastructure::memory::InMemoryAudioStore;

fn init_tracing(config: &AppConfig) {
    let log_filter = format!(
        "{},voice_sampler={},tower_http=debug",
        config.log.level, config.log.level
    );
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&log_filter));

    if config.log.json {
        tracing_subscriber::fmt().json().with_env_filter(filter).init();
    } else {
        tracing_subscriber::fmt().with_env_filter(filter).init();
    }
}

fn build_synthesizer(config: &AppConfig) -> anyhow::Result<Arc<dyn SpeechSynthesizerPort>> {
    let synthesizer: Arc<dyn SpeechSynthesizerPort> = match config.tts.provider {
        TtsProvider::Azure => {
            let client_config = AzureTtsClientConfig::new(config.azure.clone())
                .with_timeout(config.tts.timeout_secs);
            Arc::new(AzureTtsClient::new(client_config)?)
        }
        TtsProvider::Fake => Arc::new(FakeTtsClient::new(FakeTtsClientConfig {
            latency: std::time::Duration::from_millis(config.tts.fake.latency_ms),
            duration_ms: config.tts.fake.duration_ms,
            failing_voices: config.tts.fake.failing_set(),
        })),
    };
    Ok(synthesizer)
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // 加载配置（优先级：环境变量 > 配置文件 > 默认值）
    let config = load_config().map_err(|e| anyhow::anyhow!("Failed to load config: {}", e))?;

    init_tracing(&config);

    tracing::info!("Voice Sampler - Azure OpenAI TTS 音色试听");
    print_config(&config);

    let catalog = Arc::new(VoiceCatalog::builtin());
    tracing::info!(voices = catalog.len(), "Voice catalog loaded");

    let synthesizer = build_synthesizer(&config)?;

    // 音频句柄与播放通道
    let audio_store = InMemoryAudioStore::new().arc();
    let output = Arc::new(HeadlessAudioOutput::new(audio_store.clone()));
    let playback = Arc::new(PlaybackController::with_timeout(
        output,
        config.batch.load_timeout(),
    ));

    let event_publisher = EventPublisher::new().arc();

    let orchestrator = Arc::new(BatchOrchestrator::new(
        synthesizer.clone(),
        audio_store.clone(),
        playback.clone(),
        event_publisher.clone(),
        config.batch.to_batch_config(),
    ));

    let state = Arc::new(AppState::new(
        catalog,
        synthesizer,
        audio_store,
        playback,
        orchestrator.clone(),
        event_publisher,
        config.batch.speed,
        config.batch.default_mode,
    ));

    let server = HttpServer::new(config.server.clone(), state);

    // 启动服务器（带优雅关闭）
    server
        .run_with_shutdown(async move {
            if let Err(e) = tokio::signal::ctrl_c().await {
                tracing::error!(error = %e, "Failed to listen for ctrl-c");
                return;
            }
            tracing::info!("Received shutdown signal");
            if orchestrator.cancel() {
                tracing::info!("Cancelled running batch");
            }
        })
        .await?;

    tracing::info!("Server shutdown complete");

    Ok(())
}

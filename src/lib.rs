//! Voice Sampler - Azure OpenAI TTS 音色试听服务
//!
//! 架构设计: DDD + CQRS + Hexagonal Architecture
//!
//! 领域层 (domain/):
//! - Voice Context: 音色目录、试听模式
//! - Azure 凭据
//!
//! 应用层 (application/):
//! - Ports: 端口定义（SpeechSynthesizer, AudioStore, AudioOutput）
//! - Playback: 单通道播放控制
//! - Batch: 批量试听编排（先合成、后播放、可取消）
//! - Commands / Queries: CQRS 处理器
//!
//! 基础设施层 (infrastructure/):
//! - HTTP: RESTful API + WebSocket
//! - Adapters: Azure / Fake TTS Client, Headless Audio Output
//! - Memory: 音频句柄存储
//! - Events: 批量进度事件发布

pub mod application;
pub mod config;
pub mod domain;
pub mod infrastructure;

pub use config::{load_config, AppConfig};

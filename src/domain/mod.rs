//! Domain Layer - 领域层
//!
//! - Voice Context: 音色目录与试听子集
//! - Credentials: Azure 凭据校验

pub mod voice;

mod credentials;

pub use credentials::AzureCredentials;

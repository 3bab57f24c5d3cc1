//! Batch Commands - 批量试听的开始与停止

use crate::domain::voice::PlayMode;

/// 批量试听开关命令
///
/// 空闲时开始一次运行，运行中则请求取消
#[derive(Debug, Clone, Default)]
pub struct PlayAllCommand {
    pub mode: PlayMode,
    /// 缺省时使用预设文本
    pub text: Option<String>,
}

/// 批量试听开关响应
#[derive(Debug, Clone, PartialEq)]
pub enum PlayAllResponse {
    Started { total: usize, mode: PlayMode },
    Stopped,
}

/// 停止批量试听命令
#[derive(Debug, Clone, Default)]
pub struct StopAllCommand;

/// 停止批量试听响应
#[derive(Debug, Clone, PartialEq)]
pub struct StopAllResponse {
    /// 是否确实有运行被取消
    pub stopped: bool,
}

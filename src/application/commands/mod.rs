//! 应用层 - 命令（写操作）
//!
//! CQRS 命令侧：处理所有写操作

mod batch_commands;
mod speak_commands;

pub mod handlers;

pub use batch_commands::*;
pub use speak_commands::*;

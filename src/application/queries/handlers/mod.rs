//! Query Handlers 实现
//!
//! 所有 QueryHandler 的具体实现

mod batch_handlers;
mod voice_handlers;

pub use batch_handlers::*;
pub use voice_handlers::*;

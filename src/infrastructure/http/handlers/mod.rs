//! HTTP Handlers

mod batch;
mod ping;
mod speak;
mod voice;
mod websocket;

pub use batch::*;
pub use ping::*;
pub use speak::*;
pub use voice::*;
pub use websocket::*;

//! Event Publisher - 进度与结果推送

mod publisher;

pub use publisher::{BatchEvent, EventPublisher};

pub mod client;
pub mod models;
pub mod response;
pub mod service;
pub mod streaming;

pub use client::HttpCompletionClient;
pub use models::RequestBody;
pub use service::CompletionService;
pub use streaming::{SseEvent, SseLineBuffer};

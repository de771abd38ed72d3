mod chat;
mod message;

pub use chat::{Chat, DEFAULT_CHAT_TITLE};
pub use message::{ChatMessage, Message, Role};

use serde::{Deserialize, Serialize};

/// Placeholder title given to every new chat until it is auto-titled or renamed.
pub const DEFAULT_CHAT_TITLE: &str = "New Chat";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Chat {
    pub chat_id: String,
    pub owner: String,
    pub title: String,
    pub summary: Option<String>,
}


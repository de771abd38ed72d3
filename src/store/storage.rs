use crate::error::Result;
use crate::models::{Chat, ChatMessage, Role};

/// Trait for chat storage backends
pub trait ChatStore: Send + Sync {
    /// Create a chat titled "New Chat" for `owner` and return its id
    fn create_chat(&self, owner: &str) -> Result<String>;

    /// All chats owned by `owner`, oldest first
    fn list_chats(&self, owner: &str) -> Result<Vec<Chat>>;

    fn get_chat(&self, chat_id: &str) -> Result<Option<Chat>>;

    /// Set a chat's title. Empty titles are rejected; duplicate checks are up
    /// to the caller (see [`ChatStore::is_duplicate_title`]).
    fn rename_chat(&self, chat_id: &str, title: &str) -> Result<()>;

    /// Delete a chat together with its messages
    fn delete_chat(&self, chat_id: &str) -> Result<()>;

    fn append_message(&self, chat_id: &str, role: Role, content: &str) -> Result<()>;

    /// Messages of a chat in sequence order
    fn list_messages(&self, chat_id: &str) -> Result<Vec<ChatMessage>>;

    fn update_summary(&self, chat_id: &str, summary: &str) -> Result<()>;

    fn chat_title(&self, chat_id: &str) -> Result<String>;

    /// Whether another chat of `owner` already uses `title`
    fn is_duplicate_title(&self, owner: &str, title: &str, exclude_chat_id: Option<&str>)
        -> Result<bool>;
}

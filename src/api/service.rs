use crate::error::Result;
use crate::models::Message;
use async_trait::async_trait;
use tokio::sync::mpsc;

/// A remote chat-completion capability.
#[async_trait]
pub trait CompletionService: Send + Sync {
    /// Stream a completion for `messages`, sending each text increment to
    /// `tokens` as it arrives. Returns once the stream is finished.
    async fn stream(&self, messages: &[Message], tokens: mpsc::Sender<String>) -> Result<()>;

    /// Request a complete (non-streamed) completion.
    async fn complete(&self, messages: &[Message]) -> Result<String>;
}

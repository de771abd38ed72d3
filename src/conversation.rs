//! Replays a chat's stored log into a completion request and collects the
//! streamed reply.

use crate::api::CompletionService;
use crate::error::Result;
use crate::models::{ChatMessage, Message};
use tokio::sync::mpsc;

const TOKEN_CHANNEL_CAPACITY: usize = 64;

/// Ordered context for one request: system prompt, stored history, new input.
pub fn build_context(system_prompt: Option<&str>, history: &[ChatMessage], input: &str) -> Vec<Message> {
    let mut messages = Vec::with_capacity(history.len() + 2);
    if let Some(prompt) = system_prompt {
        messages.push(Message::system(prompt));
    }
    messages.extend(history.iter().map(ChatMessage::to_message));
    messages.push(Message::user(input));
    messages
}

pub struct ConversationAdapter<'a, C: CompletionService + ?Sized> {
    service: &'a C,
    system_prompt: Option<String>,
}

impl<'a, C: CompletionService + ?Sized> ConversationAdapter<'a, C> {
    pub fn new(service: &'a C) -> Self {
        Self {
            service,
            system_prompt: None,
        }
    }

    pub fn with_system_prompt(mut self, prompt: impl Into<String>) -> Self {
        self.system_prompt = Some(prompt.into());
        self
    }

    /// Send `input` with `history` as context and stream the reply.
    ///
    /// `on_token` sees every increment together with the text accumulated so
    /// far. The full reply is returned only if the stream finished cleanly;
    /// dropping the returned future drops the channel and the partial text.
    pub async fn respond<F>(&self, history: &[ChatMessage], input: &str, mut on_token: F) -> Result<String>
    where
        F: FnMut(&str, &str),
    {
        let context = build_context(self.system_prompt.as_deref(), history, input);
        let (tx, mut rx) = mpsc::channel::<String>(TOKEN_CHANNEL_CAPACITY);

        let producer = self.service.stream(&context, tx);
        let consumer = async {
            let mut buffer = String::new();
            while let Some(token) = rx.recv().await {
                buffer.push_str(&token);
                on_token(&token, &buffer);
            }
            buffer
        };

        let (produced, buffer) = tokio::join!(producer, consumer);
        produced?;
        Ok(buffer)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Role;

    fn stored(id: i64, role: Role, content: &str) -> ChatMessage {
        ChatMessage {
            id,
            chat_id: "c".to_string(),
            role,
            content: content.to_string(),
        }
    }

    #[test]
    fn context_keeps_history_order_and_appends_input() {
        let history = vec![
            stored(1, Role::User, "hi"),
            stored(2, Role::Assistant, "hello"),
        ];

        let context = build_context(Some("be nice"), &history, "how are you?");

        assert_eq!(
            context,
            vec![
                Message::system("be nice"),
                Message::user("hi"),
                Message::assistant("hello"),
                Message::user("how are you?"),
            ]
        );
    }

    #[test]
    fn context_without_system_prompt() {
        let context = build_context(None, &[], "first");
        assert_eq!(context, vec![Message::user("first")]);
    }
}

use crate::api::CompletionService;
use crate::error::Result;
use crate::models::{ChatMessage, Message};

/// A new summary is produced every time the log grows to a multiple of this
pub const SUMMARY_INTERVAL: usize = 4;
/// Number of trailing messages fed to the summarizer
pub const SUMMARY_WINDOW: usize = 10;

pub fn summary_due(message_count: usize) -> bool {
    message_count > 0 && message_count % SUMMARY_INTERVAL == 0
}

pub fn summary_prompt(messages: &[ChatMessage]) -> String {
    let start = messages.len().saturating_sub(SUMMARY_WINDOW);
    let text = messages[start..]
        .iter()
        .map(|m| format!("{}: {}", m.role, m.content))
        .collect::<Vec<_>>()
        .join("\n");
    format!("Summarize this conversation in 3 bullet points:\n\n{}", text)
}

/// Ask the completion service for a fresh summary of the recent window
pub async fn generate_summary<C: CompletionService + ?Sized>(
    service: &C,
    messages: &[ChatMessage],
) -> Result<String> {
    let prompt = summary_prompt(messages);
    service.complete(&[Message::user(prompt)]).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Role;

    #[test]
    fn due_only_on_multiples_of_four() {
        let due: Vec<usize> = (1..=8).filter(|&n| summary_due(n)).collect();
        assert_eq!(due, vec![4, 8]);
        assert!(!summary_due(0));
    }

    #[test]
    fn prompt_uses_last_ten_messages() {
        let messages: Vec<ChatMessage> = (0..12)
            .map(|i| ChatMessage {
                id: i,
                chat_id: "c".to_string(),
                role: if i % 2 == 0 { Role::User } else { Role::Assistant },
                content: format!("m{}", i),
            })
            .collect();

        let prompt = summary_prompt(&messages);

        assert!(prompt.starts_with("Summarize this conversation in 3 bullet points:\n\nuser: m2\n"));
        assert!(prompt.ends_with("assistant: m11"));
        assert!(!prompt.contains("m1\n"));
        assert!(!prompt.contains(": m0"));
    }
}

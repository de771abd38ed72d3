use crate::models::{ChatMessage, Role};

pub const NO_MEMORY_EXPLANATION: &str = "This response did not rely on earlier memory.";

/// Explain which earlier user message the latest reply drew on.
///
/// Quotes the second-to-last user message; with fewer than two user messages
/// there is nothing earlier to point at.
pub fn explain_memory(messages: &[ChatMessage]) -> String {
    let past: Vec<&str> = messages
        .iter()
        .filter(|m| m.role == Role::User)
        .map(|m| m.content.as_str())
        .collect();

    if past.len() < 2 {
        return NO_MEMORY_EXPLANATION.to_string();
    }

    format!(
        "I remembered this because earlier you said:\n\n> *{}*\n\nThat information influenced this response.",
        past[past.len() - 2]
    )
}

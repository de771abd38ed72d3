use crate::error::Result;
use crate::models::DEFAULT_CHAT_TITLE;
use crate::store::ChatStore;
use log::debug;

pub const MAX_TITLE_CHARS: usize = 40;

/// Title proposed from a chat's first user message
pub fn candidate_title(first_message: &str) -> String {
    let title: String = first_message.trim().chars().take(MAX_TITLE_CHARS).collect();
    title.trim_end().to_string()
}

/// Give a still-untitled chat a title taken from `first_message`.
///
/// Does nothing unless the chat still carries the default title. A candidate
/// already used by another of the owner's chats gets " (2)" appended, then
/// " (3)" and so on until it is free. Returns the title that was assigned.
pub fn auto_title<S: ChatStore + ?Sized>(
    store: &S,
    owner: &str,
    chat_id: &str,
    first_message: &str,
) -> Result<Option<String>> {
    if store.chat_title(chat_id)? != DEFAULT_CHAT_TITLE {
        return Ok(None);
    }

    let candidate = candidate_title(first_message);
    if candidate.trim().is_empty() {
        return Ok(None);
    }

    let mut proposed = candidate.clone();
    let mut suffix = 2;
    while store.is_duplicate_title(owner, &proposed, None)? {
        proposed = format!("{} ({})", candidate, suffix);
        suffix += 1;
    }

    debug!("auto-titled chat {} as {:?}", chat_id, proposed);
    store.rename_chat(chat_id, &proposed)?;
    Ok(Some(proposed))
}

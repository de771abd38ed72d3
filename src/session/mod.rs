//! Per-user session state and the rules keeping it consistent with the store.

use crate::error::{ChatError, Result};
use crate::models::Chat;
use crate::store::ChatStore;
use log::{debug, info};

/// Everything the UI remembers between interactions for one logged-in user.
#[derive(Debug, Clone)]
pub struct SessionContext {
    user: String,
    current_chat_id: Option<String>,
    pub last_explanation: Option<String>,
}

impl SessionContext {
    pub fn login(username: &str) -> Result<Self> {
        let user = username.trim();
        if user.is_empty() {
            return Err(ChatError::EmptyUsername);
        }
        info!("user {} logged in", user);
        Ok(Self {
            user: user.to_string(),
            current_chat_id: None,
            last_explanation: None,
        })
    }

    pub fn user(&self) -> &str {
        &self.user
    }

    /// The selected chat id. Only trustworthy right after
    /// [`SessionManager::resolve`]; the chat may have been deleted since.
    pub fn current_chat_id(&self) -> Option<&str> {
        self.current_chat_id.as_deref()
    }

    fn select(&mut self, chat_id: String) {
        if self.current_chat_id.as_deref() != Some(chat_id.as_str()) {
            self.last_explanation = None;
        }
        self.current_chat_id = Some(chat_id);
    }
}

pub struct SessionManager<'a, S: ChatStore + ?Sized> {
    store: &'a S,
}

impl<'a, S: ChatStore + ?Sized> SessionManager<'a, S> {
    pub fn new(store: &'a S) -> Self {
        Self { store }
    }

    /// Load the user's chats and repair the current selection against them.
    ///
    /// Falls back to the first chat when the selected one is gone, and creates
    /// a fresh chat when the user has none left.
    pub fn resolve(&self, ctx: &mut SessionContext) -> Result<Vec<Chat>> {
        let mut chats = self.store.list_chats(&ctx.user)?;

        if chats.is_empty() {
            let chat_id = self.store.create_chat(&ctx.user)?;
            debug!("{} had no chats, created {}", ctx.user, chat_id);
            chats = self.store.list_chats(&ctx.user)?;
            ctx.select(chat_id);
            return Ok(chats);
        }

        let selected_is_live = ctx
            .current_chat_id
            .as_deref()
            .map(|id| chats.iter().any(|c| c.chat_id == id))
            .unwrap_or(false);

        if !selected_is_live {
            if let Some(previous) = ctx.current_chat_id.as_deref() {
                debug!("chat {} disappeared, falling back to first chat", previous);
            }
            ctx.select(chats[0].chat_id.clone());
        }

        Ok(chats)
    }

    /// Resolve and return the id of the chat the next message goes to.
    pub fn current_chat(&self, ctx: &mut SessionContext) -> Result<String> {
        self.resolve(ctx)?;
        ctx.current_chat_id
            .clone()
            .ok_or_else(|| ChatError::Other("no chat selected".to_string()))
    }

    pub fn new_chat(&self, ctx: &mut SessionContext) -> Result<String> {
        let chat_id = self.store.create_chat(&ctx.user)?;
        ctx.select(chat_id.clone());
        Ok(chat_id)
    }

    pub fn open_chat(&self, ctx: &mut SessionContext, chat_id: &str) -> Result<()> {
        match self.store.get_chat(chat_id)? {
            Some(chat) if chat.owner == ctx.user => {
                ctx.select(chat.chat_id);
                Ok(())
            }
            _ => Err(ChatError::ChatNotFound(chat_id.to_string())),
        }
    }

    /// Rename one of the user's chats after checking the title is non-empty
    /// and not used by any of their other chats.
    pub fn rename_chat(&self, ctx: &SessionContext, chat_id: &str, title: &str) -> Result<()> {
        let clean_title = title.trim();
        if clean_title.is_empty() {
            return Err(ChatError::EmptyTitle);
        }
        if self
            .store
            .is_duplicate_title(&ctx.user, clean_title, Some(chat_id))?
        {
            return Err(ChatError::DuplicateTitle(clean_title.to_string()));
        }
        self.store.rename_chat(chat_id, clean_title)
    }

    /// Delete a chat. The selection is repaired lazily by the next `resolve`.
    pub fn delete_chat(&self, ctx: &SessionContext, chat_id: &str) -> Result<()> {
        info!("{} deleted chat {}", ctx.user, chat_id);
        self.store.delete_chat(chat_id)
    }
}

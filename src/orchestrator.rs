use crate::api::CompletionService;
use crate::conversation::ConversationAdapter;
use crate::error::{ChatError, Result};
use crate::features::{auto_title, explain_memory, generate_summary, summary_due};
use crate::models::Role;
use crate::session::{SessionContext, SessionManager};
use crate::store::ChatStore;
use log::{debug, info};

pub struct TurnOutcome {
    pub chat_id: String,
    pub reply: String,
    pub explanation: String,
    /// Title assigned by auto-titling during this turn
    pub new_title: Option<String>,
    /// Summary regenerated during this turn
    pub summary: Option<String>,
}

pub struct OrchestratorContext<'a, S: ChatStore + ?Sized, C: CompletionService + ?Sized> {
    pub store: &'a S,
    pub service: &'a C,
    pub system_prompt: Option<String>,
}

impl<'a, S: ChatStore + ?Sized, C: CompletionService + ?Sized> OrchestratorContext<'a, S, C> {
    /// Handle one user message against the session's current chat.
    ///
    /// The user message is committed before the remote call, so a failed or
    /// cancelled reply leaves it in the log without an answer.
    pub async fn run_turn<F>(&self, ctx: &mut SessionContext, input: &str, on_token: F) -> Result<TurnOutcome>
    where
        F: FnMut(&str, &str),
    {
        if input.trim().is_empty() {
            return Err(ChatError::EmptyMessage);
        }

        let chat_id = SessionManager::new(self.store).current_chat(ctx)?;
        let history = self.store.list_messages(&chat_id)?;

        self.store.append_message(&chat_id, Role::User, input)?;
        let new_title = auto_title(self.store, ctx.user(), &chat_id, input)?;

        let mut adapter = ConversationAdapter::new(self.service);
        if let Some(prompt) = &self.system_prompt {
            adapter = adapter.with_system_prompt(prompt.clone());
        }
        let reply = adapter.respond(&history, input, on_token).await?;
        self.store.append_message(&chat_id, Role::Assistant, &reply)?;
        debug!("chat {}: stored reply of {} bytes", chat_id, reply.len());

        let all_messages = self.store.list_messages(&chat_id)?;
        let explanation = explain_memory(&all_messages);
        ctx.last_explanation = Some(explanation.clone());

        let summary = if summary_due(all_messages.len()) {
            let summary = generate_summary(self.service, &all_messages).await?;
            self.store.update_summary(&chat_id, &summary)?;
            info!("chat {}: summary refreshed at {} messages", chat_id, all_messages.len());
            Some(summary)
        } else {
            None
        };

        Ok(TurnOutcome {
            chat_id,
            reply,
            explanation,
            new_title,
            summary,
        })
    }
}

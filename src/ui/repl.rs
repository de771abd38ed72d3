use crate::api::CompletionService;
use crate::error::{ChatError, Result};
use crate::models::Chat;
use crate::orchestrator::OrchestratorContext;
use crate::session::{SessionContext, SessionManager};
use crate::store::ChatStore;
use crate::ui::commands::Command;
use crate::ui::output::*;
use crate::ui::render::MarkdownStream;
use colored::*;
use log::debug;
use std::io::{self, Write};
use tokio::io::{AsyncBufReadExt, BufReader, Lines, Stdin};

enum Flow {
    Continue,
    Logout,
    Quit,
}

/// Interactive terminal front end.
pub struct Repl<'a, S: ChatStore + ?Sized, C: CompletionService + ?Sized> {
    turns: OrchestratorContext<'a, S, C>,
    input: Lines<BufReader<Stdin>>,
}

impl<'a, S: ChatStore + ?Sized, C: CompletionService + ?Sized> Repl<'a, S, C> {
    pub fn new(turns: OrchestratorContext<'a, S, C>) -> Self {
        Self {
            turns,
            input: BufReader::new(tokio::io::stdin()).lines(),
        }
    }

    fn sessions(&self) -> SessionManager<'a, S> {
        SessionManager::new(self.turns.store)
    }

    /// Run until the user quits. `user` skips the first login prompt.
    pub async fn run(&mut self, mut user: Option<String>) -> Result<()> {
        loop {
            let mut ctx = match user.take() {
                Some(name) => match SessionContext::login(&name) {
                    Ok(ctx) => ctx,
                    Err(e) => {
                        display_warning(&e.to_string());
                        continue;
                    }
                },
                None => match self.login().await? {
                    Some(ctx) => ctx,
                    None => return Ok(()),
                },
            };

            match self.session(&mut ctx).await? {
                Flow::Logout => continue,
                Flow::Quit | Flow::Continue => return Ok(()),
            }
        }
    }

    async fn login(&mut self) -> Result<Option<SessionContext>> {
        println!("{}", "🔐 Login".bold());
        loop {
            let Some(line) = self.prompt("Enter username: ").await? else {
                return Ok(None);
            };
            match SessionContext::login(&line) {
                Ok(ctx) => return Ok(Some(ctx)),
                Err(e) => display_warning(&e.to_string()),
            }
        }
    }

    async fn session(&mut self, ctx: &mut SessionContext) -> Result<Flow> {
        let chats = self.sessions().resolve(ctx)?;
        display_sidebar(ctx.user(), &chats, ctx.current_chat_id());
        self.show_current_chat(ctx)?;
        println!("{}", "Type a message, or /help for commands.".dimmed());

        loop {
            let Some(line) = self.prompt("> ").await? else {
                return Ok(Flow::Quit);
            };

            let flow = match self.handle(ctx, Command::parse(&line)).await {
                Ok(flow) => flow,
                Err(e) if e.is_validation() => {
                    display_warning(&e.to_string());
                    Flow::Continue
                }
                Err(ChatError::Cancelled) => {
                    println!();
                    display_warning("Response cancelled.");
                    Flow::Continue
                }
                // The turn is over; the next command starts fresh
                Err(e) => {
                    println!();
                    display_error(&e);
                    Flow::Continue
                }
            };

            match flow {
                Flow::Continue => {}
                other => return Ok(other),
            }
        }
    }

    async fn handle(&mut self, ctx: &mut SessionContext, command: Command) -> Result<Flow> {
        let sessions = self.sessions();
        match command {
            Command::Empty => {}
            Command::Message(text) => self.send(ctx, &text).await?,
            Command::ListChats => {
                let chats = sessions.resolve(ctx)?;
                display_sidebar(ctx.user(), &chats, ctx.current_chat_id());
            }
            Command::NewChat => {
                sessions.new_chat(ctx)?;
                self.show_current_chat(ctx)?;
            }
            Command::Open(index) => {
                let chat = self.chat_at(ctx, index)?;
                sessions.open_chat(ctx, &chat.chat_id)?;
                self.show_current_chat(ctx)?;
            }
            Command::Rename(index, title) => {
                let chat = self.chat_at(ctx, index)?;
                sessions.rename_chat(ctx, &chat.chat_id, &title)?;
                let chats = sessions.resolve(ctx)?;
                display_sidebar(ctx.user(), &chats, ctx.current_chat_id());
            }
            Command::Delete(index) => {
                let chat = self.chat_at(ctx, index)?;
                sessions.delete_chat(ctx, &chat.chat_id)?;
                println!("{}", format!("Deleted \"{}\"", chat.title).dimmed());
                let chats = sessions.resolve(ctx)?;
                display_sidebar(ctx.user(), &chats, ctx.current_chat_id());
            }
            Command::History => {
                let chat_id = sessions.current_chat(ctx)?;
                display_history(&self.turns.store.list_messages(&chat_id)?);
            }
            Command::Why => display_explanation(ctx.last_explanation.as_deref()),
            Command::Summary => {
                let chat_id = sessions.current_chat(ctx)?;
                let summary = self.turns.store.get_chat(&chat_id)?.and_then(|c| c.summary);
                display_summary(summary.as_deref());
            }
            Command::Help => display_help(),
            Command::Invalid(message) => display_warning(&message),
            Command::Logout => {
                debug!("{} logged out", ctx.user());
                return Ok(Flow::Logout);
            }
            Command::Quit => return Ok(Flow::Quit),
        }
        Ok(Flow::Continue)
    }

    /// Send one message and stream the reply. Ctrl-C abandons the reply.
    async fn send(&mut self, ctx: &mut SessionContext, text: &str) -> Result<()> {
        let mut markdown = MarkdownStream::new();
        let mut stdout = io::stdout();
        display_role(crate::models::Role::Assistant);

        let turn = self.turns.run_turn(ctx, text, |token, _buffer| {
            let formatted = markdown.push(token);
            if !formatted.is_empty() {
                print!("{}", formatted);
                let _ = stdout.flush();
            }
        });
        let outcome = tokio::select! {
            result = turn => result,
            _ = tokio::signal::ctrl_c() => Err(ChatError::Cancelled),
        }?;

        let remaining = markdown.finish();
        if !remaining.is_empty() {
            print!("{}", remaining.trim_end());
        }
        println!();

        if let Some(title) = &outcome.new_title {
            display_chat_header(title);
        }
        if outcome.summary.is_some() {
            println!("{}", "Chat summary updated (/summary).".dimmed());
        }
        println!("{}", "🧠 /why: why did I remember this?".dimmed());
        Ok(())
    }

    fn chat_at(&self, ctx: &mut SessionContext, index: usize) -> Result<Chat> {
        let chats = self.sessions().resolve(ctx)?;
        chats
            .into_iter()
            .nth(index - 1)
            .ok_or_else(|| ChatError::Other(format!("No chat number {}", index)))
    }

    fn show_current_chat(&self, ctx: &mut SessionContext) -> Result<()> {
        let chat_id = self.sessions().current_chat(ctx)?;
        let store = self.turns.store;
        display_chat_header(&store.chat_title(&chat_id)?);
        display_history(&store.list_messages(&chat_id)?);
        Ok(())
    }

    /// Read one line. `None` on end of input or Ctrl-C.
    async fn prompt(&mut self, label: &str) -> Result<Option<String>> {
        print!("{}", label.green());
        io::stdout().flush()?;
        tokio::select! {
            line = self.input.next_line() => Ok(line?),
            _ = tokio::signal::ctrl_c() => {
                println!();
                Ok(None)
            }
        }
    }
}

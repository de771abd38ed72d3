use crate::error::ChatError;
use crate::models::{Chat, ChatMessage, Role};
use crate::ui::render::MarkdownStream;
use colored::*;

/// Chat list with 1-based indexes, the selected chat marked
pub fn display_sidebar(user: &str, chats: &[Chat], current_chat_id: Option<&str>) {
    println!("{}", format!("👤 {}", user).bold());
    for (index, chat) in chats.iter().enumerate() {
        let line = format!("{:>3}. {}", index + 1, chat.title);
        if Some(chat.chat_id.as_str()) == current_chat_id {
            println!("{} {}", "▶".green(), line.green().bold());
        } else {
            println!("  {}", line);
        }
    }
}

pub fn display_chat_header(title: &str) {
    println!("{}", format!("🗂️  {}", title).cyan().bold());
}

pub fn display_history(messages: &[ChatMessage]) {
    let mut markdown = MarkdownStream::new();
    for message in messages {
        display_role(message.role);
        print_rendered(&mut markdown, &message.content);
    }
}

pub fn display_role(role: Role) {
    match role {
        Role::User => println!("{}", "You:".blue().bold()),
        Role::Assistant => println!("{}", "AI:".magenta().bold()),
        Role::System => println!("{}", "System:".dimmed()),
    }
}

/// Render a whole message, highlighting code blocks
pub fn display_content(content: &str) {
    print_rendered(&mut MarkdownStream::new(), content);
}

fn print_rendered(markdown: &mut MarkdownStream, content: &str) {
    println!("{}", markdown.render(content).trim_end());
}

pub fn display_explanation(explanation: Option<&str>) {
    println!("{}", "🧠 Why did I remember this?".bold());
    match explanation {
        Some(text) => display_content(text),
        None => println!("{}", "Send a message first.".dimmed()),
    }
}

pub fn display_summary(summary: Option<&str>) {
    match summary {
        Some(text) => {
            println!("{}", "Summary".bold());
            display_content(text);
        }
        None => println!("{}", "No summary yet. One is written every 4 messages.".dimmed()),
    }
}

pub fn display_warning(message: &str) {
    println!("{}", message.yellow());
}

pub fn display_error(error: &ChatError) {
    eprintln!("{} {}", "Error:".red(), error);
}

pub fn display_help() {
    let lines = [
        ("/chats", "List your chats"),
        ("/new", "Start a new chat"),
        ("/open <n>", "Switch to chat n"),
        ("/rename <n> <title>", "Rename chat n"),
        ("/delete <n>", "Delete chat n"),
        ("/history", "Show the current chat"),
        ("/why", "Why did I remember this?"),
        ("/summary", "Show the current chat's summary"),
        ("/logout", "Log out"),
        ("/quit", "Exit (also: exit)"),
    ];
    for (command, description) in lines {
        println!("  {:<22}{}", command.cyan(), description.dimmed());
    }
}

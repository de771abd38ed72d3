use chatkeep::api::HttpCompletionClient;
use chatkeep::cli::Args;
use chatkeep::config::{Config, FileConfig};
use chatkeep::error::{ChatError, Result};
use chatkeep::orchestrator::OrchestratorContext;
use chatkeep::session::{SessionContext, SessionManager};
use chatkeep::store::SqliteChatStore;
use chatkeep::ui::output::display_error;
use chatkeep::ui::{MarkdownStream, Repl};
use clap::Parser;
use colored::*;
use log::info;
use std::io::{self, Write};
use std::process;

#[tokio::main]
async fn main() {
    let args = Args::parse();

    if args.config_init {
        match FileConfig::write_example() {
            Ok(path) => {
                println!("{}", format!("Wrote example config to {}", path.display()).green());
                return;
            }
            Err(e) => {
                display_error(&e);
                process::exit(1);
            }
        }
    }

    if let Err(e) = run(args).await {
        display_error(&e);
        process::exit(1);
    }
}

async fn run(args: Args) -> Result<()> {
    let config = Config::from_env_and_args(&args)?;
    chatkeep::init_logging(config.verbose);
    info!(
        "model={} endpoint={} database={}",
        config.model,
        config.api_endpoint,
        config.database.display()
    );

    let store = SqliteChatStore::open(&config.database)?;
    let client = HttpCompletionClient::from_config(&config)?;
    let turns = OrchestratorContext {
        store: &store,
        service: &client,
        system_prompt: Some(config.system_message()),
    };

    if args.message.is_empty() {
        return Repl::new(turns).run(config.user.clone()).await;
    }

    let user = config.user.as_deref().ok_or_else(|| {
        ChatError::ConfigError("--user is required when sending a message directly".to_string())
    })?;
    let mut ctx = SessionContext::login(user)?;
    if args.new_chat {
        SessionManager::new(&store).new_chat(&mut ctx)?;
    }

    let message = args.message.join(" ");
    let mut markdown = MarkdownStream::new();
    let outcome = turns
        .run_turn(&mut ctx, &message, |token, _| {
            print!("{}", markdown.push(token));
            let _ = io::stdout().flush();
        })
        .await?;
    let remaining = markdown.finish();
    if !remaining.is_empty() {
        print!("{}", remaining.trim_end());
    }
    println!();

    if let Some(title) = outcome.new_title {
        eprintln!("{}", format!("[chat] {}", title).dimmed());
    }
    Ok(())
}

use clap::Parser;
use std::path::PathBuf;

#[derive(Parser, Debug, Default)]
#[command(name = "chatkeep")]
#[command(about = "Terminal chat client with per-user saved conversations", long_about = None)]
pub struct Args {
    #[arg(short = 'u', long = "user", help = "Log in as this user instead of prompting")]
    pub user: Option<String>,

    #[arg(short = 'n', long = "new", help = "Send the message in a new chat")]
    pub new_chat: bool,

    #[arg(long = "db", help = "Path of the SQLite chat database")]
    pub database: Option<PathBuf>,

    #[arg(short = 'm', long = "model", help = "Model identifier to request")]
    pub model: Option<String>,

    #[arg(
        long = "api-endpoint",
        help = "Custom API base URL (e.g., http://localhost:11434/v1)"
    )]
    pub api_endpoint: Option<String>,

    #[arg(short = 'v', long = "verbose", help = "Print debug logging to stderr")]
    pub verbose: bool,

    #[arg(
        long = "config-init",
        help = "Write an example config file to ~/.config/chatkeep/chatkeep.yaml"
    )]
    pub config_init: bool,

    #[arg(help = "Send this message to the current chat and exit")]
    pub message: Vec<String>,
}

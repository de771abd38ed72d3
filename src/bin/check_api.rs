//! Connectivity check: sends one short message to the configured endpoint.

use chatkeep::api::{CompletionService, HttpCompletionClient};
use chatkeep::cli::Args;
use chatkeep::config::Config;
use chatkeep::models::Message;
use colored::*;
use std::process;

const TEST_MESSAGE: &str = "Hello, test message";
const MAX_TOKENS: u32 = 50;

#[tokio::main]
async fn main() {
    let config = match Config::from_env_and_args(&Args::default()) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("{} {}", "Error:".red(), e);
            process::exit(1);
        }
    };
    chatkeep::init_logging(config.verbose);

    println!("{}", format!("Using model: {}", config.model).green());
    println!("{}", format!("Endpoint: {}", config.api_endpoint).cyan());
    println!("{}", "-".repeat(80).dimmed());

    let client = match HttpCompletionClient::from_config(&config) {
        Ok(client) => client.with_max_tokens(MAX_TOKENS),
        Err(e) => {
            eprintln!("{} {}", "Error:".red(), e);
            process::exit(1);
        }
    };

    match client.complete(&[Message::user(TEST_MESSAGE)]).await {
        Ok(response) => println!("{} {}", "Success! Response:".green(), response),
        Err(e) => {
            eprintln!("{} {}", "Error:".red(), e);
            process::exit(1);
        }
    }
}

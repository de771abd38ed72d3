pub mod api;
pub mod cli;
pub mod config;
pub mod conversation;
pub mod error;
pub mod features;
pub mod models;
pub mod orchestrator;
pub mod session;
pub mod store;
pub mod ui;

/// Route `log` output to stderr. `RUST_LOG` wins over `verbose`.
pub fn init_logging(verbose: bool) {
    let default_filter = if verbose { "chatkeep=debug" } else { "warn" };
    let _ = env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_filter))
        .format_timestamp(None)
        .try_init();
}

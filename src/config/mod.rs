mod api;
mod defaults;
mod model;
mod validation;

use crate::cli::Args;
use crate::error::{ChatError, Result};
use anyhow::Context;
use serde::{Deserialize, Serialize};
use std::env;
use std::fs;
use std::path::PathBuf;

pub use api::ApiConfig;
pub use defaults::{
    default_database, default_stream_timeout, default_temperature, API_KEY_ENV,
    DEFAULT_API_ENDPOINT, DEFAULT_MODEL, DEFAULT_SYSTEM_PROMPT,
};
pub use model::{ModelConfig, SessionConfig, StorageConfig};
pub use validation::{expand_env_var_in_string, parse_flag};

#[derive(Debug, Clone)]
pub struct Config {
    pub api_key: Option<String>,
    pub api_endpoint: String,
    pub model: String,
    pub temperature: f64,
    pub system_prompt: String,
    pub stream_timeout: u64,
    pub database: PathBuf,
    pub user: Option<String>,
    pub verbose: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_key: None,
            api_endpoint: DEFAULT_API_ENDPOINT.to_string(),
            model: DEFAULT_MODEL.to_string(),
            temperature: default_temperature(),
            system_prompt: DEFAULT_SYSTEM_PROMPT.to_string(),
            stream_timeout: default_stream_timeout(),
            database: PathBuf::from(default_database()),
            user: None,
            verbose: false,
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct FileConfig {
    #[serde(default)]
    pub api: ApiConfig,
    #[serde(default)]
    pub model: ModelConfig,
    #[serde(default)]
    pub storage: StorageConfig,
    #[serde(default)]
    pub session: SessionConfig,
}

impl Config {
    pub fn from_env_and_args(args: &Args) -> Result<Self> {
        let file_config = FileConfig::load()?;
        Ok(Self::resolve(args, file_config))
    }

    /// Merge sources: CLI args > env vars > config file > defaults
    pub fn resolve(args: &Args, file_config: FileConfig) -> Self {
        // The API key is only read from the environment
        let api_key = env::var(API_KEY_ENV).ok().filter(|k| !k.trim().is_empty());

        let api_endpoint = args
            .api_endpoint
            .clone()
            .or_else(|| env::var("CHATKEEP_API_ENDPOINT").ok())
            .or(file_config.api.endpoint)
            .map(|endpoint| normalize_endpoint(&expand_env_var_in_string(&endpoint)))
            .unwrap_or_else(|| DEFAULT_API_ENDPOINT.to_string());

        let model = args
            .model
            .clone()
            .or_else(|| env::var("CHATKEEP_MODEL").ok())
            .or(file_config.model.default_model)
            .unwrap_or_else(|| DEFAULT_MODEL.to_string());

        let temperature = env::var("CHATKEEP_TEMPERATURE")
            .ok()
            .and_then(|s| s.parse::<f64>().ok())
            .or(file_config.model.temperature)
            .unwrap_or_else(default_temperature);

        let system_prompt = env::var("CHATKEEP_SYSTEM_PROMPT")
            .ok()
            .or(file_config.model.system_prompt)
            .unwrap_or_else(|| DEFAULT_SYSTEM_PROMPT.to_string());

        let stream_timeout = env::var("CHATKEEP_STREAM_TIMEOUT")
            .ok()
            .and_then(|s| s.parse::<u64>().ok())
            .or(file_config.api.stream_timeout)
            .unwrap_or_else(default_stream_timeout);

        let database = args.database.clone().unwrap_or_else(|| {
            let raw = env::var("CHATKEEP_DB")
                .ok()
                .or(file_config.storage.database)
                .unwrap_or_else(default_database);
            PathBuf::from(expand_env_var_in_string(&raw))
        });

        let user = args.user.clone().or(file_config.session.user);

        let verbose = args.verbose
            || env::var("CHATKEEP_VERBOSE")
                .ok()
                .map(|v| parse_flag(&v))
                .or(file_config.session.verbose)
                .unwrap_or(false);

        Config {
            api_key,
            api_endpoint,
            model,
            temperature,
            system_prompt,
            stream_timeout,
            database,
            user,
            verbose,
        }
    }

    pub fn require_api_key(&self) -> Result<&str> {
        self.api_key
            .as_deref()
            .ok_or_else(|| ChatError::ConfigError(format!("{} environment variable not set", API_KEY_ENV)))
    }

    pub fn get_current_date() -> String {
        chrono::Local::now().format("%A, %B %d, %Y").to_string()
    }

    /// System message sent ahead of every conversation
    pub fn system_message(&self) -> String {
        format!("Today's date is {}.\n\n{}", Self::get_current_date(), self.system_prompt)
    }
}

/// Turn a base URL into a full chat-completions URL
pub fn normalize_endpoint(endpoint: &str) -> String {
    if endpoint.ends_with("/chat/completions") {
        endpoint.to_string()
    } else if endpoint.ends_with("/v1") {
        format!("{}/chat/completions", endpoint)
    } else if endpoint.ends_with("/v1/") {
        format!("{}chat/completions", endpoint)
    } else {
        format!("{}/v1/chat/completions", endpoint.trim_end_matches('/'))
    }
}

const EXAMPLE_CONFIG: &str = r#"api:
  endpoint: https://api.groq.com/openai/v1
  stream_timeout: 30
model:
  default_model: llama-3.1-8b-instant
  temperature: 0.3
storage:
  database: ${HOME}/.local/share/chatkeep/chatbot.db
session:
  verbose: false
"#;

impl FileConfig {
    pub fn load() -> anyhow::Result<Self> {
        for path in Self::get_config_paths() {
            if path.exists() {
                return Self::load_from(&path);
            }
        }

        // No config file found, return default
        Ok(FileConfig::default())
    }

    pub fn load_from(path: &std::path::Path) -> anyhow::Result<Self> {
        let contents = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let is_yaml = matches!(
            path.extension().and_then(|s| s.to_str()),
            Some("yaml") | Some("yml")
        );
        let config = if is_yaml {
            serde_yaml::from_str(&contents)
                .with_context(|| format!("Failed to parse YAML config file: {}", path.display()))?
        } else {
            serde_json::from_str(&contents)
                .with_context(|| format!("Failed to parse JSON config file: {}", path.display()))?
        };
        Ok(config)
    }

    pub fn get_config_paths() -> Vec<PathBuf> {
        let mut paths = vec![
            PathBuf::from(".chatkeep.yaml"),
            PathBuf::from(".chatkeep.yml"),
            PathBuf::from(".chatkeep.json"),
        ];

        if let Some(config_dir) = Self::user_config_dir() {
            paths.push(config_dir.join("chatkeep.yaml"));
            paths.push(config_dir.join("chatkeep.yml"));
            paths.push(config_dir.join("chatkeep.json"));
        }

        paths
    }

    fn user_config_dir() -> Option<PathBuf> {
        dirs::home_dir().map(|home| home.join(".config").join("chatkeep"))
    }

    /// Write the example config unless one already exists. Returns the path.
    pub fn write_example() -> Result<PathBuf> {
        let config_dir = Self::user_config_dir()
            .ok_or_else(|| ChatError::ConfigError("could not determine home directory".to_string()))?;
        let path = config_dir.join("chatkeep.yaml");
        if path.exists() {
            return Err(ChatError::ConfigError(format!(
                "config file already exists: {}",
                path.display()
            )));
        }
        fs::create_dir_all(&config_dir)?;
        fs::write(&path, EXAMPLE_CONFIG)?;
        Ok(path)
    }
}

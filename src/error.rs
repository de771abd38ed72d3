use std::fmt;

#[derive(Debug)]
pub enum ChatError {
    ApiError {
        status: u16,
        message: String,
    },
    ConfigError(String),
    StorageError(rusqlite::Error),
    NetworkError(reqwest::Error),
    Timeout,
    Cancelled,
    IoError(std::io::Error),
    JsonError(serde_json::Error),
    YamlError(serde_yaml::Error),
    EmptyUsername,
    EmptyTitle,
    DuplicateTitle(String),
    EmptyMessage,
    ChatNotFound(String),
    Other(String),
}

impl ChatError {
    /// Errors the user can fix by changing their input. These are shown as
    /// inline warnings instead of failing the interaction.
    pub fn is_validation(&self) -> bool {
        matches!(
            self,
            ChatError::EmptyUsername
                | ChatError::EmptyTitle
                | ChatError::DuplicateTitle(_)
                | ChatError::EmptyMessage
        )
    }
}

impl fmt::Display for ChatError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ChatError::ApiError { status, message } => {
                write!(f, "API error (status {}): {}", status, message)
            }
            ChatError::ConfigError(msg) => write!(f, "Configuration error: {}", msg),
            ChatError::StorageError(e) => write!(f, "Storage error: {}", e),
            ChatError::NetworkError(e) => write!(f, "Network error: {}", e),
            ChatError::Timeout => write!(f, "Request timeout"),
            ChatError::Cancelled => write!(f, "Response cancelled"),
            ChatError::IoError(e) => write!(f, "IO error: {}", e),
            ChatError::JsonError(e) => write!(f, "JSON error: {}", e),
            ChatError::YamlError(e) => write!(f, "YAML error: {}", e),
            ChatError::EmptyUsername => write!(f, "Username cannot be empty."),
            ChatError::EmptyTitle => write!(f, "Chat name cannot be empty."),
            ChatError::DuplicateTitle(_) => write!(f, "A chat with this name already exists."),
            ChatError::EmptyMessage => write!(f, "Message cannot be empty."),
            ChatError::ChatNotFound(id) => write!(f, "Chat {} not found", id),
            ChatError::Other(msg) => write!(f, "{}", msg),
        }
    }
}

impl std::error::Error for ChatError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ChatError::StorageError(e) => Some(e),
            ChatError::NetworkError(e) => Some(e),
            ChatError::IoError(e) => Some(e),
            ChatError::JsonError(e) => Some(e),
            ChatError::YamlError(e) => Some(e),
            _ => None,
        }
    }
}

impl From<rusqlite::Error> for ChatError {
    fn from(err: rusqlite::Error) -> Self {
        ChatError::StorageError(err)
    }
}

impl From<reqwest::Error> for ChatError {
    fn from(err: reqwest::Error) -> Self {
        ChatError::NetworkError(err)
    }
}

impl From<std::io::Error> for ChatError {
    fn from(err: std::io::Error) -> Self {
        ChatError::IoError(err)
    }
}

impl From<serde_json::Error> for ChatError {
    fn from(err: serde_json::Error) -> Self {
        ChatError::JsonError(err)
    }
}

impl From<serde_yaml::Error> for ChatError {
    fn from(err: serde_yaml::Error) -> Self {
        ChatError::YamlError(err)
    }
}

impl From<anyhow::Error> for ChatError {
    fn from(err: anyhow::Error) -> Self {
        ChatError::ConfigError(format!("{:#}", err))
    }
}

impl From<String> for ChatError {
    fn from(msg: String) -> Self {
        ChatError::Other(msg)
    }
}

impl From<&str> for ChatError {
    fn from(msg: &str) -> Self {
        ChatError::Other(msg.to_string())
    }
}

pub type Result<T> = std::result::Result<T, ChatError>;

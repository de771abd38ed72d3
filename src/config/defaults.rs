pub const DEFAULT_API_ENDPOINT: &str = "https://api.groq.com/openai/v1/chat/completions";
pub const DEFAULT_MODEL: &str = "llama-3.1-8b-instant";
pub const API_KEY_ENV: &str = "GROQ_API_KEY";

pub const DEFAULT_SYSTEM_PROMPT: &str = "The following is a friendly conversation between a human and an AI. \
The AI is talkative and provides lots of specific details from its context. \
If the AI does not know the answer to a question, it truthfully says it does not know.";

pub fn default_temperature() -> f64 {
    0.3
}

pub fn default_stream_timeout() -> u64 {
    30
}

pub fn default_database() -> String {
    crate::store::DEFAULT_DATABASE_FILE.to_string()
}

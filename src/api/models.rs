use crate::models::Message;
use serde::{Deserialize, Serialize};

#[derive(Serialize)]
pub struct RequestBody {
    pub model: String,
    pub messages: Vec<Message>,
    pub stream: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub temperature: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_tokens: Option<u32>,
}

#[derive(Deserialize)]
pub struct Delta {
    pub content: Option<String>,
}

#[derive(Deserialize)]
pub struct Choice {
    pub delta: Option<Delta>,
}

#[derive(Deserialize)]
pub struct StreamResponse {
    pub choices: Option<Vec<Choice>>,
}

impl StreamResponse {
    /// Concatenated content increments of all choices in this chunk
    pub fn content(&self) -> Option<String> {
        let choices = self.choices.as_ref()?;
        let text: String = choices
            .iter()
            .filter_map(|c| c.delta.as_ref())
            .filter_map(|d| d.content.as_deref())
            .collect();
        if text.is_empty() {
            None
        } else {
            Some(text)
        }
    }
}

use crate::error::{ChatError, Result};
use serde_json::Value;

/// Extract the assistant text from a non-streaming completion response
pub fn extract_content(response_json: &Value) -> Result<Option<String>> {
    let choices = response_json
        .get("choices")
        .and_then(|c| c.as_array())
        .ok_or_else(|| ChatError::Other("No choices in response".to_string()))?;

    let first_choice = choices
        .first()
        .ok_or_else(|| ChatError::Other("Empty choices array".to_string()))?;

    let message = first_choice
        .get("message")
        .ok_or_else(|| ChatError::Other("No message in response".to_string()))?;

    Ok(message
        .get("content")
        .and_then(|c| c.as_str())
        .map(|s| s.to_string()))
}

/// Pull a readable message out of an error body, falling back to the raw text
pub fn extract_error_message(body: &str) -> String {
    serde_json::from_str::<Value>(body)
        .ok()
        .and_then(|v| {
            v.get("error")
                .and_then(|e| e.get("message").or(Some(e)))
                .and_then(|m| m.as_str().map(|s| s.to_string()))
        })
        .unwrap_or_else(|| body.to_string())
}

use crate::api::models::StreamResponse;
use crate::error::{ChatError, Result};
use futures::StreamExt;
use log::debug;
use tokio::sync::mpsc;
use tokio::time::{timeout, Duration};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SseEvent {
    Data(String),
    Done,
}

/// Splits a server-sent-events byte stream into complete `data:` payloads.
///
/// Chunks may end mid-line or mid-character; raw bytes are held until their
/// newline arrives and only complete lines are decoded.
#[derive(Debug, Default)]
pub struct SseLineBuffer {
    incomplete_line: Vec<u8>,
}

impl SseLineBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, chunk: &[u8]) -> Vec<SseEvent> {
        self.incomplete_line.extend_from_slice(chunk);

        let complete = match self.incomplete_line.iter().rposition(|&b| b == b'\n') {
            Some(last_newline_pos) => {
                let rest = self.incomplete_line.split_off(last_newline_pos + 1);
                std::mem::replace(&mut self.incomplete_line, rest)
            }
            None => return Vec::new(),
        };

        // A newline byte never occurs inside a multibyte sequence
        String::from_utf8_lossy(&complete)
            .lines()
            .filter_map(parse_line)
            .collect()
    }

    /// Flush a trailing line that never got its newline
    pub fn finish(&mut self) -> Vec<SseEvent> {
        let rest = std::mem::take(&mut self.incomplete_line);
        parse_line(&String::from_utf8_lossy(&rest)).into_iter().collect()
    }
}

fn parse_line(line: &str) -> Option<SseEvent> {
    let line = line.trim_end_matches('\r');
    if line.is_empty() || line.starts_with(':') {
        return None;
    }

    let (field, value) = match line.find(':') {
        Some(colon_pos) => (line[..colon_pos].trim(), line[colon_pos + 1..].trim_start()),
        None => (line.trim(), ""),
    };

    match field {
        "data" if value == "[DONE]" => Some(SseEvent::Done),
        "data" => Some(SseEvent::Data(value.to_string())),
        "event" | "id" | "retry" => {
            debug!("SSE {}: {}", field, value);
            None
        }
        _ => {
            debug!("unknown SSE field: {}", field);
            None
        }
    }
}

/// Read a streamed completion and forward each content increment to `tokens`.
///
/// Fails with [`ChatError::Timeout`] when no bytes arrive for `timeout_secs`,
/// and with [`ChatError::Cancelled`] when the receiving side has gone away.
pub async fn forward_stream(
    response: reqwest::Response,
    timeout_secs: u64,
    tokens: mpsc::Sender<String>,
) -> Result<()> {
    let mut stream = response.bytes_stream();
    let mut lines = SseLineBuffer::new();
    let chunk_timeout = Duration::from_secs(timeout_secs);

    loop {
        let events = match timeout(chunk_timeout, stream.next()).await {
            Ok(Some(chunk)) => {
                let chunk = chunk.map_err(ChatError::NetworkError)?;
                lines.push(&chunk)
            }
            Ok(None) => {
                let events = lines.finish();
                forward_events(events, &tokens).await?;
                return Ok(());
            }
            Err(_) => {
                debug!("no data received for {} seconds", timeout_secs);
                return Err(ChatError::Timeout);
            }
        };

        if forward_events(events, &tokens).await? {
            return Ok(());
        }
    }
}

/// Returns `true` once the `[DONE]` marker has been seen.
async fn forward_events(events: Vec<SseEvent>, tokens: &mpsc::Sender<String>) -> Result<bool> {
    for event in events {
        match event {
            SseEvent::Done => return Ok(true),
            SseEvent::Data(value) => match serde_json::from_str::<StreamResponse>(&value) {
                Ok(parsed) => {
                    if let Some(content) = parsed.content() {
                        tokens
                            .send(content)
                            .await
                            .map_err(|_| ChatError::Cancelled)?;
                    }
                }
                Err(e) => debug!("JSON parse error in stream chunk: {}", e),
            },
        }
    }
    Ok(false)
}

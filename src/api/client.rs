use crate::api::response::{extract_content, extract_error_message};
use crate::api::service::CompletionService;
use crate::api::streaming::forward_stream;
use crate::api::RequestBody;
use crate::config::Config;
use crate::error::{ChatError, Result};
use crate::models::Message;
use async_trait::async_trait;
use log::debug;
use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION, CONTENT_TYPE};
use serde_json::Value;
use tokio::sync::mpsc;

/// Client for OpenAI-compatible `/chat/completions` endpoints.
pub struct HttpCompletionClient {
    http: reqwest::Client,
    api_endpoint: String,
    model: String,
    temperature: Option<f64>,
    max_tokens: Option<u32>,
    stream_timeout: u64,
}

impl HttpCompletionClient {
    pub fn new(api_key: &str, api_endpoint: &str, model: &str) -> Result<Self> {
        let mut headers = HeaderMap::new();
        headers.insert(
            AUTHORIZATION,
            HeaderValue::from_str(&format!("Bearer {}", api_key))
                .map_err(|e| ChatError::ConfigError(format!("Invalid authorization header: {}", e)))?,
        );
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));

        let http = reqwest::Client::builder()
            .default_headers(headers)
            .build()?;

        Ok(Self {
            http,
            api_endpoint: api_endpoint.to_string(),
            model: model.to_string(),
            temperature: None,
            max_tokens: None,
            stream_timeout: crate::config::default_stream_timeout(),
        })
    }

    pub fn from_config(config: &Config) -> Result<Self> {
        let api_key = config.require_api_key()?;
        Ok(Self::new(api_key, &config.api_endpoint, &config.model)?
            .with_temperature(config.temperature)
            .with_stream_timeout(config.stream_timeout))
    }

    pub fn with_temperature(mut self, temperature: f64) -> Self {
        self.temperature = Some(temperature);
        self
    }

    pub fn with_max_tokens(mut self, max_tokens: u32) -> Self {
        self.max_tokens = Some(max_tokens);
        self
    }

    pub fn with_stream_timeout(mut self, secs: u64) -> Self {
        self.stream_timeout = secs;
        self
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    fn request_body(&self, messages: &[Message], stream: bool) -> RequestBody {
        RequestBody {
            model: self.model.clone(),
            messages: messages.to_vec(),
            stream,
            temperature: self.temperature,
            max_tokens: self.max_tokens,
        }
    }

    async fn send(&self, request_body: &RequestBody) -> Result<reqwest::Response> {
        debug!(
            "POST {} (model={}, messages={}, stream={})",
            self.api_endpoint,
            request_body.model,
            request_body.messages.len(),
            request_body.stream
        );
        let response = self
            .http
            .post(&self.api_endpoint)
            .json(request_body)
            .send()
            .await?;
        debug!("response status: {}", response.status());

        if !response.status().is_success() {
            let status = response.status().as_u16();
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            return Err(ChatError::ApiError {
                status,
                message: extract_error_message(&error_text),
            });
        }
        Ok(response)
    }
}

#[async_trait]
impl CompletionService for HttpCompletionClient {
    async fn stream(&self, messages: &[Message], tokens: mpsc::Sender<String>) -> Result<()> {
        let request_body = self.request_body(messages, true);
        let response = self.send(&request_body).await?;
        forward_stream(response, self.stream_timeout, tokens).await
    }

    async fn complete(&self, messages: &[Message]) -> Result<String> {
        let request_body = self.request_body(messages, false);
        let response = self.send(&request_body).await?;
        let response_json: Value = serde_json::from_str(&response.text().await?)?;
        Ok(extract_content(&response_json)?.unwrap_or_default())
    }
}

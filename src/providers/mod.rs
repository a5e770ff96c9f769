//! Chat backends. Both providers speak the OpenAI-compatible
//! `POST {endpoint}/chat/completions` protocol and differ only in their
//! endpoint, model, and credential.

use std::time::Duration;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::debug;

use crate::config::BackendConfig;
use crate::error::{Result, SahayakError};
use crate::router::{BackendError, ChatTurn};

pub mod huggingface;
pub mod openai;

const MAX_ERROR_BODY_LEN: usize = 300;

#[derive(Debug, Serialize)]
struct ChatCompletionRequest<'a> {
    model: &'a str,
    messages: &'a [ChatTurn],
    n: u8,
    stream: bool,
}

#[derive(Debug, Deserialize)]
struct ChatCompletionResponse {
    #[serde(default)]
    choices: Vec<Choice>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: Option<ChoiceMessage>,
}

#[derive(Debug, Deserialize)]
struct ChoiceMessage {
    content: Option<String>,
}

/// HTTP client for one OpenAI-compatible chat completions endpoint
#[derive(Clone)]
pub(crate) struct ChatCompletionsClient {
    http: reqwest::Client,
    url: String,
    model: String,
    api_key: Option<String>,
    credential_var: &'static str,
}

impl ChatCompletionsClient {
    pub(crate) fn new(
        config: &BackendConfig,
        default_endpoint: &str,
        default_model: &str,
        credential_var: &'static str,
    ) -> Result<Self> {
        let mut builder = reqwest::Client::builder();
        if let Some(secs) = config.timeout_secs {
            builder = builder.timeout(Duration::from_secs(secs));
        }
        let http = builder
            .build()
            .map_err(|e| SahayakError::Backend(format!("Failed to build HTTP client: {}", e)))?;

        let base = config.endpoint_or(default_endpoint);
        Ok(Self {
            http,
            url: format!("{}/chat/completions", base.trim_end_matches('/')),
            model: config.model_or(default_model).to_string(),
            api_key: config.credential().map(str::to_string),
            credential_var,
        })
    }

    pub(crate) fn model(&self) -> &str {
        &self.model
    }

    pub(crate) async fn complete(&self, turns: &[ChatTurn]) -> std::result::Result<String, BackendError> {
        let api_key = self
            .api_key
            .as_deref()
            .ok_or(BackendError::MissingCredential(self.credential_var))?;

        let request = ChatCompletionRequest {
            model: &self.model,
            messages: turns,
            n: 1,
            stream: false,
        };

        debug!(url = %self.url, model = %self.model, turns = turns.len(), "Sending chat completion");

        let resp = self
            .http
            .post(&self.url)
            .bearer_auth(api_key)
            .json(&request)
            .send()
            .await?;

        let status = resp.status();
        let text = resp.text().await?;

        if !status.is_success() {
            return Err(BackendError::Api {
                status: status.as_u16(),
                message: extract_error_message(&text),
            });
        }

        let body: ChatCompletionResponse = serde_json::from_str(&text)
            .map_err(|e| BackendError::Malformed(e.to_string()))?;

        body.choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message)
            .and_then(|message| message.content)
            .filter(|content| !content.is_empty())
            .ok_or(BackendError::EmptyCompletion)
    }
}

/// Truncate a string to `max_len` characters, appending `...` if truncated
fn truncate_str(s: &str, max_len: usize) -> String {
    if s.len() > max_len {
        let end = s.char_indices().nth(max_len).map(|(i, _)| i).unwrap_or(s.len());
        let mut out = String::with_capacity(end + 3);
        out.push_str(&s[..end]);
        out.push_str("...");
        out
    } else {
        s.to_string()
    }
}

/// Pull a human-readable message out of an error body. Understands
/// `{"error": {"message": ...}}`, `{"error": "..."}` and `{"message": ...}`,
/// falling back to the (truncated) raw body.
fn extract_error_message(body: &str) -> String {
    if let Ok(value) = serde_json::from_str::<Value>(body) {
        let message = match value.get("error") {
            Some(Value::String(s)) => Some(s.as_str()),
            Some(Value::Object(map)) => map.get("message").and_then(Value::as_str),
            _ => value.get("message").and_then(Value::as_str),
        };
        if let Some(message) = message {
            return message.to_string();
        }
    }

    let body = body.trim();
    if body.is_empty() {
        "empty error response".to_string()
    } else {
        truncate_str(body, MAX_ERROR_BODY_LEN)
    }
}

//! Credential checks against the configured provider endpoints
//!
//! Lists the models an endpoint offers, or sends a one-shot chat completion,
//! with the stored key and base URL. Used by the settings panel to check that
//! a key/base URL pair actually works.

use crate::core::{ProviderKind, ProviderSettings};
use reqwest::header::{AUTHORIZATION, CONTENT_TYPE, HeaderMap, HeaderValue, USER_AGENT};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tokio::runtime::Handle;
use tokio::sync::oneshot;
use tracing::debug;

/// Prompt sent by the completion check
pub const COMPLETION_PROMPT: &str = "Reply with the single word OK.";

#[derive(Debug, thiserror::Error)]
pub enum ProbeError {
    #[error("Invalid header value: {0}")]
    InvalidHeader(#[from] reqwest::header::InvalidHeaderValue),

    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Request failed ({status}): {message}")]
    Status { status: u16, message: String },

    #[error("Failed to parse response: {0}")]
    Parse(#[source] reqwest::Error),

    #[error("No API key configured for {0}")]
    MissingApiKey(ProviderKind),

    #[error("{provider} does not offer {operation}")]
    Unsupported {
        provider: ProviderKind,
        operation: &'static str,
    },
}

/// Endpoint and credentials for one provider, resolved from the settings
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProviderEndpoint {
    pub provider: ProviderKind,
    pub base_url: String,
    pub api_key: String,
}

impl ProviderEndpoint {
    /// Resolve the endpoint for `provider`, falling back to its default base URL
    pub fn from_settings(provider: ProviderKind, settings: &ProviderSettings) -> Self {
        let base_url = settings
            .get(provider.base_url_setting())
            .map(str::trim)
            .filter(|url| !url.is_empty())
            .unwrap_or(provider.default_base_url())
            .to_string();
        let api_key = settings
            .get(provider.api_key_setting())
            .unwrap_or_default()
            .trim()
            .to_string();
        Self {
            provider,
            base_url,
            api_key,
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url.trim_end_matches('/'), path)
    }

    pub fn models_url(&self) -> String {
        self.url("models")
    }

    pub fn completions_url(&self) -> String {
        self.url("chat/completions")
    }

    fn client(&self) -> Result<reqwest::Client, ProbeError> {
        Ok(reqwest::Client::builder()
            .default_headers(build_headers(self.provider, &self.api_key)?)
            .build()?)
    }
}

/// Headers sent with every request to `provider`.
///
/// Deepgram authenticates with `Token <key>`; OpenAI-compatible APIs with
/// `Bearer <key>`.
pub fn build_headers(provider: ProviderKind, api_key: &str) -> Result<HeaderMap, ProbeError> {
    let mut headers = HeaderMap::new();
    headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
    headers.insert(
        USER_AGENT,
        HeaderValue::from_static(concat!("settui/", env!("CARGO_PKG_VERSION"))),
    );
    if !api_key.is_empty() {
        let scheme = match provider {
            ProviderKind::Deepgram => "Token",
            ProviderKind::OpenAi => "Bearer",
        };
        headers.insert(
            AUTHORIZATION,
            HeaderValue::from_str(&format!("{scheme} {api_key}"))?,
        );
    }
    Ok(headers)
}

/// Extract model ids from a catalog response.
///
/// Accepts the OpenAI shape `{ "data": [ { "id": .. } | { "name": .. } ] }`,
/// a bare array of strings, and Deepgram's `{ "stt": [..], "tts": [..] }`.
pub fn parse_model_list(parsed: &Value) -> Vec<String> {
    let mut models = Vec::new();
    if let Some(data) = parsed.get("data").and_then(|d| d.as_array()) {
        for entry in data {
            if let Some(id) = entry.get("id").and_then(|i| i.as_str()) {
                models.push(id.to_string());
            } else if let Some(name) = entry.get("name").and_then(|n| n.as_str()) {
                models.push(name.to_string());
            }
        }
    } else if let Some(array) = parsed.as_array() {
        models.extend(array.iter().filter_map(|entry| entry.as_str()).map(str::to_string));
    } else {
        for section in ["stt", "tts"] {
            let Some(entries) = parsed.get(section).and_then(|s| s.as_array()) else {
                continue;
            };
            for entry in entries {
                let name = entry
                    .get("canonical_name")
                    .or_else(|| entry.get("name"))
                    .and_then(|n| n.as_str());
                if let Some(name) = name {
                    models.push(name.to_string());
                }
            }
        }
    }
    models
}

/// Human-readable message from an error response body.
///
/// Understands `{ "error": { "message": .. } }`, `{ "error": ".." }` and
/// Deepgram's `{ "err_msg": .. }`; anything else is returned as is.
pub fn api_error_message(body: &str) -> String {
    let Ok(parsed) = serde_json::from_str::<Value>(body) else {
        return body.trim().to_string();
    };
    let message = match parsed.get("error") {
        Some(Value::String(message)) => Some(message.as_str()),
        Some(error) => error.get("message").and_then(|m| m.as_str()),
        None => parsed.get("err_msg").and_then(|m| m.as_str()),
    };
    message.map_or_else(|| body.trim().to_string(), str::to_string)
}

async fn check_status(response: reqwest::Response) -> Result<reqwest::Response, ProbeError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let body = response
        .text()
        .await
        .unwrap_or_else(|_| "Failed to read error response".to_string());
    Err(ProbeError::Status {
        status: status.as_u16(),
        message: api_error_message(&body),
    })
}

/// Fetch the model list from `endpoint`
pub async fn fetch_models(endpoint: &ProviderEndpoint) -> Result<Vec<String>, ProbeError> {
    if endpoint.api_key.is_empty() {
        return Err(ProbeError::MissingApiKey(endpoint.provider));
    }
    let url = endpoint.models_url();
    debug!("Fetching models from: {}", url);

    let response = check_status(endpoint.client()?.get(&url).send().await?).await?;
    let parsed: Value = response.json().await.map_err(ProbeError::Parse)?;
    Ok(parse_model_list(&parsed))
}

#[derive(Debug, Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Debug, Serialize)]
struct ChatCompletionRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
}

#[derive(Debug, Deserialize)]
struct ChatCompletionResponse {
    #[serde(default)]
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatMessageResponse,
}

#[derive(Debug, Deserialize)]
struct ChatMessageResponse {
    content: Option<String>,
}

/// Send `prompt` to `model` as a single user message.
///
/// Returns `Ok(None)` when the response carries no content.
pub async fn send_chat_completion(
    endpoint: &ProviderEndpoint,
    model: &str,
    prompt: &str,
) -> Result<Option<String>, ProbeError> {
    if endpoint.provider == ProviderKind::Deepgram {
        return Err(ProbeError::Unsupported {
            provider: endpoint.provider,
            operation: "chat completions",
        });
    }
    if endpoint.api_key.is_empty() {
        return Err(ProbeError::MissingApiKey(endpoint.provider));
    }
    let url = endpoint.completions_url();
    debug!("Sending chat completion request to: {}", url);

    let request = ChatCompletionRequest {
        model,
        messages: vec![ChatMessage {
            role: "user",
            content: prompt,
        }],
    };
    let response = check_status(endpoint.client()?.post(&url).json(&request).send().await?).await?;
    let completion: ChatCompletionResponse = response.json().await.map_err(ProbeError::Parse)?;
    Ok(completion
        .choices
        .into_iter()
        .next()
        .and_then(|choice| choice.message.content))
}

/// Which check to run against an endpoint
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CheckKind {
    Models,
    Completion { model: String },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CheckOutcome {
    Models(Vec<String>),
    Reply(Option<String>),
}

pub async fn run_check(
    endpoint: &ProviderEndpoint,
    kind: &CheckKind,
) -> Result<CheckOutcome, ProbeError> {
    match kind {
        CheckKind::Models => fetch_models(endpoint).await.map(CheckOutcome::Models),
        CheckKind::Completion { model } => send_chat_completion(endpoint, model, COMPLETION_PROMPT)
            .await
            .map(CheckOutcome::Reply),
    }
}

/// Run [`run_check`] on `runtime`; the receiver yields the outcome
pub fn spawn_check(
    runtime: &Handle,
    endpoint: ProviderEndpoint,
    kind: CheckKind,
) -> oneshot::Receiver<Result<CheckOutcome, ProbeError>> {
    let (tx, rx) = oneshot::channel();
    runtime.spawn(async move {
        let outcome = run_check(&endpoint, &kind).await;
        let _ = tx.send(outcome);
    });
    rx
}

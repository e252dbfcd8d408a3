//! OpenAI-compatible REST backend.
//!
//! Talks to any `/v1/chat/completions` endpoint: Ollama, llama.cpp server,
//! vLLM, LM Studio, or a hosted API. Optional Bearer auth. Streaming uses the
//! SSE `data:` protocol with a `[DONE]` sentinel.

use std::time::Duration;

use async_trait::async_trait;
use eventsource_stream::Eventsource;
use futures::StreamExt;
use serde::{Deserialize, Serialize};
use standup_core::config::GenerationConfig;
use tracing::{debug, instrument};

use crate::backend::{Backend, TextStream};
use crate::error::{BackendError, BackendResult};
use crate::factory::BackendConfig;

/// Connect timeout for the HTTP client. Request timeouts come from
/// [`BackendConfig::request_timeout`]; local inference can be slow.
const CONNECT_TIMEOUT: Duration = Duration::from_secs(10);

/// System message sent with every chat completion request.
const SYSTEM_MESSAGE: &str =
    "You are a helpful assistant that creates concise standup summaries from git commit data.";

/// OpenAI-compatible chat completions backend.
pub struct RestBackend {
    name: String,
    config: BackendConfig,
    client: reqwest::Client,
}

impl RestBackend {
    /// Create a backend against `config.base_url`.
    pub fn new(name: impl Into<String>, config: BackendConfig) -> BackendResult<Self> {
        let client = reqwest::Client::builder()
            .timeout(config.request_timeout)
            .connect_timeout(CONNECT_TIMEOUT)
            .build()
            .map_err(BackendError::Http)?;
        Ok(Self {
            name: name.into(),
            config,
            client,
        })
    }

    /// Resolve the chat completions URL from a base URL that may already
    /// include part of the path.
    fn completions_url(base_url: &str) -> String {
        let normalized = base_url.trim_end_matches('/');
        if normalized.ends_with("/chat/completions") {
            normalized.to_string()
        } else if normalized.ends_with("/v1") {
            format!("{normalized}/chat/completions")
        } else {
            format!("{normalized}/v1/chat/completions")
        }
    }

    fn build_request(&self, prompt: &str, config: &GenerationConfig, stream: bool) -> ChatRequest {
        ChatRequest {
            model: self.config.model.clone(),
            messages: vec![
                MessagePayload {
                    role: "system".into(),
                    content: SYSTEM_MESSAGE.into(),
                },
                MessagePayload {
                    role: "user".into(),
                    content: prompt.into(),
                },
            ],
            max_tokens: config.max_tokens,
            temperature: config.temperature,
            top_p: config.top_p,
            stream,
        }
    }

    async fn post(&self, request: &ChatRequest) -> BackendResult<reqwest::Response> {
        let url = Self::completions_url(&self.config.base_url);
        let mut builder = self.client.post(&url).json(request);
        if let Some(ref key) = self.config.api_key {
            if !key.is_empty() {
                builder = builder.bearer_auth(key);
            }
        }

        let response = builder.send().await.map_err(BackendError::Http)?;
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(BackendError::Api {
                status: status.as_u16(),
                message: body,
            });
        }
        Ok(response)
    }
}

#[async_trait]
impl Backend for RestBackend {
    fn name(&self) -> &str {
        &self.name
    }

    #[instrument(skip_all, fields(backend = %self.name, model = %self.config.model))]
    async fn generate(&self, prompt: &str, config: &GenerationConfig) -> BackendResult<String> {
        let request = self.build_request(prompt, config, false);
        debug!(
            max_tokens = request.max_tokens,
            prompt_chars = prompt.len(),
            "sending chat completion request"
        );

        let response = self.post(&request).await?;
        let completion: ChatResponse = response.json().await.map_err(BackendError::Http)?;
        completion
            .choices
            .into_iter()
            .next()
            .map(|choice| choice.message.content)
            .ok_or_else(|| BackendError::InvalidResponse {
                message: "response carried no choices".into(),
            })
    }

    #[instrument(skip_all, fields(backend = %self.name, model = %self.config.model))]
    async fn generate_stream(
        &self,
        prompt: &str,
        config: &GenerationConfig,
    ) -> BackendResult<TextStream> {
        let request = self.build_request(prompt, config, true);
        let response = self.post(&request).await?;

        Ok(Box::pin(async_stream::stream! {
            let mut events = response.bytes_stream().eventsource();
            while let Some(event) = events.next().await {
                match event {
                    Ok(event) => {
                        if event.data == "[DONE]" {
                            break;
                        }
                        // Undecodable chunks are skipped, not fatal.
                        let Ok(chunk) = serde_json::from_str::<StreamChunk>(&event.data) else {
                            continue;
                        };
                        let delta = chunk
                            .choices
                            .into_iter()
                            .next()
                            .and_then(|choice| choice.delta.content);
                        if let Some(delta) = delta {
                            if !delta.is_empty() {
                                yield Ok(delta);
                            }
                        }
                    }
                    Err(e) => {
                        yield Err(BackendError::InvalidResponse {
                            message: format!("event stream error: {e}"),
                        });
                        break;
                    }
                }
            }
        }))
    }
}

// ── Wire types ──────────────────────────────────────────────────────────────

#[derive(Debug, Serialize)]
struct ChatRequest {
    model: String,
    messages: Vec<MessagePayload>,
    max_tokens: u32,
    temperature: f32,
    top_p: f32,
    stream: bool,
}

#[derive(Debug, Serialize, Deserialize)]
struct MessagePayload {
    role: String,
    content: String,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    choices: Vec<Choice>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: MessagePayload,
}

#[derive(Debug, Deserialize)]
struct StreamChunk {
    choices: Vec<StreamChoice>,
}

#[derive(Debug, Deserialize)]
struct StreamChoice {
    delta: DeltaPayload,
}

#[derive(Debug, Deserialize)]
struct DeltaPayload {
    #[serde(default)]
    content: Option<String>,
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────

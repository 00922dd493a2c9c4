//! OpenAiChatBackend -- concrete [`CompletionBackend`] for an
//! OpenAI-compatible chat completions API.
//!
//! Sends requests to `{base_url}/chat/completions` with bearer-token
//! authentication and extracts the first choice's message content. No
//! streaming and no retry here; retry policy belongs to the relay.
//!
//! The API key is wrapped in [`secrecy::SecretString`] and is never logged
//! or included in `Debug` output.

use std::time::Duration;

use secrecy::{ExposeSecret, SecretString};

use medirelay_core::llm::CompletionBackend;
use medirelay_types::llm::{CompletionError, CompletionRequest, CompletionResponse, Usage};

use super::types::{ChatCompletionBody, ChatCompletionEnvelope, WireMessage};

/// Default base URL for the completion endpoint.
pub const DEFAULT_BASE_URL: &str = "https://api.openai.com/v1";

/// OpenAI-compatible chat completion backend.
///
/// # API Key Security
///
/// Does NOT derive Debug so the API key inside the client can never leak
/// through Debug or tracing output.
pub struct OpenAiChatBackend {
    client: reqwest::Client,
    api_key: SecretString,
    base_url: String,
}

impl OpenAiChatBackend {
    /// Create a new backend talking to [`DEFAULT_BASE_URL`].
    pub fn new(api_key: SecretString) -> Self {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(120))
            .build()
            .expect("failed to create reqwest client");

        Self {
            client,
            api_key,
            base_url: DEFAULT_BASE_URL.to_string(),
        }
    }

    /// Override the base URL (useful for tests or proxies).
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// Convert a generic [`CompletionRequest`] into the wire body.
    fn to_wire_body(request: &CompletionRequest) -> ChatCompletionBody {
        ChatCompletionBody {
            model: request.model.clone(),
            messages: request
                .messages
                .iter()
                .map(|m| WireMessage {
                    role: m.role.to_string(),
                    content: m.content.clone(),
                })
                .collect(),
            max_tokens: request.max_tokens,
            temperature: request.temperature,
        }
    }
}

impl CompletionBackend for OpenAiChatBackend {
    fn name(&self) -> &str {
        "openai"
    }

    async fn complete(
        &self,
        request: &CompletionRequest,
    ) -> Result<CompletionResponse, CompletionError> {
        let body = Self::to_wire_body(request);
        let url = format!("{}/chat/completions", self.base_url);

        let response = self
            .client
            .post(&url)
            .bearer_auth(self.api_key.expose_secret())
            .json(&body)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    CompletionError::Timeout(e.to_string())
                } else {
                    CompletionError::Network(e.to_string())
                }
            })?;

        let status = response.status();
        if !status.is_success() {
            let error_body = response.text().await.unwrap_or_default();
            tracing::error!(status = status.as_u16(), body = %error_body, "completion endpoint returned error");
            return Err(match status.as_u16() {
                401 => CompletionError::AuthenticationFailed,
                429 => CompletionError::RateLimited,
                code => CompletionError::Http {
                    status: code,
                    body: error_body,
                },
            });
        }

        let envelope: ChatCompletionEnvelope = response
            .json()
            .await
            .map_err(|e| CompletionError::MalformedResponse(format!("failed to parse response: {e}")))?;

        let content = envelope
            .choices
            .first()
            .and_then(|c| c.message.content.clone())
            .ok_or_else(|| {
                CompletionError::MalformedResponse("response contained no choices".to_string())
            })?;

        Ok(CompletionResponse {
            content,
            model: envelope.model,
            usage: envelope.usage.map(|u| Usage {
                prompt_tokens: u.prompt_tokens,
                completion_tokens: u.completion_tokens,
            }),
        })
    }
}

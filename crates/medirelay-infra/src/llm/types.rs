//! OpenAI chat completions wire types.
//!
//! These are endpoint-specific request/response structures used for HTTP
//! communication with an OpenAI-compatible chat completions API. They are
//! NOT the generic types from medirelay-types -- those are
//! backend-agnostic.

use serde::{Deserialize, Serialize};

/// Request body for `POST /chat/completions`.
#[derive(Debug, Clone, Serialize)]
pub struct ChatCompletionBody {
    pub model: String,
    pub messages: Vec<WireMessage>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_tokens: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub temperature: Option<f64>,
}

/// A single message on the wire.
#[derive(Debug, Clone, Serialize)]
pub struct WireMessage {
    pub role: String,
    pub content: String,
}

/// Response envelope: `{choices:[{message:{content}}], model?, usage?}`.
#[derive(Debug, Clone, Deserialize)]
pub struct ChatCompletionEnvelope {
    #[serde(default)]
    pub choices: Vec<Choice>,
    pub model: Option<String>,
    pub usage: Option<WireUsage>,
}

/// One completion choice.
#[derive(Debug, Clone, Deserialize)]
pub struct Choice {
    pub message: ChoiceMessage,
}

/// The message inside a choice.
#[derive(Debug, Clone, Deserialize)]
pub struct ChoiceMessage {
    pub content: Option<String>,
}

/// Token usage as reported by the endpoint.
#[derive(Debug, Clone, Deserialize)]
pub struct WireUsage {
    pub prompt_tokens: u32,
    pub completion_tokens: u32,
}

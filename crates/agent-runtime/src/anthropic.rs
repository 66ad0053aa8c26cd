//! Anthropic Messages API Provider
//!
//! Implementation of `LlmProvider` for `POST /v1/messages` with native tool
//! use. Tool results travel as `tool_result` blocks inside a user turn.

use agent_core::{
    error::{AgentError, Result},
    message::{ContentBlock, Message, Role},
    provider::{Completion, CompletionRequest, FinishReason, LlmProvider, TokenUsage},
};
use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use serde_json::{Value, json};

use crate::http::{build_client, read_body, transport_error};

/// Anthropic API base URL
pub const ANTHROPIC_BASE_URL: &str = "https://api.anthropic.com";

/// Anthropic API version header value
pub const ANTHROPIC_VERSION: &str = "2023-06-01";

/// Anthropic provider configuration
#[derive(Clone, Debug)]
pub struct AnthropicConfig {
    pub api_key: String,

    /// Base URL without the `/v1/messages` path
    pub base_url: String,

    /// Request timeout in seconds
    pub timeout_secs: u64,
}

impl AnthropicConfig {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            base_url: ANTHROPIC_BASE_URL.into(),
            timeout_secs: 120,
        }
    }

    /// Read `ANTHROPIC_API_KEY` and `ANTHROPIC_BASE_URL`
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let api_key = lookup("ANTHROPIC_API_KEY")
            .filter(|k| !k.trim().is_empty())
            .ok_or_else(|| AgentError::Config("ANTHROPIC_API_KEY not set".into()))?;

        let mut config = Self::new(api_key);
        if let Some(base_url) = lookup("ANTHROPIC_BASE_URL") {
            config.base_url = base_url;
        }
        Ok(config)
    }

    #[must_use]
    pub const fn with_timeout(mut self, timeout_secs: u64) -> Self {
        self.timeout_secs = timeout_secs;
        self
    }
}

/// Anthropic LLM provider
pub struct AnthropicProvider {
    client: Client,
    config: AnthropicConfig,
}

impl AnthropicProvider {
    /// Create from configuration
    pub fn from_config(config: AnthropicConfig) -> Result<Self> {
        Ok(Self {
            client: build_client(config.timeout_secs)?,
            config,
        })
    }

    /// Create from environment variables
    pub fn from_env() -> Result<Self> {
        Self::from_config(AnthropicConfig::from_env()?)
    }

    fn endpoint(&self) -> String {
        format!("{}/v1/messages", self.config.base_url.trim_end_matches('/'))
    }

    /// Build the JSON request body
    pub(crate) fn build_body(request: &CompletionRequest) -> Value {
        let messages: Vec<Value> = request.messages.iter().filter_map(convert_message).collect();

        let mut body = json!({
            "model": request.options.model,
            "max_tokens": request.options.max_tokens,
            "messages": messages,
        });

        if let Some(system) = &request.options.system_prompt {
            body["system"] = json!(system);
        }
        if let Some(temperature) = request.options.temperature {
            body["temperature"] = json!(temperature);
        }
        if !request.tools.is_empty() {
            body["tools"] = json!(request.tools);
        }

        body
    }

    /// Parse a response body into a completion
    pub(crate) fn parse_response(body: &str) -> Result<Completion> {
        let response: MessagesResponse = serde_json::from_str(body)
            .map_err(|e| AgentError::Parse(format!("Unexpected Anthropic response: {e}")))?;

        let finish_reason = match response.stop_reason.as_deref() {
            Some("end_turn" | "stop_sequence") | None => FinishReason::Stop,
            Some("tool_use") => FinishReason::ToolUse,
            Some("max_tokens") => FinishReason::Length,
            Some("refusal") => FinishReason::ContentFilter,
            Some(_) => FinishReason::Other,
        };

        Ok(Completion {
            content: response
                .content
                .into_iter()
                .filter(|b| *b != ContentBlock::Unsupported)
                .collect(),
            model: response.model,
            finish_reason,
            usage: response.usage.map(|u| TokenUsage {
                input_tokens: u.input_tokens,
                output_tokens: u.output_tokens,
            }),
        })
    }
}

/// Wire role and blocks for one message; empty messages are skipped
fn convert_message(message: &Message) -> Option<Value> {
    let role = match message.role {
        Role::User | Role::Tool => "user",
        Role::Assistant => "assistant",
    };

    let blocks: Vec<&ContentBlock> = message
        .content
        .iter()
        .filter(|b| **b != ContentBlock::Unsupported)
        .collect();

    if blocks.is_empty() {
        return None;
    }

    Some(json!({ "role": role, "content": blocks }))
}

#[derive(Deserialize)]
struct MessagesResponse {
    #[serde(default)]
    content: Vec<ContentBlock>,
    #[serde(default)]
    model: String,
    stop_reason: Option<String>,
    usage: Option<WireUsage>,
}

#[derive(Deserialize)]
struct WireUsage {
    #[serde(default)]
    input_tokens: u32,
    #[serde(default)]
    output_tokens: u32,
}

#[async_trait]
impl LlmProvider for AnthropicProvider {
    fn name(&self) -> &str {
        "anthropic"
    }

    async fn complete(&self, request: &CompletionRequest) -> Result<Completion> {
        let body = Self::build_body(request);

        let response = self
            .client
            .post(self.endpoint())
            .header("x-api-key", &self.config.api_key)
            .header("anthropic-version", ANTHROPIC_VERSION)
            .json(&body)
            .send()
            .await
            .map_err(|e| transport_error(&e))?;

        let text = read_body(response).await?;
        let completion = Self::parse_response(&text)?;

        tracing::debug!(
            model = %completion.model,
            finish_reason = ?completion.finish_reason,
            "Anthropic completion received"
        );

        Ok(completion)
    }
}

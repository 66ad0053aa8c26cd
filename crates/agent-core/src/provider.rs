//! LLM Provider Strategy Pattern
//!
//! Defines a common interface for remote completion services (Anthropic,
//! OpenRouter, ...) so the coordinator works with any backend without code
//! changes.
//!
//! ## Usage
//!
//! ```rust,ignore
//! use agent_core::provider::{CompletionRequest, GenerationOptions, LlmProvider};
//!
//! let provider = AnthropicProvider::from_config(config)?;
//! let request = CompletionRequest::new(GenerationOptions::default())
//!     .with_messages(vec![Message::user("Hello")]);
//! let completion = provider.complete(&request).await?;
//! ```

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::message::{ContentBlock, Message, join_text};
use crate::tool::{ToolInvocation, ToolSpec};

/// Default model identifier
pub const DEFAULT_MODEL: &str = "claude-sonnet-4-20250514";

/// Configuration for LLM generation
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct GenerationOptions {
    /// Model identifier (e.g., "claude-sonnet-4-20250514", "openai/gpt-oss-20b:free")
    pub model: String,

    /// Maximum tokens to generate
    #[serde(default = "default_max_tokens")]
    pub max_tokens: u32,

    /// System instructions
    #[serde(default)]
    pub system_prompt: Option<String>,

    /// Sampling temperature; provider default when unset
    #[serde(default)]
    pub temperature: Option<f32>,
}

const fn default_max_tokens() -> u32 {
    1024
}

impl Default for GenerationOptions {
    fn default() -> Self {
        Self {
            model: DEFAULT_MODEL.into(),
            max_tokens: default_max_tokens(),
            system_prompt: None,
            temperature: None,
        }
    }
}

impl GenerationOptions {
    pub fn with_model(model: impl Into<String>) -> Self {
        Self {
            model: model.into(),
            ..Default::default()
        }
    }
}

/// Everything sent to the completion service in one request
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct CompletionRequest {
    pub options: GenerationOptions,

    /// Declared tools
    #[serde(default)]
    pub tools: Vec<ToolSpec>,

    /// Conversation turns in order
    pub messages: Vec<Message>,
}

impl CompletionRequest {
    pub fn new(options: GenerationOptions) -> Self {
        Self {
            options,
            tools: Vec::new(),
            messages: Vec::new(),
        }
    }

    #[must_use]
    pub fn with_tools(mut self, tools: Vec<ToolSpec>) -> Self {
        self.tools = tools;
        self
    }

    #[must_use]
    pub fn with_messages(mut self, messages: Vec<Message>) -> Self {
        self.messages = messages;
        self
    }
}

/// Response from an LLM completion
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Completion {
    /// Content blocks (text and/or tool requests)
    pub content: Vec<ContentBlock>,

    /// Model that generated this response
    pub model: String,

    /// Finish reason
    pub finish_reason: FinishReason,

    /// Token usage statistics (if available)
    pub usage: Option<TokenUsage>,
}

impl Completion {
    /// Plain text completion, mostly useful for tests
    pub fn text_only(text: impl Into<String>) -> Self {
        Self {
            content: vec![ContentBlock::text(text)],
            model: String::new(),
            finish_reason: FinishReason::Stop,
            usage: None,
        }
    }

    /// Concatenated text blocks
    pub fn text(&self) -> String {
        join_text(&self.content)
    }

    /// First tool request, if any
    pub fn first_tool_use(&self) -> Option<ToolInvocation> {
        self.content.iter().find_map(ContentBlock::as_invocation)
    }

    /// Whether the service stopped to request a tool
    pub fn needs_tool(&self) -> bool {
        self.finish_reason == FinishReason::ToolUse
    }
}

/// Token usage statistics
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenUsage {
    pub input_tokens: u32,
    pub output_tokens: u32,
}

impl TokenUsage {
    pub const fn total(&self) -> u32 {
        self.input_tokens + self.output_tokens
    }

    pub fn add(&mut self, other: &Self) {
        self.input_tokens += other.input_tokens;
        self.output_tokens += other.output_tokens;
    }
}

/// Reason for completion finishing
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum FinishReason {
    Stop,
    Length,
    ToolUse,
    ContentFilter,
    Other,
}

/// Strategy trait for LLM providers
///
/// Implement this trait to add support for new completion services.
/// The coordinator works exclusively through this interface.
#[async_trait]
pub trait LlmProvider: Send + Sync {
    /// Short provider name for logs and reports
    fn name(&self) -> &str;

    /// Generate a completion
    async fn complete(&self, request: &CompletionRequest) -> Result<Completion>;

    /// Rough token estimate for services that do not report usage
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss, clippy::cast_precision_loss)]
    fn estimate_tokens(&self, text: &str) -> u32 {
        // ~1.3 tokens per whitespace-separated word
        (text.split_whitespace().count() as f64 * 1.3) as u32
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_generation_options_defaults() {
        let opts = GenerationOptions::default();
        assert_eq!(opts.max_tokens, 1024);
        assert_eq!(opts.model, DEFAULT_MODEL);
        assert!(opts.system_prompt.is_none());
    }

    #[test]
    fn test_completion_helpers() {
        let completion = Completion {
            content: vec![
                ContentBlock::text("Checking"),
                ContentBlock::ToolUse {
                    id: "t1".into(),
                    name: "get_weather".into(),
                    input: json!({"city": "Berlin"}),
                },
            ],
            model: "m".into(),
            finish_reason: FinishReason::ToolUse,
            usage: Some(TokenUsage {
                input_tokens: 10,
                output_tokens: 5,
            }),
        };

        assert!(completion.needs_tool());
        assert_eq!(completion.text(), "Checking");
        let call = completion.first_tool_use().unwrap();
        assert_eq!(call.id, "t1");
        assert_eq!(call.str_arg("city"), Some("Berlin"));
        assert_eq!(completion.usage.unwrap().total(), 15);
    }

    struct Silent;

    #[async_trait]
    impl LlmProvider for Silent {
        fn name(&self) -> &str {
            "silent"
        }

        async fn complete(&self, _request: &CompletionRequest) -> Result<Completion> {
            Ok(Completion::text_only(""))
        }
    }

    #[test]
    fn test_estimate_tokens_by_words() {
        assert_eq!(Silent.estimate_tokens("one two three four five six seven eight nine ten"), 13);
        assert_eq!(Silent.estimate_tokens(""), 0);
    }
}

//! Tool-Calling Round Trip
//!
//! One user turn costs at most two requests to the completion service:
//!
//! ```text
//! user ──▶ complete(history + user, tools)
//!              │
//!              ├── stop ──────────────▶ text
//!              │
//!              └── tool_use ─▶ dispatch ─▶ complete(.. + tool_use + tool_result) ─▶ text
//! ```
//!
//! Only the first requested tool is honoured; further `tool_use` blocks in the
//! same response are ignored. Service errors are returned to the caller
//! without retries, tool failures are folded into the tool result.

use std::sync::Arc;

use crate::error::{AgentError, Result};
use crate::message::{ContentBlock, Conversation, Message, Role};
use crate::provider::{Completion, CompletionRequest, GenerationOptions, LlmProvider, TokenUsage};
use crate::tool::{Tool, ToolInvocation, ToolRegistry, ToolResult};

/// Agent configuration
#[derive(Clone, Debug, Default)]
pub struct AgentConfig {
    /// Model, token limit and system instructions
    pub generation: GenerationOptions,
}

/// A tool request together with its local outcome
#[derive(Clone, Debug, PartialEq)]
pub struct ToolExchange {
    pub invocation: ToolInvocation,
    pub result: ToolResult,
}

/// Outcome of one round trip
#[derive(Clone, Debug, PartialEq)]
pub struct Reply {
    /// Final natural-language answer
    pub text: String,

    /// Tool used during the round trip, if any
    pub exchange: Option<ToolExchange>,

    /// Tokens consumed across both requests
    pub usage: TokenUsage,
}

impl Reply {
    /// Name of the tool used, `None` when the model answered directly
    pub fn used_tool(&self) -> Option<&str> {
        self.exchange.as_ref().map(|e| e.invocation.name.as_str())
    }
}

/// The round-trip coordinator
pub struct Agent {
    provider: Arc<dyn LlmProvider>,
    tools: Arc<ToolRegistry>,
    config: AgentConfig,
}

impl Agent {
    /// Create a new agent
    pub fn new(provider: Arc<dyn LlmProvider>, tools: Arc<ToolRegistry>, config: AgentConfig) -> Self {
        Self {
            provider,
            tools,
            config,
        }
    }

    /// Create with default configuration
    pub fn with_defaults(provider: Arc<dyn LlmProvider>, tools: Arc<ToolRegistry>) -> Self {
        Self::new(provider, tools, AgentConfig::default())
    }

    /// Run one round trip. `history` is extended with the user message, the
    /// assistant turns and the tool result only when the round trip succeeds.
    pub async fn send(&self, user_message: &str, history: &mut Conversation) -> Result<Reply> {
        let mut turn = vec![Message::user(user_message)];
        let mut usage = TokenUsage::default();

        let first = self.complete(history, &turn).await?;
        if let Some(u) = &first.usage {
            usage.add(u);
        }

        let invocation = if first.needs_tool() {
            first.first_tool_use()
        } else {
            None
        };

        let Some(invocation) = invocation else {
            let text = first.text();
            turn.push(Message::new(Role::Assistant, text_blocks(first.content)));
            history.extend(turn);
            return Ok(Reply {
                text,
                exchange: None,
                usage,
            });
        };

        tracing::info!(
            tool = %invocation.name,
            arguments = %serde_json::Value::Object(invocation.arguments.clone()),
            "Model requested tool"
        );

        let result = self.tools.dispatch(&invocation).await;
        if result.success {
            tracing::debug!(tool = %result.name, "Tool succeeded");
        } else {
            tracing::warn!(tool = %result.name, output = %result.payload, "Tool failed");
        }

        turn.push(Message::new(
            Role::Assistant,
            echo_blocks(first.content, &invocation.id),
        ));
        turn.push(Message::tool_result(&result));

        let second = self.complete(history, &turn).await?;
        if let Some(u) = &second.usage {
            usage.add(u);
        }
        if second.needs_tool() {
            tracing::debug!("Follow-up asked for another tool; returning its text as final");
        }

        let text = second.text();
        turn.push(Message::new(Role::Assistant, text_blocks(second.content)));
        history.extend(turn);

        Ok(Reply {
            text,
            exchange: Some(ToolExchange { invocation, result }),
            usage,
        })
    }

    /// Run a round trip on a fresh conversation
    pub async fn ask(&self, question: &str) -> Result<Reply> {
        let mut conversation = Conversation::new();
        self.send(question, &mut conversation).await
    }

    async fn complete(&self, history: &Conversation, turn: &[Message]) -> Result<Completion> {
        let messages = history.messages().iter().chain(turn).cloned().collect();
        let request = CompletionRequest::new(self.config.generation.clone())
            .with_tools(self.tools.specs())
            .with_messages(messages);

        tracing::debug!(
            provider = self.provider.name(),
            messages = request.messages.len(),
            tools = request.tools.len(),
            "Requesting completion"
        );

        self.provider.complete(&request).await
    }

    /// Get the tool registry
    pub fn tools(&self) -> &ToolRegistry {
        &self.tools
    }

    /// Get configuration
    pub const fn config(&self) -> &AgentConfig {
        &self.config
    }
}

/// Assistant content echoed back with the tool result: the chosen `tool_use`
/// block stays, other tool requests are dropped so none lacks a result.
fn echo_blocks(content: Vec<ContentBlock>, keep_id: &str) -> Vec<ContentBlock> {
    content
        .into_iter()
        .filter(|block| match block {
            ContentBlock::Text { .. } => true,
            ContentBlock::ToolUse { id, .. } => id == keep_id,
            ContentBlock::ToolResult { .. } | ContentBlock::Unsupported => false,
        })
        .collect()
}

fn text_blocks(content: Vec<ContentBlock>) -> Vec<ContentBlock> {
    content
        .into_iter()
        .filter(|block| matches!(block, ContentBlock::Text { .. }))
        .collect()
}

/// Builder for Agent configuration
pub struct AgentBuilder {
    provider: Option<Arc<dyn LlmProvider>>,
    tools: ToolRegistry,
    config: AgentConfig,
}

impl Default for AgentBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl AgentBuilder {
    pub fn new() -> Self {
        Self {
            provider: None,
            tools: ToolRegistry::new(),
            config: AgentConfig::default(),
        }
    }

    #[must_use]
    pub fn provider(mut self, provider: Arc<dyn LlmProvider>) -> Self {
        self.provider = Some(provider);
        self
    }

    #[must_use]
    pub fn tool<T: Tool + 'static>(mut self, tool: T) -> Self {
        self.tools.register(tool);
        self
    }

    #[must_use]
    pub fn tools(mut self, tools: ToolRegistry) -> Self {
        self.tools = tools;
        self
    }

    #[must_use]
    pub fn generation(mut self, generation: GenerationOptions) -> Self {
        self.config.generation = generation;
        self
    }

    #[must_use]
    pub fn system_prompt(mut self, prompt: impl Into<String>) -> Self {
        self.config.generation.system_prompt = Some(prompt.into());
        self
    }

    #[must_use]
    pub fn model(mut self, model: impl Into<String>) -> Self {
        self.config.generation.model = model.into();
        self
    }

    #[must_use]
    pub const fn max_tokens(mut self, max: u32) -> Self {
        self.config.generation.max_tokens = max;
        self
    }

    pub fn build(self) -> Result<Agent> {
        let provider = self
            .provider
            .ok_or_else(|| AgentError::Config("Provider is required".into()))?;

        Ok(Agent::new(provider, Arc::new(self.tools), self.config))
    }
}

//! # agent-core
//!
//! The tool-calling round trip shared by every agent program in this
//! workspace, independent of which completion service answers.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                        Agent                                │
//! │  ┌─────────────┐  ┌─────────────┐  ┌─────────────────────┐  │
//! │  │ Round trip  │  │    Tool     │  │   LlmProvider       │  │
//! │  │ coordinator │──│  Registry   │──│   (Strategy)        │  │
//! │  └─────────────┘  └─────────────┘  └─────────────────────┘  │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! The `LlmProvider` trait enables swapping between Anthropic, OpenRouter or
//! any other service without changing agent logic.

pub mod envelope;
pub mod error;
pub mod message;
pub mod provider;
pub mod reasoning;
pub mod tool;

#[cfg(any(test, feature = "testing"))]
pub mod testing;

pub use envelope::{ENVELOPE_SYSTEM_PROMPT, ResponseEnvelope};
pub use error::{AgentError, Result};
pub use message::{ContentBlock, Conversation, Message, Role};
pub use provider::{Completion, CompletionRequest, FinishReason, GenerationOptions, LlmProvider, TokenUsage};
pub use reasoning::{Agent, AgentBuilder, Reply, ToolExchange};
pub use tool::{Tool, ToolInvocation, ToolPayload, ToolRegistry, ToolResult, ToolSpec};

//! # agent-runtime
//!
//! Remote completion services behind `agent_core::LlmProvider`.
//!
//! ## Providers
//!
//! - **Anthropic** (default): Messages API with native tool use
//! - **OpenRouter** (default): OpenAI-compatible chat completions, used by the
//!   benchmark to reach third-party models
//!
//! ## Usage
//!
//! ```rust,ignore
//! use agent_runtime::{AnthropicConfig, AnthropicProvider};
//!
//! let provider = AnthropicProvider::from_config(AnthropicConfig::from_env()?)?;
//! let agent = AgentBuilder::new()
//!     .provider(Arc::new(provider))
//!     .build()?;
//! ```

mod http;

#[cfg(feature = "anthropic")]
pub mod anthropic;

#[cfg(feature = "openrouter")]
pub mod openrouter;

#[cfg(feature = "anthropic")]
pub use anthropic::{AnthropicConfig, AnthropicProvider};

#[cfg(feature = "openrouter")]
pub use openrouter::{OpenRouterConfig, OpenRouterProvider};

// Re-export core types for convenience
pub use agent_core::{Agent, AgentError, LlmProvider, Message, Result, Role, Tool, ToolRegistry};

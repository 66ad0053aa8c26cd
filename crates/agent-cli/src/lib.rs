//! # agent-cli
//!
//! Shared pieces of the console programs in `src/bin/`:
//!
//! | Binary              | Purpose                                            |
//! |---------------------|----------------------------------------------------|
//! | `agent-chat`        | tool-using chat agent                              |
//! | `agent-json-chat`   | same agent, answers shaped as a JSON envelope      |
//! | `agent-bench`       | one prompt against several models, timed           |
//! | `tool-server`       | built-in tools over stdio JSON-RPC                 |
//! | `tool-client`       | interactive client for the tool server             |
//! | `weather-collector` | periodic weather collection into a JSON file       |
//! | `notify-test`       | sends a test message through Telegram              |

pub mod benchmark;
pub mod collector;
pub mod config;
pub mod console;
pub mod history;
pub mod logging;

pub use config::{AppConfig, CollectorSettings};

use std::sync::Arc;

use agent_core::{Agent, AgentBuilder};
use agent_runtime::AnthropicProvider;
use agent_tools::{ToolContext, ToolKind};

/// Tools offered by the chat agents and the collector
pub const CHAT_TOOLS: [ToolKind; 3] = [ToolKind::Calculate, ToolKind::GetWeather, ToolKind::GetCurrentTime];

/// Tools served by `tool-server`
pub const SERVER_TOOLS: [ToolKind; 3] = [ToolKind::GetWeather, ToolKind::Calculate, ToolKind::ReadFile];

/// Tool context for this process
pub fn tool_context(config: &AppConfig) -> ToolContext {
    ToolContext::default().with_file_root(config.file_root.clone())
}

/// Anthropic-backed agent with the given tools and system prompt
pub fn build_agent(config: &AppConfig, kinds: &[ToolKind], system_prompt: &str) -> anyhow::Result<Agent> {
    let provider = AnthropicProvider::from_config(config.require_anthropic()?)?;
    let agent = AgentBuilder::new()
        .provider(Arc::new(provider))
        .tools(agent_tools::registry(kinds, &tool_context(config)))
        .generation(config.generation.clone())
        .system_prompt(system_prompt)
        .build()?;
    Ok(agent)
}

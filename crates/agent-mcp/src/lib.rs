//! # agent-mcp
//!
//! Minimal tool discovery and invocation protocol: JSON-RPC 2.0, one
//! message per line, over a pair of byte streams (normally the stdio of a
//! child process).
//!
//! | Method                      | Result                                      |
//! |-----------------------------|---------------------------------------------|
//! | `initialize`                | `{protocolVersion, serverInfo, capabilities}` |
//! | `notifications/initialized` | none (notification)                         |
//! | `tools/list`                | `{tools: [{name, description, inputSchema}]}` |
//! | `tools/call`                | `{content: [{type: "text", text}], isError}`  |
//!
//! ```rust,ignore
//! let mut client = ToolClient::spawn("tool-server", &[]).await?;
//! let info = client.initialize().await?;
//! let tools = client.list_tools().await?;
//! let result = client.call_tool("calculate", args).await?;
//! ```

pub mod client;
pub mod error;
pub mod protocol;
pub mod server;

pub use client::ToolClient;
pub use error::{McpError, Result};
pub use protocol::{CallToolResult, InitializeResult, ServerInfo, TextContent, ToolDescriptor};
pub use server::ToolServer;

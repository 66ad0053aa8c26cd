//! Built-in tools over stdio

use std::sync::Arc;

use agent_cli::{AppConfig, SERVER_TOOLS, logging, tool_context};
use agent_mcp::{ServerInfo, ToolServer};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    logging::init("warn");

    let config = AppConfig::from_env()?;
    let registry = agent_tools::registry(&SERVER_TOOLS, &tool_context(&config));

    let server = ToolServer::new(
        Arc::new(registry),
        ServerInfo::new("tool-server", env!("CARGO_PKG_VERSION")),
    );
    server.serve_stdio().await?;

    Ok(())
}

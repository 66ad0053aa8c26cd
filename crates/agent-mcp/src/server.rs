//! Tool Server
//!
//! Serves a [`ToolRegistry`] to one client. Reads one request per line,
//! writes one response per line, and returns when the input stream ends.

use std::sync::Arc;

use serde_json::{Value, json};
use tokio::io::{AsyncBufReadExt, AsyncRead, AsyncWrite, AsyncWriteExt, BufReader};

use agent_core::{ToolInvocation, ToolRegistry};

use crate::error::Result;
use crate::protocol::{
    CallToolParams, CallToolResult, INVALID_PARAMS, INVALID_REQUEST, InitializeResult,
    JSONRPC_VERSION, ListToolsResult, METHOD_CALL_TOOL, METHOD_INITIALIZE, METHOD_INITIALIZED,
    METHOD_LIST_TOOLS, METHOD_NOT_FOUND, METHOD_PING, PARSE_ERROR, PROTOCOL_VERSION, Request,
    Response, ServerInfo, TextContent,
};

/// Stdio tool server
pub struct ToolServer {
    registry: Arc<ToolRegistry>,
    info: ServerInfo,
}

impl ToolServer {
    pub fn new(registry: Arc<ToolRegistry>, info: ServerInfo) -> Self {
        Self { registry, info }
    }

    pub const fn info(&self) -> &ServerInfo {
        &self.info
    }

    /// Serve on the process's stdin/stdout
    pub async fn serve_stdio(&self) -> Result<()> {
        self.serve(tokio::io::stdin(), tokio::io::stdout()).await
    }

    /// Answer requests until `reader` reaches end of stream
    pub async fn serve<R, W>(&self, reader: R, mut writer: W) -> Result<()>
    where
        R: AsyncRead + Unpin,
        W: AsyncWrite + Unpin,
    {
        let mut lines = BufReader::new(reader).lines();
        tracing::info!(server = %self.info.name, tools = self.registry.len(), "Tool server ready");

        while let Some(line) = lines.next_line().await? {
            if line.trim().is_empty() {
                continue;
            }
            if let Some(response) = self.handle_line(&line).await {
                let mut encoded = serde_json::to_string(&response)?;
                encoded.push('\n');
                writer.write_all(encoded.as_bytes()).await?;
                writer.flush().await?;
            }
        }

        tracing::info!("Client closed the connection");
        Ok(())
    }

    /// Response for one raw line; `None` for notifications
    pub async fn handle_line(&self, line: &str) -> Option<Response> {
        let value: Value = match serde_json::from_str(line) {
            Ok(value) => value,
            Err(e) => {
                tracing::warn!(error = %e, "Unparseable request");
                return Some(Response::error(Value::Null, PARSE_ERROR, format!("Parse error: {e}")));
            }
        };

        let id = value.get("id").cloned();
        let request: Request = match serde_json::from_value(value) {
            Ok(request) => request,
            Err(e) => {
                return Some(Response::error(
                    id.unwrap_or(Value::Null),
                    INVALID_REQUEST,
                    format!("Invalid request: {e}"),
                ));
            }
        };

        if request.jsonrpc != JSONRPC_VERSION {
            return request.id.map(|id| {
                Response::error(id, INVALID_REQUEST, "Only JSON-RPC 2.0 is supported")
            });
        }

        self.handle(request).await
    }

    /// Dispatch a parsed request
    pub async fn handle(&self, request: Request) -> Option<Response> {
        let Some(id) = request.id else {
            match request.method.as_str() {
                METHOD_INITIALIZED => tracing::debug!("Client initialized"),
                other => tracing::debug!(method = other, "Ignoring notification"),
            }
            return None;
        };

        tracing::debug!(method = %request.method, "Request received");
        let response = match request.method.as_str() {
            METHOD_INITIALIZE => Response::result(id, self.initialize_result()),
            METHOD_PING => Response::result(id, json!({})),
            METHOD_LIST_TOOLS => {
                let tools = ListToolsResult {
                    tools: self.registry.specs().into_iter().map(Into::into).collect(),
                };
                Response::result(id, json!(tools))
            }
            METHOD_CALL_TOOL => match serde_json::from_value::<CallToolParams>(request.params) {
                Ok(params) => {
                    let call_id = format!("rpc-{id}");
                    Response::result(id, json!(self.call_tool(&call_id, params).await))
                }
                Err(e) => Response::error(id, INVALID_PARAMS, format!("Invalid params: {e}")),
            },
            other => Response::error(id, METHOD_NOT_FOUND, format!("Method not found: {other}")),
        };

        Some(response)
    }

    fn initialize_result(&self) -> Value {
        let result = InitializeResult {
            protocol_version: PROTOCOL_VERSION.into(),
            server_info: self.info.clone(),
            capabilities: json!({"tools": {}}),
        };
        json!(result)
    }

    async fn call_tool(&self, call_id: &str, params: CallToolParams) -> CallToolResult {
        let invocation = ToolInvocation::new(call_id, params.name, params.arguments);
        let result = self.registry.dispatch(&invocation).await;

        tracing::info!(tool = %result.name, success = result.success, "Tool called");
        CallToolResult {
            content: vec![TextContent::text(result.payload.to_content())],
            is_error: !result.success,
        }
    }
}

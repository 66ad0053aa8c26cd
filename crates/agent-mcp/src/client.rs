//! Tool Client
//!
//! Talks to a tool server over any byte-stream pair. Requests are sent one
//! at a time and each must be answered before the next goes out.

use std::process::Stdio;

use serde::de::DeserializeOwned;
use serde_json::{Map, Value, json};
use tokio::io::{AsyncBufReadExt, AsyncRead, AsyncWrite, AsyncWriteExt, BufReader, Lines};
use tokio::process::{Child, Command};

use agent_core::ToolSpec;

use crate::error::{McpError, Result};
use crate::protocol::{
    CallToolParams, CallToolResult, InitializeResult, ListToolsResult, METHOD_CALL_TOOL,
    METHOD_INITIALIZE, METHOD_INITIALIZED, METHOD_LIST_TOOLS, PROTOCOL_VERSION, Request, Response,
};

type BoxedReader = Box<dyn AsyncRead + Unpin + Send>;
type BoxedWriter = Box<dyn AsyncWrite + Unpin + Send>;

/// Client side of the tool protocol
pub struct ToolClient {
    reader: Lines<BufReader<BoxedReader>>,
    writer: BoxedWriter,
    next_id: u64,
    child: Option<Child>,
}

impl ToolClient {
    /// Use an existing stream pair
    pub fn connect<R, W>(reader: R, writer: W) -> Self
    where
        R: AsyncRead + Unpin + Send + 'static,
        W: AsyncWrite + Unpin + Send + 'static,
    {
        let reader: BoxedReader = Box::new(reader);
        Self {
            reader: BufReader::new(reader).lines(),
            writer: Box::new(writer),
            next_id: 1,
            child: None,
        }
    }

    /// Start `command` with piped stdin/stdout; its stderr is inherited.
    /// The child is killed when the client is dropped.
    pub fn spawn(command: &str, args: &[String]) -> Result<Self> {
        let spawn_error = |source| McpError::Spawn {
            command: command.to_string(),
            source,
        };

        let mut child = Command::new(command)
            .args(args)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::inherit())
            .kill_on_drop(true)
            .spawn()
            .map_err(spawn_error)?;

        let stdin = child.stdin.take().ok_or(McpError::Closed)?;
        let stdout = child.stdout.take().ok_or(McpError::Closed)?;
        tracing::debug!(command, "Tool server started");

        let mut client = Self::connect(stdout, stdin);
        client.child = Some(child);
        Ok(client)
    }

    /// Handshake: `initialize` followed by the `initialized` notification
    pub async fn initialize(&mut self) -> Result<InitializeResult> {
        let params = json!({
            "protocolVersion": PROTOCOL_VERSION,
            "capabilities": {},
            "clientInfo": {
                "name": env!("CARGO_PKG_NAME"),
                "version": env!("CARGO_PKG_VERSION"),
            },
        });
        let result = self.request(METHOD_INITIALIZE, params).await?;
        self.notify(METHOD_INITIALIZED).await?;
        Ok(result)
    }

    /// Tools offered by the server, in server order
    pub async fn list_tools(&mut self) -> Result<Vec<ToolSpec>> {
        let result: ListToolsResult = self.request(METHOD_LIST_TOOLS, json!({})).await?;
        Ok(result.tools.into_iter().map(Into::into).collect())
    }

    /// Invoke a tool by name
    pub async fn call_tool(
        &mut self,
        name: &str,
        arguments: Map<String, Value>,
    ) -> Result<CallToolResult> {
        let params = CallToolParams {
            name: name.to_string(),
            arguments,
        };
        self.request(METHOD_CALL_TOOL, json!(params)).await
    }

    /// Close the server's stdin and wait for it to exit
    pub async fn shutdown(self) -> Result<()> {
        let Self {
            writer, mut child, ..
        } = self;
        drop(writer);

        if let Some(child) = child.as_mut() {
            let status = child.wait().await?;
            tracing::debug!(%status, "Tool server exited");
        }
        Ok(())
    }

    async fn request<T: DeserializeOwned>(&mut self, method: &str, params: Value) -> Result<T> {
        let id = self.next_id;
        self.next_id += 1;

        self.send(&Request::new(id, method, params)).await?;
        let response = self.read_response().await?;

        if response.id != Value::from(id) {
            return Err(McpError::UnexpectedResponse(format!(
                "expected id {id}, got {}",
                response.id
            )));
        }
        if let Some(error) = response.error {
            return Err(McpError::Rpc {
                code: error.code,
                message: error.message,
            });
        }

        Ok(serde_json::from_value(response.result.unwrap_or(Value::Null))?)
    }

    async fn notify(&mut self, method: &str) -> Result<()> {
        self.send(&Request::notification(method)).await
    }

    async fn send(&mut self, request: &Request) -> Result<()> {
        let mut encoded = serde_json::to_string(request)?;
        encoded.push('\n');
        self.writer.write_all(encoded.as_bytes()).await?;
        self.writer.flush().await?;
        Ok(())
    }

    async fn read_response(&mut self) -> Result<Response> {
        loop {
            let line = self.reader.next_line().await?.ok_or(McpError::Closed)?;
            if !line.trim().is_empty() {
                return Ok(serde_json::from_str(&line)?);
            }
        }
    }
}

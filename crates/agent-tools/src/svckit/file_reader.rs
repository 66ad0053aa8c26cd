//! File Reader Tool
//!
//! Reads UTF-8 text files below a fixed root directory. Paths that resolve
//! outside the root (through `..` or symlinks) are refused.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use serde_json::json;

use agent_core::{Result, Tool, ToolInvocation, ToolResult, ToolSpec};

use crate::kind::ToolKind;

/// Largest file the tool will return
pub const DEFAULT_MAX_BYTES: u64 = 64 * 1024;

/// Tool for reading files under a root directory
#[derive(Clone, Debug)]
pub struct FileReaderTool {
    root: PathBuf,
    max_bytes: u64,
}

impl FileReaderTool {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            max_bytes: DEFAULT_MAX_BYTES,
        }
    }

    #[must_use]
    pub const fn with_max_bytes(mut self, max_bytes: u64) -> Self {
        self.max_bytes = max_bytes;
        self
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Canonical target path, if it stays inside the root
    async fn resolve(&self, requested: &str) -> std::result::Result<PathBuf, String> {
        let root = tokio::fs::canonicalize(&self.root)
            .await
            .map_err(|e| format!("File root unavailable: {e}"))?;
        let target = tokio::fs::canonicalize(root.join(requested))
            .await
            .map_err(|e| format!("Cannot open '{requested}': {e}"))?;

        if target.starts_with(&root) {
            Ok(target)
        } else {
            Err(format!("Access denied: '{requested}' is outside the allowed directory"))
        }
    }

    async fn read(&self, requested: &str) -> std::result::Result<String, String> {
        let path = self.resolve(requested).await?;

        let metadata = tokio::fs::metadata(&path)
            .await
            .map_err(|e| format!("Cannot open '{requested}': {e}"))?;
        if !metadata.is_file() {
            return Err(format!("'{requested}' is not a regular file"));
        }
        if metadata.len() > self.max_bytes {
            return Err(format!(
                "File too large: {} bytes (limit {})",
                metadata.len(),
                self.max_bytes
            ));
        }

        tokio::fs::read_to_string(&path)
            .await
            .map_err(|e| format!("Failed to read '{requested}': {e}"))
    }
}

#[async_trait]
impl Tool for FileReaderTool {
    fn spec(&self) -> ToolSpec {
        ToolSpec::new(
            ToolKind::ReadFile.name(),
            "Read the contents of a text file from the working directory.",
        )
        .param("filepath", "string", "Path relative to the working directory", true)
    }

    async fn execute(&self, call: &ToolInvocation) -> Result<ToolResult> {
        let name = ToolKind::ReadFile.name();
        let requested = call.str_arg("filepath").unwrap_or_default().trim();
        if requested.is_empty() {
            return Ok(ToolResult::failure(name, "File path must not be empty"));
        }

        match self.read(requested).await {
            Ok(content) => Ok(ToolResult::success(
                name,
                json!({
                    "filepath": requested,
                    "bytes": content.len(),
                    "content": content,
                }),
            )),
            Err(reason) => {
                tracing::debug!(filepath = requested, %reason, "File read refused");
                Ok(ToolResult::failure(name, reason))
            }
        }
    }
}

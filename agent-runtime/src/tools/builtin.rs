//! Built-in tools wired to a `FilesystemServer`.
//!
//! Naming and argument shape follow the teacher's file tools
//! (`read`/`write_file`): path relative to a root, offset/limit for reads.

use std::sync::Arc;

use async_trait::async_trait;
use serde_json::json;

use crate::fs::FilesystemServer;
use crate::llm::ToolSpec;

use super::r#trait::{Tool, ToolOutcome};
use super::context::ToolContext;

pub const TOOL_READ_FILE: &str = "read_file";
pub const TOOL_WRITE_FILE: &str = "write_file";
pub const TOOL_LIST_FILES: &str = "list_files";

pub struct ReadFileTool {
    fs: Arc<FilesystemServer>,
}

impl ReadFileTool {
    pub fn new(fs: Arc<FilesystemServer>) -> Self {
        Self { fs }
    }
}

#[async_trait]
impl Tool for ReadFileTool {
    fn name(&self) -> &str {
        TOOL_READ_FILE
    }

    fn spec(&self) -> ToolSpec {
        ToolSpec {
            name: TOOL_READ_FILE.to_string(),
            description: Some("Read a file's content from the agent's working filesystem.".to_string()),
            input_schema: json!({
                "type": "object",
                "properties": {
                    "path": {"type": "string", "description": "File path, e.g. /notes/todo.md"}
                },
                "required": ["path"]
            }),
        }
    }

    async fn call(&self, args: serde_json::Value, _ctx: &ToolContext<'_>) -> ToolOutcome {
        let Some(path) = args.get("path").and_then(|v| v.as_str()) else {
            return ToolOutcome::error("missing required argument: path");
        };
        match self.fs.read(path).await {
            Ok(Some(content)) => ToolOutcome::ok(content),
            Ok(None) => ToolOutcome::error(format!("file not found: {path}")),
            Err(e) => ToolOutcome::error(e.to_string()),
        }
    }
}

pub struct WriteFileTool {
    fs: Arc<FilesystemServer>,
}

impl WriteFileTool {
    pub fn new(fs: Arc<FilesystemServer>) -> Self {
        Self { fs }
    }
}

#[async_trait]
impl Tool for WriteFileTool {
    fn name(&self) -> &str {
        TOOL_WRITE_FILE
    }

    fn spec(&self) -> ToolSpec {
        ToolSpec {
            name: TOOL_WRITE_FILE.to_string(),
            description: Some("Write a file's content in the agent's working filesystem, creating it if needed.".to_string()),
            input_schema: json!({
                "type": "object",
                "properties": {
                    "path": {"type": "string"},
                    "content": {"type": "string"}
                },
                "required": ["path", "content"]
            }),
        }
    }

    async fn call(&self, args: serde_json::Value, _ctx: &ToolContext<'_>) -> ToolOutcome {
        let (Some(path), Some(content)) = (
            args.get("path").and_then(|v| v.as_str()),
            args.get("content").and_then(|v| v.as_str()),
        ) else {
            return ToolOutcome::error("missing required argument: path or content");
        };
        match self.fs.write(path, content).await {
            Ok(()) => {
                let mut delta = serde_json::Map::new();
                delta.insert("last_written_path".to_string(), json!(path));
                ToolOutcome::ok(format!("wrote {path}")).with_state_delta(delta)
            }
            Err(e) => ToolOutcome::error(e.to_string()),
        }
    }
}

pub struct ListFilesTool {
    fs: Arc<FilesystemServer>,
}

impl ListFilesTool {
    pub fn new(fs: Arc<FilesystemServer>) -> Self {
        Self { fs }
    }
}

#[async_trait]
impl Tool for ListFilesTool {
    fn name(&self) -> &str {
        TOOL_LIST_FILES
    }

    fn spec(&self) -> ToolSpec {
        ToolSpec {
            name: TOOL_LIST_FILES.to_string(),
            description: Some("List files under a path prefix in the agent's working filesystem.".to_string()),
            input_schema: json!({
                "type": "object",
                "properties": {
                    "prefix": {"type": "string", "default": "/"}
                }
            }),
        }
    }

    async fn call(&self, args: serde_json::Value, _ctx: &ToolContext<'_>) -> ToolOutcome {
        let prefix = args.get("prefix").and_then(|v| v.as_str()).unwrap_or("/");
        match self.fs.list(prefix).await {
            Ok(paths) => ToolOutcome::ok(paths.join("\n")),
            Err(e) => ToolOutcome::error(e.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::supervisor::ScopeKey;

    fn ctx() -> ToolContext<'static> {
        // leaked on purpose: only used to provide `'static` storage for a throwaway scope in tests
        let scope: &'static ScopeKey = Box::leak(Box::new(ScopeKey::agent("t", "a")));
        ToolContext {
            scope,
            recent_messages: &[],
        }
    }

    #[tokio::test]
    async fn write_then_read_file_round_trips() {
        let fs = Arc::new(FilesystemServer::memory());
        let write = WriteFileTool::new(fs.clone());
        let read = ReadFileTool::new(fs.clone());
        let ctx = ctx();
        let out = write
            .call(json!({"path": "/a.txt", "content": "hi"}), &ctx)
            .await;
        assert!(!out.is_error);
        let out = read.call(json!({"path": "/a.txt"}), &ctx).await;
        assert_eq!(out.content, "hi");
    }

    #[tokio::test]
    async fn read_missing_file_is_a_tool_error_not_a_panic() {
        let fs = Arc::new(FilesystemServer::memory());
        let read = ReadFileTool::new(fs);
        let out = read.call(json!({"path": "/missing.txt"}), &ctx()).await;
        assert!(out.is_error);
    }
}

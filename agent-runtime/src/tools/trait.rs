//! The `Tool` trait: one callable surface the model can invoke.

use async_trait::async_trait;
use serde_json::Value;

use crate::llm::ToolSpec;
use crate::message::ToolResult;

use super::ToolContext;

/// Outcome of one tool call.
///
/// `content` becomes a `ToolResult`; `state_delta`, when present, is merged
/// into the agent's metadata map by `execute_tools` before the next model
/// call, letting a tool communicate structured side effects (e.g. a
/// filesystem tool reporting which paths it touched) without every tool
/// needing to mutate `State` directly.
pub struct ToolOutcome {
    pub content: String,
    pub is_error: bool,
    pub state_delta: Option<serde_json::Map<String, Value>>,
}

impl ToolOutcome {
    pub fn ok(content: impl Into<String>) -> Self {
        Self {
            content: content.into(),
            is_error: false,
            state_delta: None,
        }
    }

    pub fn error(content: impl Into<String>) -> Self {
        Self {
            content: content.into(),
            is_error: true,
            state_delta: None,
        }
    }

    pub fn with_state_delta(mut self, delta: serde_json::Map<String, Value>) -> Self {
        self.state_delta = Some(delta);
        self
    }
}

/// One tool a model can call.
///
/// Each tool has a unique name, a spec (description + JSON schema for the
/// model), and a call implementation. Tools never return a hard `Err`: a
/// failing call produces `ToolOutcome::error(..)`, which `execute_tools`
/// turns into a `ToolResult { is_error: true, .. }` observed by the model,
/// matching the taxonomy's `tool_error` (observable, not fatal).
#[async_trait]
pub trait Tool: Send + Sync {
    fn name(&self) -> &str;

    fn spec(&self) -> ToolSpec;

    async fn call(&self, args: Value, ctx: &ToolContext<'_>) -> ToolOutcome;
}

/// Converts one `Tool::call` outcome, paired with the originating call id
/// and name, into the `ToolResult` the model sees.
pub fn outcome_to_result(call_id: impl Into<String>, name: impl Into<String>, outcome: ToolOutcome) -> ToolResult {
    ToolResult {
        tool_call_id: call_id.into(),
        name: name.into(),
        content: outcome.content,
        is_error: outcome.is_error,
    }
}

//! Tool call and tool result types.
//!
//! `ToolCall` aligns with MCP `tools/call`: `name` plus `arguments` (carried
//! as parsed JSON rather than a raw string, since callers need to validate
//! and merge partial arguments while streaming).

use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::MessageStatus;

/// Lifecycle of a single tool call within an assistant message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ToolCallStatus {
    /// Arguments are still streaming in.
    Pending,
    /// Arguments are complete; ready for `execute_tools`.
    Ready,
    /// A result has been produced for this call.
    Executed,
}

/// One tool invocation requested by the assistant.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolCall {
    pub call_id: String,
    /// Position among tool calls in the same assistant turn; streaming deltas
    /// key off this, not `call_id`, since the id may arrive after the first chunk.
    pub index: usize,
    pub status: ToolCallStatus,
    pub name: String,
    pub arguments: Value,
    /// Raw JSON text accumulated across `arguments_delta` fragments. Parsed
    /// once, when the call reaches `Ready`/`Executed`, rather than per fragment.
    #[serde(default)]
    pub arguments_raw: String,
    /// Set when `arguments_raw` failed to parse as JSON once the call
    /// completed. `execute_tools` turns this into a `ToolResult { is_error: true }`
    /// instead of invoking the tool with garbage arguments.
    #[serde(default)]
    pub arguments_parse_error: Option<String>,
}

impl ToolCall {
    pub fn new(call_id: impl Into<String>, index: usize, name: impl Into<String>, arguments: Value) -> Self {
        let arguments_raw = arguments.to_string();
        Self {
            call_id: call_id.into(),
            index,
            status: ToolCallStatus::Ready,
            name: name.into(),
            arguments,
            arguments_raw,
            arguments_parse_error: None,
        }
    }

    /// Parses `arguments_raw` into `arguments`, recording a parse error
    /// instead of silently discarding an unparsable buffer. An empty buffer
    /// (a tool call with no arguments at all) parses as an empty object.
    fn finalize_arguments(&mut self) {
        if self.arguments_raw.trim().is_empty() {
            self.arguments = Value::Object(serde_json::Map::new());
            self.arguments_parse_error = None;
            return;
        }
        match serde_json::from_str::<Value>(&self.arguments_raw) {
            Ok(parsed) => {
                self.arguments = parsed;
                self.arguments_parse_error = None;
            }
            Err(err) => {
                self.arguments_parse_error = Some(err.to_string());
            }
        }
    }
}

/// Result of executing one `ToolCall`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolResult {
    pub tool_call_id: String,
    pub name: String,
    pub content: String,
    #[serde(default)]
    pub is_error: bool,
}

/// Streamed fragment of a `ToolCall`'s arguments, keyed by `index`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolCallDelta {
    pub index: usize,
    pub call_id: Option<String>,
    pub name: Option<String>,
    /// Raw JSON text fragment to append to the accumulating arguments buffer.
    pub arguments_delta: String,
    pub status: Option<ToolCallStatus>,
}

impl ToolCallDelta {
    /// Builds a fresh `ToolCall` from this delta when no prior call exists at
    /// its index. `arguments_delta` seeds the raw buffer rather than being
    /// parsed on its own; it's only turned into `arguments` once the call
    /// reaches `Ready`/`Executed`, since a lone fragment is rarely valid JSON.
    pub fn to_tool_call(&self) -> ToolCall {
        let mut call = ToolCall {
            call_id: self.call_id.clone().unwrap_or_default(),
            index: self.index,
            status: self.status.unwrap_or(ToolCallStatus::Pending),
            name: self.name.clone().unwrap_or_default(),
            arguments: Value::Null,
            arguments_raw: self.arguments_delta.clone(),
            arguments_parse_error: None,
        };
        if matches!(call.status, ToolCallStatus::Ready | ToolCallStatus::Executed) {
            call.finalize_arguments();
        }
        call
    }
}

impl ToolCall {
    /// Appends `delta.arguments_delta` to the raw buffer rather than parsing
    /// it in isolation; the buffer is only parsed once the call's status
    /// reaches `Ready`/`Executed`, matching how a single JSON object streams
    /// in as many non-JSON fragments.
    pub fn apply_delta(&mut self, delta: &ToolCallDelta) {
        if let Some(ref call_id) = delta.call_id {
            self.call_id = call_id.clone();
        }
        if let Some(ref name) = delta.name {
            self.name = name.clone();
        }
        self.arguments_raw.push_str(&delta.arguments_delta);
        if let Some(status) = delta.status {
            self.status = status;
        }
        if matches!(self.status, ToolCallStatus::Ready | ToolCallStatus::Executed) {
            self.finalize_arguments();
        }
    }
}

/// Marker so `ToolCallStatus` participates in `MessageStatus`-style forward checks
/// without importing `MessageStatus` where it isn't otherwise used.
#[allow(dead_code)]
fn _link_status(_: MessageStatus) {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn delta_without_prior_call_parses_complete_json() {
        let delta = ToolCallDelta {
            index: 0,
            call_id: Some("call_1".into()),
            name: Some("search".into()),
            arguments_delta: r#"{"q":"rust"}"#.into(),
            status: Some(ToolCallStatus::Ready),
        };
        let call = delta.to_tool_call();
        assert_eq!(call.name, "search");
        assert_eq!(call.arguments["q"], "rust");
    }

    #[test]
    fn apply_delta_updates_name_and_arguments_in_place() {
        let mut call = ToolCall {
            call_id: "call_1".into(),
            index: 0,
            status: ToolCallStatus::Pending,
            name: String::new(),
            arguments: Value::Null,
            arguments_raw: String::new(),
            arguments_parse_error: None,
        };
        call.apply_delta(&ToolCallDelta {
            index: 0,
            call_id: None,
            name: Some("search".into()),
            arguments_delta: r#"{"q":"rust"}"#.into(),
            status: Some(ToolCallStatus::Ready),
        });
        assert_eq!(call.name, "search");
        assert_eq!(call.arguments["q"], "rust");
        assert_eq!(call.status, ToolCallStatus::Ready);
        assert!(call.arguments_parse_error.is_none());
    }

    #[test]
    fn arguments_buffer_across_multiple_fragments_parses_once_complete() {
        let mut call = ToolCall {
            call_id: "call_1".into(),
            index: 0,
            status: ToolCallStatus::Pending,
            name: "search".into(),
            arguments: Value::Null,
            arguments_raw: String::new(),
            arguments_parse_error: None,
        };
        call.apply_delta(&ToolCallDelta {
            index: 0,
            call_id: None,
            name: None,
            arguments_delta: r#"{"q":"ru"#.into(),
            status: None,
        });
        assert_eq!(call.arguments, Value::Null, "should not parse a partial fragment");
        call.apply_delta(&ToolCallDelta {
            index: 0,
            call_id: None,
            name: None,
            arguments_delta: r#"st"}"#.into(),
            status: Some(ToolCallStatus::Ready),
        });
        assert_eq!(call.arguments["q"], "rust");
        assert!(call.arguments_parse_error.is_none());
    }

    #[test]
    fn unparsable_arguments_buffer_records_parse_error_instead_of_dropping_it() {
        let mut call = ToolCall {
            call_id: "call_1".into(),
            index: 0,
            status: ToolCallStatus::Pending,
            name: "search".into(),
            arguments: Value::Null,
            arguments_raw: String::new(),
            arguments_parse_error: None,
        };
        call.apply_delta(&ToolCallDelta {
            index: 0,
            call_id: None,
            name: None,
            arguments_delta: "{not valid json".into(),
            status: Some(ToolCallStatus::Ready),
        });
        assert!(call.arguments_parse_error.is_some());
    }
}

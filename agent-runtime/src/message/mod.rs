//! Message types for agent conversation state.
//!
//! `Message` carries a role, content (plain text or a list of typed
//! `ContentPart`s), any tool calls the assistant requested, and any tool
//! results a user/tool turn is reporting back. `MessageDelta` carries the
//! same shape in fragment form for streaming and is merged into a
//! `Message` with [`Message::apply_delta`].

mod delta;
mod tool;

pub use delta::MessageDelta;
pub use tool::{ToolCall, ToolCallStatus, ToolResult};

use serde::{Deserialize, Serialize};

/// Who sent a message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    System,
    User,
    Assistant,
    Tool,
}

/// One fragment of message content.
///
/// A message's content is either a single plain string (the common case) or
/// a list of these parts (for mixed text/tool-output/attachment content).
/// Parts merge by index when a streamed delta targets the same position as
/// an existing part of the same variant; a type mismatch at the same index
/// is an append, not an overwrite, since switching part kinds mid-stream
/// would otherwise silently discard content.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ContentPart {
    Text { text: String },
    ToolUse { tool_call_id: String, name: String },
    ToolResult { tool_call_id: String, text: String },
}

impl ContentPart {
    fn same_kind(&self, other: &ContentPart) -> bool {
        std::mem::discriminant(self) == std::mem::discriminant(other)
    }

    /// Appends `other`'s text into `self` when they are the same kind; otherwise
    /// is a no-op (callers append `other` as a new part instead).
    fn merge_text(&mut self, other: &ContentPart) -> bool {
        match (self, other) {
            (ContentPart::Text { text }, ContentPart::Text { text: add }) => {
                text.push_str(add);
                true
            }
            (
                ContentPart::ToolResult { text, .. },
                ContentPart::ToolResult { text: add, .. },
            ) => {
                text.push_str(add);
                true
            }
            _ => false,
        }
    }
}

/// Status of a message in the conversation lifecycle.
///
/// Transitions are monotone forward: `Streaming -> Complete` or
/// `Streaming -> Error`; a complete or errored message is never reopened by
/// a later delta for the same id.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MessageStatus {
    Streaming,
    Complete,
    Error,
}

/// One message in an agent's conversation state.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Message {
    pub id: String,
    pub role: Role,
    pub content: Vec<ContentPart>,
    #[serde(default)]
    pub tool_calls: Vec<ToolCall>,
    #[serde(default)]
    pub tool_results: Vec<ToolResult>,
    #[serde(default = "default_status")]
    pub status: MessageStatus,
}

fn default_status() -> MessageStatus {
    MessageStatus::Complete
}

impl Message {
    pub fn system(id: impl Into<String>, text: impl Into<String>) -> Self {
        Self::text(id, Role::System, text)
    }

    pub fn user(id: impl Into<String>, text: impl Into<String>) -> Self {
        Self::text(id, Role::User, text)
    }

    pub fn assistant(id: impl Into<String>, text: impl Into<String>) -> Self {
        Self::text(id, Role::Assistant, text)
    }

    fn text(id: impl Into<String>, role: Role, text: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            role,
            content: vec![ContentPart::Text { text: text.into() }],
            tool_calls: vec![],
            tool_results: vec![],
            status: MessageStatus::Complete,
        }
    }

    /// Concatenates every `Text` content part; empty when the message has none
    /// (e.g. an assistant turn that only carries tool calls).
    pub fn text_content(&self) -> String {
        self.content
            .iter()
            .filter_map(|p| match p {
                ContentPart::Text { text } => Some(text.as_str()),
                _ => None,
            })
            .collect()
    }

    /// Merges a streamed delta into this message.
    ///
    /// Tool calls accumulate by `index`: a delta targeting an index already
    /// present appends its `arguments_delta` onto that call's arguments and
    /// updates `name`/`status` when the delta sets them; a new index appends
    /// a new in-progress `ToolCall`. Status transitions forward only: once
    /// `Complete` or `Error`, later deltas for the same message id are dropped.
    pub fn apply_delta(&mut self, delta: &MessageDelta) {
        if self.status != MessageStatus::Streaming {
            return;
        }
        for part in &delta.content {
            if let Some(last) = self.content.last_mut() {
                if last.same_kind(part) && last.merge_text(part) {
                    continue;
                }
            }
            self.content.push(part.clone());
        }
        for delta_call in &delta.tool_calls {
            match self
                .tool_calls
                .iter_mut()
                .find(|c| c.index == delta_call.index)
            {
                Some(existing) => existing.apply_delta(delta_call),
                None => self.tool_calls.push(delta_call.to_tool_call()),
            }
        }
        if let Some(status) = delta.status {
            self.status = status;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn text_content_concatenates_text_parts_only() {
        let msg = Message {
            id: "m1".into(),
            role: Role::Assistant,
            content: vec![
                ContentPart::Text { text: "hello ".into() },
                ContentPart::ToolUse {
                    tool_call_id: "c1".into(),
                    name: "search".into(),
                },
                ContentPart::Text { text: "world".into() },
            ],
            tool_calls: vec![],
            tool_results: vec![],
            status: MessageStatus::Complete,
        };
        assert_eq!(msg.text_content(), "hello world");
    }

    #[test]
    fn apply_delta_is_noop_once_complete() {
        let mut msg = Message::assistant("m1", "done");
        msg.status = MessageStatus::Complete;
        let delta = MessageDelta {
            content: vec![ContentPart::Text { text: "more".into() }],
            tool_calls: vec![],
            status: None,
        };
        msg.apply_delta(&delta);
        assert_eq!(msg.text_content(), "done");
    }

    #[test]
    fn apply_delta_merges_consecutive_text_parts() {
        let mut msg = Message {
            id: "m1".into(),
            role: Role::Assistant,
            content: vec![],
            tool_calls: vec![],
            tool_results: vec![],
            status: MessageStatus::Streaming,
        };
        msg.apply_delta(&MessageDelta {
            content: vec![ContentPart::Text { text: "Hel".into() }],
            tool_calls: vec![],
            status: None,
        });
        msg.apply_delta(&MessageDelta {
            content: vec![ContentPart::Text { text: "lo".into() }],
            tool_calls: vec![],
            status: Some(MessageStatus::Complete),
        });
        assert_eq!(msg.text_content(), "Hello");
        assert_eq!(msg.status, MessageStatus::Complete);
    }
}

//! Streaming message fragment, merged into a `Message` via `Message::apply_delta`.

use serde::{Deserialize, Serialize};

use super::tool::ToolCallDelta;
use super::{ContentPart, MessageStatus};

/// One chunk of a streaming assistant message.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MessageDelta {
    #[serde(default)]
    pub content: Vec<ContentPart>,
    #[serde(default)]
    pub tool_calls: Vec<ToolCallDelta>,
    pub status: Option<MessageStatus>,
}

//! Dangling tool call repair: inserts a synthetic cancelled `ToolResult` for
//! any assistant tool_call with no matching result later in the message
//! list, so a resumed or edited conversation never asks the model to
//! reconcile a call it made but never saw answered.

use async_trait::async_trait;
use uuid::Uuid;

use crate::error::AgentError;
use crate::message::{ContentPart, Message, MessageStatus, Role, ToolResult};
use crate::state::State;

use super::super::r#trait::{BeforeModelDecision, Middleware};

#[derive(Default)]
pub struct PatchDanglingToolCallsMiddleware;

fn has_matching_result(messages: &[Message], call_id: &str) -> bool {
    messages
        .iter()
        .any(|m| m.tool_results.iter().any(|r| r.tool_call_id == call_id))
}

/// Returns a synthetic tool message for every dangling call, in the order
/// the calls appear in `messages`. Pure function so it's trivially testable
/// and idempotent: calling it again on a list that already has the patch
/// messages finds every call already matched and returns nothing.
fn find_dangling(messages: &[Message]) -> Vec<ToolResult> {
    let mut dangling = Vec::new();
    for (i, message) in messages.iter().enumerate() {
        if message.role != Role::Assistant {
            continue;
        }
        for call in &message.tool_calls {
            if !has_matching_result(&messages[i + 1..], &call.call_id) {
                dangling.push(ToolResult {
                    tool_call_id: call.call_id.clone(),
                    name: call.name.clone(),
                    content: format!("tool call '{}' was cancelled", call.name),
                    is_error: true,
                });
            }
        }
    }
    dangling
}

#[async_trait]
impl Middleware for PatchDanglingToolCallsMiddleware {
    fn name(&self) -> &str {
        "patch_dangling_tool_calls"
    }

    async fn before_model(&self, state: &mut State) -> Result<BeforeModelDecision, AgentError> {
        let dangling = find_dangling(&state.messages);
        if dangling.is_empty() {
            return Ok(BeforeModelDecision::Continue);
        }
        state.messages.push(Message {
            id: Uuid::new_v4().to_string(),
            role: Role::Tool,
            content: dangling
                .iter()
                .map(|r| ContentPart::ToolResult {
                    tool_call_id: r.tool_call_id.clone(),
                    text: r.content.clone(),
                })
                .collect(),
            tool_calls: vec![],
            tool_results: dangling,
            status: MessageStatus::Complete,
        });
        Ok(BeforeModelDecision::Continue)
    }
}

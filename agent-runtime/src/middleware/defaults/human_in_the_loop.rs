//! Human-in-the-loop middleware: pauses the run before any tool call whose
//! name is configured for approval, surfacing an interrupt the caller
//! resolves via `Agent::resume_from_interrupt`.
//!
//! Decision set per tool mirrors the teacher's `helve::ApprovalPolicy`
//! (`None` / `DestructiveOnly` / `Always`), generalized here to an explicit
//! per-tool allow-list of decisions rather than two fixed tiers.

use std::collections::HashMap;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::json;

use crate::error::AgentError;
use crate::exec::Interrupt;
use crate::message::{ContentPart, Message, MessageStatus, Role, ToolResult};
use crate::state::State;

use super::super::r#trait::{AfterModelDecision, Middleware};

/// Decisions a reviewer may make about one pending tool call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ApprovalDecision {
    Approve,
    Edit,
    Reject,
}

/// Which decisions are allowed for a given tool. Built by a caller from
/// whatever tier scheme it wants (e.g. a `DestructiveOnly`/`Always` preset,
/// or a bespoke per-tool map); this middleware only cares about the result.
#[derive(Debug, Clone, Default)]
pub struct ApprovalPolicy {
    pub tools: HashMap<String, Vec<ApprovalDecision>>,
}

impl ApprovalPolicy {
    pub fn requires_approval(&self, tool_name: &str) -> bool {
        self.tools.contains_key(tool_name)
    }

    pub fn allowed_decisions(&self, tool_name: &str) -> &[ApprovalDecision] {
        self.tools
            .get(tool_name)
            .map(|v| v.as_slice())
            .unwrap_or(&[])
    }
}

/// One approval request surfaced in the interrupt payload.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ActionRequest {
    pub tool_call_id: String,
    pub tool_name: String,
    pub arguments: serde_json::Value,
}

pub struct HumanInTheLoopMiddleware {
    policy: ApprovalPolicy,
}

impl HumanInTheLoopMiddleware {
    pub fn new(policy: ApprovalPolicy) -> Self {
        Self { policy }
    }
}

#[async_trait]
impl Middleware for HumanInTheLoopMiddleware {
    fn name(&self) -> &str {
        "human_in_the_loop"
    }

    /// Runs in `after_model`: the review is over what the model just
    /// proposed, not what was already state going in.
    async fn after_model(&self, state: &mut State) -> Result<AfterModelDecision, AgentError> {
        match self.check_after_model(state) {
            Some(interrupt) => Ok(AfterModelDecision::Pause(interrupt)),
            None => Ok(AfterModelDecision::Continue),
        }
    }
}

impl HumanInTheLoopMiddleware {
    /// Scans the last assistant message for tool calls requiring approval.
    /// Returns the interrupt to surface, if any.
    pub fn check_after_model(&self, state: &State) -> Option<Interrupt> {
        let last = state.messages.iter().rev().find(|m| m.role == Role::Assistant)?;
        let requests: Vec<ActionRequest> = last
            .tool_calls
            .iter()
            .filter(|c| self.policy.requires_approval(&c.name))
            .map(|c| ActionRequest {
                tool_call_id: c.call_id.clone(),
                tool_name: c.name.clone(),
                arguments: c.arguments.clone(),
            })
            .collect();
        if requests.is_empty() {
            return None;
        }
        let review_configs: HashMap<String, Vec<ApprovalDecision>> = requests
            .iter()
            .map(|r| (r.tool_name.clone(), self.policy.allowed_decisions(&r.tool_name).to_vec()))
            .collect();
        Some(Interrupt::new(json!({
            "action_requests": requests,
            "review_configs": review_configs,
        })))
    }

    /// Synthesizes tool results for a resumed run: one decision per pending
    /// action request, in the order they were surfaced.
    pub fn resume(
        &self,
        state: &mut State,
        decisions: Vec<(ActionRequest, ApprovalDecision, Option<serde_json::Value>)>,
    ) {
        let mut results = Vec::new();
        for (request, decision, edited_arguments) in decisions {
            let content = match decision {
                ApprovalDecision::Approve => format!("approved: {}", request.tool_name),
                ApprovalDecision::Reject => format!("rejected: {}", request.tool_name),
                ApprovalDecision::Edit => format!(
                    "edited arguments for {}: {}",
                    request.tool_name,
                    edited_arguments.unwrap_or(request.arguments.clone())
                ),
            };
            results.push(ToolResult {
                tool_call_id: request.tool_call_id,
                name: request.tool_name,
                content,
                is_error: decision == ApprovalDecision::Reject,
            });
        }
        state.messages.push(Message {
            id: uuid::Uuid::new_v4().to_string(),
            role: Role::Tool,
            content: results
                .iter()
                .map(|r| ContentPart::ToolResult {
                    tool_call_id: r.tool_call_id.clone(),
                    text: r.content.clone(),
                })
                .collect(),
            tool_calls: vec![],
            tool_results: results,
            status: MessageStatus::Complete,
        });
    }
}

//! Built-in pipeline steps.

use async_trait::async_trait;
use uuid::Uuid;

use crate::error::AgentError;
use crate::llm::{ChatRequest, ToolChoice};
use crate::message::{ContentPart, Message, MessageStatus, Role, ToolCallStatus};
use crate::state::State;
use crate::tools::ToolContext;

use super::retry::RetryPolicy;
use super::step::{PipelineStep, StepContext, StepOutcome};

/// Calls the chat model with the middleware-assembled system prompt and
/// tool list, retrying transient provider errors per `retry_policy`.
pub struct CallLlm {
    pub retry_policy: RetryPolicy,
}

impl Default for CallLlm {
    fn default() -> Self {
        Self {
            retry_policy: RetryPolicy::None,
        }
    }
}

#[async_trait]
impl PipelineStep for CallLlm {
    fn name(&self) -> &str {
        "call_llm"
    }

    async fn run(&self, state: &mut State, ctx: &StepContext<'_>) -> StepOutcome {
        match ctx.middleware.before_model(state).await {
            Ok(Some(interrupt)) => return StepOutcome::Interrupt(interrupt),
            Ok(None) => {}
            Err(err) => return StepOutcome::Error(err),
        }

        let system_prompt = ctx.middleware.system_prompt(state);
        let mut messages = Vec::with_capacity(state.messages.len() + 1);
        if let Some(prompt) = system_prompt {
            messages.push(Message::system("system", prompt));
        }
        messages.extend(state.messages.clone());

        let tools = ctx.tools.specs();
        let tool_choice = if tools.is_empty() {
            ToolChoice::None
        } else {
            ToolChoice::Auto
        };

        let mut attempt = 0usize;
        loop {
            let request = ChatRequest {
                messages: &messages,
                tools: &tools,
                tool_choice,
            };
            match ctx.model.invoke(request).await {
                Ok(response) => {
                    if response.content.is_empty() && response.tool_calls.is_empty() {
                        return StepOutcome::Error(AgentError::Validation(
                            "model returned an assistant message with no content and no tool calls".to_string(),
                        ));
                    }
                    if let Some(usage) = response.usage {
                        state.record_usage(usage);
                    }
                    let mut message = Message::assistant(Uuid::new_v4().to_string(), response.content);
                    message.tool_calls = response.tool_calls;
                    state.messages.push(message);
                    match ctx.middleware.after_model(state).await {
                        Ok(Some(interrupt)) => return StepOutcome::Interrupt(interrupt),
                        Ok(None) => {}
                        Err(err) => return StepOutcome::Error(err),
                    }
                    return StepOutcome::Continue;
                }
                Err(err) => {
                    if self.retry_policy.should_retry(attempt) {
                        tokio::time::sleep(self.retry_policy.delay(attempt)).await;
                        attempt += 1;
                        continue;
                    }
                    return StepOutcome::Error(err);
                }
            }
        }
    }
}

/// Executes every `Ready` tool call on the most recent assistant message,
/// appending one `ToolResult` each. Tool errors become `ToolResult { is_error: true }`
/// observations, not pipeline errors; `state.failure_count` tracks consecutive
/// all-error rounds so `until_success`-style modes can give up via `max_retry_count`.
pub struct ExecuteTools {
    pub max_retry_count: u32,
}

#[async_trait]
impl PipelineStep for ExecuteTools {
    fn name(&self) -> &str {
        "execute_tools"
    }

    async fn run(&self, state: &mut State, ctx: &StepContext<'_>) -> StepOutcome {
        let Some(last) = state.messages.last() else {
            return StepOutcome::Continue;
        };
        if last.role != Role::Assistant || last.tool_calls.is_empty() {
            return StepOutcome::Continue;
        }

        let pending: Vec<_> = last
            .tool_calls
            .iter()
            .filter(|c| c.status != ToolCallStatus::Executed)
            .cloned()
            .collect();
        if pending.is_empty() {
            return StepOutcome::Continue;
        }

        let recent_messages = state.messages.clone();
        let mut results = Vec::new();
        let mut any_error = false;

        for call in &pending {
            let tool_ctx = ToolContext {
                scope: ctx.scope,
                recent_messages: &recent_messages,
            };
            let outcome = if let Some(parse_error) = &call.arguments_parse_error {
                crate::tools::ToolOutcome::error(format!(
                    "invalid arguments for tool '{}': {}",
                    call.name, parse_error
                ))
            } else {
                match ctx.tools.get(&call.name) {
                    Some(tool) => tool.call(call.arguments.clone(), &tool_ctx).await,
                    None => crate::tools::ToolOutcome::error(format!("unknown tool: {}", call.name)),
                }
            };
            any_error = any_error || outcome.is_error;
            if let Some(delta) = &outcome.state_delta {
                for (key, value) in delta {
                    if key == "todos" {
                        if let Ok(todos) = serde_json::from_value(value.clone()) {
                            state.todos = todos;
                            continue;
                        }
                    }
                    state.metadata.insert(key.clone(), value.clone());
                }
            }
            results.push(crate::tools::outcome_to_result(
                call.call_id.clone(),
                call.name.clone(),
                outcome,
            ));
        }

        if let Some(last_mut) = state.messages.last_mut() {
            for call in last_mut.tool_calls.iter_mut() {
                if pending.iter().any(|p| p.call_id == call.call_id) {
                    call.status = ToolCallStatus::Executed;
                }
            }
        }

        let result_message_id = Uuid::new_v4().to_string();
        state.messages.push(Message {
            id: result_message_id,
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

        if any_error {
            state.failure_count += 1;
            if state.failure_count > self.max_retry_count {
                return StepOutcome::Error(AgentError::ExceededFailureCount {
                    max_failures: self.max_retry_count,
                });
            }
        } else {
            state.failure_count = 0;
        }

        StepOutcome::Continue
    }
}

/// Stops the run with `ExceededMaxRuns` once `state.run_count` exceeds `ctx.max_runs`.
/// Runs first in every built-in mode's pipeline, before `call_llm`.
pub struct CheckMaxRuns;

#[async_trait]
impl PipelineStep for CheckMaxRuns {
    fn name(&self) -> &str {
        "check_max_runs"
    }

    async fn run(&self, state: &mut State, ctx: &StepContext<'_>) -> StepOutcome {
        state.run_count += 1;
        if state.run_count > ctx.max_runs {
            StepOutcome::Error(AgentError::ExceededMaxRuns {
                max_runs: ctx.max_runs,
            })
        } else {
            StepOutcome::Continue
        }
    }
}

/// Unconditionally pauses the pipeline. Used by the `step` mode to run
/// exactly one think/act round per `Agent::run` call.
pub struct CheckPause;

#[async_trait]
impl PipelineStep for CheckPause {
    fn name(&self) -> &str {
        "check_pause"
    }

    async fn run(&self, _state: &mut State, _ctx: &StepContext<'_>) -> StepOutcome {
        StepOutcome::Pause
    }
}

/// Stops successfully once `tool_name` has appeared in an executed tool result.
pub struct CheckUntilTool {
    pub tool_name: String,
}

#[async_trait]
impl PipelineStep for CheckUntilTool {
    fn name(&self) -> &str {
        "check_until_tool"
    }

    async fn run(&self, state: &mut State, _ctx: &StepContext<'_>) -> StepOutcome {
        let used = state.messages.iter().any(|m| {
            m.tool_results
                .iter()
                .any(|r| r.name == self.tool_name && !r.is_error)
        });
        if used {
            StepOutcome::Ok
        } else {
            StepOutcome::Continue
        }
    }
}

/// Stop condition for `until_success`: done as soon as tools succeed, without
/// waiting for a further LLM call. Stops once the last message is a plain
/// assistant reply (no tool calls), or a tool-result message with no errors;
/// `ExecuteTools` already turns a failure-count overrun into a pipeline error,
/// so this step only has to recognize the two success shapes.
pub struct CheckUntilSuccess;

#[async_trait]
impl PipelineStep for CheckUntilSuccess {
    fn name(&self) -> &str {
        "check_until_success"
    }

    async fn run(&self, state: &mut State, _ctx: &StepContext<'_>) -> StepOutcome {
        let done = match state.messages.last() {
            Some(m) if m.role == Role::Assistant => m.tool_calls.is_empty(),
            Some(m) if m.role == Role::Tool => m.tool_results.iter().all(|r| !r.is_error),
            _ => false,
        };
        if done {
            StepOutcome::Ok
        } else {
            StepOutcome::Continue
        }
    }
}

/// Default terminal check: stops successfully once the most recent assistant
/// message carries no tool calls (a plain reply means the model is done).
pub struct ContinueOrDone;

#[async_trait]
impl PipelineStep for ContinueOrDone {
    fn name(&self) -> &str {
        "continue_or_done"
    }

    async fn run(&self, state: &mut State, _ctx: &StepContext<'_>) -> StepOutcome {
        let done = state
            .messages
            .iter()
            .rev()
            .find(|m| m.role == Role::Assistant)
            .map(|m| m.tool_calls.is_empty())
            .unwrap_or(true);
        if done {
            StepOutcome::Ok
        } else {
            StepOutcome::Continue
        }
    }
}

//! The agent actor itself: owns `Agent config + State + status`, serialises
//! every mutation through its mailbox, and drives the execution mode.

use std::sync::Arc;
use std::time::Instant;

use serde::{Deserialize, Serialize};
use serde_json::json;
use tokio::sync::{broadcast, mpsc, oneshot};

use crate::error::AgentError;
use crate::exec::{ExecutionMode, Interrupt, RunOutcome, StepContext};
use crate::llm::ChatModel;
use crate::message::{ContentPart, Message, MessageStatus, Role, ToolResult};
use crate::middleware::MiddlewarePipeline;
use crate::serialize::{ExportedAgent, SerializedAgentConfig};
use crate::state::State;
use crate::supervisor::ScopeKey;
use crate::tools::ToolRegistry;

use super::events::{DebugEvent, LifecycleEvent};
use super::logging;

/// Status of one agent actor. Terminal with respect to a single run
/// (`Completed`/`Error`/`Cancelled`); the next `add_message` moves any of
/// them back to `Idle`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AgentStatus {
    Idle,
    Running,
    Interrupted,
    Completed,
    Error,
    Cancelled,
}

/// One decision resolving a pending action request from an interrupt,
/// matched one-to-one (by position) with the interrupt's `action_requests`.
#[derive(Debug, Clone)]
pub struct ResumeDecision {
    pub kind: ResumeDecisionKind,
    pub edited_arguments: Option<serde_json::Value>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResumeDecisionKind {
    Approve,
    Edit,
    Reject,
}

/// Static configuration an `Agent` is built from; immutable for its lifetime.
pub struct AgentConfig {
    pub agent_id: String,
    pub scope: ScopeKey,
    pub base_system_prompt: Option<String>,
    pub model: Arc<dyn ChatModel>,
    pub middleware: MiddlewarePipeline,
    pub mode: ExecutionMode,
    pub max_runs: u32,
    pub max_retry_count: u32,
}

struct Agent {
    config: AgentConfig,
    state: State,
    tools: ToolRegistry,
    status: AgentStatus,
    pending_interrupt: Option<Interrupt>,
    last_activity: Instant,
    lifecycle_tx: broadcast::Sender<LifecycleEvent>,
    debug_tx: broadcast::Sender<DebugEvent>,
}

impl Agent {
    fn new(
        config: AgentConfig,
        lifecycle_tx: broadcast::Sender<LifecycleEvent>,
        debug_tx: broadcast::Sender<DebugEvent>,
    ) -> Self {
        let mut state = State::default();
        let mut tools = ToolRegistry::new();
        config.middleware.init(&mut state, &mut tools);
        Self {
            config,
            state,
            tools,
            status: AgentStatus::Idle,
            pending_interrupt: None,
            last_activity: Instant::now(),
            lifecycle_tx,
            debug_tx,
        }
    }

    fn set_status(&mut self, to: AgentStatus) {
        if self.status == to {
            return;
        }
        logging::log_status_change(&self.config.agent_id, self.status, to);
        let from = self.status;
        self.status = to;
        let _ = self.lifecycle_tx.send(LifecycleEvent::StatusChanged {
            agent_id: self.config.agent_id.clone(),
            from,
            to,
        });
    }

    /// Appends `message`, resetting a terminal status back to `Idle`. When the
    /// message is from the user and the agent is now idle, this also triggers
    /// a run, the same as the handle's own `add_message` + `run` combo would.
    async fn add_message(&mut self, message: Message) -> Result<(), AgentError> {
        let role = message.role;
        self.state.messages.push(message);
        let _ = self.lifecycle_tx.send(LifecycleEvent::MessageReceived {
            agent_id: self.config.agent_id.clone(),
        });
        if matches!(
            self.status,
            AgentStatus::Idle | AgentStatus::Completed | AgentStatus::Error | AgentStatus::Cancelled
        ) {
            self.set_status(AgentStatus::Idle);
        }
        if role == Role::User && self.status == AgentStatus::Idle {
            return match self.run().await {
                RunOutcome::Error(err) => Err(err),
                _ => Ok(()),
            };
        }
        Ok(())
    }

    async fn run(&mut self) -> RunOutcome {
        logging::log_run_start(&self.config.agent_id);
        self.set_status(AgentStatus::Running);
        self.state.run_count = 0;
        let ctx = StepContext {
            model: self.config.model.as_ref(),
            tools: &self.tools,
            middleware: &self.config.middleware,
            scope: &self.config.scope,
            max_runs: self.config.max_runs,
            max_retry_count: self.config.max_retry_count,
        };
        let outcome = self.config.mode.run(&mut self.state, &ctx).await;
        match &outcome {
            RunOutcome::Ok => {
                logging::log_run_complete(&self.config.agent_id);
                self.set_status(AgentStatus::Completed);
            }
            RunOutcome::Pause => {
                self.set_status(AgentStatus::Idle);
            }
            RunOutcome::Interrupt(interrupt) => {
                self.pending_interrupt = Some(interrupt.clone());
                self.set_status(AgentStatus::Interrupted);
            }
            RunOutcome::Error(err) => {
                logging::log_run_error(&self.config.agent_id, err);
                self.set_status(AgentStatus::Error);
            }
        }
        outcome
    }

    fn cancel(&mut self) {
        self.set_status(AgentStatus::Cancelled);
    }

    async fn resume_from_interrupt(&mut self, decisions: Vec<ResumeDecision>) -> Result<RunOutcome, AgentError> {
        if self.status != AgentStatus::Interrupted {
            return Err(AgentError::DecisionMismatch(
                "no pending interrupt to resume".to_string(),
            ));
        }
        let interrupt = self
            .pending_interrupt
            .take()
            .ok_or_else(|| AgentError::DecisionMismatch("no pending interrupt to resume".to_string()))?;
        let requests = interrupt
            .value
            .get("action_requests")
            .cloned()
            .unwrap_or(json!([]));
        let requests: Vec<serde_json::Value> = requests.as_array().cloned().unwrap_or_default();
        if requests.len() != decisions.len() {
            return Err(AgentError::DecisionMismatch(format!(
                "expected {} decision(s), got {}",
                requests.len(),
                decisions.len()
            )));
        }

        let mut results = Vec::with_capacity(requests.len());
        for (request, decision) in requests.iter().zip(decisions.iter()) {
            let tool_call_id = request
                .get("tool_call_id")
                .and_then(|v| v.as_str())
                .unwrap_or_default()
                .to_string();
            let tool_name = request
                .get("tool_name")
                .and_then(|v| v.as_str())
                .unwrap_or_default()
                .to_string();
            let original_arguments = request.get("arguments").cloned().unwrap_or(json!({}));
            let (content, is_error) = match decision.kind {
                ResumeDecisionKind::Approve => (format!("approved: {tool_name}"), false),
                ResumeDecisionKind::Reject => (format!("rejected: {tool_name}"), true),
                ResumeDecisionKind::Edit => (
                    format!(
                        "edited arguments for {tool_name}: {}",
                        decision.edited_arguments.clone().unwrap_or(original_arguments)
                    ),
                    false,
                ),
            };
            results.push(ToolResult {
                tool_call_id,
                name: tool_name,
                content,
                is_error,
            });
        }

        self.state.messages.push(Message {
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

        Ok(self.run().await)
    }

    fn export_state(&self) -> Result<serde_json::Value, AgentError> {
        let exported = ExportedAgent {
            version: 1,
            agent_config: SerializedAgentConfig {
                agent_id: self.config.agent_id.clone(),
                base_system_prompt: self.config.base_system_prompt.clone(),
                custom_tool_names: self.tools.specs().into_iter().map(|s| s.name).collect(),
                middleware: self
                    .config
                    .middleware
                    .names()
                    .into_iter()
                    .map(|name| name.to_string())
                    .collect(),
            },
            state: self.state.clone(),
        };
        Ok(serde_json::to_value(exported)?)
    }

    fn import_state(&mut self, payload: serde_json::Value) -> Result<(), AgentError> {
        let exported: ExportedAgent = serde_json::from_value(payload)?;
        self.state = exported.state;
        Ok(())
    }
}

pub(super) enum Command {
    AddMessage {
        message: Message,
        reply: oneshot::Sender<Result<(), AgentError>>,
    },
    Run {
        reply: oneshot::Sender<RunOutcome>,
    },
    Cancel {
        reply: oneshot::Sender<()>,
    },
    ResumeFromInterrupt {
        decisions: Vec<ResumeDecision>,
        reply: oneshot::Sender<Result<RunOutcome, AgentError>>,
    },
    Touch {
        reply: oneshot::Sender<()>,
    },
    GetState {
        reply: oneshot::Sender<State>,
    },
    GetStatus {
        reply: oneshot::Sender<AgentStatus>,
    },
    ExportState {
        reply: oneshot::Sender<Result<serde_json::Value, AgentError>>,
    },
    ImportState {
        payload: serde_json::Value,
        reply: oneshot::Sender<Result<(), AgentError>>,
    },
}

/// Spawns the actor task owning `config`'s `Agent`, returning the mailbox
/// sender and both broadcast senders so `AgentHandle` can subscribe.
pub(super) fn spawn(
    config: AgentConfig,
) -> (
    mpsc::Sender<Command>,
    broadcast::Sender<LifecycleEvent>,
    broadcast::Sender<DebugEvent>,
) {
    let (tx, mut rx) = mpsc::channel::<Command>(64);
    let (lifecycle_tx, _) = broadcast::channel(256);
    let (debug_tx, _) = broadcast::channel(256);
    let lifecycle_tx_for_actor = lifecycle_tx.clone();
    let debug_tx_for_actor = debug_tx.clone();

    tokio::spawn(async move {
        let mut agent = Agent::new(config, lifecycle_tx_for_actor, debug_tx_for_actor);
        while let Some(command) = rx.recv().await {
            agent.last_activity = Instant::now();
            match command {
                Command::AddMessage { message, reply } => {
                    let _ = reply.send(agent.add_message(message).await);
                }
                Command::Run { reply } => {
                    let _ = reply.send(agent.run().await);
                }
                Command::Cancel { reply } => {
                    agent.cancel();
                    let _ = reply.send(());
                }
                Command::ResumeFromInterrupt { decisions, reply } => {
                    let _ = reply.send(agent.resume_from_interrupt(decisions).await);
                }
                Command::Touch { reply } => {
                    let _ = reply.send(());
                }
                Command::GetState { reply } => {
                    let _ = reply.send(agent.state.clone());
                }
                Command::GetStatus { reply } => {
                    let _ = reply.send(agent.status);
                }
                Command::ExportState { reply } => {
                    let _ = reply.send(agent.export_state());
                }
                Command::ImportState { payload, reply } => {
                    let _ = reply.send(agent.import_state(payload));
                }
            }
        }
    });

    (tx, lifecycle_tx, debug_tx)
}

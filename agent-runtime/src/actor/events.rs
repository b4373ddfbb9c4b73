//! Lifecycle and debug events an agent actor broadcasts.
//!
//! Two topics, same as the spec's "Lifecycle" / "Debug" split: lifecycle
//! carries status changes and turn-level facts a caller typically renders;
//! debug carries the finer-grained trace (middleware hooks, sub-agent
//! activity, delta merges) a developer watches.

use serde::{Deserialize, Serialize};

use super::runtime::AgentStatus;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum LifecycleEvent {
    StatusChanged {
        agent_id: String,
        from: AgentStatus,
        to: AgentStatus,
    },
    MessageReceived {
        agent_id: String,
    },
    ToolResponseReady {
        agent_id: String,
        tool_call_id: String,
    },
    RetriesExceeded {
        agent_id: String,
    },
}

/// `sub_agent_id` tags events from a child agent so a single subscriber on
/// the parent's debug topic sees the whole tree; `None` means the event is
/// the agent's own.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum DebugEvent {
    SubAgentStarted {
        sub_agent_id: String,
    },
    SubAgentCompleted {
        sub_agent_id: String,
    },
    SubAgentErrored {
        sub_agent_id: String,
        reason: String,
    },
    MiddlewareHookFired {
        middleware: String,
        hook: &'static str,
    },
    DeltaMerged {
        message_id: String,
    },
}

//! Structured logging for agent actor execution, mirroring the teacher's
//! `graph::logging` helpers one level up: per-run and per-turn events
//! instead of per-node ones.

use super::runtime::AgentStatus;
use crate::error::AgentError;

pub fn log_run_start(agent_id: &str) {
    tracing::info!(agent_id, "agent run starting");
}

pub fn log_run_complete(agent_id: &str) {
    tracing::info!(agent_id, "agent run complete");
}

pub fn log_turn_start(agent_id: &str, run_count: u32) {
    tracing::debug!(agent_id, run_count, "agent turn starting");
}

pub fn log_tool_call(agent_id: &str, tool_name: &str) {
    tracing::debug!(agent_id, tool_name, "agent calling tool");
}

pub fn log_status_change(agent_id: &str, from: AgentStatus, to: AgentStatus) {
    tracing::info!(agent_id, ?from, ?to, "agent status changed");
}

pub fn log_run_error(agent_id: &str, error: &AgentError) {
    tracing::error!(agent_id, %error, "agent run error");
}

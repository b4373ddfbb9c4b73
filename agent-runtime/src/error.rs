//! Agent execution error taxonomy.
//!
//! `AgentError` is the single error type returned by the execution mode
//! engine, the middleware pipeline, and the filesystem server. Tool errors
//! are deliberately *not* part of this type in their raw form: a failing
//! tool produces a `ToolResult` with `is_error = true` that is surfaced to
//! the model as an observation, not an `Err` that aborts the run (see
//! `ToolError` below and `exec::steps::execute_tools`).

use thiserror::Error;

use crate::exec::Interrupt;

/// Error returned by agent execution, middleware, and the filesystem server.
#[derive(Debug, Error)]
pub enum AgentError {
    /// A command or configuration value failed validation before any work ran.
    #[error("validation failed: {0}")]
    Validation(String),

    /// The run count for a single `run` invocation exceeded `max_runs`.
    #[error("exceeded max runs ({max_runs})")]
    ExceededMaxRuns { max_runs: u32 },

    /// Consecutive tool/model failures exceeded `max_retry_count`.
    #[error("exceeded failure count ({max_failures})")]
    ExceededFailureCount { max_failures: u32 },

    /// A tool call referenced a tool name not present in the registry.
    #[error("invalid tool name: {0}")]
    InvalidToolName(String),

    /// The chat model returned an error (transport, rate limit, malformed response).
    #[error("provider error: {0}")]
    ProviderError(String),

    /// A tool's own execution failed. Carries the tool name so callers can log it;
    /// this variant is only ever surfaced to the caller of `Agent::run` when a tool
    /// error escapes a middleware that should have turned it into a `ToolResult` ---
    /// under normal operation tool errors become `ToolResult { is_error: true, .. }`
    /// and never become an `AgentError`.
    #[error("tool '{tool}' failed: {message}")]
    ToolError { tool: String, message: String },

    /// A filesystem write targeted a path covered by a read-only scope.
    #[error("readonly violation: {0}")]
    ReadonlyViolation(String),

    /// A lookup (agent, file, checkpoint) found nothing at the given key.
    #[error("not found: {0}")]
    NotFound(String),

    /// A resume command's decision didn't match the shape the pending interrupt expected.
    #[error("decision mismatch: {0}")]
    DecisionMismatch(String),

    /// Execution paused for human input. Carries the pending interrupt so the
    /// caller can inspect it and later call `Agent::resume_from_interrupt`.
    #[error("execution interrupted: {0}")]
    Interrupted(Interrupt),

    /// Import/export of serialized state failed (corrupt or version-mismatched payload).
    #[error("serialization error: {0}")]
    Serialization(String),
}

impl From<Interrupt> for AgentError {
    fn from(interrupt: Interrupt) -> Self {
        AgentError::Interrupted(interrupt)
    }
}

impl From<serde_json::Error> for AgentError {
    fn from(err: serde_json::Error) -> Self {
        AgentError::Serialization(err.to_string())
    }
}

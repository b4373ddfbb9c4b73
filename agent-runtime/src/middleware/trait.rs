//! The `Middleware` trait: a capability-set a middleware can contribute.

use async_trait::async_trait;
use serde_json::Value;

use crate::error::AgentError;
use crate::exec::Interrupt;
use crate::state::State;
use crate::tools::ToolRegistry;

/// What a `before_model` hook decided.
pub enum BeforeModelDecision {
    /// Proceed to the next middleware, then to the model call.
    Continue,
    /// Stop before calling the model and surface this interrupt.
    Pause(Interrupt),
}

/// What an `after_model` hook decided.
pub enum AfterModelDecision {
    /// Proceed to the next (outer) middleware's `after_model`.
    Continue,
    /// Stop the chain and surface this interrupt (e.g. human-in-the-loop
    /// pausing for tool-call approval after seeing what the model proposed).
    Pause(Interrupt),
}

/// A middleware contributes zero or more of: startup state/tool
/// registration, a system prompt fragment, a hook before the model is
/// called, a hook after, and a JSON schema describing any metadata keys it
/// reads or writes in `State::metadata`.
///
/// Every method has a default no-op so a middleware only needs to implement
/// the hooks relevant to it.
#[async_trait]
pub trait Middleware: Send + Sync {
    fn name(&self) -> &str;

    /// Called once when the agent is constructed: register tools, seed
    /// `State::metadata` defaults.
    fn init(&self, _state: &mut State, _tools: &mut ToolRegistry) {}

    /// A fragment to append to the assembled system prompt, if any.
    fn system_prompt(&self, _state: &State) -> Option<String> {
        None
    }

    /// Runs before `call_llm`, in registration order. The first middleware
    /// to return `Pause` stops the chain; later middleware do not run.
    async fn before_model(&self, _state: &mut State) -> Result<BeforeModelDecision, AgentError> {
        Ok(BeforeModelDecision::Continue)
    }

    /// Runs after `call_llm` succeeds, in reverse registration order.
    async fn after_model(&self, _state: &mut State) -> Result<AfterModelDecision, AgentError> {
        Ok(AfterModelDecision::Continue)
    }

    /// JSON Schema describing the shape of any `State::metadata` entries this
    /// middleware owns, for callers that export/inspect state.
    fn state_schema(&self) -> Option<Value> {
        None
    }
}

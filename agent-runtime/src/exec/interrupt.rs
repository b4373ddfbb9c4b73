//! Interrupts: a pipeline step's request to pause for human input.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::AgentError;

/// A pause request raised by a pipeline step (typically the human-in-the-loop
/// middleware's `before_model` hook). `value` carries whatever the step
/// needs to show the caller (e.g. pending tool-call approval requests);
/// `id` correlates a specific pause with the decision passed to
/// `Agent::resume_from_interrupt`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Interrupt {
    pub value: Value,
    pub id: Option<String>,
}

impl Interrupt {
    pub fn new(value: Value) -> Self {
        Self { value, id: None }
    }

    pub fn with_id(value: Value, id: impl Into<String>) -> Self {
        Self {
            value,
            id: Some(id.into()),
        }
    }
}

impl std::fmt::Display for Interrupt {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match &self.id {
            Some(id) => write!(f, "{id}: {}", self.value),
            None => write!(f, "{}", self.value),
        }
    }
}

/// Resolves a pending interrupt into a value the paused step can continue with.
pub trait InterruptHandler: Send + Sync {
    fn handle(&self, interrupt: &Interrupt, decision: Value) -> Result<Value, AgentError>;
}

/// The default handler: passes the caller's decision through unchanged.
#[derive(Default)]
pub struct PassThroughInterruptHandler;

impl InterruptHandler for PassThroughInterruptHandler {
    fn handle(&self, _interrupt: &Interrupt, decision: Value) -> Result<Value, AgentError> {
        Ok(decision)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn pass_through_handler_returns_decision_unchanged() {
        let handler = PassThroughInterruptHandler;
        let interrupt = Interrupt::with_id(json!({"action": "approve"}), "int-1");
        let result = handler.handle(&interrupt, json!(true)).unwrap();
        assert_eq!(result, json!(true));
    }
}

//! Ordered collection of `Middleware`, run as one around-the-model wrapper.

use std::sync::Arc;

use crate::error::AgentError;
use crate::exec::Interrupt;
use crate::state::State;
use crate::tools::ToolRegistry;

use super::r#trait::{AfterModelDecision, BeforeModelDecision, Middleware};

#[derive(Clone, Default)]
pub struct MiddlewarePipeline {
    middlewares: Vec<Arc<dyn Middleware>>,
}

impl MiddlewarePipeline {
    pub fn new(middlewares: Vec<Arc<dyn Middleware>>) -> Self {
        Self { middlewares }
    }

    pub fn init(&self, state: &mut State, tools: &mut ToolRegistry) {
        for middleware in &self.middlewares {
            middleware.init(state, tools);
        }
    }

    /// Joins every middleware's non-empty system prompt fragment, in
    /// registration order, separated by a blank line.
    pub fn system_prompt(&self, state: &State) -> Option<String> {
        let fragments: Vec<String> = self
            .middlewares
            .iter()
            .filter_map(|m| m.system_prompt(state))
            .collect();
        if fragments.is_empty() {
            None
        } else {
            Some(fragments.join("\n\n"))
        }
    }

    /// Runs `before_model` hooks forward; stops and returns the interrupt at
    /// the first middleware that pauses.
    pub async fn before_model(&self, state: &mut State) -> Result<Option<Interrupt>, AgentError> {
        for middleware in &self.middlewares {
            if let BeforeModelDecision::Pause(interrupt) = middleware.before_model(state).await? {
                return Ok(Some(interrupt));
            }
        }
        Ok(None)
    }

    /// Runs `after_model` hooks in reverse registration order; stops and
    /// returns the interrupt at the first middleware that pauses.
    pub async fn after_model(&self, state: &mut State) -> Result<Option<Interrupt>, AgentError> {
        for middleware in self.middlewares.iter().rev() {
            if let AfterModelDecision::Pause(interrupt) = middleware.after_model(state).await? {
                return Ok(Some(interrupt));
            }
        }
        Ok(None)
    }

    /// Names of every registered middleware, in registration order.
    pub fn names(&self) -> Vec<&str> {
        self.middlewares.iter().map(|m| m.name()).collect()
    }

    pub fn len(&self) -> usize {
        self.middlewares.len()
    }

    pub fn is_empty(&self) -> bool {
        self.middlewares.is_empty()
    }
}

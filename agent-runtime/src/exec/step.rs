//! A single step in the execution pipeline.

use async_trait::async_trait;

use crate::error::AgentError;
use crate::llm::ChatModel;
use crate::middleware::MiddlewarePipeline;
use crate::state::State;
use crate::supervisor::ScopeKey;
use crate::tools::ToolRegistry;

use super::interrupt::Interrupt;

/// Shared, read-only context a step needs beyond `State` itself.
pub struct StepContext<'a> {
    pub model: &'a dyn ChatModel,
    pub tools: &'a ToolRegistry,
    pub middleware: &'a MiddlewarePipeline,
    pub scope: &'a ScopeKey,
    pub max_runs: u32,
    pub max_retry_count: u32,
}

/// What a pipeline step decided after looking at `State`.
pub enum StepOutcome {
    /// Keep running the pipeline from the next step.
    Continue,
    /// The pipeline is done; the run succeeded.
    Ok,
    /// Stop for now; the next `run` call picks up where this left off
    /// (distinct from `Interrupt`: nothing needs human input, the mode
    /// just decided this is a natural stopping point, e.g. `step` mode
    /// after one iteration).
    Pause,
    /// Stop and surface an interrupt; resumes via `Agent::resume_from_interrupt`.
    Interrupt(Interrupt),
    /// Stop with an error.
    Error(AgentError),
}

/// One step in an execution mode's pipeline: state in, outcome out.
#[async_trait]
pub trait PipelineStep: Send + Sync {
    fn name(&self) -> &str;

    async fn run(&self, state: &mut State, ctx: &StepContext<'_>) -> StepOutcome;
}

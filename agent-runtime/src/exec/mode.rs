//! An execution mode: a compiled, ordered list of pipeline steps run in a
//! loop until a step yields anything but `Continue`.

use thiserror::Error;

use crate::state::State;

use super::step::{PipelineStep, StepContext, StepOutcome};

/// Raised when a hand-assembled `ExecutionMode` fails validation at
/// construction rather than only failing on first run.
#[derive(Debug, Error)]
pub enum CompilationError {
    #[error("execution mode must have at least one step")]
    EmptySteps,
}

/// A compiled pipeline: run its steps in order, repeating from the top
/// whenever every step in a pass returns `Continue`.
pub struct ExecutionMode {
    name: String,
    steps: Vec<Box<dyn PipelineStep>>,
}

/// Final result of running an `ExecutionMode` to a stopping point.
#[derive(Debug)]
pub enum RunOutcome {
    Ok,
    Pause,
    Interrupt(super::interrupt::Interrupt),
    Error(crate::error::AgentError),
}

impl ExecutionMode {
    /// Validates and wraps a step list. Mirrors `StateGraph::compile`'s
    /// fail-fast validation rather than discovering an empty pipeline only
    /// on first `run`.
    pub fn new(name: impl Into<String>, steps: Vec<Box<dyn PipelineStep>>) -> Result<Self, CompilationError> {
        if steps.is_empty() {
            return Err(CompilationError::EmptySteps);
        }
        Ok(Self {
            name: name.into(),
            steps,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub async fn run(&self, state: &mut State, ctx: &StepContext<'_>) -> RunOutcome {
        loop {
            for step in &self.steps {
                let span = tracing::info_span!("pipeline_step", mode = %self.name, step = step.name());
                let _enter = span.enter();
                match step.run(state, ctx).await {
                    StepOutcome::Continue => continue,
                    StepOutcome::Ok => return RunOutcome::Ok,
                    StepOutcome::Pause => return RunOutcome::Pause,
                    StepOutcome::Interrupt(interrupt) => return RunOutcome::Interrupt(interrupt),
                    StepOutcome::Error(err) => return RunOutcome::Error(err),
                }
            }
        }
    }
}

/// Constructors for the execution modes this crate ships out of the box.
pub mod builtin {
    use super::*;
    use crate::exec::retry::RetryPolicy;
    use crate::exec::steps::{
        CallLlm, CheckMaxRuns, CheckPause, CheckUntilSuccess, CheckUntilTool, ContinueOrDone, ExecuteTools,
    };

    /// Loops think -> act while the model keeps asking for tools; stops once
    /// it produces a plain reply.
    pub fn while_needs_response(retry_policy: RetryPolicy, max_retry_count: u32) -> ExecutionMode {
        ExecutionMode::new(
            "while_needs_response",
            vec![
                Box::new(CheckMaxRuns),
                Box::new(CallLlm { retry_policy }),
                Box::new(ExecuteTools { max_retry_count }),
                Box::new(ContinueOrDone),
            ],
        )
        .expect("built-in mode always has steps")
    }

    /// Stops as soon as a tool call succeeds, without waiting for a further
    /// LLM call to turn it into a plain reply. A run of consecutive tool
    /// failures beyond `max_retry_count` ends the run with
    /// `ExceededFailureCount` rather than letting the model keep trying
    /// indefinitely.
    pub fn until_success(retry_policy: RetryPolicy, max_retry_count: u32) -> ExecutionMode {
        ExecutionMode::new(
            "until_success",
            vec![
                Box::new(CheckMaxRuns),
                Box::new(CallLlm { retry_policy }),
                Box::new(ExecuteTools { max_retry_count }),
                Box::new(CheckUntilSuccess),
            ],
        )
        .expect("built-in mode always has steps")
    }

    /// Loops until a specific tool has been used successfully at least once.
    pub fn until_tool_used(tool_name: impl Into<String>, retry_policy: RetryPolicy, max_retry_count: u32) -> ExecutionMode {
        ExecutionMode::new(
            "until_tool_used",
            vec![
                Box::new(CheckMaxRuns),
                Box::new(CallLlm { retry_policy }),
                Box::new(ExecuteTools { max_retry_count }),
                Box::new(CheckUntilTool {
                    tool_name: tool_name.into(),
                }),
            ],
        )
        .expect("built-in mode always has steps")
    }

    /// Runs exactly one think/act round per `Agent::run` call, then pauses
    /// (resumable, not an interrupt: nothing needs human input).
    pub fn step(retry_policy: RetryPolicy, max_retry_count: u32) -> ExecutionMode {
        ExecutionMode::new(
            "step",
            vec![
                Box::new(CheckMaxRuns),
                Box::new(CallLlm { retry_policy }),
                Box::new(ExecuteTools { max_retry_count }),
                Box::new(CheckPause),
            ],
        )
        .expect("built-in mode always has steps")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_step_list_is_rejected_at_construction() {
        let err = ExecutionMode::new("custom", vec![]).unwrap_err();
        assert!(matches!(err, CompilationError::EmptySteps));
    }
}

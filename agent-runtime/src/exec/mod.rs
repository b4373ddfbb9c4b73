//! Execution mode engine: pure pipeline steps composed into a run loop.
//!
//! A `PipelineStep` receives `State` and returns a `StepOutcome`: keep
//! going, stop successfully, pause for a reason that will resume on the
//! next `run`, or interrupt for human input. An `ExecutionMode` is an
//! ordered list of steps run in a loop until a step yields anything but
//! `Continue`.

mod interrupt;
mod mode;
mod retry;
mod step;
mod steps;

pub use interrupt::{Interrupt, InterruptHandler};
pub use mode::{builtin, CompilationError, ExecutionMode, RunOutcome};
pub use retry::RetryPolicy;
pub use step::{PipelineStep, StepContext, StepOutcome};
pub use steps::{CallLlm, CheckMaxRuns, CheckPause, CheckUntilTool, ContinueOrDone, ExecuteTools};

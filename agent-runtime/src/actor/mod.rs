//! Agent actor: the long-lived, single-threaded state machine driving one
//! conversation through an `ExecutionMode`.
//!
//! Mirrors the teacher's node-actor split: `runtime` owns the mailbox loop
//! and status machine (like a compiled graph's executor), `handle` is the
//! cheap cloneable reference callers hold, `events` are what gets broadcast,
//! `logging` is the structured tracing wired into both.

mod events;
mod handle;
mod logging;
mod runtime;

pub use events::{DebugEvent, LifecycleEvent};
pub use handle::{ActorGone, AgentHandle};
pub use runtime::{AgentConfig, AgentStatus, ResumeDecision, ResumeDecisionKind};

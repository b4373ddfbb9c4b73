//! `AgentHandle`: a cheap, cloneable reference to a running agent actor.
//!
//! Every public operation round-trips through the mailbox so mutations to
//! `State` are always serialized through the single task `spawn` created;
//! callers never get a `&mut State` directly.

use tokio::sync::{broadcast, mpsc, oneshot};

use crate::error::AgentError;
use crate::exec::RunOutcome;
use crate::message::Message;
use crate::state::State;

use super::events::{DebugEvent, LifecycleEvent};
use super::runtime::{self, AgentConfig, AgentStatus, Command, ResumeDecision};

#[derive(Clone)]
pub struct AgentHandle {
    tx: mpsc::Sender<Command>,
    lifecycle_tx: broadcast::Sender<LifecycleEvent>,
    debug_tx: broadcast::Sender<DebugEvent>,
}

/// Returned when the actor's mailbox has already shut down (e.g. evicted by
/// the lifecycle supervisor) and a command can no longer be delivered.
#[derive(Debug, thiserror::Error)]
#[error("agent actor is no longer running")]
pub struct ActorGone;

impl AgentHandle {
    pub fn spawn(config: AgentConfig) -> Self {
        let (tx, lifecycle_tx, debug_tx) = runtime::spawn(config);
        Self {
            tx,
            lifecycle_tx,
            debug_tx,
        }
    }

    pub fn subscribe_lifecycle(&self) -> broadcast::Receiver<LifecycleEvent> {
        self.lifecycle_tx.subscribe()
    }

    pub fn subscribe_debug(&self) -> broadcast::Receiver<DebugEvent> {
        self.debug_tx.subscribe()
    }

    async fn call<T>(
        &self,
        build: impl FnOnce(oneshot::Sender<T>) -> Command,
    ) -> Result<T, ActorGone> {
        let (reply_tx, reply_rx) = oneshot::channel();
        self.tx.send(build(reply_tx)).await.map_err(|_| ActorGone)?;
        reply_rx.await.map_err(|_| ActorGone)
    }

    pub async fn add_message(&self, message: Message) -> Result<Result<(), AgentError>, ActorGone> {
        self.call(|reply| Command::AddMessage { message, reply }).await
    }

    pub async fn run(&self) -> Result<RunOutcome, ActorGone> {
        self.call(|reply| Command::Run { reply }).await
    }

    pub async fn cancel(&self) -> Result<(), ActorGone> {
        self.call(|reply| Command::Cancel { reply }).await
    }

    pub async fn resume_from_interrupt(
        &self,
        decisions: Vec<ResumeDecision>,
    ) -> Result<Result<RunOutcome, AgentError>, ActorGone> {
        self.call(|reply| Command::ResumeFromInterrupt { decisions, reply }).await
    }

    pub async fn touch(&self) -> Result<(), ActorGone> {
        self.call(|reply| Command::Touch { reply }).await
    }

    pub async fn get_state(&self) -> Result<State, ActorGone> {
        self.call(|reply| Command::GetState { reply }).await
    }

    pub async fn get_status(&self) -> Result<AgentStatus, ActorGone> {
        self.call(|reply| Command::GetStatus { reply }).await
    }

    pub async fn export_state(&self) -> Result<Result<serde_json::Value, AgentError>, ActorGone> {
        self.call(|reply| Command::ExportState { reply }).await
    }

    pub async fn import_state(&self, payload: serde_json::Value) -> Result<Result<(), AgentError>, ActorGone> {
        self.call(|reply| Command::ImportState { payload, reply }).await
    }
}

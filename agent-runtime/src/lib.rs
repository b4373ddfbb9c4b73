//! # agent-runtime
//!
//! A runtime for long-lived, tool-using LLM agents. Built around one core
//! loop instead of a general graph: an agent actor holds conversation
//! `State`, drives it through an `ExecutionMode`'s pipeline steps, and
//! wraps every model turn in a `MiddlewarePipeline` of capability-set
//! middleware (todo list, filesystem access, context compaction, dangling
//! tool-call patching, human-in-the-loop approval).
//!
//! ## Design principles
//!
//! - **Single state type**: one `State` (messages, todos, metadata, usage)
//!   flows through every pipeline step and middleware hook.
//! - **Actor, not a thread pool**: each `Agent` is a single-threaded
//!   cooperative mailbox loop; every mutation serializes through `Command`s
//!   sent to an `AgentHandle`.
//! - **Tool errors are observations, not failures**: a failing tool produces
//!   a `ToolResult { is_error: true }` the model sees, not an `AgentError`
//!   that aborts the run.
//! - **Interrupts, not panics, for human input**: a middleware's
//!   `before_model`/`after_model` hook can pause a run with an `Interrupt`;
//!   `Agent::resume_from_interrupt` (via `AgentHandle`) continues it.
//!
//! ## Main modules
//!
//! - [`actor`]: the agent actor — [`actor::AgentHandle`], [`actor::AgentConfig`],
//!   [`actor::AgentStatus`], lifecycle/debug events.
//! - [`exec`]: the execution mode engine — [`exec::ExecutionMode`],
//!   [`exec::PipelineStep`], built-in modes in [`exec::builtin`].
//! - [`middleware`]: the middleware pipeline — [`middleware::Middleware`],
//!   [`middleware::MiddlewarePipeline`]; default middleware in
//!   [`middleware::defaults`].
//! - [`fs`]: the filesystem server backing the default filesystem middleware.
//! - [`tools`]: the [`tools::Tool`] trait, [`tools::ToolRegistry`], built-in tools.
//! - [`llm`]: the [`llm::ChatModel`] abstraction and [`llm::MockChatModel`].
//! - [`message`]: [`message::Message`], [`message::ContentPart`], tool call/result types.
//! - [`state`]: [`state::State`], [`state::Todo`], [`state::TokenUsage`].
//! - [`supervisor`]: [`supervisor::LifecycleSupervisor`], [`supervisor::ScopeKey`],
//!   [`supervisor::Presence`].
//! - [`serialize`]: versioned export/import of an agent's serialized state.
//! - [`error`]: [`error::AgentError`], the error type shared across the above.
//!
//! ## Quick start
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use agent_runtime::actor::{AgentConfig, AgentHandle};
//! use agent_runtime::exec::{builtin, RetryPolicy};
//! use agent_runtime::llm::MockChatModel;
//! use agent_runtime::message::Message;
//! use agent_runtime::middleware::MiddlewarePipeline;
//! use agent_runtime::supervisor::ScopeKey;
//!
//! # #[tokio::main]
//! # async fn main() {
//! let config = AgentConfig {
//!     agent_id: "demo".to_string(),
//!     scope: ScopeKey::agent("local", "demo"),
//!     base_system_prompt: Some("You are a helpful assistant.".to_string()),
//!     model: Arc::new(MockChatModel::fixed_reply("hello!")),
//!     middleware: MiddlewarePipeline::default(),
//!     mode: builtin::while_needs_response(RetryPolicy::None, 3),
//!     max_runs: 20,
//!     max_retry_count: 3,
//! };
//! let agent = AgentHandle::spawn(config);
//! agent.add_message(Message::user("u1", "hi there")).await.unwrap().unwrap();
//! let _outcome = agent.run().await.unwrap();
//! # }
//! ```

pub mod actor;
pub mod error;
pub mod exec;
pub mod fs;
pub mod llm;
pub mod message;
pub mod middleware;
pub mod serialize;
pub mod state;
pub mod supervisor;
pub mod tools;

pub use error::AgentError;
pub use message::Message;
pub use state::State;

//! Middleware pipeline: capability-set hooks wrapped around the `call_llm`
//! step. `before_model` hooks run forward (registration order); `after_model`
//! hooks run in reverse, so the last middleware to see the request is the
//! first to see the response (an "around" pattern, same shape as the
//! teacher's `NodeMiddleware::around_run`).

pub mod defaults;
mod pipeline;
mod r#trait;

pub use pipeline::MiddlewarePipeline;
pub use r#trait::{AfterModelDecision, BeforeModelDecision, Middleware};

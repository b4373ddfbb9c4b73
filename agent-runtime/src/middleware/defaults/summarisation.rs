//! Summarisation middleware: when the conversation overflows the configured
//! context window, replaces the oldest messages with one summary message
//! produced by an LLM call, keeping the most recent `compact_keep_recent`
//! messages verbatim.

use std::sync::Arc;

use async_trait::async_trait;

use crate::error::AgentError;
use crate::llm::{ChatModel, ChatRequest, ToolChoice};
use crate::message::Message;
use crate::state::State;

use super::super::r#trait::{BeforeModelDecision, Middleware};

const CHARS_PER_TOKEN: u32 = 4;

fn estimate_tokens(messages: &[Message]) -> u32 {
    let total: usize = messages.iter().map(|m| m.text_content().len()).sum();
    (total / CHARS_PER_TOKEN as usize) as u32
}

#[derive(Debug, Clone)]
pub struct SummarisationConfig {
    /// Whether to auto-compact when the estimated context overflows.
    pub auto: bool,
    pub max_context_tokens: u32,
    pub reserve_tokens: u32,
    /// Number of most recent messages kept verbatim when compacting.
    pub compact_keep_recent: usize,
}

impl Default for SummarisationConfig {
    fn default() -> Self {
        Self {
            auto: true,
            max_context_tokens: 128_000,
            reserve_tokens: 4096,
            compact_keep_recent: 20,
        }
    }
}

fn is_overflow(state: &State, config: &SummarisationConfig) -> bool {
    let current = match state.total_usage {
        Some(usage) => usage.total_tokens,
        None => estimate_tokens(&state.messages),
    };
    current + config.reserve_tokens > config.max_context_tokens
}

/// Compacts old history via an LLM call when the model overflows.
pub struct SummarisationMiddleware {
    config: SummarisationConfig,
    model: Arc<dyn ChatModel>,
}

impl SummarisationMiddleware {
    pub fn new(config: SummarisationConfig, model: Arc<dyn ChatModel>) -> Self {
        Self { config, model }
    }

    async fn compact(&self, messages: &[Message]) -> Result<Message, AgentError> {
        let keep_recent = self.config.compact_keep_recent.min(messages.len());
        let to_summarise = &messages[..messages.len() - keep_recent];
        let mut prompt_messages = to_summarise.to_vec();
        prompt_messages.push(Message::user(
            "compact-request",
            "Summarise the conversation above into a concise paragraph capturing decisions, \
             open questions, and facts the agent still needs. This summary will replace the \
             original messages in context.",
        ));
        let response = self
            .model
            .invoke(ChatRequest {
                messages: &prompt_messages,
                tools: &[],
                tool_choice: ToolChoice::None,
            })
            .await?;
        Ok(Message::system("compaction-summary", response.content))
    }
}

#[async_trait]
impl Middleware for SummarisationMiddleware {
    fn name(&self) -> &str {
        "summarisation"
    }

    async fn before_model(&self, state: &mut State) -> Result<BeforeModelDecision, AgentError> {
        if !self.config.auto || !is_overflow(state, &self.config) {
            return Ok(BeforeModelDecision::Continue);
        }
        if state.messages.len() <= self.config.compact_keep_recent {
            return Ok(BeforeModelDecision::Continue);
        }
        let summary = self.compact(&state.messages).await?;
        let keep_recent = self.config.compact_keep_recent.min(state.messages.len());
        let recent = state.messages.split_off(state.messages.len() - keep_recent);
        state.messages = vec![summary];
        state.messages.extend(recent);
        Ok(BeforeModelDecision::Continue)
    }
}

//! Conversation state carried by an agent across runs.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::message::Message;

/// Status of one item on the agent's todo list (default middleware, see
/// `middleware::defaults::todo`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TodoStatus {
    Pending,
    InProgress,
    Completed,
    Cancelled,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Todo {
    pub id: String,
    pub content: String,
    pub status: TodoStatus,
}

/// Token usage for one chat-model call.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct TokenUsage {
    pub prompt_tokens: u32,
    pub completion_tokens: u32,
    pub total_tokens: u32,
}

impl std::ops::AddAssign for TokenUsage {
    fn add_assign(&mut self, other: Self) {
        self.prompt_tokens += other.prompt_tokens;
        self.completion_tokens += other.completion_tokens;
        self.total_tokens += other.total_tokens;
    }
}

/// State carried by an `Agent` across runs: conversation history, todo list,
/// and free-form metadata middleware can use to stash scratch data (e.g. a
/// running summary, or the last compaction point).
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct State {
    pub messages: Vec<Message>,
    #[serde(default)]
    pub todos: Vec<Todo>,
    #[serde(default)]
    pub metadata: HashMap<String, Value>,
    /// Usage for the most recent `call_llm` step.
    #[serde(default)]
    pub usage: Option<TokenUsage>,
    /// Usage accumulated over every `call_llm` step this run.
    #[serde(default)]
    pub total_usage: Option<TokenUsage>,
    /// Consecutive tool/model failures since the last success; reset to 0 on
    /// success, checked against `max_retry_count` by `check_max_runs`-adjacent logic.
    #[serde(default)]
    pub failure_count: u32,
    /// Number of pipeline iterations completed in the current `run` call;
    /// reset at the start of every `run`, checked by `check_max_runs`.
    #[serde(default)]
    pub run_count: u32,
}

impl State {
    pub fn last_assistant_reply(&self) -> Option<String> {
        self.messages
            .iter()
            .rev()
            .find(|m| matches!(m.role, crate::message::Role::Assistant))
            .map(|m| m.text_content())
    }

    pub fn record_usage(&mut self, usage: TokenUsage) {
        self.usage = Some(usage);
        let total = self.total_usage.get_or_insert(TokenUsage::default());
        *total += usage;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::message::Message;

    #[test]
    fn record_usage_accumulates_into_total() {
        let mut state = State::default();
        state.record_usage(TokenUsage {
            prompt_tokens: 10,
            completion_tokens: 5,
            total_tokens: 15,
        });
        state.record_usage(TokenUsage {
            prompt_tokens: 3,
            completion_tokens: 2,
            total_tokens: 5,
        });
        let total = state.total_usage.unwrap();
        assert_eq!(total.total_tokens, 20);
        assert_eq!(state.usage.unwrap().total_tokens, 5);
    }

    #[test]
    fn last_assistant_reply_finds_most_recent() {
        let mut state = State::default();
        state.messages.push(Message::user("u1", "hi"));
        state.messages.push(Message::assistant("a1", "hello"));
        state.messages.push(Message::user("u2", "again"));
        assert_eq!(state.last_assistant_reply(), Some("hello".to_string()));
    }
}

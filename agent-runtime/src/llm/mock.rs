//! Deterministic `ChatModel` for tests and the demo CLI.

use async_trait::async_trait;
use std::sync::atomic::{AtomicUsize, Ordering};

use super::{ChatModel, ChatRequest, ChatResponse};
use crate::error::AgentError;
use crate::message::{Role, ToolCall};
use crate::state::TokenUsage;

/// One scripted response: either a plain reply, or a reply that also
/// requests a tool call.
#[derive(Clone)]
pub enum ScriptedTurn {
    Reply(String),
    CallTool { name: String, arguments: serde_json::Value },
}

/// A `ChatModel` that plays back a fixed script of turns, one per `invoke`
/// call, falling back to echoing the last user message once the script is
/// exhausted. Used by tests that need deterministic multi-turn behavior
/// (tool call then final reply) without a live provider.
pub struct MockChatModel {
    script: Vec<ScriptedTurn>,
    cursor: AtomicUsize,
}

impl MockChatModel {
    pub fn new(script: Vec<ScriptedTurn>) -> Self {
        Self {
            script,
            cursor: AtomicUsize::new(0),
        }
    }

    /// A model that always replies with the same fixed text.
    pub fn fixed_reply(text: impl Into<String>) -> Self {
        Self::new(vec![ScriptedTurn::Reply(text.into())])
    }
}

#[async_trait]
impl ChatModel for MockChatModel {
    async fn invoke(&self, request: ChatRequest<'_>) -> Result<ChatResponse, AgentError> {
        let idx = self.cursor.fetch_add(1, Ordering::SeqCst);
        let turn = self
            .script
            .get(idx)
            .cloned()
            .unwrap_or_else(|| echo_last_user(request.messages));

        let usage = Some(TokenUsage {
            prompt_tokens: request.messages.len() as u32,
            completion_tokens: 1,
            total_tokens: request.messages.len() as u32 + 1,
        });

        Ok(match turn {
            ScriptedTurn::Reply(content) => ChatResponse {
                content,
                tool_calls: vec![],
                usage,
            },
            ScriptedTurn::CallTool { name, arguments } => ChatResponse {
                content: String::new(),
                tool_calls: vec![ToolCall::new(format!("call_{idx}"), 0, name, arguments)],
                usage,
            },
        })
    }
}

fn echo_last_user(messages: &[crate::message::Message]) -> ScriptedTurn {
    let last = messages
        .iter()
        .rev()
        .find(|m| m.role == Role::User)
        .map(|m| m.text_content())
        .unwrap_or_default();
    ScriptedTurn::Reply(format!("echo: {last}"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::llm::{ChatRequest, ToolChoice};
    use crate::message::Message;

    #[tokio::test]
    async fn fixed_reply_always_returns_same_text() {
        let model = MockChatModel::fixed_reply("hello");
        let messages = vec![Message::user("u1", "hi")];
        for _ in 0..3 {
            let resp = model
                .invoke(ChatRequest {
                    messages: &messages,
                    tools: &[],
                    tool_choice: ToolChoice::Auto,
                })
                .await
                .unwrap();
            assert_eq!(resp.content, "hello");
        }
    }

    #[tokio::test]
    async fn script_exhaustion_falls_back_to_echo() {
        let model = MockChatModel::new(vec![ScriptedTurn::Reply("first".into())]);
        let messages = vec![Message::user("u1", "ping")];
        let req = |m: &[Message]| ChatRequest {
            messages: m,
            tools: &[],
            tool_choice: ToolChoice::Auto,
        };
        let first = model.invoke(req(&messages)).await.unwrap();
        assert_eq!(first.content, "first");
        let second = model.invoke(req(&messages)).await.unwrap();
        assert_eq!(second.content, "echo: ping");
    }
}

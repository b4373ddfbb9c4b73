//! Chat model abstraction.
//!
//! `ChatModel` is the only seam between the execution mode engine and an
//! actual LLM provider. Provider adapters (OpenAI, Anthropic, ...) are out
//! of scope for this crate; `MockChatModel` is the reference implementation
//! used by tests and the demo CLI.

mod mock;

pub use mock::{MockChatModel, ScriptedTurn};

use async_trait::async_trait;
use tokio::sync::mpsc;

use crate::error::AgentError;
use crate::message::{Message, MessageDelta, ToolCall};
use crate::state::TokenUsage;

/// Controls whether the model may, must not, or must call a tool.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ToolChoice {
    #[default]
    Auto,
    None,
    Required,
}

/// Tool specification passed to the model so it knows what it can call.
#[derive(Clone, Debug)]
pub struct ToolSpec {
    pub name: String,
    pub description: Option<String>,
    pub input_schema: serde_json::Value,
}

/// Input to one `ChatModel::invoke` call.
pub struct ChatRequest<'a> {
    pub messages: &'a [Message],
    pub tools: &'a [ToolSpec],
    pub tool_choice: ToolChoice,
}

/// Result of one chat-model turn.
pub struct ChatResponse {
    pub content: String,
    pub tool_calls: Vec<ToolCall>,
    pub usage: Option<TokenUsage>,
}

/// A chat model: messages and available tools in, one assistant turn out.
///
/// Implementations that support token streaming should send `MessageDelta`
/// fragments through `chunk_tx` as they arrive; `invoke` still returns the
/// complete `ChatResponse` once the turn finishes.
#[async_trait]
pub trait ChatModel: Send + Sync {
    async fn invoke(&self, request: ChatRequest<'_>) -> Result<ChatResponse, AgentError>;

    async fn invoke_stream(
        &self,
        request: ChatRequest<'_>,
        chunk_tx: Option<mpsc::Sender<MessageDelta>>,
    ) -> Result<ChatResponse, AgentError> {
        let response = self.invoke(request).await?;
        if let Some(tx) = chunk_tx {
            if !response.content.is_empty() {
                let _ = tx
                    .send(MessageDelta {
                        content: vec![crate::message::ContentPart::Text {
                            text: response.content.clone(),
                        }],
                        tool_calls: vec![],
                        status: None,
                    })
                    .await;
            }
        }
        Ok(response)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct StubModel;

    #[async_trait]
    impl ChatModel for StubModel {
        async fn invoke(&self, _request: ChatRequest<'_>) -> Result<ChatResponse, AgentError> {
            Ok(ChatResponse {
                content: "hi".to_string(),
                tool_calls: vec![],
                usage: None,
            })
        }
    }

    #[tokio::test]
    async fn default_invoke_stream_sends_single_chunk() {
        let model = StubModel;
        let (tx, mut rx) = mpsc::channel(2);
        let req = ChatRequest {
            messages: &[],
            tools: &[],
            tool_choice: ToolChoice::Auto,
        };
        let resp = model.invoke_stream(req, Some(tx)).await.unwrap();
        assert_eq!(resp.content, "hi");
        let delta = rx.recv().await.expect("one chunk");
        assert_eq!(delta.content.len(), 1);
    }
}

//! Todo-list middleware: contributes the `write_todos` tool and renders the
//! current list into the system prompt so the model stays aware of it.

use async_trait::async_trait;
use serde_json::json;

use crate::llm::ToolSpec;
use crate::state::{State, Todo, TodoStatus};
use crate::tools::{Tool, ToolContext, ToolOutcome, ToolRegistry};

use super::super::r#trait::Middleware;

pub const TOOL_WRITE_TODOS: &str = "write_todos";

/// Lets the model maintain a todo list across turns. The list lives in
/// `State::todos`; the tool replaces it wholesale each call (the model is
/// expected to resend the full list, same as the teacher's file tools treat
/// a write as replacing the whole file rather than patching it).
#[derive(Default)]
pub struct TodoMiddleware;

#[async_trait]
impl Middleware for TodoMiddleware {
    fn name(&self) -> &str {
        "todo"
    }

    fn init(&self, _state: &mut State, tools: &mut ToolRegistry) {
        tools
            .register(std::sync::Arc::new(WriteTodosTool))
            .expect("write_todos is this middleware's only tool name");
    }

    fn system_prompt(&self, state: &State) -> Option<String> {
        if state.todos.is_empty() {
            return None;
        }
        let mut lines = vec!["Current todo list:".to_string()];
        for todo in &state.todos {
            let mark = match todo.status {
                TodoStatus::Pending => "[ ]",
                TodoStatus::InProgress => "[~]",
                TodoStatus::Completed => "[x]",
                TodoStatus::Cancelled => "[-]",
            };
            lines.push(format!("{mark} {}", todo.content));
        }
        Some(lines.join("\n"))
    }
}

struct WriteTodosTool;

#[async_trait]
impl Tool for WriteTodosTool {
    fn name(&self) -> &str {
        TOOL_WRITE_TODOS
    }

    fn spec(&self) -> ToolSpec {
        ToolSpec {
            name: TOOL_WRITE_TODOS.to_string(),
            description: Some(
                "Replace the agent's todo list. Pass the complete list every call.".to_string(),
            ),
            input_schema: json!({
                "type": "object",
                "properties": {
                    "todos": {
                        "type": "array",
                        "items": {
                            "type": "object",
                            "properties": {
                                "id": {"type": "string"},
                                "content": {"type": "string"},
                                "status": {"type": "string", "enum": ["pending", "in_progress", "completed", "cancelled"]}
                            },
                            "required": ["id", "content", "status"]
                        }
                    }
                },
                "required": ["todos"]
            }),
        }
    }

    async fn call(&self, args: serde_json::Value, _ctx: &ToolContext<'_>) -> ToolOutcome {
        let Some(raw) = args.get("todos") else {
            return ToolOutcome::error("missing required argument: todos");
        };
        let todos: Vec<Todo> = match serde_json::from_value(raw.clone()) {
            Ok(todos) => todos,
            Err(err) => return ToolOutcome::error(format!("invalid todos: {err}")),
        };
        let mut delta = serde_json::Map::new();
        delta.insert("todos".to_string(), serde_json::to_value(&todos).unwrap());
        ToolOutcome::ok(format!("recorded {} todo(s)", todos.len())).with_state_delta(delta)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::supervisor::ScopeKey;

    fn ctx() -> ToolContext<'static> {
        let scope: &'static ScopeKey = Box::leak(Box::new(ScopeKey::agent("t", "a")));
        ToolContext {
            scope,
            recent_messages: &[],
        }
    }

    #[tokio::test]
    async fn write_todos_returns_state_delta_with_todos_key() {
        let tool = WriteTodosTool;
        let out = tool
            .call(
                json!({"todos": [{"id": "1", "content": "do it", "status": "pending"}]}),
                &ctx(),
            )
            .await;
        assert!(!out.is_error);
        let delta = out.state_delta.expect("state_delta");
        assert!(delta.contains_key("todos"));
    }

    #[test]
    fn system_prompt_is_none_when_todos_empty() {
        let middleware = TodoMiddleware;
        assert!(middleware.system_prompt(&State::default()).is_none());
    }

    #[test]
    fn system_prompt_renders_status_marks() {
        let middleware = TodoMiddleware;
        let mut state = State::default();
        state.todos.push(Todo {
            id: "1".into(),
            content: "ship it".into(),
            status: TodoStatus::InProgress,
        });
        let prompt = middleware.system_prompt(&state).unwrap();
        assert!(prompt.contains("[~] ship it"));
    }
}

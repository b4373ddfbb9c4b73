//! Integration test: a tool call gated behind approval pauses the run with
//! an interrupt, and resuming with an edited decision produces a synthetic
//! tool result and lets the run continue to completion.

mod init_logging;

use std::sync::Arc;

use agent_runtime::actor::{AgentConfig, AgentHandle, AgentStatus, ResumeDecision, ResumeDecisionKind};
use agent_runtime::exec::{builtin, RetryPolicy, RunOutcome};
use agent_runtime::fs::FilesystemServer;
use agent_runtime::llm::{MockChatModel, ScriptedTurn};
use agent_runtime::message::{Message, Role};
use agent_runtime::middleware::defaults::{ApprovalDecision, ApprovalPolicy, FilesystemMiddleware, HumanInTheLoopMiddleware};
use agent_runtime::middleware::MiddlewarePipeline;
use agent_runtime::supervisor::ScopeKey;
use serde_json::json;

#[tokio::test]
async fn write_file_behind_approval_pauses_then_resumes_with_an_edited_argument() {
    let model = MockChatModel::new(vec![
        ScriptedTurn::CallTool {
            name: "write_file".to_string(),
            arguments: json!({"path": "x", "content": "y"}),
        },
        ScriptedTurn::Reply("done".to_string()),
    ]);

    let mut tools = std::collections::HashMap::new();
    tools.insert(
        "write_file".to_string(),
        vec![ApprovalDecision::Approve, ApprovalDecision::Edit, ApprovalDecision::Reject],
    );
    let policy = ApprovalPolicy { tools };

    let fs = Arc::new(FilesystemServer::memory());
    let config = AgentConfig {
        agent_id: "s6".into(),
        scope: ScopeKey::agent("u1", "s6"),
        base_system_prompt: None,
        model: Arc::new(model),
        middleware: MiddlewarePipeline::new(vec![
            Arc::new(FilesystemMiddleware::new(fs)),
            Arc::new(HumanInTheLoopMiddleware::new(policy)),
        ]),
        mode: builtin::while_needs_response(RetryPolicy::None, 3),
        max_runs: 10,
        max_retry_count: 3,
    };
    let agent = AgentHandle::spawn(config);

    // add_message triggers the run itself; it surfaces as Ok(()) here since
    // only RunOutcome::Error propagates as an Err, and Interrupt does not.
    agent
        .add_message(Message::user("u1", "please write x"))
        .await
        .unwrap()
        .unwrap();

    assert_eq!(agent.get_status().await.unwrap(), AgentStatus::Interrupted);

    let outcome = agent
        .resume_from_interrupt(vec![ResumeDecision {
            kind: ResumeDecisionKind::Edit,
            edited_arguments: Some(json!({"path": "x", "content": "z"})),
        }])
        .await
        .unwrap()
        .unwrap();
    assert!(matches!(outcome, RunOutcome::Ok));
    assert_eq!(agent.get_status().await.unwrap(), AgentStatus::Completed);

    let state = agent.get_state().await.unwrap();
    let synthetic = state
        .messages
        .iter()
        .find(|m| m.role == Role::Tool && m.tool_results.iter().any(|r| r.content.contains("edited")))
        .expect("synthetic tool result from resume");
    let result = &synthetic.tool_results[0];
    assert!(result.content.contains("write_file"));
    assert!(result.content.contains('z'));
    assert!(!result.is_error);

    assert_eq!(state.last_assistant_reply(), Some("done".to_string()));
}

//! Minimal stdin/stdout demo: one agent, the default middleware stack, a
//! mock chat model. Reads a line, feeds it to the agent, prints the reply.

use std::io::Write;
use std::sync::Arc;

use agent_runtime::actor::{AgentConfig, AgentHandle};
use agent_runtime::exec::{builtin, RetryPolicy};
use agent_runtime::fs::{FilesystemServer, MemoryBackend, PersistenceConfig};
use agent_runtime::llm::MockChatModel;
use agent_runtime::message::Message;
use agent_runtime::middleware::defaults::{FilesystemMiddleware, PatchDanglingToolCallsMiddleware, TodoMiddleware};
use agent_runtime::middleware::MiddlewarePipeline;
use agent_runtime::supervisor::{LifecycleSupervisor, ScopeKey};
use clap::Parser;

/// Demo REPL over an in-memory agent runtime.
#[derive(Parser)]
struct Args {
    /// Fixed reply the mock model echoes instead of calling a real provider.
    #[arg(long, default_value = "I received your message.")]
    reply: String,
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| "warn".into()))
        .init();

    let _ = env_config::load_and_apply("agent-runtime", None);
    let args = Args::parse();

    let scope = ScopeKey::agent("local", "demo");
    let fs = Arc::new(FilesystemServer::memory());
    fs.register_persistence(PersistenceConfig::new("workspace"), Arc::new(MemoryBackend::new()))
        .await
        .expect("workspace is this demo's only base_directory");

    let middleware = MiddlewarePipeline::new(vec![
        Arc::new(TodoMiddleware),
        Arc::new(FilesystemMiddleware::new(fs)),
        Arc::new(PatchDanglingToolCallsMiddleware),
    ]);

    let config = AgentConfig {
        agent_id: "demo".to_string(),
        scope: scope.clone(),
        base_system_prompt: Some("You are a helpful assistant running in a local demo.".to_string()),
        model: Arc::new(MockChatModel::fixed_reply(args.reply)),
        middleware,
        mode: builtin::while_needs_response(RetryPolicy::None, 3),
        max_runs: 20,
        max_retry_count: 3,
    };

    let supervisor: LifecycleSupervisor<AgentHandle> = LifecycleSupervisor::with_defaults();
    let agent = supervisor.start(scope, || AgentHandle::spawn(config)).into_handle();

    println!("agent-runtime demo. Type a message, Ctrl-D to exit.");
    let stdin = std::io::stdin();
    loop {
        print!("> ");
        std::io::stdout().flush().ok();
        let mut line = String::new();
        if stdin.read_line(&mut line).unwrap_or(0) == 0 {
            break;
        }
        let line = line.trim();
        if line.is_empty() {
            continue;
        }

        // add_message triggers the run itself (the agent is idle between
        // prompts), so there's nothing left to drive here.
        match agent.add_message(Message::user(uuid::Uuid::new_v4().to_string(), line)).await {
            Ok(Ok(())) => {}
            Ok(Err(err)) => {
                eprintln!("run error: {err}");
                continue;
            }
            Err(err) => {
                eprintln!("agent is gone: {err}");
                break;
            }
        }

        match agent.get_status().await {
            Ok(agent_runtime::actor::AgentStatus::Interrupted) => println!("(interrupted)"),
            Ok(_) => {
                let state = agent.get_state().await.expect("agent still running");
                if let Some(reply) = state.last_assistant_reply() {
                    println!("{reply}");
                }
            }
            Err(err) => {
                eprintln!("agent is gone: {err}");
                break;
            }
        }
    }
}

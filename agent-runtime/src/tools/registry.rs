//! Tool registry: looks tools up by name for the execution mode engine.

use std::collections::HashMap;
use std::sync::Arc;

use crate::error::AgentError;
use crate::llm::ToolSpec;

use super::Tool;

/// Holds the tools available to one agent, keyed by name.
///
/// Middleware can extend this at `init` time (e.g. the filesystem
/// middleware registers `read_file`/`write_file`); the execution mode
/// engine's `execute_tools` step looks calls up here.
#[derive(Default, Clone)]
pub struct ToolRegistry {
    tools: HashMap<String, Arc<dyn Tool>>,
}

impl ToolRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers `tool` under its own name. Fails rather than silently
    /// replacing an existing tool of the same name.
    pub fn register(&mut self, tool: Arc<dyn Tool>) -> Result<(), AgentError> {
        let name = tool.name().to_string();
        if self.tools.contains_key(&name) {
            return Err(AgentError::Validation(format!(
                "tool '{name}' is already registered"
            )));
        }
        self.tools.insert(name, tool);
        Ok(())
    }

    pub fn get(&self, name: &str) -> Option<Arc<dyn Tool>> {
        self.tools.get(name).cloned()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.tools.contains_key(name)
    }

    pub fn specs(&self) -> Vec<ToolSpec> {
        let mut specs: Vec<_> = self.tools.values().map(|t| t.spec()).collect();
        specs.sort_by(|a, b| a.name.cmp(&b.name));
        specs
    }

    pub fn len(&self) -> usize {
        self.tools.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tools.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tools::{ToolContext, ToolOutcome};
    use async_trait::async_trait;
    use serde_json::Value;

    struct EchoTool;

    #[async_trait]
    impl Tool for EchoTool {
        fn name(&self) -> &str {
            "echo"
        }

        fn spec(&self) -> ToolSpec {
            ToolSpec {
                name: "echo".to_string(),
                description: Some("Echoes its input".to_string()),
                input_schema: serde_json::json!({"type": "object"}),
            }
        }

        async fn call(&self, args: Value, _ctx: &ToolContext<'_>) -> ToolOutcome {
            ToolOutcome::ok(args.to_string())
        }
    }

    #[test]
    fn register_then_lookup_by_name() {
        let mut registry = ToolRegistry::new();
        registry.register(Arc::new(EchoTool)).unwrap();
        assert!(registry.contains("echo"));
        assert!(registry.get("missing").is_none());
        assert_eq!(registry.specs().len(), 1);
    }

    #[test]
    fn registering_a_duplicate_name_fails() {
        let mut registry = ToolRegistry::new();
        registry.register(Arc::new(EchoTool)).unwrap();
        let err = registry.register(Arc::new(EchoTool)).unwrap_err();
        assert!(matches!(err, AgentError::Validation(_)));
        assert_eq!(registry.specs().len(), 1);
    }
}

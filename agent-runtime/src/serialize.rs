//! Versioned export/import format for an agent's serialized state.
//!
//! `agent_config` carries enough to reconstruct the agent's capability set
//! (tool names, middleware names, the base system prompt) without any
//! secret material; the live `model`/`middleware` objects themselves are
//! rebuilt by the caller from its own configuration, not from this payload.

use serde::{Deserialize, Serialize};

use crate::state::State;

/// Non-secret description of an `AgentConfig`, enough for a caller to
/// confirm what it's importing into matches what was exported.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SerializedAgentConfig {
    pub agent_id: String,
    pub base_system_prompt: Option<String>,
    pub custom_tool_names: Vec<String>,
    pub middleware: Vec<String>,
}

/// Top-level export/import payload. `version` lets a future format change
/// reject or migrate payloads produced by an older build.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExportedAgent {
    pub version: u32,
    pub agent_config: SerializedAgentConfig,
    pub state: State,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn round_trips_through_json() {
        let exported = ExportedAgent {
            version: 1,
            agent_config: SerializedAgentConfig {
                agent_id: "a1".into(),
                base_system_prompt: Some("be helpful".into()),
                custom_tool_names: vec!["read_file".into()],
                middleware: vec!["todo".into(), "filesystem".into()],
            },
            state: State::default(),
        };
        let json = serde_json::to_string(&exported).unwrap();
        let back: ExportedAgent = serde_json::from_str(&json).unwrap();
        assert_eq!(back.version, 1);
        assert_eq!(back.agent_config.agent_id, "a1");
    }
}

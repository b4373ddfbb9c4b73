//! Scope keys identify one agent's place in the user/project/agent hierarchy.

use serde::{Deserialize, Serialize};

/// Identifies one running agent: `{user,id}/{project,id}/{agent,id}`. Used
/// as the registry key in `LifecycleSupervisor` and to namespace a
/// `FilesystemServer`'s storage.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ScopeKey {
    pub user_id: String,
    pub project_id: Option<String>,
    pub agent_id: String,
}

impl ScopeKey {
    pub fn agent(user_id: impl Into<String>, agent_id: impl Into<String>) -> Self {
        Self {
            user_id: user_id.into(),
            project_id: None,
            agent_id: agent_id.into(),
        }
    }

    pub fn with_project(mut self, project_id: impl Into<String>) -> Self {
        self.project_id = Some(project_id.into());
        self
    }

    /// A path-safe string identifying this scope, used as a storage namespace.
    pub fn storage_key(&self) -> String {
        match &self.project_id {
            Some(project) => format!("{}/{}/{}", self.user_id, project, self.agent_id),
            None => format!("{}/{}", self.user_id, self.agent_id),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn storage_key_includes_project_when_present() {
        let scope = ScopeKey::agent("u1", "a1").with_project("p1");
        assert_eq!(scope.storage_key(), "u1/p1/a1");
    }

    #[test]
    fn storage_key_omits_project_when_absent() {
        let scope = ScopeKey::agent("u1", "a1");
        assert_eq!(scope.storage_key(), "u1/a1");
    }
}

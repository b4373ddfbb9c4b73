//! Filesystem middleware: registers `read_file`/`write_file`/`list_files`
//! against one `FilesystemServer` scoped to the owning agent.

use std::sync::Arc;

use async_trait::async_trait;

use crate::fs::FilesystemServer;
use crate::state::State;
use crate::tools::{ListFilesTool, ReadFileTool, ToolRegistry, WriteFileTool};

use super::super::r#trait::Middleware;

pub struct FilesystemMiddleware {
    fs: Arc<FilesystemServer>,
}

impl FilesystemMiddleware {
    pub fn new(fs: Arc<FilesystemServer>) -> Self {
        Self { fs }
    }
}

#[async_trait]
impl Middleware for FilesystemMiddleware {
    fn name(&self) -> &str {
        "filesystem"
    }

    fn init(&self, _state: &mut State, tools: &mut ToolRegistry) {
        tools
            .register(Arc::new(ReadFileTool::new(self.fs.clone())))
            .expect("read_file is this middleware's own tool name");
        tools
            .register(Arc::new(WriteFileTool::new(self.fs.clone())))
            .expect("write_file is this middleware's own tool name");
        tools
            .register(Arc::new(ListFilesTool::new(self.fs.clone())))
            .expect("list_files is this middleware's own tool name");
    }

    fn system_prompt(&self, _state: &State) -> Option<String> {
        Some(
            "You have read_file, write_file, and list_files tools for a persistent working filesystem."
                .to_string(),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn init_registers_all_three_file_tools() {
        let fs = Arc::new(FilesystemServer::memory());
        let middleware = FilesystemMiddleware::new(fs);
        let mut state = State::default();
        let mut tools = ToolRegistry::new();
        middleware.init(&mut state, &mut tools);
        assert!(tools.contains("read_file"));
        assert!(tools.contains("write_file"));
        assert!(tools.contains("list_files"));
    }
}

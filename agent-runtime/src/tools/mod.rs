//! Tool abstraction: the `Tool` trait, a registry, and a small set of
//! built-in tools wired to the filesystem server.

mod builtin;
mod context;
mod registry;
mod r#trait;

pub use builtin::{ListFilesTool, ReadFileTool, WriteFileTool, TOOL_LIST_FILES, TOOL_READ_FILE, TOOL_WRITE_FILE};
pub use context::ToolContext;
pub use r#trait::{outcome_to_result, Tool, ToolOutcome};
pub use registry::ToolRegistry;

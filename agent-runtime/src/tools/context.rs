//! Per-call context threaded into `Tool::call`.

use crate::message::Message;
use crate::supervisor::ScopeKey;

/// Context available to a tool while it runs: which agent is calling, and a
/// read-only view of the conversation so far. Tools that need write access
/// to the virtual filesystem hold their own `Arc<FilesystemServer>` handle
/// rather than reaching through this context, keeping `Tool::call` free of
/// a god-object parameter.
pub struct ToolContext<'a> {
    pub scope: &'a ScopeKey,
    pub recent_messages: &'a [Message],
}

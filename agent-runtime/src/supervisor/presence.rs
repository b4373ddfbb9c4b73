//! Presence interface: tells the supervisor whether anyone is still
//! watching an agent, so idle eviction doesn't race a connected client.

use async_trait::async_trait;

use super::ScopeKey;

/// Tracks which scopes currently have an observer attached (e.g. a
/// connected client subscribed to an agent's events). The supervisor
/// consults this before evicting an idle agent: an agent with no observer
/// is a candidate for eviction, one with an observer never is, regardless
/// of its idle timer.
#[async_trait]
pub trait Presence: Send + Sync {
    async fn track(&self, scope: &ScopeKey);
    async fn untrack(&self, scope: &ScopeKey);
    async fn list(&self) -> Vec<ScopeKey>;
    async fn is_present(&self, scope: &ScopeKey) -> bool {
        self.list().await.contains(scope)
    }
}

/// A `Presence` that never reports anyone watching; idle eviction runs purely
/// off each agent's own idle timer. Suitable for a single-process deployment
/// with no external presence tracker.
#[derive(Default)]
pub struct NoopPresence;

#[async_trait]
impl Presence for NoopPresence {
    async fn track(&self, _scope: &ScopeKey) {}
    async fn untrack(&self, _scope: &ScopeKey) {}
    async fn list(&self) -> Vec<ScopeKey> {
        Vec::new()
    }
    async fn is_present(&self, _scope: &ScopeKey) -> bool {
        false
    }
}

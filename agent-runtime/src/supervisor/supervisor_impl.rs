//! `LifecycleSupervisor`: a registry of running agent handles keyed by
//! `ScopeKey`, with idle-timeout eviction that defers to `Presence`.
//!
//! Generic over the handle type so this module doesn't depend on `actor`;
//! the actor module registers `actor::AgentHandle` instances here.

use std::sync::Arc;
use std::time::{Duration, Instant};

use dashmap::DashMap;

use super::presence::{NoopPresence, Presence};
use super::scope::ScopeKey;

#[derive(Debug, Clone, Copy)]
pub struct SupervisorConfig {
    /// How long an agent may sit untouched before it becomes eviction-eligible.
    pub idle_timeout: Duration,
}

impl Default for SupervisorConfig {
    fn default() -> Self {
        Self {
            idle_timeout: Duration::from_secs(30 * 60),
        }
    }
}

struct Entry<H> {
    handle: H,
    last_touch: Instant,
}

/// Result of `start`: whether a fresh handle was registered, or an existing
/// one for the same scope was returned untouched.
#[derive(Debug, Clone)]
pub enum StartOutcome<H> {
    Started(H),
    AlreadyStarted(H),
}

impl<H> StartOutcome<H> {
    /// The handle either way, whichever branch this is.
    pub fn into_handle(self) -> H {
        match self {
            StartOutcome::Started(h) => h,
            StartOutcome::AlreadyStarted(h) => h,
        }
    }

    pub fn already_started(&self) -> bool {
        matches!(self, StartOutcome::AlreadyStarted(_))
    }
}

/// Tracks one handle per `ScopeKey`. `touch` resets the idle clock (called on
/// every command an agent receives); `sweep_idle` evicts handles that are
/// both past `idle_timeout` and not reported present by `Presence`.
pub struct LifecycleSupervisor<H> {
    config: SupervisorConfig,
    presence: Arc<dyn Presence>,
    agents: DashMap<ScopeKey, Entry<H>>,
}

impl<H: Clone + Send + Sync + 'static> LifecycleSupervisor<H> {
    pub fn new(config: SupervisorConfig, presence: Arc<dyn Presence>) -> Self {
        Self {
            config,
            presence,
            agents: DashMap::new(),
        }
    }

    pub fn with_defaults() -> Self {
        Self::new(SupervisorConfig::default(), Arc::new(NoopPresence))
    }

    /// Unconditionally registers `handle` under `scope`, replacing and
    /// orphaning whatever handle was there before. Prefer `start` unless a
    /// forced replacement is actually what's wanted.
    pub fn register(&self, scope: ScopeKey, handle: H) {
        self.agents.insert(
            scope,
            Entry {
                handle,
                last_touch: Instant::now(),
            },
        );
    }

    /// Registers a handle for `scope` only if one isn't already running,
    /// calling `make_handle` lazily so an already-started scope never pays
    /// the cost of spawning a handle it's about to throw away. Returns the
    /// existing handle (untouched) on a duplicate start.
    pub fn start(&self, scope: ScopeKey, make_handle: impl FnOnce() -> H) -> StartOutcome<H> {
        if let Some(entry) = self.agents.get(&scope) {
            return StartOutcome::AlreadyStarted(entry.handle.clone());
        }
        match self.agents.entry(scope) {
            dashmap::mapref::entry::Entry::Occupied(occupied) => {
                StartOutcome::AlreadyStarted(occupied.get().handle.clone())
            }
            dashmap::mapref::entry::Entry::Vacant(vacant) => {
                let handle = make_handle();
                vacant.insert(Entry {
                    handle: handle.clone(),
                    last_touch: Instant::now(),
                });
                StartOutcome::Started(handle)
            }
        }
    }

    /// Every scope currently registered, in no particular order.
    pub fn list(&self) -> Vec<ScopeKey> {
        self.agents.iter().map(|e| e.key().clone()).collect()
    }

    pub fn get(&self, scope: &ScopeKey) -> Option<H> {
        self.agents.get(scope).map(|e| e.handle.clone())
    }

    /// Resets the idle clock for `scope`. No-op if the scope isn't registered.
    pub fn touch(&self, scope: &ScopeKey) {
        if let Some(mut entry) = self.agents.get_mut(scope) {
            entry.last_touch = Instant::now();
        }
    }

    pub fn remove(&self, scope: &ScopeKey) -> Option<H> {
        self.agents.remove(scope).map(|(_, e)| e.handle)
    }

    pub fn len(&self) -> usize {
        self.agents.len()
    }

    pub fn is_empty(&self) -> bool {
        self.agents.is_empty()
    }

    /// Evicts every scope that is both idle past `idle_timeout` and not
    /// currently present, returning their handles so the caller can shut
    /// them down (flush filesystem state, close the mailbox, etc).
    pub async fn sweep_idle(&self) -> Vec<(ScopeKey, H)> {
        let now = Instant::now();
        let candidates: Vec<ScopeKey> = self
            .agents
            .iter()
            .filter(|e| now.duration_since(e.last_touch) >= self.config.idle_timeout)
            .map(|e| e.key().clone())
            .collect();

        let mut evicted = Vec::new();
        for scope in candidates {
            if self.presence.is_present(&scope).await {
                continue;
            }
            if let Some(handle) = self.remove(&scope) {
                evicted.push((scope, handle));
            }
        }
        evicted
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;

    #[test]
    fn start_registers_a_fresh_handle() {
        let supervisor: LifecycleSupervisor<&'static str> = LifecycleSupervisor::with_defaults();
        let scope = ScopeKey::agent("u1", "a1");
        let outcome = supervisor.start(scope.clone(), || "handle-a");
        assert!(!outcome.already_started());
        assert_eq!(outcome.into_handle(), "handle-a");
        assert_eq!(supervisor.get(&scope), Some("handle-a"));
    }

    #[test]
    fn start_is_idempotent_for_an_existing_scope() {
        let supervisor: LifecycleSupervisor<&'static str> = LifecycleSupervisor::with_defaults();
        let scope = ScopeKey::agent("u1", "a1");
        supervisor.start(scope.clone(), || "handle-a");
        let mut called = false;
        let outcome = supervisor.start(scope.clone(), || {
            called = true;
            "handle-b"
        });
        assert!(outcome.already_started());
        assert_eq!(outcome.into_handle(), "handle-a");
        assert!(!called, "make_handle must not run on a duplicate start");
        assert_eq!(supervisor.len(), 1);
    }

    #[test]
    fn list_returns_every_registered_scope() {
        let supervisor: LifecycleSupervisor<&'static str> = LifecycleSupervisor::with_defaults();
        let scope_a = ScopeKey::agent("u1", "a1");
        let scope_b = ScopeKey::agent("u1", "a2");
        supervisor.register(scope_a.clone(), "handle-a");
        supervisor.register(scope_b.clone(), "handle-b");
        let mut scopes = supervisor.list();
        scopes.sort_by(|a, b| a.agent_id.cmp(&b.agent_id));
        assert_eq!(scopes, vec![scope_a, scope_b]);
    }

    #[test]
    fn register_then_get_round_trips() {
        let supervisor: LifecycleSupervisor<&'static str> = LifecycleSupervisor::with_defaults();
        let scope = ScopeKey::agent("u1", "a1");
        supervisor.register(scope.clone(), "handle-a");
        assert_eq!(supervisor.get(&scope), Some("handle-a"));
        assert_eq!(supervisor.len(), 1);
    }

    #[tokio::test]
    async fn sweep_idle_evicts_past_timeout_when_absent() {
        let supervisor: LifecycleSupervisor<&'static str> = LifecycleSupervisor::new(
            SupervisorConfig {
                idle_timeout: Duration::from_millis(10),
            },
            Arc::new(NoopPresence),
        );
        let scope = ScopeKey::agent("u1", "a1");
        supervisor.register(scope.clone(), "handle-a");
        tokio::time::sleep(Duration::from_millis(30)).await;
        let evicted = supervisor.sweep_idle().await;
        assert_eq!(evicted.len(), 1);
        assert!(supervisor.is_empty());
    }

    #[tokio::test]
    async fn sweep_idle_skips_present_scopes() {
        struct AlwaysPresent;
        #[async_trait]
        impl Presence for AlwaysPresent {
            async fn track(&self, _scope: &ScopeKey) {}
            async fn untrack(&self, _scope: &ScopeKey) {}
            async fn list(&self) -> Vec<ScopeKey> {
                Vec::new()
            }
            async fn is_present(&self, _scope: &ScopeKey) -> bool {
                true
            }
        }
        let supervisor: LifecycleSupervisor<&'static str> = LifecycleSupervisor::new(
            SupervisorConfig {
                idle_timeout: Duration::from_millis(10),
            },
            Arc::new(AlwaysPresent),
        );
        let scope = ScopeKey::agent("u1", "a1");
        supervisor.register(scope.clone(), "handle-a");
        tokio::time::sleep(Duration::from_millis(30)).await;
        let evicted = supervisor.sweep_idle().await;
        assert!(evicted.is_empty());
        assert_eq!(supervisor.len(), 1);
    }

    #[tokio::test]
    async fn touch_resets_idle_clock() {
        let supervisor: LifecycleSupervisor<&'static str> = LifecycleSupervisor::new(
            SupervisorConfig {
                idle_timeout: Duration::from_millis(40),
            },
            Arc::new(NoopPresence),
        );
        let scope = ScopeKey::agent("u1", "a1");
        supervisor.register(scope.clone(), "handle-a");
        tokio::time::sleep(Duration::from_millis(20)).await;
        supervisor.touch(&scope);
        tokio::time::sleep(Duration::from_millis(20)).await;
        let evicted = supervisor.sweep_idle().await;
        assert!(evicted.is_empty(), "touch should have reset the idle clock");
    }
}

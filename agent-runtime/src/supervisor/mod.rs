//! Lifecycle supervisor: a dynamic registry of running agents keyed by
//! scope, with presence-aware and idle-timer shutdown.

mod presence;
mod scope;
mod supervisor_impl;

pub use presence::{NoopPresence, Presence};
pub use scope::ScopeKey;
pub use supervisor_impl::{LifecycleSupervisor, StartOutcome, SupervisorConfig};

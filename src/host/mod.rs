pub mod memory;
pub use memory::*;

use anyhow::Result;
use std::time::Duration;

/// A connected user as reported by the host platform.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct User {
    pub id: String,
    pub name: String,
}

/// Identity as provided by the host document.
///
/// Both lookups can be unavailable in practice: `current_user` during early
/// render, `active_users` whenever the host API misbehaves. Callers fall back
/// to generated ids and tracked participant lists rather than failing.
pub trait Identity {
    fn current_user(&self) -> Option<User>;
    fn active_users(&self) -> Result<Vec<User>>;
}

/// The host's replicated key-value map.
///
/// Treated as a local, synchronous, in-memory map; replication to other
/// clients is the integrator's responsibility. Values are returned by copy,
/// matching the host's snapshot-on-read semantics, and writes are
/// last-write-wins per key with no compound transactions.
pub trait SyncedMap<T> {
    fn get(&self, key: &str) -> Option<T>;
    fn set(&self, key: &str, value: T);
    fn delete(&self, key: &str);
    fn keys(&self) -> Vec<String>;
    fn len(&self) -> usize;
    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// The host's replicated singleton state.
pub trait SyncedCell<T> {
    fn get(&self) -> T;
    fn set(&self, value: T);
}

/// Fire-and-forget user-facing toast.
pub trait Notifier {
    fn notify(&self, message: &str, timeout: Duration);
}

/// Millisecond wall clock, injected so staleness policies are testable.
pub trait Clock {
    fn now_millis(&self) -> u64;
}

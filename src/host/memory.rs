use super::{Clock, Identity, Notifier, SyncedCell, SyncedMap, User};
use anyhow::Result;
use std::cell::{Cell, RefCell};
use std::collections::BTreeMap;
use std::time::{Duration, SystemTime, UNIX_EPOCH};

/// In-memory stand-in for the host's replicated map.
///
/// Single-threaded by design, like the host scheduling model: interior
/// mutability instead of locks, values copied out on read.
#[derive(Debug, Default)]
pub struct MemoryMap<T>(RefCell<BTreeMap<String, T>>);

impl<T> MemoryMap<T> {
    pub fn new() -> Self {
        Self(RefCell::new(BTreeMap::new()))
    }
}

impl<T: Clone> SyncedMap<T> for MemoryMap<T> {
    fn get(&self, key: &str) -> Option<T> {
        self.0.borrow().get(key).cloned()
    }
    fn set(&self, key: &str, value: T) {
        self.0.borrow_mut().insert(key.to_string(), value);
    }
    fn delete(&self, key: &str) {
        self.0.borrow_mut().remove(key);
    }
    fn keys(&self) -> Vec<String> {
        self.0.borrow().keys().cloned().collect()
    }
    fn len(&self) -> usize {
        self.0.borrow().len()
    }
}

/// In-memory stand-in for the host's replicated singleton.
#[derive(Debug, Default)]
pub struct MemoryCell<T>(RefCell<T>);

impl<T> MemoryCell<T> {
    pub fn new(value: T) -> Self {
        Self(RefCell::new(value))
    }
}

impl<T: Clone> SyncedCell<T> for MemoryCell<T> {
    fn get(&self) -> T {
        self.0.borrow().clone()
    }
    fn set(&self, value: T) {
        *self.0.borrow_mut() = value;
    }
}

/// Identity provider with a scriptable user roster.
///
/// `fail_active_users` makes `active_users` return an error, to exercise
/// the fallback paths the host forces on us in production.
#[derive(Debug, Default)]
pub struct StaticIdentity {
    current: Option<User>,
    active: RefCell<Vec<User>>,
    fail_active: Cell<bool>,
}

impl StaticIdentity {
    pub fn new(current: Option<User>) -> Self {
        Self {
            current,
            active: RefCell::new(Vec::new()),
            fail_active: Cell::new(false),
        }
    }

    pub fn set_active_users(&self, users: Vec<User>) {
        *self.active.borrow_mut() = users;
    }

    pub fn fail_active_users(&self, fail: bool) {
        self.fail_active.set(fail);
    }
}

impl Identity for StaticIdentity {
    fn current_user(&self) -> Option<User> {
        self.current.clone()
    }
    fn active_users(&self) -> Result<Vec<User>> {
        if self.fail_active.get() {
            anyhow::bail!("active users unavailable");
        }
        Ok(self.active.borrow().clone())
    }
}

/// Notifier that records every toast, for assertions and the demo binary.
#[derive(Debug, Default)]
pub struct RecordingNotifier(RefCell<Vec<String>>);

impl RecordingNotifier {
    pub fn new() -> Self {
        Self::default()
    }
    pub fn messages(&self) -> Vec<String> {
        self.0.borrow().clone()
    }
    pub fn last(&self) -> Option<String> {
        self.0.borrow().last().cloned()
    }
}

impl Notifier for RecordingNotifier {
    fn notify(&self, message: &str, _timeout: Duration) {
        log::debug!("notify: {}", message);
        self.0.borrow_mut().push(message.to_string());
    }
}

/// Wall clock backed by the system time.
#[derive(Debug, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now_millis(&self) -> u64 {
        SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_millis() as u64)
            .unwrap_or(0)
    }
}

/// Manually advanced clock for staleness tests.
#[derive(Debug, Default)]
pub struct ManualClock(Cell<u64>);

impl ManualClock {
    pub fn at(millis: u64) -> Self {
        Self(Cell::new(millis))
    }
    pub fn advance(&self, millis: u64) {
        self.0.set(self.0.get() + millis);
    }
}

impl Clock for ManualClock {
    fn now_millis(&self) -> u64 {
        self.0.get()
    }
}

//! Observer registry
//!
//! Ordered, duplicate-tolerant set of observers with copy-on-dispatch
//! fan-out.
//!
//! # Concurrency
//!
//! `dispatch` clones the list of `Arc` handles under a read lock and releases
//! the lock before calling any observer. Registration from another task, or
//! from inside an observer's own `notify`, therefore never deadlocks and never
//! disturbs a dispatch already in progress: the running pass delivers to the
//! snapshot it took, the next message sees the new set.

use crate::handle::ListenerHandle;
use crate::traits::*;
use parking_lot::RwLock;
use std::panic::{self, AssertUnwindSafe};
use std::sync::Arc;
use tracing::{debug, error, warn};

/// Result of one dispatch pass
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DispatchOutcome {
    /// Observers that returned `Ok`
    pub delivered: usize,
    /// Observers that returned an error or panicked
    pub failed: usize,
}

/// Registered observers, in registration order
pub struct ObserverRegistry {
    observers: RwLock<Vec<Arc<dyn Observer>>>,
}

impl ObserverRegistry {
    pub fn new() -> Self {
        Self {
            observers: RwLock::new(Vec::new()),
        }
    }

    /// Append an observer
    ///
    /// The `notify` capability is checked by the type system, so this always
    /// succeeds and returns `true`. Registering the same observer twice makes
    /// it receive every message twice.
    pub fn register(&self, observer: Arc<dyn Observer>) -> bool {
        let mut observers = self.observers.write();
        observers.push(observer);
        debug!("New observer has registered ({} total)", observers.len());
        true
    }

    /// Remove the first registration of `observer`
    ///
    /// Identity is `Arc` pointer identity. Returns `false` when the observer
    /// is not registered.
    pub fn unregister(&self, observer: &Arc<dyn Observer>) -> bool {
        let mut observers = self.observers.write();
        match observers.iter().position(|o| same_observer(o, observer)) {
            Some(index) => {
                observers.remove(index);
                debug!("Observer unregistered ({} left)", observers.len());
                true
            }
            None => false,
        }
    }

    /// Deliver `message` to every registered observer
    ///
    /// Observers that return an error or panic are logged and skipped.
    pub fn dispatch(&self, source: &ListenerHandle, message: &WsMessage) -> DispatchOutcome {
        let snapshot = self.snapshot();
        let mut outcome = DispatchOutcome::default();

        for (index, observer) in snapshot.iter().enumerate() {
            let result =
                panic::catch_unwind(AssertUnwindSafe(|| observer.notify(source, message)));

            match result {
                Ok(Ok(())) => outcome.delivered += 1,
                Ok(Err(e)) => {
                    outcome.failed += 1;
                    warn!("Observer #{} failed: {}", index, e);
                }
                Err(payload) => {
                    outcome.failed += 1;
                    error!("Observer #{} panicked: {}", index, panic_message(payload.as_ref()));
                }
            }
        }

        outcome
    }

    /// Number of registrations (duplicates counted)
    pub fn len(&self) -> usize {
        self.observers.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.observers.read().is_empty()
    }

    fn snapshot(&self) -> Vec<Arc<dyn Observer>> {
        self.observers.read().clone()
    }
}

impl Default for ObserverRegistry {
    fn default() -> Self {
        Self::new()
    }
}

/// Compare data pointers only; vtable pointers of the same type may differ
/// across codegen units.
fn same_observer(a: &Arc<dyn Observer>, b: &Arc<dyn Observer>) -> bool {
    std::ptr::eq(
        Arc::as_ptr(a) as *const (),
        Arc::as_ptr(b) as *const (),
    )
}

fn panic_message(payload: &(dyn std::any::Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "unknown panic".to_string()
    }
}

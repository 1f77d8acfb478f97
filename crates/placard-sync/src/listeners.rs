//! # Listener Registry
//!
//! Ordered collection of update subscribers with fan-out notification.
//!
//! ## Contract
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                       Listener Registry Rules                           │
//! │                                                                         │
//! │  • add() appends; the same listener may be registered twice and will   │
//! │    then be invoked twice per notification                              │
//! │  • remove() drops the FIRST matching registration (pointer identity)   │
//! │  • notifications run in registration order, synchronously on the       │
//! │    task that completed the sync cycle                                  │
//! │  • one listener panicking never interrupts the fan-out: the panic is   │
//! │    caught, logged, and the remaining listeners still run               │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! The registry snapshots its list before invoking callbacks, so a
//! listener may add or remove listeners from inside its own hook without
//! deadlocking; such mutations take effect from the next notification.

use std::panic::{catch_unwind, AssertUnwindSafe};
use std::sync::{Arc, RwLock};

use tracing::{debug, error};

// =============================================================================
// Update Listener Trait
// =============================================================================

/// Subscriber hooks for engine state changes.
pub trait UpdateListener: Send + Sync {
    /// Visible message state changed; re-read placements of interest.
    fn on_messages_updated(&self);

    /// Messaging was disabled server-side (inactive subscription or
    /// rejected credential); the host should stop requesting syncs.
    fn on_messaging_disabled(&self);
}

// =============================================================================
// Listener Registry
// =============================================================================

/// Ordered, duplicate-tolerant listener collection.
#[derive(Default)]
pub struct ListenerRegistry {
    listeners: RwLock<Vec<Arc<dyn UpdateListener>>>,
}

impl ListenerRegistry {
    /// Creates an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a listener. Duplicates are allowed; no identity dedup.
    pub fn add(&self, listener: Arc<dyn UpdateListener>) {
        let mut listeners = self.listeners.write().unwrap_or_else(|e| e.into_inner());
        listeners.push(listener);
        debug!(count = listeners.len(), "Listener registered");
    }

    /// Removes the first registration matching `listener` by pointer
    /// identity. Returns true if one was removed.
    pub fn remove(&self, listener: &Arc<dyn UpdateListener>) -> bool {
        let mut listeners = self.listeners.write().unwrap_or_else(|e| e.into_inner());
        if let Some(pos) = listeners.iter().position(|l| Arc::ptr_eq(l, listener)) {
            listeners.remove(pos);
            debug!(count = listeners.len(), "Listener removed");
            true
        } else {
            false
        }
    }

    /// Returns the current registrations, in order.
    pub fn all(&self) -> Vec<Arc<dyn UpdateListener>> {
        self.listeners
            .read()
            .unwrap_or_else(|e| e.into_inner())
            .clone()
    }

    /// Returns the number of registrations.
    pub fn len(&self) -> usize {
        self.listeners.read().unwrap_or_else(|e| e.into_inner()).len()
    }

    /// Returns true when no listener is registered.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Invokes every listener's update hook in registration order.
    pub fn notify_updated(&self) {
        self.fan_out("on_messages_updated", |l| l.on_messages_updated());
    }

    /// Invokes every listener's disabled hook in registration order.
    pub fn notify_disabled(&self) {
        self.fan_out("on_messaging_disabled", |l| l.on_messaging_disabled());
    }

    /// Runs `hook` for each listener, isolating panics per listener.
    fn fan_out(&self, hook_name: &str, hook: impl Fn(&dyn UpdateListener)) {
        let snapshot = self.all();
        debug!(hook = hook_name, listeners = snapshot.len(), "Notifying listeners");

        for listener in snapshot {
            let result = catch_unwind(AssertUnwindSafe(|| hook(listener.as_ref())));
            if result.is_err() {
                error!(hook = hook_name, "Listener panicked during notification");
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Mutex;

    struct Recorder {
        label: &'static str,
        log: Arc<Mutex<Vec<String>>>,
    }

    impl UpdateListener for Recorder {
        fn on_messages_updated(&self) {
            self.log.lock().unwrap().push(format!("{}:updated", self.label));
        }

        fn on_messaging_disabled(&self) {
            self.log.lock().unwrap().push(format!("{}:disabled", self.label));
        }
    }

    fn recorder(label: &'static str, log: &Arc<Mutex<Vec<String>>>) -> Arc<dyn UpdateListener> {
        Arc::new(Recorder {
            label,
            log: log.clone(),
        })
    }

    #[test]
    fn test_notification_in_registration_order() {
        let registry = ListenerRegistry::new();
        let log = Arc::new(Mutex::new(Vec::new()));

        registry.add(recorder("first", &log));
        registry.add(recorder("second", &log));
        registry.notify_updated();
        registry.notify_disabled();

        assert_eq!(
            *log.lock().unwrap(),
            vec!["first:updated", "second:updated", "first:disabled", "second:disabled"]
        );
    }

    #[test]
    fn test_duplicates_delivered_twice_and_removed_once() {
        let registry = ListenerRegistry::new();
        let log = Arc::new(Mutex::new(Vec::new()));
        let listener = recorder("dup", &log);

        registry.add(listener.clone());
        registry.add(listener.clone());
        registry.notify_updated();
        assert_eq!(log.lock().unwrap().len(), 2);

        assert!(registry.remove(&listener));
        assert_eq!(registry.len(), 1);

        log.lock().unwrap().clear();
        registry.notify_updated();
        assert_eq!(log.lock().unwrap().len(), 1);
    }

    #[test]
    fn test_remove_unknown_listener_is_noop() {
        let registry = ListenerRegistry::new();
        let log = Arc::new(Mutex::new(Vec::new()));
        registry.add(recorder("present", &log));

        let stranger = recorder("stranger", &log);
        assert!(!registry.remove(&stranger));
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn test_panicking_listener_does_not_stop_fan_out() {
        struct Panicker;
        impl UpdateListener for Panicker {
            fn on_messages_updated(&self) {
                panic!("listener blew up");
            }
            fn on_messaging_disabled(&self) {}
        }

        let registry = ListenerRegistry::new();
        let hits = Arc::new(AtomicUsize::new(0));

        struct Counter(Arc<AtomicUsize>);
        impl UpdateListener for Counter {
            fn on_messages_updated(&self) {
                self.0.fetch_add(1, Ordering::SeqCst);
            }
            fn on_messaging_disabled(&self) {}
        }

        registry.add(Arc::new(Panicker));
        registry.add(Arc::new(Counter(hits.clone())));
        registry.notify_updated();

        assert_eq!(hits.load(Ordering::SeqCst), 1);
    }
}

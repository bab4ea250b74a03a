//! # Per-message-type handler registry.
//!
//! [`HandlerRegistry`] holds the ordered collection of handlers subscribed
//! to one message type. Registration is idempotent by handler identity,
//! removal of an absent handler is a no-op, and dispatch never iterates the
//! live collection: it takes a [`snapshot`](HandlerRegistry::snapshot)
//! under the lock and runs the round against that copy, so concurrent
//! subscribe/unsubscribe calls neither crash a round in flight nor make it
//! skip or double-invoke handlers mid-round.
//!
//! ## Rules
//! - Insertion order is preserved; sequential strategies execute in it.
//! - A handler removed and re-added takes the position of its most recent
//!   addition.
//! - All mutation and snapshotting happens under one mutex; the lock is
//!   never held across handler execution.

use parking_lot::Mutex;

use crate::handlers::{same_handler, HandlerRef};

/// Ordered, identity-deduplicated collection of handlers for one message type.
pub struct HandlerRegistry<M> {
    handlers: Mutex<Vec<HandlerRef<M>>>,
}

impl<M> Default for HandlerRegistry<M> {
    fn default() -> Self {
        Self::new()
    }
}

impl<M> HandlerRegistry<M> {
    /// Creates an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self {
            handlers: Mutex::new(Vec::new()),
        }
    }

    /// Adds a handler unless the same handler is already registered.
    ///
    /// Idempotent: registering the same `Arc` twice leaves one entry, so a
    /// dispatch round invokes it exactly once.
    pub fn register(&self, handler: HandlerRef<M>) {
        let mut handlers = self.handlers.lock();
        if !handlers.iter().any(|h| same_handler(h, &handler)) {
            handlers.push(handler);
        }
    }

    /// Removes a handler if present; no-op otherwise.
    pub fn unregister(&self, handler: &HandlerRef<M>) {
        let mut handlers = self.handlers.lock();
        handlers.retain(|h| !same_handler(h, handler));
    }

    /// Returns a point-in-time copy of the current handler collection.
    ///
    /// Every dispatch round operates on one snapshot taken at its start;
    /// later registry mutations do not affect a round in flight.
    #[must_use]
    pub fn snapshot(&self) -> Vec<HandlerRef<M>> {
        self.handlers.lock().clone()
    }

    /// Number of registered handlers.
    #[must_use]
    pub fn len(&self) -> usize {
        self.handlers.lock().len()
    }

    /// True if no handlers are registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.handlers.lock().is_empty()
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::error::HandlerError;
    use crate::handlers::HandlerFn;

    fn handler(name: &'static str) -> HandlerRef<u32> {
        HandlerFn::arc(name, |_msg: Arc<u32>, _ctx| async {
            Ok::<_, HandlerError>(())
        })
    }

    #[test]
    fn test_register_is_idempotent() {
        let reg = HandlerRegistry::new();
        let h = handler("a");
        reg.register(Arc::clone(&h));
        reg.register(Arc::clone(&h));
        assert_eq!(reg.len(), 1);
    }

    #[test]
    fn test_unregister_absent_is_noop() {
        let reg = HandlerRegistry::new();
        let present = handler("a");
        let absent = handler("b");
        reg.register(Arc::clone(&present));
        reg.unregister(&absent);
        assert_eq!(reg.len(), 1);
    }

    #[test]
    fn test_snapshot_preserves_insertion_order() {
        let reg = HandlerRegistry::new();
        let a = handler("a");
        let b = handler("b");
        let c = handler("c");
        reg.register(Arc::clone(&a));
        reg.register(Arc::clone(&b));
        reg.register(Arc::clone(&c));

        let snap = reg.snapshot();
        let names: Vec<&str> = snap.iter().map(|h| h.name()).collect();
        assert_eq!(names, vec!["a", "b", "c"]);
    }

    #[test]
    fn test_readd_takes_most_recent_position() {
        let reg = HandlerRegistry::new();
        let a = handler("a");
        let b = handler("b");
        reg.register(Arc::clone(&a));
        reg.register(Arc::clone(&b));
        reg.unregister(&a);
        reg.register(Arc::clone(&a));

        let snap = reg.snapshot();
        let names: Vec<&str> = snap.iter().map(|h| h.name()).collect();
        assert_eq!(names, vec!["b", "a"]);
    }

    #[test]
    fn test_snapshot_is_isolated_from_later_mutation() {
        let reg = HandlerRegistry::new();
        let a = handler("a");
        reg.register(Arc::clone(&a));

        let snap = reg.snapshot();
        reg.unregister(&a);

        assert!(reg.is_empty());
        assert_eq!(snap.len(), 1);
    }

    #[test]
    fn test_distinct_closures_with_identical_behavior_are_distinct() {
        let reg = HandlerRegistry::new();
        reg.register(handler("same"));
        reg.register(handler("same"));
        assert_eq!(reg.len(), 2);
    }
}

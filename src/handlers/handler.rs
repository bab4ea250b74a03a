//! # Handler abstraction.
//!
//! This module defines the [`Handle`] trait (async, cancelable) and the
//! shared handle type [`HandlerRef`], an `Arc<dyn Handle<M>>` suitable for
//! registration with a bus.
//!
//! A handler receives the published message and a [`CancellationToken`];
//! it should periodically check the token and stop cooperatively — the
//! dispatch engine never force-terminates a handler that ignores it.
//!
//! Registry membership is identity-based: the *same* `Arc` registered twice
//! is one subscription, while two separate allocations are two handlers
//! even if they behave identically. [`same_handler`] is the comparison the
//! registry uses.

use std::sync::Arc;

use async_trait::async_trait;
use tokio_util::sync::CancellationToken;

use crate::error::HandlerError;

/// # Asynchronous, cancelable message handler.
///
/// Invoked once per matching publish round with a shared reference to the
/// message. Implementors should check `ctx.is_cancelled()` at suspension
/// points and return promptly when cancelled.
///
/// # Example
/// ```
/// use std::sync::Arc;
/// use async_trait::async_trait;
/// use tokio_util::sync::CancellationToken;
/// use fanout::{Handle, HandlerError};
///
/// struct Audit;
///
/// #[async_trait]
/// impl Handle<String> for Audit {
///     async fn call(&self, msg: Arc<String>, ctx: CancellationToken) -> Result<(), HandlerError> {
///         if ctx.is_cancelled() {
///             return Ok(());
///         }
///         println!("audit: {msg}");
///         Ok(())
///     }
/// }
/// ```
#[async_trait]
pub trait Handle<M>: Send + Sync + 'static {
    /// Handles one published message.
    ///
    /// The message is shared across every handler in the round; clone out
    /// of the `Arc` only if ownership is needed.
    async fn call(&self, msg: Arc<M>, ctx: CancellationToken) -> Result<(), HandlerError>;

    /// Human-readable name (for logs/metrics).
    fn name(&self) -> &str {
        std::any::type_name::<Self>()
    }
}

/// Shared handle to a registered handler.
pub type HandlerRef<M> = Arc<dyn Handle<M>>;

/// Identity comparison for registry membership.
///
/// Compares the data pointers of the two `Arc`s (metadata excluded, so two
/// handles to the same allocation compare equal even across unsizing).
#[must_use]
pub fn same_handler<M>(a: &HandlerRef<M>, b: &HandlerRef<M>) -> bool {
    std::ptr::eq(
        Arc::as_ptr(a) as *const (),
        Arc::as_ptr(b) as *const (),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::handlers::HandlerFn;

    fn noop() -> HandlerRef<u32> {
        HandlerFn::arc("noop", |_msg: Arc<u32>, _ctx| async {
            Ok::<_, HandlerError>(())
        })
    }

    #[test]
    fn test_same_arc_is_same_handler() {
        let h = noop();
        let h2 = Arc::clone(&h);
        assert!(same_handler(&h, &h2));
    }

    #[test]
    fn test_distinct_allocations_are_distinct_handlers() {
        let a = noop();
        let b = noop();
        assert!(!same_handler(&a, &b));
    }
}

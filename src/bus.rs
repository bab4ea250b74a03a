//! # The bus: named pub/sub facade over per-type registries.
//!
//! [`Bus`] owns one [`HandlerRegistry`] per message type, keyed by the
//! message's [`TypeId`]. Handlers subscribed under type `A` never see
//! messages of type `B`, and two bus instances are fully independent — no
//! process-wide state.
//!
//! ## Architecture
//! ```text
//! Bus (name, default strategy)
//!  └─ registries: TypeId ─► HandlerRegistry<M>
//!
//! publish(msg, ctx)
//!  ├─ look up registry for TypeId::of::<M>()  (read lock, released at once)
//!  ├─ snapshot()                              (registry lock, released at once)
//!  └─ dispatch::run(snapshot, msg, ctx, strategy)   (no lock held)
//! ```
//!
//! ## Rules
//! - Publishing a type that has no subscribers succeeds and invokes nothing.
//! - The registry map lock and the per-type registry lock are never held
//!   while handlers execute.
//! - `publish` accepts the message by value; presence is enforced by the
//!   type system, so there is no absent-message error path to check.
//!
//! ## Example
//! ```
//! use std::sync::Arc;
//! use tokio_util::sync::CancellationToken;
//! use fanout::{Bus, HandlerError, HandlerFn};
//!
//! #[derive(Debug)]
//! struct OrderPlaced { id: u64 }
//!
//! # #[tokio::main(flavor = "current_thread")]
//! # async fn main() -> Result<(), fanout::PublishError> {
//! let bus = Bus::new();
//! bus.subscribe::<OrderPlaced>(HandlerFn::arc("billing", |msg: Arc<OrderPlaced>, _ctx| async move {
//!     println!("billing order {}", msg.id);
//!     Ok::<_, HandlerError>(())
//! }));
//!
//! bus.publish(OrderPlaced { id: 42 }, CancellationToken::new()).await?;
//! # Ok(())
//! # }
//! ```

use std::any::{Any, TypeId};
use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use parking_lot::RwLock;
use tokio_util::sync::CancellationToken;

use crate::config::BusConfig;
use crate::dispatch;
use crate::error::PublishError;
use crate::handlers::HandlerRef;
use crate::registry::HandlerRegistry;
use crate::strategy::PublishStrategy;

static NEXT_BUS_ID: AtomicU64 = AtomicU64::new(1);

/// Named message bus with a default publish strategy and one handler
/// registry per message type.
pub struct Bus {
    name: String,
    strategy: PublishStrategy,
    registries: RwLock<HashMap<TypeId, Box<dyn Any + Send + Sync>>>,
}

impl Default for Bus {
    fn default() -> Self {
        Self::new()
    }
}

impl Bus {
    /// Creates a bus with an auto-generated name (`bus-<n>`) and the
    /// default strategy.
    #[must_use]
    pub fn new() -> Self {
        Self::with_config(BusConfig::default())
    }

    /// Creates a bus from an explicit configuration.
    #[must_use]
    pub fn with_config(config: BusConfig) -> Self {
        let name = config
            .name
            .unwrap_or_else(|| format!("bus-{}", NEXT_BUS_ID.fetch_add(1, Ordering::Relaxed)));
        Self {
            name,
            strategy: config.strategy,
            registries: RwLock::new(HashMap::new()),
        }
    }

    /// The bus name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The default publish strategy.
    pub fn strategy(&self) -> PublishStrategy {
        self.strategy
    }

    /// Subscribes a handler to message type `M`.
    ///
    /// Idempotent: subscribing the same handler twice keeps one
    /// subscription, so it runs exactly once per round.
    pub fn subscribe<M>(&self, handler: HandlerRef<M>)
    where
        M: Send + Sync + 'static,
    {
        self.registry_for::<M>().register(handler);
    }

    /// Removes a handler's subscription to message type `M`; no-op when the
    /// handler was never subscribed.
    pub fn unsubscribe<M>(&self, handler: &HandlerRef<M>)
    where
        M: Send + Sync + 'static,
    {
        if let Some(registry) = self.existing_registry::<M>() {
            registry.unregister(handler);
        }
    }

    /// Number of handlers currently subscribed to `M`.
    pub fn subscriber_count<M>(&self) -> usize
    where
        M: Send + Sync + 'static,
    {
        self.existing_registry::<M>().map_or(0, |r| r.len())
    }

    /// Publishes a message with the bus's default strategy.
    ///
    /// Suspends until the strategy's completion condition is met (only
    /// `ParallelNoWait` returns without waiting).
    pub async fn publish<M>(&self, msg: M, ctx: CancellationToken) -> Result<(), PublishError>
    where
        M: Send + Sync + 'static,
    {
        self.publish_with(msg, ctx, self.strategy).await
    }

    /// Publishes a message with a per-call strategy override.
    pub async fn publish_with<M>(
        &self,
        msg: M,
        ctx: CancellationToken,
        strategy: PublishStrategy,
    ) -> Result<(), PublishError>
    where
        M: Send + Sync + 'static,
    {
        let snapshot = match self.existing_registry::<M>() {
            Some(registry) => registry.snapshot(),
            None => return Ok(()),
        };
        dispatch::run(snapshot, Arc::new(msg), ctx, strategy).await
    }

    /// Returns the registry for `M`, creating it on first use.
    fn registry_for<M>(&self) -> Arc<HandlerRegistry<M>>
    where
        M: Send + Sync + 'static,
    {
        if let Some(registry) = self.existing_registry::<M>() {
            return registry;
        }

        let mut registries = self.registries.write();
        let entry = registries
            .entry(TypeId::of::<M>())
            .or_insert_with(|| Box::new(Arc::new(HandlerRegistry::<M>::new())));
        entry
            .downcast_ref::<Arc<HandlerRegistry<M>>>()
            .map(Arc::clone)
            .unwrap_or_else(|| unreachable!("registry map entry has the key's type"))
    }

    /// Returns the registry for `M` if any handler ever subscribed to it.
    fn existing_registry<M>(&self) -> Option<Arc<HandlerRegistry<M>>>
    where
        M: Send + Sync + 'static,
    {
        let registries = self.registries.read();
        registries
            .get(&TypeId::of::<M>())
            .and_then(|entry| entry.downcast_ref::<Arc<HandlerRegistry<M>>>())
            .map(Arc::clone)
    }
}

impl std::fmt::Debug for Bus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Bus")
            .field("name", &self.name)
            .field("strategy", &self.strategy)
            .field("types", &self.registries.read().len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::AtomicUsize;

    use super::*;
    use crate::error::HandlerError;
    use crate::handlers::HandlerFn;

    #[derive(Debug)]
    struct Ping;
    #[derive(Debug)]
    struct Pong;

    fn counting<M: Send + Sync + 'static>(counter: &Arc<AtomicUsize>) -> HandlerRef<M> {
        let counter = Arc::clone(counter);
        HandlerFn::arc("counting", move |_msg: Arc<M>, _ctx| {
            let counter = Arc::clone(&counter);
            async move {
                counter.fetch_add(1, Ordering::SeqCst);
                Ok::<_, HandlerError>(())
            }
        })
    }

    #[tokio::test]
    async fn test_publish_without_subscribers_succeeds() {
        let bus = Bus::new();
        let res = bus.publish(Ping, CancellationToken::new()).await;
        assert!(res.is_ok());
    }

    #[tokio::test]
    async fn test_message_types_are_isolated() {
        let bus = Bus::new();
        let pings = Arc::new(AtomicUsize::new(0));
        bus.subscribe::<Ping>(counting(&pings));

        bus.publish(Pong, CancellationToken::new()).await.unwrap();
        assert_eq!(pings.load(Ordering::SeqCst), 0);

        bus.publish(Ping, CancellationToken::new()).await.unwrap();
        assert_eq!(pings.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_buses_are_independent() {
        let a = Bus::with_config(BusConfig::named("a"));
        let b = Bus::with_config(BusConfig::named("b"));
        let count = Arc::new(AtomicUsize::new(0));
        a.subscribe::<Ping>(counting(&count));

        b.publish(Ping, CancellationToken::new()).await.unwrap();
        assert_eq!(count.load(Ordering::SeqCst), 0);
        assert_eq!(b.subscriber_count::<Ping>(), 0);
        assert_eq!(a.subscriber_count::<Ping>(), 1);
    }

    #[tokio::test]
    async fn test_duplicate_subscription_runs_once_per_round() {
        let bus = Bus::new();
        let count = Arc::new(AtomicUsize::new(0));
        let handler = counting::<Ping>(&count);
        bus.subscribe::<Ping>(Arc::clone(&handler));
        bus.subscribe::<Ping>(Arc::clone(&handler));

        bus.publish(Ping, CancellationToken::new()).await.unwrap();
        assert_eq!(count.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_unsubscribe_stops_invocation() {
        let bus = Bus::new();
        let count = Arc::new(AtomicUsize::new(0));
        let handler = counting::<Ping>(&count);
        bus.subscribe::<Ping>(Arc::clone(&handler));
        bus.unsubscribe::<Ping>(&handler);

        // unsubscribing again is a no-op
        bus.unsubscribe::<Ping>(&handler);

        bus.publish(Ping, CancellationToken::new()).await.unwrap();
        assert_eq!(count.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_publish_with_overrides_default_strategy() {
        let bus = Bus::new();
        let failing: HandlerRef<Ping> = HandlerFn::arc("bad", |_msg: Arc<Ping>, _ctx| async {
            Err(HandlerError::fail("bad"))
        });
        bus.subscribe::<Ping>(failing);

        // default strategy surfaces the failure as an aggregate
        let err = bus.publish(Ping, CancellationToken::new()).await.unwrap_err();
        assert_eq!(err.as_label(), "handler_errors");

        // fire-and-forget override swallows it
        let res = bus
            .publish_with(Ping, CancellationToken::new(), PublishStrategy::ParallelNoWait)
            .await;
        assert!(res.is_ok());
    }

    #[test]
    fn test_auto_generated_names_are_unique() {
        let a = Bus::new();
        let b = Bus::new();
        assert_ne!(a.name(), b.name());
        assert!(a.name().starts_with("bus-"));
    }
}

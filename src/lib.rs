//! # fanout
//!
//! **Fanout** is a typed in-process publish/subscribe bus for Rust.
//!
//! Producers publish typed messages, subscribers register typed handlers,
//! and a [`PublishStrategy`] governs how each round invokes them:
//! sequential or parallel, fail-fast or error-collecting, waiting or
//! fire-and-forget. Everything stays in one process and one runtime; there
//! is no transport, persistence, or retry.
//!
//! ## Architecture
//! ### Overview
//! ```text
//!   ┌────────────┐      ┌────────────────────────────────────────────┐
//!   │ publisher  │─────►│ Bus (name, default strategy)               │
//!   └────────────┘      │  └─ per-type registries (TypeId keyed)     │
//!                       └──────────────────┬─────────────────────────┘
//!                                          │ snapshot (under lock)
//!                                          ▼
//!                       ┌────────────────────────────────────────────┐
//!                       │ Dispatch engine (strategy match)           │
//!                       │  sequential ──► h1 → h2 → h3               │
//!                       │  joint await ─► join_all(f1, f2, f3)       │
//!                       │  parallel ────► spawn × N (worker pool)    │
//!                       └──────────────────┬─────────────────────────┘
//!                                          ▼
//!                        success │ raw failure │ aggregated failures
//! ```
//!
//! ### One publish round
//! ```text
//! publish(msg, ctx)
//!   ├─► snapshot handlers for msg's type (registration order)
//!   ├─► execute per strategy:
//!   │     SyncContinueOnException  run all, collect every failure
//!   │     SyncStopOnException      stop at the first failure, unwrapped
//!   │     Async                    create all futures, await jointly
//!   │     ParallelNoWait           spawn all, return immediately
//!   │     ParallelWhenAll          spawn all, wait for every outcome
//!   │     ParallelWhenAny          spawn all, wait for the first outcome
//!   └─► outcome: Ok(()) | PublishError::{Handler, Handlers}
//! ```
//!
//! ## Features
//! | Area           | Description                                               | Key types / traits                  |
//! |----------------|-----------------------------------------------------------|-------------------------------------|
//! | **Handlers**   | Define handlers as traits or closures.                    | [`Handle`], [`HandlerFn`], [`HandlerRef`] |
//! | **Strategies** | Select sequencing, parallelism, and failure aggregation.  | [`PublishStrategy`]                 |
//! | **Bus**        | Named bus identity with isolated per-type subscriptions.  | [`Bus`], [`BusConfig`]              |
//! | **Registry**   | Ordered, idempotent subscription bookkeeping.             | [`HandlerRegistry`]                 |
//! | **Errors**     | Typed errors for configuration and handler failures.      | [`PublishError`], [`HandlerError`], [`AggregateError`] |
//!
//! ## Optional features
//! - `logging`: exports a simple built-in [`LogWriter`] handler _(demo/reference only)_.
//!
//! ## Example
//! ```rust
//! use std::sync::Arc;
//! use tokio_util::sync::CancellationToken;
//! use fanout::{Bus, BusConfig, HandlerError, HandlerFn, PublishStrategy};
//!
//! #[derive(Debug)]
//! struct UserRegistered {
//!     email: String,
//! }
//!
//! #[tokio::main(flavor = "current_thread")]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let bus = Bus::with_config(BusConfig::named("accounts"));
//!
//!     bus.subscribe::<UserRegistered>(HandlerFn::arc(
//!         "welcome-mail",
//!         |msg: Arc<UserRegistered>, ctx: CancellationToken| async move {
//!             if ctx.is_cancelled() {
//!                 return Ok(());
//!             }
//!             println!("sending welcome mail to {}", msg.email);
//!             Ok::<_, HandlerError>(())
//!         },
//!     ));
//!
//!     bus.publish(
//!         UserRegistered { email: "user@example.com".into() },
//!         CancellationToken::new(),
//!     )
//!     .await?;
//!
//!     // per-call strategy override
//!     bus.publish_with(
//!         UserRegistered { email: "other@example.com".into() },
//!         CancellationToken::new(),
//!         PublishStrategy::ParallelWhenAll,
//!     )
//!     .await?;
//!     Ok(())
//! }
//! ```

mod bus;
mod config;
mod dispatch;
mod error;
mod handlers;
mod registry;
mod strategy;

// ---- Public re-exports ----

pub use bus::Bus;
pub use config::BusConfig;
pub use error::{AggregateError, HandlerError, PublishError};
pub use handlers::{same_handler, Handle, HandlerFn, HandlerRef};
pub use registry::HandlerRegistry;
pub use strategy::PublishStrategy;

// Optional: expose a simple built-in logging handler (demo/reference).
// Enable with: `--features logging`
#[cfg(feature = "logging")]
pub use handlers::LogWriter;

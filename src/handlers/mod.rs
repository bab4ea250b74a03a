//! # Message handlers.
//!
//! This module provides the [`Handle`] trait — the extension point for
//! plugging message processing into a [`Bus`](crate::Bus) — together with
//! the closure-backed [`HandlerFn`] and the shared handle type
//! [`HandlerRef`].
//!
//! ## Contract
//! - Handlers may be slow (I/O, batching, retries); how much they block the
//!   publisher depends entirely on the [`PublishStrategy`](crate::PublishStrategy)
//!   of the round that invokes them.
//! - Handlers receive a [`CancellationToken`](tokio_util::sync::CancellationToken)
//!   and are responsible for honoring it; the engine never aborts them.
//! - Handlers invoked by a parallel strategy may overlap in wall-clock time
//!   and must not assume mutual exclusion over shared state outside the
//!   message itself.

mod handler;
mod handler_fn;

pub use handler::{same_handler, Handle, HandlerRef};
pub use handler_fn::HandlerFn;

#[cfg(feature = "logging")]
mod log;
#[cfg(feature = "logging")]
pub use log::LogWriter;

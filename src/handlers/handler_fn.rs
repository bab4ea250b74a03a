//! # Function-backed handler (`HandlerFn`)
//!
//! [`HandlerFn`] wraps a closure `F: Fn(Arc<M>, CancellationToken) -> Fut`,
//! producing a fresh future per invocation. Each dispatch round calls the
//! closure anew, so there is no hidden mutable state between rounds; if a
//! handler needs shared state, hold an `Arc<...>` inside the closure
//! explicitly.
//!
//! ## Example
//! ```rust
//! use std::sync::Arc;
//! use tokio_util::sync::CancellationToken;
//! use fanout::{HandlerFn, HandlerRef, HandlerError};
//!
//! let h: HandlerRef<String> = HandlerFn::arc("greeter", |msg: Arc<String>, _ctx| async move {
//!     println!("hello, {msg}");
//!     Ok::<_, HandlerError>(())
//! });
//!
//! assert_eq!(h.name(), "greeter");
//! ```

use std::borrow::Cow;
use std::future::Future;
use std::sync::Arc;

use async_trait::async_trait;
use tokio_util::sync::CancellationToken;

use crate::error::HandlerError;
use crate::handlers::handler::Handle;

/// Function-backed handler implementation.
///
/// Wraps a closure that *creates* a new future per invocation.
#[derive(Debug)]
pub struct HandlerFn<F> {
    name: Cow<'static, str>,
    f: F,
}

impl<F> HandlerFn<F> {
    /// Creates a new function-backed handler.
    ///
    /// Prefer [`HandlerFn::arc`] when you immediately need a
    /// [`HandlerRef`](crate::HandlerRef).
    pub fn new(name: impl Into<Cow<'static, str>>, f: F) -> Self {
        Self { name: name.into(), f }
    }

    /// Creates the handler and returns it as a shared handle.
    pub fn arc(name: impl Into<Cow<'static, str>>, f: F) -> Arc<Self> {
        Arc::new(Self::new(name, f))
    }
}

#[async_trait]
impl<M, F, Fut> Handle<M> for HandlerFn<F>
where
    M: Send + Sync + 'static,
    F: Fn(Arc<M>, CancellationToken) -> Fut + Send + Sync + 'static, // Fn, not FnMut
    Fut: Future<Output = Result<(), HandlerError>> + Send + 'static,
{
    async fn call(&self, msg: Arc<M>, ctx: CancellationToken) -> Result<(), HandlerError> {
        (self.f)(msg, ctx).await
    }

    fn name(&self) -> &str {
        &self.name
    }
}

//! # Dispatch engine - strategy execution over a handler snapshot.
//!
//! Given a snapshot of handlers, a shared message, and a cancellation
//! token, [`run`] executes one publish round with the concurrency shape
//! and failure policy of the selected [`PublishStrategy`]:
//!
//! ```text
//! run(snapshot, msg, ctx, strategy)
//!   ├─► SyncContinueOnException ─ for h in snapshot { catch; record } ─► aggregate
//!   ├─► SyncStopOnException ───── for h in snapshot { h.call().await? }
//!   ├─► Async ─────────────────── join_all(futures, no spawn) ─► aggregate
//!   ├─► ParallelNoWait ────────── spawn each, return immediately
//!   ├─► ParallelWhenAll ───────── spawn each, join_all(handles) ─► aggregate
//!   └─► ParallelWhenAny ───────── spawn each, select_all(handles) ─► first outcome
//! ```
//!
//! ## Rules
//! - Dispatch is a match over the closed strategy enum; every variant maps
//!   to exactly one function, so there is no lookup table to mis-initialize
//!   and no silent fallback.
//! - Sequential strategies run handlers in snapshot order; handler N+1 does
//!   not start until handler N's outcome is known. Parallel strategies make
//!   no ordering guarantee.
//! - Recoverable handler failures (returned `Err`s and caught panics) are
//!   folded into the strategy's policy. Fatal runtime states (OOM, stack
//!   exhaustion) abort the process and are never folded.
//! - The engine holds no lock while handlers run and never force-terminates
//!   a handler; the cancellation token is passed through for cooperative
//!   shutdown.

use std::any::Any;
use std::panic::AssertUnwindSafe;
use std::sync::Arc;

use futures::future::{join_all, select_all};
use futures::FutureExt;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

use crate::error::{AggregateError, HandlerError, PublishError};
use crate::handlers::HandlerRef;
use crate::strategy::PublishStrategy;

/// Executes one publish round over a handler snapshot.
///
/// The snapshot is taken by the caller before the round starts; registry
/// mutations after that point do not affect this round.
pub(crate) async fn run<M>(
    handlers: Vec<HandlerRef<M>>,
    msg: Arc<M>,
    ctx: CancellationToken,
    strategy: PublishStrategy,
) -> Result<(), PublishError>
where
    M: Send + Sync + 'static,
{
    match strategy {
        PublishStrategy::SyncContinueOnException => sync_continue(handlers, msg, ctx).await,
        PublishStrategy::SyncStopOnException => sync_stop(handlers, msg, ctx).await,
        PublishStrategy::Async => joint_await(handlers, msg, ctx).await,
        PublishStrategy::ParallelNoWait => parallel_no_wait(handlers, msg, ctx),
        PublishStrategy::ParallelWhenAll => parallel_when_all(handlers, msg, ctx).await,
        PublishStrategy::ParallelWhenAny => parallel_when_any(handlers, msg, ctx).await,
    }
}

/// Sequential, registration order; every failure is recorded and execution
/// continues. Result: empty failure set → success, else an aggregate in
/// encounter order.
async fn sync_continue<M>(
    handlers: Vec<HandlerRef<M>>,
    msg: Arc<M>,
    ctx: CancellationToken,
) -> Result<(), PublishError>
where
    M: Send + Sync + 'static,
{
    let mut agg = AggregateError::new();
    for handler in &handlers {
        let fut = handler.call(Arc::clone(&msg), ctx.clone());
        match AssertUnwindSafe(fut).catch_unwind().await {
            Ok(Ok(())) => {}
            Ok(Err(err)) => agg.push(err),
            Err(payload) => agg.push(panic_error(payload)),
        }
    }
    agg.into_result()
}

/// Sequential, registration order; the first failure aborts the round and
/// propagates unwrapped. Handlers after the failing one never start.
async fn sync_stop<M>(
    handlers: Vec<HandlerRef<M>>,
    msg: Arc<M>,
    ctx: CancellationToken,
) -> Result<(), PublishError>
where
    M: Send + Sync + 'static,
{
    for handler in &handlers {
        handler.call(Arc::clone(&msg), ctx.clone()).await?;
    }
    Ok(())
}

/// All handler futures created back-to-back without spawning, then awaited
/// jointly. Failures (returned or panicked) are aggregated once every
/// handler has settled.
async fn joint_await<M>(
    handlers: Vec<HandlerRef<M>>,
    msg: Arc<M>,
    ctx: CancellationToken,
) -> Result<(), PublishError>
where
    M: Send + Sync + 'static,
{
    let futures: Vec<_> = handlers
        .iter()
        .map(|handler| {
            let fut = handler.call(Arc::clone(&msg), ctx.clone());
            AssertUnwindSafe(fut).catch_unwind()
        })
        .collect();

    let mut agg = AggregateError::new();
    for outcome in join_all(futures).await {
        match outcome {
            Ok(Ok(())) => {}
            Ok(Err(err)) => agg.push(err),
            Err(payload) => agg.push(panic_error(payload)),
        }
    }
    agg.into_result()
}

/// Fire-and-forget: each handler is spawned onto the runtime's worker pool
/// and the round completes immediately. The caller opted out of waiting, so
/// failures are not surfaced; they are reported to stderr for visibility.
fn parallel_no_wait<M>(
    handlers: Vec<HandlerRef<M>>,
    msg: Arc<M>,
    ctx: CancellationToken,
) -> Result<(), PublishError>
where
    M: Send + Sync + 'static,
{
    for handler in handlers {
        let msg = Arc::clone(&msg);
        let ctx = ctx.clone();
        tokio::spawn(async move {
            if let Err(err) = handler.call(msg, ctx).await {
                eprintln!(
                    "[fanout] detached handler '{}' failed: {}",
                    handler.name(),
                    err
                );
            }
        });
    }
    Ok(())
}

/// Each handler spawned onto the runtime; the round completes when all have
/// finished, folding every returned error, panic, and torn-down task into
/// one aggregate.
async fn parallel_when_all<M>(
    handlers: Vec<HandlerRef<M>>,
    msg: Arc<M>,
    ctx: CancellationToken,
) -> Result<(), PublishError>
where
    M: Send + Sync + 'static,
{
    let tasks = spawn_round(&handlers, &msg, &ctx);

    let mut agg = AggregateError::new();
    for joined in join_all(tasks).await {
        match joined {
            Ok(Ok(())) => {}
            Ok(Err(err)) => agg.push(err),
            Err(join_err) => agg.push(join_error(join_err)),
        }
    }
    agg.into_result()
}

/// Each handler spawned onto the runtime; the round completes with the
/// outcome of whichever handler finishes first. The remaining handlers keep
/// running detached; their eventual outcomes are dropped, consistent with
/// [`PublishStrategy::ParallelNoWait`].
async fn parallel_when_any<M>(
    handlers: Vec<HandlerRef<M>>,
    msg: Arc<M>,
    ctx: CancellationToken,
) -> Result<(), PublishError>
where
    M: Send + Sync + 'static,
{
    if handlers.is_empty() {
        return Ok(());
    }

    let tasks = spawn_round(&handlers, &msg, &ctx);

    // Dropping the remaining JoinHandles detaches them; the tasks run on.
    let (first, _index, _rest) = select_all(tasks).await;
    match first {
        Ok(Ok(())) => Ok(()),
        Ok(Err(err)) => Err(PublishError::Handler(err)),
        Err(join_err) => Err(PublishError::Handler(join_error(join_err))),
    }
}

/// Spawns one task per handler, sharing the message and the round's
/// cancellation token.
fn spawn_round<M>(
    handlers: &[HandlerRef<M>],
    msg: &Arc<M>,
    ctx: &CancellationToken,
) -> Vec<JoinHandle<Result<(), HandlerError>>>
where
    M: Send + Sync + 'static,
{
    handlers
        .iter()
        .map(|handler| {
            let handler = Arc::clone(handler);
            let msg = Arc::clone(msg);
            let ctx = ctx.clone();
            tokio::spawn(async move { handler.call(msg, ctx).await })
        })
        .collect()
}

fn panic_error(payload: Box<dyn Any + Send>) -> HandlerError {
    let message = if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "non-string panic payload".to_string()
    };
    HandlerError::Panic { message }
}

fn join_error(err: tokio::task::JoinError) -> HandlerError {
    if err.is_panic() {
        panic_error(err.into_panic())
    } else {
        HandlerError::Canceled
    }
}

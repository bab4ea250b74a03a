//! Error types used by the bus and its handlers.
//!
//! This module defines three main error types:
//!
//! - [`HandlerError`] — a failure raised by a single handler invocation.
//! - [`AggregateError`] — a flat collection of handler failures from one
//!   dispatch round.
//! - [`PublishError`] — the error returned to the publisher, distinguishing
//!   configuration errors from handler failures.
//!
//! All types provide helper methods (`as_label`, `as_message`) for
//! logging/metrics.

use thiserror::Error;

/// # Errors produced by a single handler invocation.
///
/// Handlers return these from [`Handle::call`](crate::Handle::call); the
/// dispatch engine additionally synthesizes the `Panic` and `Canceled`
/// variants when a handler panics or its spawned task is torn down before
/// completion.
#[non_exhaustive]
#[derive(Error, Debug)]
pub enum HandlerError {
    /// Handler execution failed.
    #[error("handler failed: {error}")]
    Fail {
        /// The underlying error message.
        error: String,
    },

    /// Handler panicked; the panic was caught and folded into the round's
    /// failure policy.
    #[error("handler panicked: {message}")]
    Panic {
        /// Best-effort rendering of the panic payload.
        message: String,
    },

    /// Handler's task was cancelled before it produced an outcome.
    #[error("handler cancelled")]
    Canceled,
}

impl HandlerError {
    /// Creates a `Fail` from anything displayable.
    pub fn fail(error: impl std::fmt::Display) -> Self {
        HandlerError::Fail {
            error: error.to_string(),
        }
    }

    /// Returns a short stable label (snake_case) for use in logs/metrics.
    ///
    /// # Example
    /// ```
    /// use fanout::HandlerError;
    ///
    /// let err = HandlerError::fail("boom");
    /// assert_eq!(err.as_label(), "handler_failed");
    /// ```
    pub fn as_label(&self) -> &'static str {
        match self {
            HandlerError::Fail { .. } => "handler_failed",
            HandlerError::Panic { .. } => "handler_panicked",
            HandlerError::Canceled => "handler_canceled",
        }
    }

    /// Returns a human-readable message with details about the error.
    pub fn as_message(&self) -> String {
        match self {
            HandlerError::Fail { error } => format!("error: {error}"),
            HandlerError::Panic { message } => format!("panic: {message}"),
            HandlerError::Canceled => "cancelled".to_string(),
        }
    }
}

/// # Flat collection of handler failures from one dispatch round.
///
/// Order is the order in which failures were encountered. Contents are
/// preserved exactly: no truncation, no deduplication. The collection is
/// flat by construction — each entry is a single [`HandlerError`], so
/// nested aggregates cannot arise.
#[derive(Error, Debug, Default)]
#[error("{} handler(s) failed", .errors.len())]
pub struct AggregateError {
    /// The constituent failures, in encounter order.
    pub errors: Vec<HandlerError>,
}

impl AggregateError {
    /// Creates an empty aggregate.
    #[must_use]
    pub fn new() -> Self {
        Self { errors: Vec::new() }
    }

    /// Records one failure.
    pub fn push(&mut self, err: HandlerError) {
        self.errors.push(err);
    }

    /// True if no failures were recorded; an empty aggregate means the
    /// round succeeded and must not be surfaced as an error.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    /// Number of recorded failures.
    #[must_use]
    pub fn len(&self) -> usize {
        self.errors.len()
    }

    /// Converts a round's collected failures into a publish outcome:
    /// empty → `Ok(())`, nonempty → `Err(PublishError::Handlers)`.
    pub fn into_result(self) -> Result<(), PublishError> {
        if self.is_empty() {
            Ok(())
        } else {
            Err(PublishError::Handlers(self))
        }
    }
}

impl From<Vec<HandlerError>> for AggregateError {
    fn from(errors: Vec<HandlerError>) -> Self {
        Self { errors }
    }
}

/// # Errors returned to the publisher.
///
/// Distinguishes configuration errors (reported before any handler runs)
/// from handler failures (raw single failure or aggregate, per the active
/// strategy's policy).
#[non_exhaustive]
#[derive(Error, Debug)]
pub enum PublishError {
    /// A strategy name did not match any known [`PublishStrategy`](crate::PublishStrategy).
    /// No handlers were invoked.
    #[error("unknown publish strategy: {name:?}")]
    UnknownStrategy {
        /// The unrecognized strategy name.
        name: String,
    },

    /// A single handler failure surfaced unwrapped
    /// (`SyncStopOnException`, `ParallelWhenAny`).
    #[error(transparent)]
    Handler(#[from] HandlerError),

    /// One or more handler failures collected by an aggregating strategy.
    #[error(transparent)]
    Handlers(#[from] AggregateError),
}

impl PublishError {
    /// Returns a short stable label (snake_case) for use in logs/metrics.
    pub fn as_label(&self) -> &'static str {
        match self {
            PublishError::UnknownStrategy { .. } => "unknown_strategy",
            PublishError::Handler(_) => "handler_error",
            PublishError::Handlers(_) => "handler_errors",
        }
    }

    /// True if this is a configuration error rather than a handler failure.
    #[must_use]
    pub fn is_config(&self) -> bool {
        matches!(self, PublishError::UnknownStrategy { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_aggregate_is_ok() {
        let agg = AggregateError::new();
        assert!(agg.is_empty());
        assert!(agg.into_result().is_ok());
    }

    #[test]
    fn test_nonempty_aggregate_preserves_order() {
        let mut agg = AggregateError::new();
        agg.push(HandlerError::fail("first"));
        agg.push(HandlerError::fail("second"));
        agg.push(HandlerError::fail("second"));

        // no deduplication, no truncation
        assert_eq!(agg.len(), 3);

        match agg.into_result() {
            Err(PublishError::Handlers(inner)) => {
                let msgs: Vec<String> = inner.errors.iter().map(|e| e.as_message()).collect();
                assert_eq!(msgs, vec!["error: first", "error: second", "error: second"]);
            }
            other => panic!("expected aggregate, got {other:?}"),
        }
    }

    #[test]
    fn test_config_error_distinguishable_from_handler_failure() {
        let cfg = PublishError::UnknownStrategy { name: "bogus".into() };
        let fail = PublishError::Handler(HandlerError::fail("boom"));
        assert!(cfg.is_config());
        assert!(!fail.is_config());
        assert_eq!(cfg.as_label(), "unknown_strategy");
        assert_eq!(fail.as_label(), "handler_error");
    }
}

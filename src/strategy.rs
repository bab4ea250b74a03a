//! # Publish strategies.
//!
//! [`PublishStrategy`] selects how one publish round executes its handlers:
//! sequential or parallel, fail-fast or error-collecting, waiting or
//! fire-and-forget. Every variant maps to exactly one execution behavior in
//! the dispatch engine; there is no fallback.
//!
//! | Strategy                  | Shape                      | Failure policy            |
//! |---------------------------|----------------------------|---------------------------|
//! | `SyncContinueOnException` | sequential, insertion order| collect all, aggregate    |
//! | `SyncStopOnException`     | sequential, insertion order| first failure aborts      |
//! | `Async`                   | joint await, no spawn      | collect all, aggregate    |
//! | `ParallelNoWait`          | spawned, fire-and-forget   | swallowed                 |
//! | `ParallelWhenAll`         | spawned, wait for all      | aggregate                 |
//! | `ParallelWhenAny`         | spawned, first to finish   | first outcome, unwrapped  |
//!
//! Strategies parse from `snake_case` names, which is how a configuration
//! layer selects the bus default; an unrecognized name is a configuration
//! error, not a silent no-op.
//!
//! # Example
//! ```
//! use fanout::PublishStrategy;
//!
//! let s: PublishStrategy = "parallel_when_all".parse().unwrap();
//! assert_eq!(s, PublishStrategy::ParallelWhenAll);
//! assert_eq!(s.to_string(), "parallel_when_all");
//!
//! assert!("whenmost".parse::<PublishStrategy>().is_err());
//! ```

use std::fmt;
use std::str::FromStr;

use crate::error::PublishError;

/// Execution policy for one publish round.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum PublishStrategy {
    /// Sequential, registration order; failures are recorded and execution
    /// continues; result is an aggregate of every failure.
    SyncContinueOnException,
    /// Sequential, registration order; the first failure aborts the round
    /// and propagates unwrapped; later handlers never run.
    SyncStopOnException,
    /// All handler futures are created back-to-back (no separate execution
    /// units) and awaited jointly; failures are aggregated after all settle.
    Async,
    /// Each handler is spawned onto the runtime and the round completes
    /// immediately; handler failures are not observable by the publisher.
    ParallelNoWait,
    /// Each handler is spawned onto the runtime; the round completes when
    /// all handlers have finished, aggregating every failure.
    ParallelWhenAll,
    /// Each handler is spawned onto the runtime; the round completes with
    /// the outcome of whichever handler finishes first. The rest keep
    /// running detached; their outcomes are not observed by this call.
    ParallelWhenAny,
}

impl Default for PublishStrategy {
    /// `SyncContinueOnException`: run everything, report everything.
    fn default() -> Self {
        PublishStrategy::SyncContinueOnException
    }
}

impl PublishStrategy {
    /// Stable `snake_case` name, used by [`Display`](fmt::Display) and
    /// accepted by [`FromStr`].
    pub fn as_str(&self) -> &'static str {
        match self {
            PublishStrategy::SyncContinueOnException => "sync_continue_on_exception",
            PublishStrategy::SyncStopOnException => "sync_stop_on_exception",
            PublishStrategy::Async => "async",
            PublishStrategy::ParallelNoWait => "parallel_no_wait",
            PublishStrategy::ParallelWhenAll => "parallel_when_all",
            PublishStrategy::ParallelWhenAny => "parallel_when_any",
        }
    }

    /// All strategies, in declaration order.
    pub const ALL: [PublishStrategy; 6] = [
        PublishStrategy::SyncContinueOnException,
        PublishStrategy::SyncStopOnException,
        PublishStrategy::Async,
        PublishStrategy::ParallelNoWait,
        PublishStrategy::ParallelWhenAll,
        PublishStrategy::ParallelWhenAny,
    ];

    /// True if the strategy waits for its completion condition before
    /// returning to the publisher. Only `ParallelNoWait` does not.
    #[must_use]
    pub fn waits(&self) -> bool {
        !matches!(self, PublishStrategy::ParallelNoWait)
    }
}

impl fmt::Display for PublishStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PublishStrategy {
    type Err = PublishError;

    /// Parses a `snake_case` strategy name.
    ///
    /// Returns [`PublishError::UnknownStrategy`] for anything else; a bad
    /// strategy name must surface as a configuration error before any
    /// handler runs.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "sync_continue_on_exception" => Ok(PublishStrategy::SyncContinueOnException),
            "sync_stop_on_exception" => Ok(PublishStrategy::SyncStopOnException),
            "async" => Ok(PublishStrategy::Async),
            "parallel_no_wait" => Ok(PublishStrategy::ParallelNoWait),
            "parallel_when_all" => Ok(PublishStrategy::ParallelWhenAll),
            "parallel_when_any" => Ok(PublishStrategy::ParallelWhenAny),
            other => Err(PublishError::UnknownStrategy {
                name: other.to_string(),
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_sync_continue() {
        assert_eq!(
            PublishStrategy::default(),
            PublishStrategy::SyncContinueOnException
        );
    }

    #[test]
    fn test_display_parse_round_trip() {
        for s in PublishStrategy::ALL {
            let parsed: PublishStrategy = s.to_string().parse().unwrap();
            assert_eq!(parsed, s);
        }
    }

    #[test]
    fn test_unknown_name_is_config_error() {
        let err = "whenmost".parse::<PublishStrategy>().unwrap_err();
        assert!(err.is_config());
        match err {
            PublishError::UnknownStrategy { name } => assert_eq!(name, "whenmost"),
            other => panic!("expected UnknownStrategy, got {other:?}"),
        }
    }

    #[test]
    fn test_only_no_wait_skips_waiting() {
        for s in PublishStrategy::ALL {
            assert_eq!(s.waits(), s != PublishStrategy::ParallelNoWait);
        }
    }
}

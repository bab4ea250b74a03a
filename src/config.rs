//! # Bus configuration.
//!
//! [`BusConfig`] defines a bus's identity and its default publish strategy.
//! The default strategy applies to every [`publish`](crate::Bus::publish)
//! call; [`publish_with`](crate::Bus::publish_with) overrides it per call.
//!
//! # Example
//! ```
//! use fanout::{Bus, BusConfig, PublishStrategy};
//!
//! let mut cfg = BusConfig::default();
//! cfg.name = Some("orders".into());
//! cfg.strategy = PublishStrategy::ParallelWhenAll;
//!
//! let bus = Bus::with_config(cfg);
//! assert_eq!(bus.name(), "orders");
//! assert_eq!(bus.strategy(), PublishStrategy::ParallelWhenAll);
//! ```

use crate::error::PublishError;
use crate::strategy::PublishStrategy;

/// Configuration for one bus instance.
#[derive(Clone, Debug, Default)]
pub struct BusConfig {
    /// Bus name; auto-generated when `None`.
    pub name: Option<String>,
    /// Default publish strategy for [`publish`](crate::Bus::publish) calls.
    pub strategy: PublishStrategy,
}

impl BusConfig {
    /// Creates a config with the given name and the default strategy.
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: Some(name.into()),
            strategy: PublishStrategy::default(),
        }
    }

    /// Sets the default strategy from its `snake_case` name.
    ///
    /// This is the seam a configuration layer uses; an unrecognized name is
    /// a configuration error, never a silent fallback.
    ///
    /// # Example
    /// ```
    /// use fanout::BusConfig;
    ///
    /// let cfg = BusConfig::default().with_strategy_name("parallel_no_wait").unwrap();
    /// assert!(BusConfig::default().with_strategy_name("whenmost").is_err());
    /// # let _ = cfg;
    /// ```
    pub fn with_strategy_name(mut self, name: &str) -> Result<Self, PublishError> {
        self.strategy = name.parse()?;
        Ok(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_strategy_is_sync_continue() {
        let cfg = BusConfig::default();
        assert_eq!(cfg.strategy, PublishStrategy::SyncContinueOnException);
        assert!(cfg.name.is_none());
    }

    #[test]
    fn test_strategy_name_rejects_unknown() {
        let err = BusConfig::default()
            .with_strategy_name("whenmost")
            .unwrap_err();
        assert!(err.is_config());
    }
}

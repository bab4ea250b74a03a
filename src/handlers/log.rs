//! # Simple logging handler for debugging and demos.
//!
//! [`LogWriter`] prints every message it receives to stdout in a
//! human-readable format. This is primarily useful for development,
//! debugging, and examples.
//!
//! ## Output format
//! ```text
//! [message] Ping { seq: 1 }
//! [message] Ping { seq: 2 }
//! ```
//!
//! ## Example
//! ```no_run
//! # use std::sync::Arc;
//! # use fanout::{Bus, LogWriter};
//! #[derive(Debug)]
//! struct Ping { seq: u64 }
//!
//! let bus = Bus::new();
//! bus.subscribe::<Ping>(Arc::new(LogWriter));
//! // every published Ping will be printed to stdout
//! ```

use std::fmt::Debug;
use std::sync::Arc;

use async_trait::async_trait;
use tokio_util::sync::CancellationToken;

use crate::error::HandlerError;
use crate::handlers::handler::Handle;

/// Simple stdout logging handler.
///
/// Enabled via the `logging` feature. Subscribes to any message type whose
/// payload implements [`Debug`] and prints it.
///
/// Not intended for production use - implement a custom [`Handle`] for
/// structured logging or metrics collection.
pub struct LogWriter;

#[async_trait]
impl<M: Debug + Send + Sync + 'static> Handle<M> for LogWriter {
    async fn call(&self, msg: Arc<M>, _ctx: CancellationToken) -> Result<(), HandlerError> {
        println!("[message] {msg:?}");
        Ok(())
    }

    fn name(&self) -> &str {
        "log_writer"
    }
}

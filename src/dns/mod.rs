//! The dns-scheme resolver.
//!
//! Resolves `host[:port]` targets via asynchronous address lookups, fetches
//! the optional service-config TXT record alongside, and retries failures
//! internally with exponential backoff until torn down.

mod lookup;
mod resolver;

// Re-export public API
pub use lookup::{NameLookup, SystemLookup};
pub use resolver::{DnsResolver, DnsResolverFactory};

use std::time::Duration;

use tokio_retry::strategy::{jitter, ExponentialBackoff};

use crate::config::{BACKOFF_BASE, BACKOFF_FACTOR_MS, BACKOFF_MAX_DELAY_SECS};

/// Creates the retry delay sequence for one run of failed attempts.
///
/// Delays start at one second, double each attempt, cap at
/// `BACKOFF_MAX_DELAY_SECS`, and carry jitter so many clients re-resolving
/// the same dead host do not stampede together. The sequence is unbounded;
/// a failing resolver retries until torn down. A fresh sequence is created
/// after every successful resolution, which is what resets backoff.
pub(crate) fn backoff_strategy() -> impl Iterator<Item = Duration> {
    ExponentialBackoff::from_millis(BACKOFF_BASE)
        .factor(BACKOFF_FACTOR_MS)
        .max_delay(Duration::from_secs(BACKOFF_MAX_DELAY_SECS))
        .map(jitter)
}

//! Configuration constants.
//!
//! Operational parameters for target parsing, DNS lookups, and the retry
//! backoff policy.

use std::time::Duration;

/// Scheme assumed when a target string carries no scheme prefix.
pub const DEFAULT_SCHEME: &str = "dns";

/// Port assumed when a dns target names a host without one.
pub const DEFAULT_PORT: u16 = 443;

/// DNS name prefix under which the service-config TXT record is published.
/// The record for `example.com` lives at `_grpc_config.example.com`.
pub const SERVICE_CONFIG_NAME_PREFIX: &str = "_grpc_config.";

/// Text prefix identifying the service-config TXT record among the records
/// returned for the derived name.
pub const SERVICE_CONFIG_RECORD_PREFIX: &str = "grpc_config=";

/// Timeout applied to each address or TXT lookup.
/// Most queries complete in well under a second; 3s fails fast on
/// unresponsive DNS servers without cutting off slow-but-working ones.
pub const DNS_LOOKUP_TIMEOUT: Duration = Duration::from_secs(3);

// Retry backoff parameters. The delay sequence produced from these is
// 1s, 2s, 4s, ... capped at BACKOFF_MAX_DELAY_SECS, with jitter applied.
/// Exponent base for the backoff sequence (delays double each attempt).
pub const BACKOFF_BASE: u64 = 2;
/// Multiplier in milliseconds; with base 2 the first delay is 1000ms.
pub const BACKOFF_FACTOR_MS: u64 = 500;
/// Maximum backoff delay in seconds.
pub const BACKOFF_MAX_DELAY_SECS: u64 = 120;

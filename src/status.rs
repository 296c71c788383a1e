//! Status codes and the structured error reported through the listener contract.
//!
//! Resolvers never raise errors past their own boundary; every failure is
//! converted to a [`Status`] and delivered through
//! [`ResolverListener::on_error`](crate::ResolverListener::on_error).

use strum_macros::EnumIter as EnumIterMacro;
use thiserror::Error;

/// Code classifying a resolution failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, EnumIterMacro)]
pub enum StatusCode {
    /// Malformed target string. Fatal: surfaced once, never retried.
    InvalidArgument,
    /// Lookup failed or returned no usable result. Transient: the dns
    /// resolver retries these automatically with backoff.
    Unavailable,
    /// Unexpected internal failure.
    Internal,
}

impl StatusCode {
    /// Returns the canonical string form of the code.
    pub fn as_str(&self) -> &'static str {
        match self {
            StatusCode::InvalidArgument => "INVALID_ARGUMENT",
            StatusCode::Unavailable => "UNAVAILABLE",
            StatusCode::Internal => "INTERNAL",
        }
    }
}

impl std::fmt::Display for StatusCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Structured error delivered through the listener contract.
///
/// `details` is human-readable and names the target or host that failed.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{code}: {details}")]
pub struct Status {
    /// Failure classification.
    pub code: StatusCode,
    /// Human-readable description naming the failed target or host.
    pub details: String,
}

impl Status {
    /// Builds an `INVALID_ARGUMENT` status.
    pub fn invalid_argument(details: impl Into<String>) -> Self {
        Status {
            code: StatusCode::InvalidArgument,
            details: details.into(),
        }
    }

    /// Builds an `UNAVAILABLE` status.
    pub fn unavailable(details: impl Into<String>) -> Self {
        Status {
            code: StatusCode::Unavailable,
            details: details.into(),
        }
    }

    /// Builds an `INTERNAL` status.
    pub fn internal(details: impl Into<String>) -> Self {
        Status {
            code: StatusCode::Internal,
            details: details.into(),
        }
    }
}

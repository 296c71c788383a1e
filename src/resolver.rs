//! Resolver and listener contracts.

use crate::address::Address;
use crate::service_config::{ServiceConfig, ServiceConfigOutcome};
use crate::status::Status;

/// Callback surface a resolver reports results to.
///
/// Exactly one of the two callbacks fires per completed resolution attempt:
/// never both, never neither. Implementations must be cheap and non-blocking;
/// they are invoked from the resolver's task.
pub trait ResolverListener: Send + Sync {
    /// A resolution attempt succeeded.
    ///
    /// `addresses` is the complete, fresh backend list (never a delta).
    /// `config` and `config_error` describe the service-config outcome: at
    /// most one is `Some`, and both being `None` means no document was
    /// published. A malformed config never suppresses address delivery.
    fn on_successful_resolution(
        &self,
        addresses: Vec<Address>,
        config: Option<ServiceConfig>,
        config_error: Option<Status>,
    );

    /// A resolution attempt failed.
    ///
    /// `UNAVAILABLE` failures from the dns resolver are transient: the
    /// resolver keeps retrying internally, and the channel should keep
    /// using its last known-good addresses, if any.
    fn on_error(&self, status: Status);
}

/// Stateful handle for one target's ongoing resolution.
///
/// Created by a registry factory, lives for the lifetime of the owning
/// driver, and is reusable: every kind supports repeated
/// `update_resolution()` calls.
pub trait Resolver: Send + Sync {
    /// Requests a fresh resolution pass.
    ///
    /// If an attempt is already in flight the call coalesces with it: no
    /// second lookup is issued and only the in-flight attempt's callback
    /// is delivered. A call made while that callback is being delivered,
    /// including from inside the listener itself, starts one fresh attempt
    /// after the delivery completes.
    fn update_resolution(&self);

    /// Cancels any in-flight lookup and pending retry timer.
    ///
    /// No listener callback fires after tear-down returns; a delivery
    /// already in progress is waited out first. Must not be called from
    /// inside a listener callback.
    fn tear_down(&self);
}

/// Result of one completed resolution attempt.
///
/// Funnelling both paths through [`deliver`] keeps the
/// one-success-or-one-failure contract structural: an attempt produces one
/// outcome value, and that value is dispatched exactly once.
pub(crate) enum AttemptOutcome {
    Success {
        addresses: Vec<Address>,
        config: ServiceConfigOutcome,
    },
    Failure(Status),
}

pub(crate) fn deliver(listener: &dyn ResolverListener, outcome: AttemptOutcome) {
    match outcome {
        AttemptOutcome::Success { addresses, config } => {
            let (config, config_error) = config.into_parts();
            listener.on_successful_resolution(addresses, config, config_error);
        }
        AttemptOutcome::Failure(status) => listener.on_error(status),
    }
}

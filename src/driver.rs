//! Per-channel resolution driver.

use std::sync::Arc;

use log::debug;

use crate::registry::ResolverRegistry;
use crate::resolver::{Resolver, ResolverListener};
use crate::status::Status;
use crate::target::Target;

/// Owns exactly one resolver for the lifetime of one RPC channel.
///
/// The driver is the only caller of the resolver's `update_resolution()`.
/// It relays listener callbacks to the channel unchanged; the channel
/// should treat `on_error` as transient (the dns resolver already retries
/// internally) and keep using its last known-good addresses.
pub struct ResolutionDriver {
    resolver: Result<Box<dyn Resolver>, Status>,
    listener: Arc<dyn ResolverListener>,
    target: String,
    default_authority: String,
}

impl ResolutionDriver {
    /// Creates a driver for `target`, building its resolver from the
    /// process-wide registry.
    ///
    /// If the resolver cannot be created (malformed target, unregistered
    /// scheme) the failure has already been reported through `listener`
    /// synchronously; the driver stores it and replays it on every
    /// subsequent `update_resolution()` call.
    pub fn new(target: &str, listener: Arc<dyn ResolverListener>) -> Self {
        let registry = ResolverRegistry::global();
        let default_authority = Target::parse(target, &registry.schemes())
            .map(|parsed| parsed.path.trim_start_matches('/').to_string())
            .unwrap_or_default();
        let resolver = registry.create_resolver(target, Arc::clone(&listener));
        ResolutionDriver {
            resolver,
            listener,
            target: target.to_string(),
            default_authority,
        }
    }

    /// Requests a fresh resolution pass.
    pub fn update_resolution(&self) {
        match &self.resolver {
            Ok(resolver) => resolver.update_resolution(),
            Err(status) => {
                debug!(
                    "no resolver was created for '{}', replaying creation failure",
                    self.target
                );
                self.listener.on_error(status.clone());
            }
        }
    }

    /// Cancels any in-flight resolution work. No callback fires afterwards.
    pub fn tear_down(&self) {
        if let Ok(resolver) = &self.resolver {
            resolver.tear_down();
        }
    }

    /// The target string this driver was created for.
    pub fn target(&self) -> &str {
        &self.target
    }

    /// The channel's default authority: the path portion of the target.
    pub fn default_authority(&self) -> &str {
        &self.default_authority
    }
}

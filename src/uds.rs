//! The unix-scheme resolver.
//!
//! No network I/O, no retry, no backoff: the socket path is known at parse
//! time, so every `update_resolution()` call simply re-delivers it.

use std::sync::Arc;

use crate::address::Address;
use crate::registry::ResolverFactory;
use crate::resolver::{deliver, AttemptOutcome, Resolver, ResolverListener};
use crate::service_config::ServiceConfigOutcome;
use crate::status::Status;
use crate::target::Target;

/// Factory for the `unix` scheme.
pub struct UdsResolverFactory;

impl ResolverFactory for UdsResolverFactory {
    fn scheme(&self) -> &'static str {
        "unix"
    }

    fn create(
        &self,
        target: &Target,
        listener: Arc<dyn ResolverListener>,
    ) -> Result<Box<dyn Resolver>, Status> {
        // The accepted forms are `unix:PATH` and `unix:///PATH`; anything
        // that parsed with an authority (`unix://host/...`) is neither.
        if !target.authority.is_empty() {
            return Err(Status::invalid_argument(format!(
                "unix target must be unix:PATH or unix:///PATH, got authority '{}'",
                target.authority
            )));
        }
        Ok(Box::new(UdsResolver {
            path: target.path.clone(),
            listener,
        }))
    }
}

/// Resolver for unix-domain socket targets.
///
/// Malformed targets are rejected at parse time, so resolution itself has
/// no failure path and never produces a service config.
pub(crate) struct UdsResolver {
    path: String,
    listener: Arc<dyn ResolverListener>,
}

impl Resolver for UdsResolver {
    fn update_resolution(&self) {
        deliver(
            self.listener.as_ref(),
            AttemptOutcome::Success {
                addresses: vec![Address::Path(self.path.clone())],
                config: ServiceConfigOutcome::Absent,
            },
        );
    }

    fn tear_down(&self) {}
}

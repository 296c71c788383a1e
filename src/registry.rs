//! Scheme-to-factory resolver registry.
//!
//! Process-wide state, written during startup via [`register_all`] (or
//! [`ResolverRegistry::register`] for custom schemes) and read-only
//! afterwards. Registration must complete before any `create_resolver`
//! call; concurrent registration after startup is unsupported.

use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use log::debug;
use once_cell::sync::Lazy;

use crate::dns::DnsResolverFactory;
use crate::resolver::{Resolver, ResolverListener};
use crate::status::Status;
use crate::target::Target;
use crate::uds::UdsResolverFactory;

static GLOBAL_REGISTRY: Lazy<ResolverRegistry> = Lazy::new(ResolverRegistry::new);

/// Builds resolver instances for one scheme.
pub trait ResolverFactory: Send + Sync {
    /// The scheme this factory serves.
    fn scheme(&self) -> &'static str;

    /// Creates a resolver for an already-parsed target.
    ///
    /// # Errors
    ///
    /// Returns a status if the target is unusable for this scheme (e.g. a
    /// malformed port). The registry reports the status through the
    /// listener on the caller's behalf.
    fn create(
        &self,
        target: &Target,
        listener: Arc<dyn ResolverListener>,
    ) -> Result<Box<dyn Resolver>, Status>;
}

/// Process-wide mapping from scheme name to resolver factory.
pub struct ResolverRegistry {
    factories: RwLock<HashMap<String, Arc<dyn ResolverFactory>>>,
}

impl ResolverRegistry {
    fn new() -> Self {
        ResolverRegistry {
            factories: RwLock::new(HashMap::new()),
        }
    }

    /// The process-wide registry instance.
    pub fn global() -> &'static ResolverRegistry {
        &GLOBAL_REGISTRY
    }

    /// Registers a factory for its scheme.
    ///
    /// Idempotent: a scheme that is already registered is left untouched,
    /// so repeated startup registration is harmless.
    pub fn register(&self, factory: Arc<dyn ResolverFactory>) {
        let scheme = factory.scheme().to_string();
        let mut factories = self.factories.write().expect("registry lock poisoned");
        if factories.contains_key(&scheme) {
            debug!("resolver scheme '{scheme}' already registered, keeping existing factory");
            return;
        }
        factories.insert(scheme, factory);
    }

    /// The currently registered schemes.
    pub fn schemes(&self) -> Vec<String> {
        self.factories
            .read()
            .expect("registry lock poisoned")
            .keys()
            .cloned()
            .collect()
    }

    /// Parses `target`, looks up its scheme, and builds a resolver.
    ///
    /// Name-resolution failures are expected, recoverable conditions for a
    /// channel, so every failure here (malformed target, unregistered
    /// scheme, factory rejection) is reported synchronously through
    /// `listener.on_error` as well as returned.
    ///
    /// # Errors
    ///
    /// `INVALID_ARGUMENT` for a malformed target, `UNAVAILABLE` for an
    /// unregistered scheme.
    pub fn create_resolver(
        &self,
        target: &str,
        listener: Arc<dyn ResolverListener>,
    ) -> Result<Box<dyn Resolver>, Status> {
        let parsed = match Target::parse(target, &self.schemes()) {
            Ok(parsed) => parsed,
            Err(status) => {
                listener.on_error(status.clone());
                return Err(status);
            }
        };

        let factory = self
            .factories
            .read()
            .expect("registry lock poisoned")
            .get(&parsed.scheme)
            .cloned();

        let Some(factory) = factory else {
            let status = Status::unavailable(format!(
                "no resolver registered for scheme '{}' of target '{target}'",
                parsed.scheme
            ));
            listener.on_error(status.clone());
            return Err(status);
        };

        match factory.create(&parsed, Arc::clone(&listener)) {
            Ok(resolver) => Ok(resolver),
            Err(status) => {
                listener.on_error(status.clone());
                Err(status)
            }
        }
    }
}

/// Registers every built-in resolver (dns, unix) with the process-wide
/// registry. Idempotent; call once before creating any resolver.
pub fn register_all() {
    let registry = ResolverRegistry::global();
    registry.register(Arc::new(DnsResolverFactory));
    registry.register(Arc::new(UdsResolverFactory));
}

/// Creates a resolver from the process-wide registry.
///
/// See [`ResolverRegistry::create_resolver`].
///
/// # Errors
///
/// Propagates the status also reported through `listener.on_error`.
pub fn create_resolver(
    target: &str,
    listener: Arc<dyn ResolverListener>,
) -> Result<Box<dyn Resolver>, Status> {
    ResolverRegistry::global().create_resolver(target, listener)
}

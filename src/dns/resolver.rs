//! The dns resolver state machine.
//!
//! States: idle, resolving, succeeded/failed. `update_resolution()` starts
//! one attempt; a call arriving while an attempt (or its backoff wait) is
//! in flight coalesces with it, and a call arriving while a result is
//! being delivered queues exactly one follow-up attempt. Failures schedule
//! an internal retry, so a failing resolver keeps re-resolving until torn
//! down.

use std::net::{IpAddr, SocketAddr};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use log::{debug, warn};
use tokio::time::sleep;
use tokio_util::sync::CancellationToken;

use super::backoff_strategy;
use super::lookup::{NameLookup, SystemLookup};
use crate::address::Address;
use crate::config::{BACKOFF_MAX_DELAY_SECS, DEFAULT_PORT};
use crate::registry::ResolverFactory;
use crate::resolver::{deliver, AttemptOutcome, Resolver, ResolverListener};
use crate::service_config::{ServiceConfig, ServiceConfigOutcome};
use crate::status::Status;
use crate::target::Target;

/// Factory for the `dns` scheme.
///
/// Each created resolver gets its own [`SystemLookup`]; nothing is shared
/// between resolver instances, so independent resolvers for the same host
/// resolve independently.
pub struct DnsResolverFactory;

impl ResolverFactory for DnsResolverFactory {
    fn scheme(&self) -> &'static str {
        "dns"
    }

    fn create(
        &self,
        target: &Target,
        listener: Arc<dyn ResolverListener>,
    ) -> Result<Box<dyn Resolver>, Status> {
        // `dns:///host:port` leaves a leading slash on the path.
        let name = target.path.strip_prefix('/').unwrap_or(&target.path);
        let (host, port) = split_host_port(name)?;
        Ok(Box::new(DnsResolver::new(host, port, listener)))
    }
}

/// Resolves one `host:port` target via asynchronous lookups.
///
/// Reusable and re-triggerable: after a result is delivered the next
/// `update_resolution()` call starts a fresh attempt. At most one attempt
/// is in flight at any time.
pub struct DnsResolver {
    host: String,
    port: u16,
    listener: Arc<dyn ResolverListener>,
    lookup: Arc<dyn NameLookup>,
    /// True from the start of an attempt run until the run goes idle after
    /// a success callback. Stays true across failed attempts and their
    /// backoff waits, which is what coalesces `update_resolution()` calls.
    resolving: Arc<AtomicBool>,
    /// Set by `update_resolution()` when a run is already in flight. The
    /// run consumes it after a successful delivery and loops into a fresh
    /// attempt, so a request made during delivery is never lost.
    pending: Arc<AtomicBool>,
    /// Held around every callback delivery. `tear_down()` takes it after
    /// cancelling, so no delivery outlives that call.
    delivery: Arc<Mutex<()>>,
    cancel: CancellationToken,
}

impl DnsResolver {
    /// Creates a resolver backed by the system lookup facility.
    pub fn new(host: String, port: u16, listener: Arc<dyn ResolverListener>) -> Self {
        Self::with_lookup(host, port, listener, Arc::new(SystemLookup::new()))
    }

    /// Creates a resolver backed by a caller-supplied lookup facility.
    pub fn with_lookup(
        host: String,
        port: u16,
        listener: Arc<dyn ResolverListener>,
        lookup: Arc<dyn NameLookup>,
    ) -> Self {
        DnsResolver {
            host,
            port,
            listener,
            lookup,
            resolving: Arc::new(AtomicBool::new(false)),
            pending: Arc::new(AtomicBool::new(false)),
            delivery: Arc::new(Mutex::new(())),
            cancel: CancellationToken::new(),
        }
    }
}

impl Resolver for DnsResolver {
    fn update_resolution(&self) {
        if self.cancel.is_cancelled() {
            return;
        }
        if self.resolving.swap(true, Ordering::AcqRel) {
            // A run is in flight: queue the request with its task.
            self.pending.store(true, Ordering::Release);
            // The run may have gone idle between the two stores; if it
            // did, this request owns a fresh run.
            if self.resolving.swap(true, Ordering::AcqRel) {
                debug!(
                    "resolution of {} already in flight, coalescing request",
                    self.host
                );
                return;
            }
        }

        let host = self.host.clone();
        let port = self.port;
        let listener = Arc::clone(&self.listener);
        let lookup = Arc::clone(&self.lookup);
        let resolving = Arc::clone(&self.resolving);
        let pending = Arc::clone(&self.pending);
        let delivery = Arc::clone(&self.delivery);
        let cancel = self.cancel.clone();
        tokio::spawn(resolve_loop(
            host, port, listener, lookup, resolving, pending, delivery, cancel,
        ));
    }

    fn tear_down(&self) {
        self.cancel.cancel();
        // A delivery already past its cancellation check finishes first;
        // once the lock is acquired no further callback can start.
        drop(self.delivery.lock());
    }
}

impl Drop for DnsResolver {
    fn drop(&mut self) {
        self.cancel.cancel();
    }
}

/// One or more runs of the state machine. A run attempts, and on failure
/// sleeps out the backoff delay and attempts again, until a success is
/// delivered or the resolver is torn down; a request queued during the run
/// rolls straight into another run with fresh backoff. Runs as a single
/// task per resolver, which keeps callback deliveries strictly sequential.
#[allow(clippy::too_many_arguments)]
async fn resolve_loop(
    host: String,
    port: u16,
    listener: Arc<dyn ResolverListener>,
    lookup: Arc<dyn NameLookup>,
    resolving: Arc<AtomicBool>,
    pending: Arc<AtomicBool>,
    delivery: Arc<Mutex<()>>,
    cancel: CancellationToken,
) {
    loop {
        // A request made before this run starts is satisfied by it.
        pending.store(false, Ordering::Release);
        let mut backoff = backoff_strategy();
        loop {
            let outcome = tokio::select! {
                _ = cancel.cancelled() => return,
                outcome = attempt(&host, port, lookup.as_ref()) => outcome,
            };

            let failed = matches!(outcome, AttemptOutcome::Failure(_));
            match &outcome {
                AttemptOutcome::Success { addresses, .. } => {
                    debug!("resolved {} to {} address(es)", host, addresses.len());
                }
                AttemptOutcome::Failure(status) => {
                    warn!("resolution of {host} failed, will retry: {status}");
                }
            }
            {
                let _delivering = delivery.lock().expect("delivery lock poisoned");
                if cancel.is_cancelled() {
                    return;
                }
                deliver(listener.as_ref(), outcome);
            }

            if !failed {
                break;
            }

            let delay = backoff
                .next()
                .unwrap_or(Duration::from_secs(BACKOFF_MAX_DELAY_SECS));
            tokio::select! {
                _ = cancel.cancelled() => return,
                _ = sleep(delay) => {}
            }
        }

        // Success delivered: take a request queued during the run, or go
        // idle. The re-check covers a request that landed between the
        // swap and the store.
        if pending.swap(false, Ordering::AcqRel) {
            continue;
        }
        resolving.store(false, Ordering::Release);
        if pending.load(Ordering::Acquire) && !resolving.swap(true, Ordering::AcqRel) {
            continue;
        }
        return;
    }
}

/// One resolution attempt: the address lookup and the best-effort
/// service-config fetch run concurrently. Config trouble never fails the
/// attempt; it only shapes the success callback's config outcome.
async fn attempt(host: &str, port: u16, lookup: &dyn NameLookup) -> AttemptOutcome {
    // Literal IPs skip DNS entirely.
    if let Ok(ip) = host.parse::<IpAddr>() {
        return AttemptOutcome::Success {
            addresses: vec![Address::Socket(SocketAddr::new(ip, port))],
            config: ServiceConfigOutcome::Absent,
        };
    }

    let (addresses, config) = tokio::join!(
        lookup.lookup_host(host, port),
        lookup.lookup_service_config(host)
    );

    let addresses: Vec<Address> = match addresses {
        Ok(addrs) if !addrs.is_empty() => addrs.into_iter().map(Address::Socket).collect(),
        Ok(_) => {
            return AttemptOutcome::Failure(Status::unavailable(format!(
                "no addresses found for {host}"
            )))
        }
        Err(e) => {
            return AttemptOutcome::Failure(Status::unavailable(format!(
                "failed to resolve {host}: {e}"
            )))
        }
    };

    let config = match config {
        Ok(Some(raw)) => match ServiceConfig::from_json(&raw) {
            Ok(config) => ServiceConfigOutcome::Value(config),
            Err(status) => ServiceConfigOutcome::Invalid(status),
        },
        Ok(None) => ServiceConfigOutcome::Absent,
        Err(e) => {
            debug!("service config lookup for {host} failed: {e}");
            ServiceConfigOutcome::Absent
        }
    };

    AttemptOutcome::Success { addresses, config }
}

/// Splits `host[:port]` into its parts, defaulting the port.
///
/// Accepts bracketed IPv6 forms (`[::1]:50051`, `[::1]`) and bare IPv6
/// literals (`::1`, which contain colons but no port).
fn split_host_port(name: &str) -> Result<(String, u16), Status> {
    let (host, port) = if let Some(rest) = name.strip_prefix('[') {
        let Some((host, after)) = rest.split_once(']') else {
            return Err(Status::invalid_argument(format!(
                "unterminated IPv6 bracket in '{name}'"
            )));
        };
        match after {
            "" => (host.to_string(), DEFAULT_PORT),
            _ => match after.strip_prefix(':') {
                Some(port) => (host.to_string(), parse_port(name, port)?),
                None => {
                    return Err(Status::invalid_argument(format!(
                        "unexpected text after IPv6 bracket in '{name}'"
                    )))
                }
            },
        }
    } else if let Some((host, port)) = name.rsplit_once(':') {
        if host.contains(':') {
            // More than one colon and no brackets: a bare IPv6 literal.
            (name.to_string(), DEFAULT_PORT)
        } else {
            (host.to_string(), parse_port(name, port)?)
        }
    } else {
        (name.to_string(), DEFAULT_PORT)
    };

    if host.is_empty() {
        return Err(Status::invalid_argument(format!(
            "no host in dns target '{name}'"
        )));
    }
    Ok((host, port))
}

fn parse_port(name: &str, port: &str) -> Result<u16, Status> {
    port.parse::<u16>().map_err(|_| {
        Status::invalid_argument(format!("invalid port '{port}' in dns target '{name}'"))
    })
}

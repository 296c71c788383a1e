//! Lookup facilities behind the dns resolver.
//!
//! The resolver itself is generic over [`NameLookup`] so tests can
//! substitute a controllable implementation; production uses
//! [`SystemLookup`].

use anyhow::{anyhow, Result};
use async_trait::async_trait;
use hickory_resolver::config::{ResolverConfig, ResolverOpts};
use hickory_resolver::error::ResolveErrorKind;
use hickory_resolver::TokioAsyncResolver;
use log::warn;
use std::net::SocketAddr;

use crate::config::{
    DNS_LOOKUP_TIMEOUT, SERVICE_CONFIG_NAME_PREFIX, SERVICE_CONFIG_RECORD_PREFIX,
};

/// Address and service-config lookup facility used by [`DnsResolver`].
///
/// Both operations are best-effort views of external systems: the address
/// lookup may return zero addresses, and the service-config fetch may find
/// nothing at all (`Ok(None)`), which is not an error.
///
/// [`DnsResolver`]: super::DnsResolver
#[async_trait]
pub trait NameLookup: Send + Sync {
    /// Forward-resolves `host`, pairing every returned address (IPv4 and
    /// IPv6 alike, none preferred or filtered) with `port`.
    async fn lookup_host(&self, host: &str, port: u16) -> Result<Vec<SocketAddr>>;

    /// Fetches the raw service-config text published for `host`.
    ///
    /// `Ok(None)` means no config is published, which is the common case.
    async fn lookup_service_config(&self, host: &str) -> Result<Option<String>>;
}

/// Production lookup facility.
///
/// Address lookups go through `tokio::net::lookup_host` (the system
/// resolver, so `/etc/hosts` entries such as `localhost` work); the
/// service-config side channel is a TXT query under the derived
/// `_grpc_config.<host>` name via `hickory-resolver`.
pub struct SystemLookup {
    txt_resolver: TokioAsyncResolver,
}

impl SystemLookup {
    /// Creates a lookup facility from the system DNS configuration,
    /// falling back to defaults if `resolv.conf` cannot be read.
    pub fn new() -> Self {
        let txt_resolver = match TokioAsyncResolver::tokio_from_system_conf() {
            Ok(resolver) => resolver,
            Err(e) => {
                warn!("Failed to read system DNS configuration, using defaults: {e}");
                TokioAsyncResolver::tokio(ResolverConfig::default(), ResolverOpts::default())
            }
        };
        SystemLookup { txt_resolver }
    }
}

impl Default for SystemLookup {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl NameLookup for SystemLookup {
    async fn lookup_host(&self, host: &str, port: u16) -> Result<Vec<SocketAddr>> {
        let addrs = tokio::time::timeout(DNS_LOOKUP_TIMEOUT, tokio::net::lookup_host((host, port)))
            .await
            .map_err(|_| anyhow!("address lookup timed out for {host}"))??;
        Ok(addrs.collect())
    }

    async fn lookup_service_config(&self, host: &str) -> Result<Option<String>> {
        let name = format!("{SERVICE_CONFIG_NAME_PREFIX}{host}");
        let lookup =
            match tokio::time::timeout(DNS_LOOKUP_TIMEOUT, self.txt_resolver.txt_lookup(name)).await
            {
                Ok(Ok(lookup)) => lookup,
                Ok(Err(e)) => {
                    // No record is the expected case for services without a config.
                    if matches!(e.kind(), ResolveErrorKind::NoRecordsFound { .. }) {
                        return Ok(None);
                    }
                    return Err(e.into());
                }
                Err(_) => return Err(anyhow!("service config lookup timed out for {host}")),
            };

        for record in lookup.iter() {
            let text = record
                .txt_data()
                .iter()
                .map(|bytes| String::from_utf8_lossy(bytes).to_string())
                .collect::<Vec<String>>()
                .join("");
            if let Some(raw) = text.strip_prefix(SERVICE_CONFIG_RECORD_PREFIX) {
                return Ok(Some(raw.to_string()));
            }
        }
        Ok(None)
    }
}

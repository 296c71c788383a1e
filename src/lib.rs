//! channel_resolver library: name resolution for RPC channel targets
//!
//! This library turns a channel target string (e.g. `dns:///host:port`,
//! `unix:///path`, or a bare `host:port`) into the set of backend addresses
//! the channel should connect to, plus an optional service-config document
//! fetched alongside the addresses.
//!
//! Resolvers are selected by target scheme through a process-wide registry.
//! The built-in `dns` resolver performs asynchronous host lookups with
//! automatic exponential-backoff retry; the built-in `unix` resolver maps a
//! socket path target to a single local address.
//!
//! # Example
//!
//! ```no_run
//! use channel_resolver::{
//!     register_all, Address, ResolutionDriver, ResolverListener, ServiceConfig, Status,
//! };
//! use std::sync::Arc;
//!
//! struct PrintListener;
//!
//! impl ResolverListener for PrintListener {
//!     fn on_successful_resolution(
//!         &self,
//!         addresses: Vec<Address>,
//!         _config: Option<ServiceConfig>,
//!         _config_error: Option<Status>,
//!     ) {
//!         for address in addresses {
//!             println!("backend: {address}");
//!         }
//!     }
//!
//!     fn on_error(&self, status: Status) {
//!         eprintln!("resolution failed: {status}");
//!     }
//! }
//!
//! #[tokio::main]
//! async fn main() {
//!     register_all();
//!     let driver = ResolutionDriver::new("dns:///localhost:50051", Arc::new(PrintListener));
//!     driver.update_resolution();
//!     tokio::time::sleep(std::time::Duration::from_secs(1)).await;
//! }
//! ```
//!
//! # Requirements
//!
//! The `dns` resolver spawns Tokio tasks, so `update_resolution()` must be
//! called from within a Tokio runtime. Call [`register_all`] once at startup
//! before creating any resolver.

#![warn(missing_docs)]

mod address;
mod config;
mod dns;
mod driver;
mod registry;
mod resolver;
mod service_config;
mod status;
mod target;
mod uds;

// Re-export public API
pub use address::Address;
pub use dns::{DnsResolver, NameLookup, SystemLookup};
pub use driver::ResolutionDriver;
pub use registry::{create_resolver, register_all, ResolverFactory, ResolverRegistry};
pub use resolver::{Resolver, ResolverListener};
pub use service_config::{ServiceConfig, ServiceConfigOutcome};
pub use status::{Status, StatusCode};
pub use target::Target;

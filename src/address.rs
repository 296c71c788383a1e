//! Resolved backend addresses.

use std::fmt;
use std::net::SocketAddr;

/// One routable backend endpoint.
///
/// Exactly one of the two forms applies depending on the resolver kind that
/// produced it. The `Display` form is canonical: `host:port` for socket
/// addresses (IPv6 hosts bracketed), the raw path for unix-domain sockets.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Address {
    /// A TCP endpoint produced by the dns resolver.
    Socket(SocketAddr),
    /// A unix-domain socket path, relative or absolute, produced by the
    /// unix resolver.
    Path(String),
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Address::Socket(addr) => write!(f, "{addr}"),
            Address::Path(path) => f.write_str(path),
        }
    }
}

impl From<SocketAddr> for Address {
    fn from(addr: SocketAddr) -> Self {
        Address::Socket(addr)
    }
}

//! Discovery of receivers and media servers
//!
//! The broadcast query itself is performed by an external
//! [`DiscoveryTransport`]. This module turns its raw, noisy responses into a
//! clean list of [`Remote`](crate::types::Remote)s.

pub mod dedup;
mod registry;


pub use dedup::{dedup_remotes, suppress_loopback};
pub use registry::RemoteRegistry;

use std::net::Ipv4Addr;

use async_trait::async_trait;

use crate::rpc::TransportError;
use crate::types::Remote;

/// Service filter answered by receivers
pub const RECEIVER_SERVICE: &str = "nymphcast";

/// Service filter answered by media servers
pub const MEDIA_SERVER_SERVICE: &str = "nymphcast_mediaserver";

/// Default receiver port
pub const RECEIVER_PORT: u16 = 4004;

/// Default media server port
pub const MEDIA_SERVER_PORT: u16 = 4005;

/// One raw answer to a discovery query
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServiceResponse {
    /// Host name of the responder
    pub hostname: String,
    /// IPv4 address as a host-order integer (`0x7F00_0001` is `127.0.0.1`)
    pub ipv4: u32,
    /// IPv6 address as text
    pub ipv6: String,
    /// Service port
    pub port: u16,
}

impl ServiceResponse {
    /// Convert into a `Remote`
    #[must_use]
    pub fn to_remote(&self) -> Remote {
        Remote {
            name: self.hostname.clone(),
            ipv4: Ipv4Addr::from(self.ipv4).to_string(),
            ipv6: self.ipv6.clone(),
            port: self.port,
        }
    }
}

/// External broadcast query mechanism
#[async_trait]
pub trait DiscoveryTransport: Send + Sync {
    /// Send one "query all" request tagged with `filter` on `port` and
    /// collect every response received within the transport's window,
    /// in arrival order.
    async fn query(&self, filter: &str, port: u16) -> Result<Vec<ServiceResponse>, TransportError>;
}

/// Kinds of services the client looks for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ServiceKind {
    /// Media receivers
    Receiver,
    /// Media servers
    MediaServer,
}

impl ServiceKind {
    /// Query filter for this kind
    #[must_use]
    pub fn filter(self) -> &'static str {
        match self {
            Self::Receiver => RECEIVER_SERVICE,
            Self::MediaServer => MEDIA_SERVER_SERVICE,
        }
    }

    /// Whether loopback answers are dropped in favor of routable ones
    #[must_use]
    pub fn suppresses_loopback(self) -> bool {
        matches!(self, Self::Receiver)
    }

    /// Kind matching a query filter, if any
    #[must_use]
    pub fn from_filter(filter: &str) -> Option<Self> {
        match filter {
            RECEIVER_SERVICE => Some(Self::Receiver),
            MEDIA_SERVER_SERVICE => Some(Self::MediaServer),
            _ => None,
        }
    }
}

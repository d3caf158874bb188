use std::net::Ipv4Addr;

use serde::{Deserialize, Serialize};

use crate::rpc::RpcValue;

/// A receiver or media server found on the network
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Remote {
    /// Host name reported by the remote
    pub name: String,

    /// IPv4 address in dotted-decimal form
    pub ipv4: String,

    /// IPv6 address, empty if none was reported
    pub ipv6: String,

    /// Service port
    pub port: u16,
}

impl Remote {
    /// Create a new remote
    pub fn new(
        name: impl Into<String>,
        ipv4: impl Into<String>,
        ipv6: impl Into<String>,
        port: u16,
    ) -> Self {
        Self {
            name: name.into(),
            ipv4: ipv4.into(),
            ipv6: ipv6.into(),
            port,
        }
    }

    /// Whether the IPv4 address is a loopback address
    #[must_use]
    pub fn is_loopback(&self) -> bool {
        self.ipv4
            .parse::<Ipv4Addr>()
            .is_ok_and(|addr| addr.is_loopback())
    }

    /// Whether `other` names the same service, ignoring addresses
    #[must_use]
    pub fn same_service(&self, other: &Remote) -> bool {
        self.name == other.name && self.port == other.port
    }

    /// `ipv4:port`
    #[must_use]
    pub fn address(&self) -> String {
        format!("{}:{}", self.ipv4, self.port)
    }

    /// Encode as the `{name, ipv4, ipv6}` record receivers and media
    /// servers expect in receiver lists
    #[must_use]
    pub fn to_rpc(&self) -> RpcValue {
        RpcValue::structure([
            ("name", RpcValue::from(self.name.as_str())),
            ("ipv4", RpcValue::from(self.ipv4.as_str())),
            ("ipv6", RpcValue::from(self.ipv6.as_str())),
        ])
    }
}

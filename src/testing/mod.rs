//! Recording fakes of the external transports
//!
//! Used by the crate's own tests and available to applications that want
//! to exercise their control flow without a receiver on the network.

mod mock_discovery;
mod mock_transport;
#[cfg(test)]
mod tests;

pub use mock_discovery::MockDiscovery;
pub use mock_transport::{MockTransport, RecordedCall};

use crate::discovery::ServiceResponse;

/// Helper to build a raw discovery answer from a dotted-decimal address.
///
/// An unparsable address maps to `0.0.0.0`.
#[must_use]
pub fn service_response(hostname: &str, ipv4: &str, port: u16) -> ServiceResponse {
    let addr: std::net::Ipv4Addr = ipv4.parse().unwrap_or(std::net::Ipv4Addr::UNSPECIFIED);
    ServiceResponse {
        hostname: hostname.to_string(),
        ipv4: u32::from(addr),
        ipv6: String::new(),
        port,
    }
}

//! Common test utilities and fixtures
#![allow(dead_code)]

use std::sync::{Arc, Once};
use std::time::Duration;

use nymphcast_client::testing::{MockDiscovery, MockTransport};
use nymphcast_client::{ClientConfig, NymphCastClient};
use tracing_subscriber::{EnvFilter, fmt};

static INIT: Once = Once::new();

/// Initialize test logging (call once per test module)
pub fn init_logging() {
    INIT.call_once(|| {
        let filter = EnvFilter::from_default_env()
            .add_directive("nymphcast_client=debug".parse().unwrap());

        fmt().with_env_filter(filter).with_test_writer().init();
    });
}

/// Create a test configuration with a short call timeout
pub fn test_config() -> ClientConfig {
    ClientConfig::builder()
        .client_id("integration-test")
        .rpc_timeout(Duration::from_millis(500))
        .build()
}

/// A client wired to fresh mocks
pub fn mock_client() -> (NymphCastClient, Arc<MockTransport>, Arc<MockDiscovery>) {
    let transport = Arc::new(MockTransport::new());
    let discovery = Arc::new(MockDiscovery::new());
    let client = NymphCastClient::new(test_config(), transport.clone(), discovery.clone());
    (client, transport, discovery)
}

use std::time::Duration;

/// Configuration for `NymphCast` client behavior
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Identifier sent with `connect` (default: `NymphClient_21xb`)
    pub client_id: String,

    /// Timeout for each RPC call (default: 2 seconds)
    pub rpc_timeout: Duration,

    /// Host used when `connect_server` is given an empty host (default: `127.0.0.1`)
    pub default_host: String,

    /// Receiver port, used for discovery and as the default connect port (default: 4004)
    pub receiver_port: u16,

    /// Media server discovery port (default: 4005)
    pub media_server_port: u16,

    /// Block size served when the receiver does not ask for one, in KiB (default: 200)
    pub default_block_kib: u32,

    /// Largest block served to a receiver, in KiB (default: 16384)
    pub max_block_kib: u32,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            client_id: "NymphClient_21xb".to_string(),
            rpc_timeout: Duration::from_secs(2),
            default_host: "127.0.0.1".to_string(),
            receiver_port: crate::discovery::RECEIVER_PORT,
            media_server_port: crate::discovery::MEDIA_SERVER_PORT,
            default_block_kib: 200,
            max_block_kib: 16 * 1024,
        }
    }
}

impl ClientConfig {
    /// Create a new config builder
    #[must_use]
    pub fn builder() -> ClientConfigBuilder {
        ClientConfigBuilder::default()
    }

    /// Default block size in bytes
    #[must_use]
    pub fn default_block_size(&self) -> usize {
        (self.default_block_kib as usize).saturating_mul(1024)
    }

    /// Largest block served, in bytes
    #[must_use]
    pub fn max_block_size(&self) -> usize {
        (self.max_block_kib as usize).saturating_mul(1024)
    }
}

/// Builder for `ClientConfig`
#[derive(Debug, Clone, Default)]
pub struct ClientConfigBuilder {
    config: ClientConfig,
}

impl ClientConfigBuilder {
    /// Set the client identifier
    #[must_use]
    pub fn client_id(mut self, id: impl Into<String>) -> Self {
        self.config.client_id = id.into();
        self
    }

    /// Set the RPC call timeout
    #[must_use]
    pub fn rpc_timeout(mut self, timeout: Duration) -> Self {
        self.config.rpc_timeout = timeout;
        self
    }

    /// Set the fallback host for `connect_server`
    #[must_use]
    pub fn default_host(mut self, host: impl Into<String>) -> Self {
        self.config.default_host = host.into();
        self
    }

    /// Set the receiver port
    #[must_use]
    pub fn receiver_port(mut self, port: u16) -> Self {
        self.config.receiver_port = port;
        self
    }

    /// Set the media server discovery port
    #[must_use]
    pub fn media_server_port(mut self, port: u16) -> Self {
        self.config.media_server_port = port;
        self
    }

    /// Set the default block size in KiB (0 keeps the current value)
    #[must_use]
    pub fn default_block_kib(mut self, kib: u32) -> Self {
        if kib > 0 {
            self.config.default_block_kib = kib;
        }
        self
    }

    /// Set the largest block served in KiB (0 keeps the current value)
    #[must_use]
    pub fn max_block_kib(mut self, kib: u32) -> Self {
        if kib > 0 {
            self.config.max_block_kib = kib;
        }
        self
    }

    /// Build the configuration
    #[must_use]
    pub fn build(self) -> ClientConfig {
        self.config
    }
}

//! Boundary traits for the external RPC transport

use std::fmt;
use std::sync::Arc;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use super::RpcValue;

/// Opaque identifier of one connection to a remote
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct SessionHandle(pub u32);

impl fmt::Display for SessionHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Diagnostic returned by the transport when a call does not complete
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransportError {
    /// Transport-provided message
    pub message: String,
}

impl TransportError {
    /// Create a new transport error
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

impl fmt::Display for TransportError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)
    }
}

impl std::error::Error for TransportError {}

/// Asynchronous request/response channel to remotes
///
/// Implementations must serialize dispatch of [`SessionCallbacks`] for a
/// single session. Callbacks of different sessions may run concurrently.
#[async_trait]
pub trait RpcTransport: Send + Sync {
    /// Open a connection to `host:port`
    ///
    /// A failed connect leaves no session behind, so callers have nothing to
    /// disconnect.
    async fn connect(&self, host: &str, port: u16) -> Result<SessionHandle, TransportError>;

    /// Call a named remote method and wait for its result
    async fn call(
        &self,
        session: SessionHandle,
        method: &str,
        args: Vec<RpcValue>,
    ) -> Result<RpcValue, TransportError>;

    /// Close the connection
    async fn disconnect(&self, session: SessionHandle) -> Result<(), TransportError>;

    /// Route receiver-initiated callbacks for `session` to `callbacks`
    fn register_callbacks(&self, session: SessionHandle, callbacks: Arc<dyn SessionCallbacks>);

    /// Stop routing callbacks for `session`
    fn remove_callbacks(&self, session: SessionHandle);
}

/// Callback table invoked by the transport on behalf of a receiver
#[async_trait]
pub trait SessionCallbacks: Send + Sync {
    /// The receiver wants the next block of the source.
    /// `block_kib` is in 1024-byte units; `None` or `Some(0)` means default.
    async fn on_read(&self, session: SessionHandle, block_kib: Option<u32>);

    /// The receiver wants the source repositioned to an absolute byte offset,
    /// followed by one block of data.
    async fn on_seek(&self, session: SessionHandle, position: u64, block_kib: Option<u32>);

    /// The receiver stopped playback of the streamed source
    async fn on_stop(&self, session: SessionHandle);

    /// The receiver pushed a playback status record
    async fn on_status(&self, session: SessionHandle, status: &RpcValue);

    /// A receiver-hosted application sent a message
    async fn on_app_message(&self, session: SessionHandle, app_id: &str, message: &str);
}

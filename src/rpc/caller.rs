//! Synchronous-style request/response over the RPC transport

use std::sync::Arc;
use std::time::Duration;

use super::{RpcTransport, RpcValue, SessionHandle, TransportError};
use crate::error::NymphCastError;

/// Request/response facade shared by every control operation
///
/// A call that does not complete (transport error or timeout) is fatal to
/// its session: the session is disconnected once and the error is returned.
/// Nothing is retried.
#[derive(Clone)]
pub struct RpcCaller {
    transport: Arc<dyn RpcTransport>,
    timeout: Duration,
}

impl RpcCaller {
    /// Create a new caller
    #[must_use]
    pub fn new(transport: Arc<dyn RpcTransport>, timeout: Duration) -> Self {
        Self { transport, timeout }
    }

    /// The underlying transport
    #[must_use]
    pub fn transport(&self) -> &Arc<dyn RpcTransport> {
        &self.transport
    }

    /// Timeout applied to each call
    #[must_use]
    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Open a connection to a remote
    ///
    /// # Errors
    ///
    /// Returns `ConnectionFailed` if the transport cannot connect in time.
    pub async fn connect(&self, host: &str, port: u16) -> Result<SessionHandle, NymphCastError> {
        let result = tokio::time::timeout(self.timeout, self.transport.connect(host, port))
            .await
            .unwrap_or_else(|_| Err(self.timed_out()));

        result.map_err(|e| {
            tracing::warn!("Connecting to {}:{} failed: {}", host, port, e);
            NymphCastError::ConnectionFailed {
                address: format!("{host}:{port}"),
                message: e.message,
            }
        })
    }

    /// Call a remote method
    ///
    /// # Errors
    ///
    /// Returns `Transport` if the call does not complete. The session is
    /// disconnected before returning.
    pub async fn call(
        &self,
        session: SessionHandle,
        method: &str,
        args: Vec<RpcValue>,
    ) -> Result<RpcValue, NymphCastError> {
        tracing::trace!("Calling '{}' on session {}", method, session);

        let result = tokio::time::timeout(self.timeout, self.transport.call(session, method, args))
            .await
            .unwrap_or_else(|_| Err(self.timed_out()));

        match result {
            Ok(value) => Ok(value),
            Err(e) => {
                tracing::warn!("Error calling remote method '{}': {}", method, e);
                self.close(session).await;
                Err(NymphCastError::Transport {
                    method: method.to_string(),
                    message: e.message,
                })
            }
        }
    }

    /// Call a remote method that answers with a single-byte result code
    ///
    /// # Errors
    ///
    /// Returns `Transport` if the call fails, `ProtocolMismatch` if the
    /// result is not a `u8`.
    pub async fn call_code(
        &self,
        session: SessionHandle,
        method: &str,
        args: Vec<RpcValue>,
    ) -> Result<u8, NymphCastError> {
        let value = self.call(session, method, args).await?;
        value
            .as_u8()
            .ok_or_else(|| NymphCastError::ProtocolMismatch {
                method: method.to_string(),
                detail: format!("expected u8 result code, got {value:?}"),
            })
    }

    /// Call a remote method whose result code must be zero
    ///
    /// # Errors
    ///
    /// As [`Self::call_code`], plus `Rejected` for a non-zero code.
    pub async fn call_checked(
        &self,
        session: SessionHandle,
        method: &str,
        args: Vec<RpcValue>,
    ) -> Result<(), NymphCastError> {
        match self.call_code(session, method, args).await? {
            0 => Ok(()),
            code => Err(NymphCastError::Rejected {
                method: method.to_string(),
                code,
            }),
        }
    }

    /// Call a remote method that answers with a string
    ///
    /// # Errors
    ///
    /// Returns `Transport` if the call fails, `ProtocolMismatch` if the
    /// result is not a string.
    pub async fn call_string(
        &self,
        session: SessionHandle,
        method: &str,
        args: Vec<RpcValue>,
    ) -> Result<String, NymphCastError> {
        match self.call(session, method, args).await? {
            RpcValue::String(s) => Ok(s),
            other => Err(NymphCastError::ProtocolMismatch {
                method: method.to_string(),
                detail: format!("expected string, got {other:?}"),
            }),
        }
    }

    /// Close the transport connection, logging any failure
    pub async fn close(&self, session: SessionHandle) {
        if let Err(e) = self.transport.disconnect(session).await {
            tracing::debug!("Disconnecting session {} failed: {}", session, e);
        }
    }

    fn timed_out(&self) -> TransportError {
        TransportError::new(format!("timed out after {:?}", self.timeout))
    }
}

use std::io;
use thiserror::Error;

use crate::rpc::SessionHandle;

/// Errors that can occur while controlling `NymphCast` remotes
#[derive(Debug, Error)]
pub enum NymphCastError {
    // ===== Transport Errors =====
    /// An RPC call did not complete. The affected session has already been
    /// disconnected when this is returned.
    #[error("call to '{method}' failed: {message}")]
    Transport {
        /// The remote method that was being called
        method: String,
        /// Diagnostic message from the transport
        message: String,
    },

    /// Connecting to a remote failed
    #[error("connection failed to {address}: {message}")]
    ConnectionFailed {
        /// `host:port` of the remote
        address: String,
        /// Diagnostic message from the transport
        message: String,
    },

    /// No live session exists for the handle
    #[error("no session for handle {handle}")]
    NotConnected {
        /// The unknown handle
        handle: SessionHandle,
    },

    // ===== Protocol Errors =====
    /// A structured response is missing an expected field or has the wrong type
    #[error("protocol mismatch in '{method}': {detail}")]
    ProtocolMismatch {
        /// The remote method whose response was malformed
        method: String,
        /// What was missing or mistyped
        detail: String,
    },

    /// The remote answered with a non-zero result code
    #[error("'{method}' rejected with code {code}")]
    Rejected {
        /// The remote method
        method: String,
        /// Result code returned by the remote
        code: u8,
    },

    // ===== Precondition Errors =====
    /// Invalid parameter provided
    #[error("invalid parameter: {name} - {message}")]
    InvalidParameter {
        /// The name of the parameter
        name: String,
        /// Description of the error
        message: String,
    },

    /// The file to cast does not exist
    #[error("file not found: {path}")]
    FileNotFound {
        /// The path that was checked
        path: String,
    },

    // ===== Discovery Errors =====
    /// The discovery query could not be sent or collected
    #[error("discovery failed: {message}")]
    Discovery {
        /// Description of the failure
        message: String,
    },

    // ===== I/O Errors =====
    /// Local file I/O error
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
}

impl NymphCastError {
    /// Check if the session this error came from has been torn down
    #[must_use]
    pub fn is_session_fatal(&self) -> bool {
        matches!(self, Self::Transport { .. } | Self::ConnectionFailed { .. })
    }

    /// Check if this error was raised before any network activity
    #[must_use]
    pub fn is_precondition(&self) -> bool {
        matches!(
            self,
            Self::InvalidParameter { .. } | Self::FileNotFound { .. }
        )
    }

    pub(crate) fn missing_field(method: &str, field: &str) -> Self {
        Self::ProtocolMismatch {
            method: method.to_string(),
            detail: format!("missing or mistyped field '{field}'"),
        }
    }
}

/// Result type alias for `NymphCast` operations
pub type Result<T> = std::result::Result<T, NymphCastError>;

//! # nymphcast-client
//!
//! A Rust library for controlling `NymphCast` receivers and media servers.
//!
//! ## Features
//!
//! - Discovery of receivers and media servers with duplicate cleanup
//! - Pull-based streaming of local files to a receiver
//! - Volume, playback and stream control
//! - Multi-room playback with one master and mirroring slaves
//! - Status and application message notifications
//!
//! ## Example
//!
//! ```rust,no_run
//! use std::sync::Arc;
//!
//! use nymphcast_client::{ClientConfig, NymphCastClient, RpcTransport, DiscoveryTransport};
//!
//! # async fn example(
//! #     rpc: Arc<dyn RpcTransport>,
//! #     discovery: Arc<dyn DiscoveryTransport>,
//! # ) -> Result<(), nymphcast_client::NymphCastError> {
//! let client = NymphCastClient::new(ClientConfig::default(), rpc, discovery);
//!
//! let receivers = client.find_servers().await;
//! if let Some(receiver) = receivers.first() {
//!     let handle = client.connect_server(&receiver.ipv4, receiver.port).await?;
//!     client.cast_file(handle, "movie.mkv").await?;
//! }
//! # Ok(())
//! # }
//! ```
//!
//! # Architecture
//!
//! The wire protocol and the broadcast discovery query live outside this
//! crate, behind [`RpcTransport`] and [`DiscoveryTransport`]:
//!
//! - **High-level**: [`NymphCastClient`] - every control operation
//! - **Mid-level**: [`RemoteRegistry`], [`GroupCoordinator`],
//!   [`StreamingSession`], [`StatusBridge`]
//! - **Low-level**: [`RpcCaller`] - timed calls that tear failed sessions down

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

// Public modules
/// Error types
pub mod error;
/// Core types
pub mod types;

/// Testing utilities
pub mod testing;

pub mod client;
pub mod control;
pub mod discovery;
pub mod events;
pub mod group;
pub mod rpc;
pub mod streaming;

// Re-exports
pub use client::NymphCastClient;
pub use control::{PlaybackCommand, SeekRequest, StreamCycle, Volume};
pub use discovery::{DiscoveryTransport, RemoteRegistry, ServiceKind, ServiceResponse};
pub use error::{NymphCastError, Result};
pub use events::StatusBridge;
pub use group::{GroupCoordinator, PlaybackGroup, ShareResult};
pub use rpc::{RpcCaller, RpcTransport, RpcValue, SessionCallbacks, SessionHandle, TransportError};
pub use streaming::{DataBlock, MediaSource, SessionState, StreamingSession};
pub use types::{
    ClientConfig, ClientConfigBuilder, MediaFile, MediaFileType, PlaybackStatus, Remote,
    RemoteStatus,
};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Prelude for common imports
///
/// Convenient re-exports
pub mod prelude {
    pub use crate::{
        ClientConfig, MediaFile, NymphCastClient, NymphCastError, PlaybackStatus, Remote,
        SeekRequest, SessionHandle, ShareResult, Volume,
    };
}

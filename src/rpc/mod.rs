//! RPC facade over the external transport
//!
//! The transport itself (connection lifetime, dispatch, wire format) lives
//! outside this crate and is reached through [`RpcTransport`]. Every control
//! operation goes through [`RpcCaller`], which applies the call timeout and
//! tears the session down when a call does not complete.

mod caller;
mod transport;
mod value;

#[cfg(test)]
mod tests;

pub use caller::RpcCaller;
pub use transport::{RpcTransport, SessionCallbacks, SessionHandle, TransportError};
pub use value::RpcValue;

//! Multi-room group playback

use crate::error::NymphCastError;
use crate::rpc::{RpcCaller, RpcValue, SessionHandle};
use crate::types::{MediaFile, Remote};

/// Outcome of a `playMedia` request to a media server
///
/// The raw code is kept so callers can tell a stale share list (re-fetch
/// with `get_shares` and retry) from a hard failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShareResult {
    /// Playback was set up (code 0)
    Success,
    /// The server no longer knows the file id (code 1)
    StaleShareList,
    /// Any other code
    Failure(u8),
}

impl ShareResult {
    /// Decode a `playMedia` result code
    #[must_use]
    pub fn from_code(code: u8) -> Self {
        match code {
            0 => Self::Success,
            1 => Self::StaleShareList,
            other => Self::Failure(other),
        }
    }

    /// The raw result code
    #[must_use]
    pub fn code(self) -> u8 {
        match self {
            Self::Success => 0,
            Self::StaleShareList => 1,
            Self::Failure(code) => code,
        }
    }

    /// Check for success
    #[must_use]
    pub fn is_success(self) -> bool {
        self == Self::Success
    }
}

/// Encode remotes as the receiver list sent with `playMedia` and
/// `session_add_slave`
#[must_use]
pub fn encode_receivers(remotes: &[Remote]) -> RpcValue {
    RpcValue::Array(remotes.iter().map(Remote::to_rpc).collect())
}

/// An ordered set of receivers playing together
///
/// The first member is the master, which owns the stream and drives timing.
/// The others are slaves mirroring its status.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlaybackGroup {
    members: Vec<Remote>,
}

impl PlaybackGroup {
    /// Create a group with a master and no slaves
    #[must_use]
    pub fn new(master: Remote) -> Self {
        Self {
            members: vec![master],
        }
    }

    /// Build from an ordered receiver list; the first entry is the master
    ///
    /// Returns `None` for an empty list. Entries are kept as given,
    /// duplicates included; use [`PlaybackGroup::add_slave`] to build a
    /// group without repeats.
    #[must_use]
    pub fn from_receivers(receivers: Vec<Remote>) -> Option<Self> {
        if receivers.is_empty() {
            return None;
        }
        Some(Self { members: receivers })
    }

    /// The master receiver
    #[must_use]
    pub fn master(&self) -> &Remote {
        &self.members[0]
    }

    /// The slave receivers
    #[must_use]
    pub fn slaves(&self) -> &[Remote] {
        &self.members[1..]
    }

    /// Master followed by slaves
    #[must_use]
    pub fn members(&self) -> &[Remote] {
        &self.members
    }

    /// Add a slave. Returns false if the receiver is already a member.
    pub fn add_slave(&mut self, remote: Remote) -> bool {
        if self.members.iter().any(|m| m.same_service(&remote)) {
            return false;
        }
        self.members.push(remote);
        true
    }

    /// Remove a slave by service identity. The master cannot be removed.
    pub fn remove_slave(&mut self, remote: &Remote) -> Option<Remote> {
        let pos = self.members[1..]
            .iter()
            .position(|m| m.same_service(remote))?;
        Some(self.members.remove(pos + 1))
    }

    /// Number of members including the master
    #[must_use]
    pub fn len(&self) -> usize {
        self.members.len()
    }

    /// Always false; a group has at least its master
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }
}

/// Sends group playback requests to media servers and receivers
#[derive(Clone)]
pub struct GroupCoordinator {
    caller: RpcCaller,
}

impl GroupCoordinator {
    /// Create a coordinator over an RPC caller
    #[must_use]
    pub fn new(caller: RpcCaller) -> Self {
        Self { caller }
    }

    /// Ask the file's media server to play it on `group`
    ///
    /// One `playMedia` call carries the file id and every member, master
    /// first. The server sets up playback on the master and configures it to
    /// mirror to the slaves. The connection to the server only lives for
    /// this call.
    ///
    /// # Errors
    ///
    /// Returns `ConnectionFailed`/`Transport` if the server cannot be
    /// reached, `ProtocolMismatch` if it does not answer with a code.
    pub async fn play_share(&self, file: &MediaFile, group: &PlaybackGroup) -> Result<ShareResult, NymphCastError> {
        let server = &file.media_server;
        let handle = self.caller.connect(&server.ipv4, server.port).await?;

        tracing::info!(
            "Playing '{}' from {} on master {} with {} slave(s)",
            file.name,
            server.name,
            group.master().name,
            group.slaves().len()
        );

        let args = vec![RpcValue::U32(file.id), encode_receivers(group.members())];
        let code = self.caller.call_code(handle, "playMedia", args).await;
        if !matches!(code, Err(NymphCastError::Transport { .. })) {
            self.caller.close(handle).await;
        }

        Ok(ShareResult::from_code(code?))
    }

    /// Ask a connected receiver to play a file from its own share
    ///
    /// # Errors
    ///
    /// Returns `Transport` on call failure, `Rejected` for a non-zero code.
    pub async fn play_receiver_share(&self, handle: SessionHandle, file: &MediaFile) -> Result<(), NymphCastError> {
        self.caller
            .call_checked(handle, "playMedia", vec![RpcValue::U32(file.id)])
            .await
    }

    /// Replace the slaves a playing master mirrors its status to
    ///
    /// # Errors
    ///
    /// Returns `Transport` on call failure, `Rejected` for a non-zero code.
    pub async fn add_slaves(&self, handle: SessionHandle, slaves: &[Remote]) -> Result<(), NymphCastError> {
        self.caller
            .call_checked(handle, "session_add_slave", vec![encode_receivers(slaves)])
            .await
    }
}

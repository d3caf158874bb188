//! Streaming session state machine

use std::io;

use tokio::sync::Mutex;

use super::{DataBlock, MediaSource, OpenSource};
use crate::rpc::SessionHandle;

/// Largest block served unless configured otherwise (16 MiB)
pub const DEFAULT_MAX_BLOCK_SIZE: usize = 16 * 1024 * 1024;

/// Lifecycle of a streaming session
///
/// `Idle -> Started -> Serving <-> Seeking -> Stopped`. A stopped session
/// returns to `Started` when a new source is cast.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SessionState {
    /// Connected, nothing cast yet
    #[default]
    Idle,
    /// Source open, receiver told to start
    Started,
    /// Receiver is pulling data
    Serving,
    /// Repositioning the source
    Seeking,
    /// Receiver stopped, or the controller disconnected
    Stopped,
}

impl SessionState {
    /// Whether a source is expected to be open
    #[must_use]
    pub fn is_active(self) -> bool {
        matches!(self, Self::Started | Self::Serving | Self::Seeking)
    }
}

struct Inner {
    state: SessionState,
    source: Option<OpenSource>,
}

/// Serves one receiver's read and seek requests from one open source
///
/// All requests take the session lock, so reads and seeks of a session are
/// strictly ordered even if the transport dispatches them concurrently.
pub struct StreamingSession {
    handle: SessionHandle,
    default_block_size: usize,
    max_block_size: usize,
    inner: Mutex<Inner>,
}

impl StreamingSession {
    /// Create an idle session
    #[must_use]
    pub fn new(handle: SessionHandle, default_block_size: usize) -> Self {
        Self {
            handle,
            default_block_size,
            max_block_size: DEFAULT_MAX_BLOCK_SIZE,
            inner: Mutex::new(Inner {
                state: SessionState::Idle,
                source: None,
            }),
        }
    }

    /// Cap the block size a receiver may ask for, in bytes
    #[must_use]
    pub fn with_max_block_size(mut self, max_block_size: usize) -> Self {
        self.max_block_size = max_block_size.max(1);
        self
    }

    /// Handle of the receiver connection
    #[must_use]
    pub fn handle(&self) -> SessionHandle {
        self.handle
    }

    /// Current state
    pub async fn state(&self) -> SessionState {
        self.inner.lock().await.state
    }

    /// Whether a source is open
    pub async fn has_source(&self) -> bool {
        self.inner.lock().await.source.is_some()
    }

    /// Offset of the open source, if any
    pub async fn offset(&self) -> Option<u64> {
        self.inner.lock().await.source.as_ref().map(OpenSource::offset)
    }

    /// Block size in bytes for a request of `block_kib` KiB
    ///
    /// Requests above the session's maximum are served at the maximum.
    #[must_use]
    pub fn block_size(&self, block_kib: Option<u32>) -> usize {
        let requested = match block_kib {
            Some(kib) if kib > 0 => (kib as usize).checked_mul(1024),
            _ => Some(self.default_block_size),
        };
        requested.map_or(self.max_block_size, |len| len.min(self.max_block_size))
    }

    /// Install a new source, closing any previous one
    pub async fn open(&self, source: Box<dyn MediaSource>, size: u64) {
        let mut inner = self.inner.lock().await;
        if inner.source.take().is_some() {
            tracing::debug!("Closing previous source of session {}", self.handle);
        }
        inner.source = Some(OpenSource::new(source, size));
        inner.state = SessionState::Started;
    }

    /// Serve one block from the current offset
    ///
    /// Without an open source this answers an empty end-of-file block.
    ///
    /// # Errors
    ///
    /// Returns an error if reading the source fails.
    pub async fn read(&self, block_kib: Option<u32>) -> io::Result<DataBlock> {
        let len = self.block_size(block_kib);
        let mut inner = self.inner.lock().await;

        let Some(source) = inner.source.as_mut() else {
            tracing::debug!("Read on session {} without a source", self.handle);
            return Ok(DataBlock::end());
        };

        let block = source.read_block(len)?;
        tracing::debug!(
            "Read block with size {} bytes (eof: {}) for session {}",
            block.data.len(),
            block.eof,
            self.handle
        );
        inner.state = SessionState::Serving;
        Ok(block)
    }

    /// Reposition to `position` bytes from the start, then serve one block
    ///
    /// # Errors
    ///
    /// Returns an error if seeking or reading the source fails.
    pub async fn seek(&self, position: u64, block_kib: Option<u32>) -> io::Result<DataBlock> {
        let len = self.block_size(block_kib);
        let mut inner = self.inner.lock().await;

        if inner.source.is_none() {
            tracing::debug!("Seek on session {} without a source", self.handle);
            return Ok(DataBlock::end());
        }

        inner.state = SessionState::Seeking;
        tracing::debug!("Seeking session {} to position {}", self.handle, position);

        let result = match inner.source.as_mut() {
            Some(source) => source.seek_to(position).and_then(|()| source.read_block(len)),
            None => Ok(DataBlock::end()),
        };
        inner.state = SessionState::Serving;
        result
    }

    /// Close the source and mark the session stopped
    pub async fn stop(&self) {
        let mut inner = self.inner.lock().await;
        inner.source = None;
        inner.state = SessionState::Stopped;
    }

    /// Close the source after a failed start, returning to `Idle`
    pub async fn reset(&self) {
        let mut inner = self.inner.lock().await;
        inner.source = None;
        inner.state = SessionState::Idle;
    }
}

//! Callback table the transport invokes for receiver-initiated requests

use std::sync::Weak;

use async_trait::async_trait;

use super::Shared;
use crate::rpc::{RpcValue, SessionCallbacks, SessionHandle};
use crate::streaming::DataBlock;

/// Serves data pulls and relays events for the sessions of one client
///
/// Holds the client weakly; once the client is dropped every callback is a
/// no-op.
pub(super) struct SessionEndpoint {
    shared: Weak<Shared>,
}

impl SessionEndpoint {
    pub(super) fn new(shared: Weak<Shared>) -> Self {
        Self { shared }
    }

    async fn send_block(shared: &Shared, session: SessionHandle, block: DataBlock) {
        let args = vec![RpcValue::Blob(block.data), RpcValue::Bool(block.eof)];
        let result = shared.caller.call(session, "session_data", args).await;
        if shared.settle(session, result).await.is_err() {
            tracing::warn!("Failed to deliver data block to session {}", session);
        }
    }
}

#[async_trait]
impl SessionCallbacks for SessionEndpoint {
    async fn on_read(&self, session: SessionHandle, block_kib: Option<u32>) {
        let Some(shared) = self.shared.upgrade() else {
            return;
        };
        let Some(streaming) = shared.session(session).await else {
            tracing::debug!("Read request for unknown session {}", session);
            return;
        };

        let block = streaming.read(block_kib).await.unwrap_or_else(|e| {
            tracing::warn!("Reading source of session {} failed: {}", session, e);
            DataBlock::end()
        });
        Self::send_block(&shared, session, block).await;
    }

    async fn on_seek(&self, session: SessionHandle, position: u64, block_kib: Option<u32>) {
        let Some(shared) = self.shared.upgrade() else {
            return;
        };
        let Some(streaming) = shared.session(session).await else {
            tracing::debug!("Seek request for unknown session {}", session);
            return;
        };

        let block = streaming.seek(position, block_kib).await.unwrap_or_else(|e| {
            tracing::warn!("Seeking source of session {} failed: {}", session, e);
            DataBlock::end()
        });
        Self::send_block(&shared, session, block).await;
    }

    async fn on_stop(&self, session: SessionHandle) {
        let Some(shared) = self.shared.upgrade() else {
            return;
        };

        tracing::info!("Receiver stopped playback on session {}", session);
        if let Some(streaming) = shared.session(session).await {
            streaming.stop().await;
        }
        shared.bridge.deliver_stopped(session);
    }

    async fn on_status(&self, session: SessionHandle, record: &RpcValue) {
        if let Some(shared) = self.shared.upgrade() {
            shared.bridge.deliver_status(session, record);
        }
    }

    async fn on_app_message(&self, _session: SessionHandle, app_id: &str, message: &str) {
        if let Some(shared) = self.shared.upgrade() {
            shared.bridge.deliver_app_message(app_id, message);
        }
    }
}

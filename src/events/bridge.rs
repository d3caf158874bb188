//! Observer slots for application messages and status pushes

use std::sync::{Arc, PoisonError, RwLock};

use crate::rpc::{RpcValue, SessionHandle};
use crate::types::PlaybackStatus;

/// Handler for messages from receiver-hosted applications: `(app_id, message)`
pub type AppMessageHandler = Arc<dyn Fn(&str, &str) + Send + Sync>;

/// Handler for playback status pushes
pub type StatusHandler = Arc<dyn Fn(SessionHandle, &PlaybackStatus) + Send + Sync>;

/// Handler called when a receiver stops playing the streamed source
pub type PlaybackStoppedHandler = Arc<dyn Fn(SessionHandle) + Send + Sync>;

/// Routes receiver events to at most one handler of each kind
///
/// Registering a handler replaces the previous one. Events arriving with no
/// handler registered are dropped.
#[derive(Default)]
pub struct StatusBridge {
    app_message: RwLock<Option<AppMessageHandler>>,
    status: RwLock<Option<StatusHandler>>,
    stopped: RwLock<Option<PlaybackStoppedHandler>>,
}

impl StatusBridge {
    /// Create a bridge with no handlers
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the application message handler
    pub fn set_app_message_handler<F>(&self, handler: F)
    where
        F: Fn(&str, &str) + Send + Sync + 'static,
    {
        let handler: AppMessageHandler = Arc::new(handler);
        replace(&self.app_message, Some(handler));
    }

    /// Set the status handler
    pub fn set_status_handler<F>(&self, handler: F)
    where
        F: Fn(SessionHandle, &PlaybackStatus) + Send + Sync + 'static,
    {
        let handler: StatusHandler = Arc::new(handler);
        replace(&self.status, Some(handler));
    }

    /// Set the playback stopped handler
    pub fn set_stopped_handler<F>(&self, handler: F)
    where
        F: Fn(SessionHandle) + Send + Sync + 'static,
    {
        let handler: PlaybackStoppedHandler = Arc::new(handler);
        replace(&self.stopped, Some(handler));
    }

    /// Remove every handler
    pub fn clear(&self) {
        replace(&self.app_message, None);
        replace(&self.status, None);
        replace(&self.stopped, None);
    }

    /// Deliver an application message. Returns whether a handler ran.
    pub fn deliver_app_message(&self, app_id: &str, message: &str) -> bool {
        match current(&self.app_message) {
            Some(handler) => {
                handler(app_id, message);
                true
            }
            None => false,
        }
    }

    /// Decode and deliver a status push. Returns whether a handler ran.
    ///
    /// A record missing any field is dropped whole.
    pub fn deliver_status(&self, session: SessionHandle, record: &RpcValue) -> bool {
        let status = match PlaybackStatus::from_rpc(record) {
            Ok(status) => status,
            Err(field) => {
                tracing::warn!(
                    "Dropping status push from session {}: missing value '{}'",
                    session,
                    field
                );
                return false;
            }
        };

        match current(&self.status) {
            Some(handler) => {
                handler(session, &status);
                true
            }
            None => false,
        }
    }

    /// Deliver a playback stopped notice. Returns whether a handler ran.
    pub fn deliver_stopped(&self, session: SessionHandle) -> bool {
        match current(&self.stopped) {
            Some(handler) => {
                handler(session);
                true
            }
            None => false,
        }
    }
}

// Handlers are cloned out of the slot before running, so a handler may
// replace itself without deadlocking.
fn current<T: Clone>(slot: &RwLock<Option<T>>) -> Option<T> {
    slot.read().unwrap_or_else(PoisonError::into_inner).clone()
}

fn replace<T>(slot: &RwLock<Option<T>>, value: Option<T>) {
    *slot.write().unwrap_or_else(PoisonError::into_inner) = value;
}

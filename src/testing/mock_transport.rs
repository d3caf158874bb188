//! Scripted RPC transport that records every interaction

use std::collections::{HashMap, HashSet, VecDeque};
use std::sync::{Arc, Mutex, PoisonError};

use async_trait::async_trait;

use crate::rpc::{RpcTransport, RpcValue, SessionCallbacks, SessionHandle, TransportError};

/// One outbound call seen by the mock
#[derive(Debug, Clone, PartialEq)]
pub struct RecordedCall {
    /// Session the call was made on
    pub session: SessionHandle,
    /// Remote method name
    pub method: String,
    /// Arguments as passed
    pub args: Vec<RpcValue>,
}

#[derive(Default)]
struct TransportState {
    next_handle: u32,
    connect_failure: Option<String>,
    connections: Vec<(String, u16)>,
    responses: HashMap<String, VecDeque<RpcValue>>,
    defaults: HashMap<String, RpcValue>,
    failures: HashMap<String, String>,
    stalled: HashSet<String>,
    calls: Vec<RecordedCall>,
    disconnects: Vec<SessionHandle>,
    callbacks: HashMap<SessionHandle, Arc<dyn SessionCallbacks>>,
}

/// RPC transport answering from a script
///
/// Unscripted methods answer `U8(0)`.
#[derive(Default)]
pub struct MockTransport {
    state: Mutex<TransportState>,
}

impl MockTransport {
    /// Create a new mock
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Answer every call to `method` with `value`
    pub fn respond(&self, method: &str, value: RpcValue) {
        self.lock().defaults.insert(method.to_string(), value);
    }

    /// Answer the next call to `method` with `value`, before any default
    pub fn respond_once(&self, method: &str, value: RpcValue) {
        self.lock()
            .responses
            .entry(method.to_string())
            .or_default()
            .push_back(value);
    }

    /// Make calls to `method` fail with `message`
    pub fn fail(&self, method: &str, message: &str) {
        self.lock()
            .failures
            .insert(method.to_string(), message.to_string());
    }

    /// Make calls to `method` never complete
    pub fn stall(&self, method: &str) {
        self.lock().stalled.insert(method.to_string());
    }

    /// Make `connect` fail with `message`
    pub fn fail_connect(&self, message: &str) {
        self.lock().connect_failure = Some(message.to_string());
    }

    /// All calls made so far
    #[must_use]
    pub fn calls(&self) -> Vec<RecordedCall> {
        self.lock().calls.clone()
    }

    /// Calls made to `method`
    #[must_use]
    pub fn calls_to(&self, method: &str) -> Vec<RecordedCall> {
        self.lock()
            .calls
            .iter()
            .filter(|c| c.method == method)
            .cloned()
            .collect()
    }

    /// Sessions closed so far, one entry per `disconnect`
    #[must_use]
    pub fn disconnects(&self) -> Vec<SessionHandle> {
        self.lock().disconnects.clone()
    }

    /// Connections opened so far as `(host, port)`
    #[must_use]
    pub fn connections(&self) -> Vec<(String, u16)> {
        self.lock().connections.clone()
    }

    /// Callback table registered for `session`
    #[must_use]
    pub fn callbacks(&self, session: SessionHandle) -> Option<Arc<dyn SessionCallbacks>> {
        self.lock().callbacks.get(&session).cloned()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, TransportState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

#[async_trait]
impl RpcTransport for MockTransport {
    async fn connect(&self, host: &str, port: u16) -> Result<SessionHandle, TransportError> {
        let mut state = self.lock();
        state.connections.push((host.to_string(), port));

        if let Some(message) = &state.connect_failure {
            return Err(TransportError::new(message.clone()));
        }

        state.next_handle += 1;
        Ok(SessionHandle(state.next_handle))
    }

    async fn call(
        &self,
        session: SessionHandle,
        method: &str,
        args: Vec<RpcValue>,
    ) -> Result<RpcValue, TransportError> {
        let outcome = {
            let mut state = self.lock();
            state.calls.push(RecordedCall {
                session,
                method: method.to_string(),
                args,
            });

            if state.stalled.contains(method) {
                None
            } else if let Some(message) = state.failures.get(method) {
                Some(Err(TransportError::new(message.clone())))
            } else {
                let queued = state
                    .responses
                    .get_mut(method)
                    .and_then(VecDeque::pop_front);
                let value = queued
                    .or_else(|| state.defaults.get(method).cloned())
                    .unwrap_or(RpcValue::U8(0));
                Some(Ok(value))
            }
        };

        match outcome {
            Some(result) => result,
            None => std::future::pending().await,
        }
    }

    async fn disconnect(&self, session: SessionHandle) -> Result<(), TransportError> {
        self.lock().disconnects.push(session);
        Ok(())
    }

    fn register_callbacks(&self, session: SessionHandle, callbacks: Arc<dyn SessionCallbacks>) {
        self.lock().callbacks.insert(session, callbacks);
    }

    fn remove_callbacks(&self, session: SessionHandle) {
        self.lock().callbacks.remove(&session);
    }
}

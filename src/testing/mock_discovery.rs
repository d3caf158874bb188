//! Scripted discovery transport

use std::collections::HashMap;
use std::sync::{Mutex, PoisonError};

use async_trait::async_trait;

use crate::discovery::{DiscoveryTransport, ServiceResponse};
use crate::rpc::TransportError;

#[derive(Default)]
struct DiscoveryState {
    answers: HashMap<String, Vec<ServiceResponse>>,
    failure: Option<String>,
    queries: Vec<(String, u16)>,
}

/// Discovery transport answering from a script
#[derive(Default)]
pub struct MockDiscovery {
    state: Mutex<DiscoveryState>,
}

impl MockDiscovery {
    /// Create an empty mock (every query answers with nothing)
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Answer queries for `filter` with `responses`, in arrival order
    pub fn answer(&self, filter: &str, responses: Vec<ServiceResponse>) {
        self.lock().answers.insert(filter.to_string(), responses);
    }

    /// Make every query fail with `message`
    pub fn fail(&self, message: &str) {
        self.lock().failure = Some(message.to_string());
    }

    /// Queries received so far as `(filter, port)`
    #[must_use]
    pub fn queries(&self) -> Vec<(String, u16)> {
        self.lock().queries.clone()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, DiscoveryState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

#[async_trait]
impl DiscoveryTransport for MockDiscovery {
    async fn query(&self, filter: &str, port: u16) -> Result<Vec<ServiceResponse>, TransportError> {
        let mut state = self.lock();
        state.queries.push((filter.to_string(), port));

        if let Some(message) = &state.failure {
            return Err(TransportError::new(message.clone()));
        }

        Ok(state.answers.get(filter).cloned().unwrap_or_default())
    }
}

//! Registry of remotes found by discovery

use std::collections::HashMap;
use std::sync::Arc;

use tokio::sync::RwLock;

use super::{DiscoveryTransport, ServiceKind, dedup_remotes, suppress_loopback};
use crate::error::NymphCastError;
use crate::types::Remote;

/// Holds the remotes found by the last discovery pass of each service
pub struct RemoteRegistry {
    transport: Arc<dyn DiscoveryTransport>,
    known: RwLock<HashMap<String, Vec<Remote>>>,
}

impl RemoteRegistry {
    /// Create a registry over a discovery transport
    #[must_use]
    pub fn new(transport: Arc<dyn DiscoveryTransport>) -> Self {
        Self {
            transport,
            known: RwLock::new(HashMap::new()),
        }
    }

    /// Query the network for `filter` on `port` and return the cleaned list
    ///
    /// Loopback suppression is applied to receiver queries only.
    ///
    /// # Errors
    ///
    /// Returns `Discovery` if the query could not be performed.
    pub async fn try_discover(&self, filter: &str, port: u16) -> Result<Vec<Remote>, NymphCastError> {
        let responses = self
            .transport
            .query(filter, port)
            .await
            .map_err(|e| NymphCastError::Discovery { message: e.message })?;

        tracing::debug!(
            "Discovery for '{}' on port {} got {} responses",
            filter,
            port,
            responses.len()
        );

        let mut remotes: Vec<Remote> = responses.iter().map(super::ServiceResponse::to_remote).collect();
        if ServiceKind::from_filter(filter).is_some_and(ServiceKind::suppresses_loopback) {
            remotes = suppress_loopback(&remotes);
        }
        let remotes = dedup_remotes(&remotes);

        self.known
            .write()
            .await
            .insert(filter.to_string(), remotes.clone());

        Ok(remotes)
    }

    /// Like [`Self::try_discover`], but a failed query yields an empty list
    ///
    /// Callers cannot tell "nothing found" from "discovery failed" here; use
    /// `try_discover` when the difference matters.
    pub async fn discover(&self, filter: &str, port: u16) -> Vec<Remote> {
        match self.try_discover(filter, port).await {
            Ok(remotes) => remotes,
            Err(e) => {
                tracing::warn!("{}", e);
                Vec::new()
            }
        }
    }

    /// Discover one kind of service
    pub async fn discover_kind(&self, kind: ServiceKind, port: u16) -> Vec<Remote> {
        self.discover(kind.filter(), port).await
    }

    /// Discover receivers and media servers concurrently
    pub async fn discover_all(&self, receiver_port: u16, media_server_port: u16) -> (Vec<Remote>, Vec<Remote>) {
        futures::join!(
            self.discover_kind(ServiceKind::Receiver, receiver_port),
            self.discover_kind(ServiceKind::MediaServer, media_server_port),
        )
    }

    /// Remotes found by the last pass for `filter`
    pub async fn known(&self, filter: &str) -> Vec<Remote> {
        self.known
            .read()
            .await
            .get(filter)
            .cloned()
            .unwrap_or_default()
    }

    /// Receivers found by the last receiver pass
    pub async fn receivers(&self) -> Vec<Remote> {
        self.known(ServiceKind::Receiver.filter()).await
    }

    /// Media servers found by the last media server pass
    pub async fn media_servers(&self) -> Vec<Remote> {
        self.known(ServiceKind::MediaServer.filter()).await
    }
}

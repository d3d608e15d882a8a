//! Peer registry
//!
//! An append-only list of peers kept as one JSON array under a reserved
//! ledger key. It is bookkeeping only: transactions do not consult it.

use crate::error::{CommitError, Result};
use crate::types::RegisteredPeer;
use proven_ledger::RecordStore;
use std::sync::Arc;

pub struct PeerRegistry {
    store: Arc<dyn RecordStore>,
    key: String,
    dedupe: bool,
    max_update_attempts: usize,
}

impl PeerRegistry {
    pub fn new(
        store: Arc<dyn RecordStore>,
        key: impl Into<String>,
        dedupe: bool,
        max_update_attempts: usize,
    ) -> Self {
        Self {
            store,
            key: key.into(),
            dedupe,
            max_update_attempts: max_update_attempts.max(1),
        }
    }

    /// Append a peer to the registry
    pub fn register(&self, peer_id: &str) -> Result<()> {
        if peer_id.is_empty() {
            return Err(CommitError::InvalidInput(
                "peer id must not be empty".to_string(),
            ));
        }

        for attempt in 1..=self.max_update_attempts {
            let current = self.store.get(&self.key)?;
            let mut peers = match &current {
                Some(bytes) => self.decode(bytes)?,
                None => Vec::new(),
            };

            if self.dedupe && peers.iter().any(|p| p.peer_id == peer_id) {
                tracing::debug!("Peer {} already registered", peer_id);
                return Ok(());
            }

            peers.push(RegisteredPeer::new(peer_id));
            let bytes = serde_json::to_vec(&peers)?;

            if self
                .store
                .compare_and_swap(&self.key, current.as_deref(), bytes)?
            {
                tracing::debug!("Registered peer {} ({} total)", peer_id, peers.len());
                return Ok(());
            }

            tracing::debug!(
                "Registry changed while registering {} (attempt {}), retrying",
                peer_id,
                attempt
            );
        }

        tracing::warn!(
            "Giving up registering peer {} after {} conflicting updates",
            peer_id,
            self.max_update_attempts
        );
        Err(proven_ledger::Error::Contention {
            key: self.key.clone(),
            attempts: self.max_update_attempts,
        }
        .into())
    }

    /// All registered peers in registration order
    pub fn list(&self) -> Result<Vec<RegisteredPeer>> {
        match self.store.get(&self.key)? {
            Some(bytes) => self.decode(&bytes),
            None => Ok(Vec::new()),
        }
    }

    /// The stored registry document, or an empty JSON array
    pub fn list_raw(&self) -> Result<Vec<u8>> {
        Ok(self
            .store
            .get(&self.key)?
            .unwrap_or_else(|| b"[]".to_vec()))
    }

    fn decode(&self, bytes: &[u8]) -> Result<Vec<RegisteredPeer>> {
        serde_json::from_slice(bytes).map_err(|e| {
            tracing::warn!("Undecodable peer registry under {}: {}", self.key, e);
            CommitError::corrupt(&self.key, e)
        })
    }
}

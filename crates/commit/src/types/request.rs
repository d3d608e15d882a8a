//! Request and response payloads exchanged with callers
//!
//! Request fields default to empty when missing so that validation can
//! report exactly which field is wrong instead of a generic decode error.

use crate::types::VoteValue;
use serde::{Deserialize, Serialize};

/// Payload of `addTransaction`
///
/// Only the id and the peer ids are read; decisions and expiry sent by the
/// caller are ignored because the coordinator assigns them.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewTransactionRequest {
    #[serde(rename = "TransactionID", default)]
    pub transaction_id: String,

    #[serde(rename = "InvolvedPeers", default)]
    pub involved_peers: Option<Vec<PeerRef>>,
}

/// A peer named in a new transaction
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PeerRef {
    #[serde(rename = "PeerID", default)]
    pub peer_id: String,
}

impl NewTransactionRequest {
    pub fn new<I, P>(transaction_id: impl Into<String>, peers: I) -> Self
    where
        I: IntoIterator<Item = P>,
        P: Into<String>,
    {
        Self {
            transaction_id: transaction_id.into(),
            involved_peers: Some(
                peers
                    .into_iter()
                    .map(|p| PeerRef { peer_id: p.into() })
                    .collect(),
            ),
        }
    }

    /// Peer ids in request order
    pub fn peer_ids(&self) -> Vec<&str> {
        self.involved_peers
            .iter()
            .flatten()
            .map(|p| p.peer_id.as_str())
            .collect()
    }
}

/// Payload of `makePeerDecision` (`PeerUpdateRequestModel` on the wire)
///
/// `decision` is kept as the raw string: a vote against a transaction that
/// is already decided succeeds as a no-op before the value is validated.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PeerUpdateRequest {
    #[serde(rename = "TransactionID", default)]
    pub transaction_id: String,

    #[serde(rename = "PeerID", default)]
    pub peer_id: String,

    #[serde(rename = "Decision", default)]
    pub decision: String,
}

impl PeerUpdateRequest {
    pub fn new(
        transaction_id: impl Into<String>,
        peer_id: impl Into<String>,
        decision: VoteValue,
    ) -> Self {
        Self {
            transaction_id: transaction_id.into(),
            peer_id: peer_id.into(),
            decision: decision.as_str().to_string(),
        }
    }
}

/// Result of `queryFinalDecision` (`FinalDecisionResponseModel` on the wire)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FinalDecisionResponse {
    #[serde(rename = "TransactionID")]
    pub transaction_id: String,

    #[serde(rename = "FinalDecision")]
    pub final_decision: VoteValue,
}

/// Entry of the peer registry (`PeerModel` on the wire)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegisteredPeer {
    #[serde(rename = "PeerID")]
    pub peer_id: String,
}

impl RegisteredPeer {
    pub fn new(peer_id: impl Into<String>) -> Self {
        Self {
            peer_id: peer_id.into(),
        }
    }
}

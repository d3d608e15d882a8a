//! Transaction record as stored in the ledger

use crate::types::VoteValue;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A peer taking part in a transaction, with its current vote
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Peer {
    #[serde(rename = "PeerID")]
    pub peer_id: String,

    #[serde(rename = "PeerDecision", default)]
    pub decision: VoteValue,
}

impl Peer {
    pub fn new(peer_id: impl Into<String>) -> Self {
        Self {
            peer_id: peer_id.into(),
            decision: VoteValue::Pending,
        }
    }
}

/// A multi-peer commit decision tracked in the ledger
///
/// The peer set is fixed at creation and kept in insertion order, which is
/// also the order votes are evaluated in.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Transaction {
    #[serde(rename = "TransactionID")]
    pub transaction_id: String,

    #[serde(rename = "InvolvedPeers", default)]
    pub involved_peers: Vec<Peer>,

    #[serde(rename = "FinalDecision", default)]
    pub final_decision: VoteValue,

    #[serde(rename = "TransactionExpire")]
    pub expires_at: DateTime<Utc>,
}

impl Transaction {
    /// Create a pending transaction where every peer is yet to vote
    pub fn new<I, P>(transaction_id: impl Into<String>, peers: I, expires_at: DateTime<Utc>) -> Self
    where
        I: IntoIterator<Item = P>,
        P: Into<String>,
    {
        Self {
            transaction_id: transaction_id.into(),
            involved_peers: peers.into_iter().map(Peer::new).collect(),
            final_decision: VoteValue::Pending,
            expires_at,
        }
    }

    /// Whether the final decision has been reached
    pub fn is_terminal(&self) -> bool {
        self.final_decision.is_terminal()
    }

    /// Look up a peer by id (first match in list order)
    pub fn peer(&self, peer_id: &str) -> Option<&Peer> {
        self.involved_peers.iter().find(|p| p.peer_id == peer_id)
    }

    /// Record a peer's vote. Returns false if the peer is not involved.
    pub fn record_vote(&mut self, peer_id: &str, decision: VoteValue) -> bool {
        match self
            .involved_peers
            .iter_mut()
            .find(|p| p.peer_id == peer_id)
        {
            Some(peer) => {
                peer.decision = decision;
                true
            }
            None => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn expiry() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 1, 1, 12, 5, 0).unwrap()
    }

    #[test]
    fn test_wire_field_names() {
        let tx = Transaction::new("tx1", ["p1", "p2"], expiry());
        let json: serde_json::Value = serde_json::to_value(&tx).unwrap();

        assert_eq!(json["TransactionID"], "tx1");
        assert_eq!(json["FinalDecision"], "P");
        assert_eq!(json["InvolvedPeers"][0]["PeerID"], "p1");
        assert_eq!(json["InvolvedPeers"][1]["PeerDecision"], "P");
        assert_eq!(json["TransactionExpire"], "2024-01-01T12:05:00Z");
    }

    #[test]
    fn test_decodes_unset_decisions_as_pending() {
        let raw = r#"{
            "TransactionID": "tx1",
            "InvolvedPeers": [{"PeerID": "p1", "PeerDecision": ""}, {"PeerID": "p2"}],
            "FinalDecision": "",
            "TransactionExpire": "2024-01-01T12:05:00.123456789Z"
        }"#;
        let tx: Transaction = serde_json::from_str(raw).unwrap();

        assert_eq!(tx.final_decision, VoteValue::Pending);
        assert!(tx.involved_peers.iter().all(|p| p.decision == VoteValue::Pending));
    }

    #[test]
    fn test_record_vote_updates_first_match_only() {
        let mut tx = Transaction::new("tx1", ["p1", "p2", "p1"], expiry());

        assert!(tx.record_vote("p1", VoteValue::Commit));
        assert_eq!(tx.involved_peers[0].decision, VoteValue::Commit);
        assert_eq!(tx.involved_peers[2].decision, VoteValue::Pending);

        assert!(!tx.record_vote("p9", VoteValue::Commit));
        assert_eq!(tx.peer("p2").unwrap().decision, VoteValue::Pending);
    }
}

//! Commit coordinator
//!
//! Validates requests, enforces the transaction state machine and persists
//! the results. The coordinator keeps no per-transaction state: every call
//! reads what it needs from the ledger and writes the outcome back.
//!
//! State machine: `Pending -> {Commit, Abort}`. Terminal states absorb every
//! later vote, and deadlines are only checked when a vote or a decision
//! query arrives.

use crate::clock::{Clock, SystemClock};
use crate::config::CoordinatorConfig;
use crate::error::{CommitError, Result};
use crate::evaluation::{Verdict, evaluate};
use crate::registry::PeerRegistry;
use crate::repository::{Mutation, TransactionRepository};
use crate::types::{
    FinalDecisionResponse, NewTransactionRequest, PeerUpdateRequest, RegisteredPeer, Transaction,
    VoteValue,
};
use proven_ledger::RecordStore;
use std::collections::HashSet;
use std::sync::Arc;

/// Coordinates multi-peer commit decisions recorded in a ledger
pub struct CommitCoordinator {
    transactions: TransactionRepository,
    registry: PeerRegistry,
    clock: Arc<dyn Clock>,
    config: CoordinatorConfig,
}

impl CommitCoordinator {
    /// Create a coordinator with default config and the system clock
    pub fn new(store: Arc<dyn RecordStore>) -> Self {
        Self::with_config(store, CoordinatorConfig::default(), Arc::new(SystemClock))
    }

    /// Create a coordinator with custom config and clock
    pub fn with_config(
        store: Arc<dyn RecordStore>,
        config: CoordinatorConfig,
        clock: Arc<dyn Clock>,
    ) -> Self {
        let transactions = TransactionRepository::new(store.clone(), config.max_update_attempts);
        let registry = PeerRegistry::new(
            store,
            config.registry_key.clone(),
            config.dedupe_registered_peers,
            config.max_update_attempts,
        );

        Self {
            transactions,
            registry,
            clock,
            config,
        }
    }

    pub fn config(&self) -> &CoordinatorConfig {
        &self.config
    }

    /// Create a transaction (`addTransaction`)
    ///
    /// Every peer starts `Pending` and the deadline is set from the
    /// configured vote timeout; whatever the caller sent for those is
    /// ignored. Returns the record as stored.
    pub fn add_transaction(&self, request: &NewTransactionRequest) -> Result<Transaction> {
        let transaction_id = request.transaction_id.as_str();
        if transaction_id.is_empty() {
            return Err(CommitError::InvalidInput(
                "transaction id must not be empty".to_string(),
            ));
        }

        if self.transactions.exists(transaction_id)? {
            return Err(CommitError::AlreadyExists(transaction_id.to_string()));
        }

        let peer_ids = request.peer_ids();
        if peer_ids.is_empty() {
            return Err(CommitError::InvalidInput(
                "there are no peers involved in the transaction".to_string(),
            ));
        }

        let mut seen = HashSet::new();
        for peer_id in &peer_ids {
            if peer_id.is_empty() {
                return Err(CommitError::InvalidInput(
                    "peer id must not be empty".to_string(),
                ));
            }
            if !seen.insert(*peer_id) {
                return Err(CommitError::InvalidInput(format!(
                    "peer {} is listed more than once",
                    peer_id
                )));
            }
        }

        let expires_at = self.clock.now() + self.config.vote_timeout;
        let transaction = Transaction::new(transaction_id, peer_ids, expires_at);

        // Atomic with the existence check above losing a race
        self.transactions.create(&transaction)?;

        tracing::info!(
            "Created transaction {} with {} peers, expires at {}",
            transaction_id,
            transaction.involved_peers.len(),
            expires_at
        );

        Ok(transaction)
    }

    /// Stored bytes of a transaction (`queryTransaction`)
    pub fn query_transaction(&self, transaction_id: &str) -> Result<Vec<u8>> {
        if transaction_id.is_empty() {
            return Err(CommitError::InvalidInput(
                "transaction id must not be empty".to_string(),
            ));
        }
        self.transactions.load_raw(transaction_id)
    }

    /// Decoded transaction record
    pub fn get_transaction(&self, transaction_id: &str) -> Result<Transaction> {
        self.transactions.load(transaction_id)
    }

    /// Record a peer's vote (`makePeerDecision`)
    ///
    /// Returns the transaction's final decision after the vote, which is
    /// `Pending` while other votes are still outstanding. Votes on a decided
    /// transaction are accepted and ignored.
    pub fn make_peer_decision(&self, request: &PeerUpdateRequest) -> Result<VoteValue> {
        let transaction_id = request.transaction_id.as_str();
        if transaction_id.is_empty() {
            return Err(CommitError::InvalidInput(
                "transaction id must not be empty".to_string(),
            ));
        }

        let mode = self.config.evaluation_mode;
        let now = self.clock.now();

        self.transactions.update(transaction_id, |transaction| {
            if transaction.is_terminal() {
                tracing::debug!(
                    "Ignoring vote by {} on decided transaction {} ({})",
                    request.peer_id,
                    transaction_id,
                    transaction.final_decision
                );
                return Ok(Mutation::Keep(transaction.final_decision));
            }

            let vote = parse_vote(&request.decision)?;

            if transaction.involved_peers.is_empty() {
                return Err(CommitError::InvalidTransaction(format!(
                    "transaction {} has no involved peers",
                    transaction_id
                )));
            }

            if !transaction.record_vote(&request.peer_id, vote) {
                return Err(CommitError::PeerNotFound {
                    transaction_id: transaction_id.to_string(),
                    peer_id: request.peer_id.clone(),
                });
            }

            tracing::debug!(
                "Peer {} voted {} on transaction {}",
                request.peer_id,
                vote,
                transaction_id
            );

            if vote == VoteValue::Abort {
                // An abort vote decides on its own; no need to look at the rest
                transaction.final_decision = VoteValue::Abort;
            } else if let Verdict::Decided(decision) = evaluate(transaction, now, mode)? {
                transaction.final_decision = decision;
            }

            if transaction.is_terminal() {
                tracing::info!(
                    "Transaction {} decided: {}",
                    transaction_id,
                    transaction.final_decision
                );
            }

            Ok(Mutation::Write(transaction.final_decision))
        })
    }

    /// Current final decision of a transaction (`queryFinalDecision`)
    ///
    /// A pending transaction is re-evaluated first; if that reaches a
    /// decision (typically a missed deadline) it is persisted before
    /// answering.
    pub fn query_final_decision(&self, transaction_id: &str) -> Result<FinalDecisionResponse> {
        if transaction_id.is_empty() {
            return Err(CommitError::InvalidInput(
                "transaction id must not be empty".to_string(),
            ));
        }

        let mode = self.config.evaluation_mode;
        let now = self.clock.now();

        let final_decision = self.transactions.update(transaction_id, |transaction| {
            if transaction.is_terminal() {
                return Ok(Mutation::Keep(transaction.final_decision));
            }

            match evaluate(transaction, now, mode)? {
                Verdict::Decided(decision) => {
                    if now > transaction.expires_at {
                        tracing::info!(
                            "Transaction {} expired at {}, decided: {}",
                            transaction_id,
                            transaction.expires_at,
                            decision
                        );
                    } else {
                        tracing::info!("Transaction {} decided: {}", transaction_id, decision);
                    }
                    transaction.final_decision = decision;
                    Ok(Mutation::Write(decision))
                }
                Verdict::Pending => Ok(Mutation::Keep(VoteValue::Pending)),
            }
        })?;

        Ok(FinalDecisionResponse {
            transaction_id: transaction_id.to_string(),
            final_decision,
        })
    }

    /// Add a peer to the registry (`registerPeer`)
    pub fn register_peer(&self, peer_id: &str) -> Result<()> {
        self.registry.register(peer_id)
    }

    /// Registered peers in registration order
    pub fn registered_peers(&self) -> Result<Vec<RegisteredPeer>> {
        self.registry.list()
    }

    /// Stored registry document (`getRegisteredPeers`)
    pub fn registered_peers_raw(&self) -> Result<Vec<u8>> {
        self.registry.list_raw()
    }
}

/// A vote must be a decision; `Pending` cannot be cast
fn parse_vote(raw: &str) -> Result<VoteValue> {
    match raw.parse::<VoteValue>() {
        Ok(vote) if vote.is_terminal() => Ok(vote),
        Ok(_) => Err(CommitError::InvalidInput(format!(
            "vote must be Commit or Abort, got {:?}",
            raw
        ))),
        Err(e) => Err(CommitError::InvalidInput(e)),
    }
}

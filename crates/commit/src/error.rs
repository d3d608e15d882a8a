//! Error types for the commit coordinator

use thiserror::Error;

/// Commit coordinator error types
#[derive(Error, Debug)]
pub enum CommitError {
    /// Malformed arguments, wrong argument count or unparseable payload
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Transaction already exists: {0}")]
    AlreadyExists(String),

    #[error("Transaction does not exist: {0}")]
    NotFound(String),

    #[error("Peer {peer_id} is not involved in transaction {transaction_id}")]
    PeerNotFound {
        transaction_id: String,
        peer_id: String,
    },

    /// Stored bytes do not decode against the expected schema
    #[error("Corrupt record under {key}: {reason}")]
    Corrupt { key: String, reason: String },

    #[error("Invalid transaction: {0}")]
    InvalidTransaction(String),

    #[error("Invalid function: {0}")]
    InvalidFunction(String),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Store failure: {0}")]
    StoreFailure(#[from] proven_ledger::Error),
}

/// Result type for coordinator operations
pub type Result<T> = std::result::Result<T, CommitError>;

impl CommitError {
    pub(crate) fn corrupt(key: &str, reason: impl ToString) -> Self {
        CommitError::Corrupt {
            key: key.to_string(),
            reason: reason.to_string(),
        }
    }
}

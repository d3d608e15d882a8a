//! Transaction repository
//!
//! Maps transaction ids to their JSON records in the ledger. Every write that
//! depends on a previous read goes through `compare_and_swap`, so concurrent
//! votes on the same transaction cannot overwrite each other.

use crate::error::{CommitError, Result};
use crate::types::Transaction;
use proven_ledger::RecordStore;
use std::sync::Arc;

/// What a read-modify-write step decided to do with the record it was given
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Mutation<T> {
    /// Leave the stored record as it is
    Keep(T),
    /// Persist the modified record
    Write(T),
}

/// Load/save access to transaction records
pub struct TransactionRepository {
    store: Arc<dyn RecordStore>,
    max_update_attempts: usize,
}

impl TransactionRepository {
    pub fn new(store: Arc<dyn RecordStore>, max_update_attempts: usize) -> Self {
        Self {
            store,
            max_update_attempts: max_update_attempts.max(1),
        }
    }

    /// Check whether a record is stored under `transaction_id`
    pub fn exists(&self, transaction_id: &str) -> Result<bool> {
        Ok(self.store.contains(transaction_id)?)
    }

    /// Store a new transaction; fails if the id is already taken
    pub fn create(&self, transaction: &Transaction) -> Result<()> {
        let bytes = serde_json::to_vec(transaction)?;
        if !self
            .store
            .compare_and_swap(&transaction.transaction_id, None, bytes)?
        {
            return Err(CommitError::AlreadyExists(
                transaction.transaction_id.clone(),
            ));
        }
        Ok(())
    }

    /// Stored bytes of a transaction, verbatim
    pub fn load_raw(&self, transaction_id: &str) -> Result<Vec<u8>> {
        self.store
            .get(transaction_id)?
            .ok_or_else(|| CommitError::NotFound(transaction_id.to_string()))
    }

    /// Load and decode a transaction
    pub fn load(&self, transaction_id: &str) -> Result<Transaction> {
        let bytes = self.load_raw(transaction_id)?;
        decode(transaction_id, &bytes)
    }

    /// Overwrite a transaction record unconditionally (last writer wins)
    pub fn save(&self, transaction: &Transaction) -> Result<()> {
        let bytes = serde_json::to_vec(transaction)?;
        self.store.put(&transaction.transaction_id, bytes)?;
        Ok(())
    }

    /// Atomically load, modify and store a transaction
    ///
    /// `step` may run more than once: if another writer changed the record
    /// between our read and our write, the record is reloaded and `step` is
    /// applied again to the fresh copy.
    pub fn update<T, F>(&self, transaction_id: &str, mut step: F) -> Result<T>
    where
        F: FnMut(&mut Transaction) -> Result<Mutation<T>>,
    {
        for attempt in 1..=self.max_update_attempts {
            let current = self.load_raw(transaction_id)?;
            let mut transaction = decode(transaction_id, &current)?;

            let output = match step(&mut transaction)? {
                Mutation::Keep(output) => return Ok(output),
                Mutation::Write(output) => output,
            };

            let bytes = serde_json::to_vec(&transaction)?;
            if self
                .store
                .compare_and_swap(transaction_id, Some(current.as_slice()), bytes)?
            {
                return Ok(output);
            }

            tracing::debug!(
                "Transaction {} changed during update (attempt {}), retrying",
                transaction_id,
                attempt
            );
        }

        tracing::warn!(
            "Giving up on transaction {} after {} conflicting updates",
            transaction_id,
            self.max_update_attempts
        );
        Err(proven_ledger::Error::Contention {
            key: transaction_id.to_string(),
            attempts: self.max_update_attempts,
        }
        .into())
    }
}

fn decode(transaction_id: &str, bytes: &[u8]) -> Result<Transaction> {
    let transaction: Transaction = serde_json::from_slice(bytes).map_err(|e| {
        tracing::warn!("Undecodable transaction record {}: {}", transaction_id, e);
        CommitError::corrupt(transaction_id, e)
    })?;

    if transaction.transaction_id.is_empty() {
        return Err(CommitError::corrupt(
            transaction_id,
            "record has an empty TransactionID",
        ));
    }

    Ok(transaction)
}

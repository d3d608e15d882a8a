//! The record store contract
//!
//! Keys are transaction identifiers or reserved well-known keys; values are
//! opaque bytes (JSON documents in practice). A store must report absent and
//! present records distinctly, since existence checks are built on `get`.

use crate::error::Result;
use std::sync::Arc;

/// Key-addressed storage of opaque byte records
pub trait RecordStore: Send + Sync {
    /// Read the record stored under `key`, or `None` if there is none
    fn get(&self, key: &str) -> Result<Option<Vec<u8>>>;

    /// Store `value` under `key`, replacing any existing record
    fn put(&self, key: &str, value: Vec<u8>) -> Result<()>;

    /// Store `new` under `key` only if the current record equals `expected`
    ///
    /// `expected == None` means the key must be absent. Returns `false`
    /// without writing when the current record does not match.
    fn compare_and_swap(&self, key: &str, expected: Option<&[u8]>, new: Vec<u8>) -> Result<bool>;

    /// Check whether a record is stored under `key`
    fn contains(&self, key: &str) -> Result<bool> {
        Ok(self.get(key)?.is_some())
    }
}

impl<S: RecordStore + ?Sized> RecordStore for Arc<S> {
    fn get(&self, key: &str) -> Result<Option<Vec<u8>>> {
        (**self).get(key)
    }

    fn put(&self, key: &str, value: Vec<u8>) -> Result<()> {
        (**self).put(key, value)
    }

    fn compare_and_swap(&self, key: &str, expected: Option<&[u8]>, new: Vec<u8>) -> Result<bool> {
        (**self).compare_and_swap(key, expected, new)
    }

    fn contains(&self, key: &str) -> Result<bool> {
        (**self).contains(key)
    }
}

//! In-memory record store implementation

use crate::error::Result;
use crate::store::RecordStore;
use parking_lot::RwLock;
use std::collections::BTreeMap;

/// In-memory record store for testing and embedding
#[derive(Default)]
pub struct MemoryStore {
    // key -> record bytes
    records: RwLock<BTreeMap<String, Vec<u8>>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored records
    pub fn len(&self) -> usize {
        self.records.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.read().is_empty()
    }
}

impl RecordStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<Vec<u8>>> {
        Ok(self.records.read().get(key).cloned())
    }

    fn put(&self, key: &str, value: Vec<u8>) -> Result<()> {
        self.records.write().insert(key.to_string(), value);
        Ok(())
    }

    fn compare_and_swap(&self, key: &str, expected: Option<&[u8]>, new: Vec<u8>) -> Result<bool> {
        let mut records = self.records.write();
        if records.get(key).map(Vec::as_slice) != expected {
            return Ok(false);
        }
        records.insert(key.to_string(), new);
        Ok(true)
    }

    fn contains(&self, key: &str) -> Result<bool> {
        Ok(self.records.read().contains_key(key))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_get_put() {
        let store = MemoryStore::new();
        assert_eq!(store.get("tx1").unwrap(), None);
        assert!(!store.contains("tx1").unwrap());

        store.put("tx1", b"one".to_vec()).unwrap();
        assert_eq!(store.get("tx1").unwrap(), Some(b"one".to_vec()));
        assert!(store.contains("tx1").unwrap());

        store.put("tx1", b"two".to_vec()).unwrap();
        assert_eq!(store.get("tx1").unwrap(), Some(b"two".to_vec()));
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn test_compare_and_swap() {
        let store = MemoryStore::new();

        // Absent expectation only succeeds once
        assert!(store.compare_and_swap("k", None, b"a".to_vec()).unwrap());
        assert!(!store.compare_and_swap("k", None, b"b".to_vec()).unwrap());
        assert_eq!(store.get("k").unwrap(), Some(b"a".to_vec()));

        // Stale expectation is rejected without writing
        assert!(!store.compare_and_swap("k", Some(&b"x"[..]), b"c".to_vec()).unwrap());
        assert_eq!(store.get("k").unwrap(), Some(b"a".to_vec()));

        assert!(store.compare_and_swap("k", Some(&b"a"[..]), b"c".to_vec()).unwrap());
        assert_eq!(store.get("k").unwrap(), Some(b"c".to_vec()));
    }
}

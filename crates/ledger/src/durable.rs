//! Durable record store backed by Fjall
//!
//! All records live in one partition of a Fjall keyspace. Fjall gives us
//! atomic single-key writes but no conditional write, so writers are
//! serialized through a store-wide lock; this makes `compare_and_swap`
//! atomic for every handle sharing the same `FjallStore`.

use crate::config::LedgerConfig;
use crate::error::Result;
use crate::store::RecordStore;
use fjall::{Keyspace, Partition, PartitionCreateOptions, PersistMode};
use parking_lot::Mutex;
use std::path::{Path, PathBuf};

/// Record store persisted in a Fjall partition
pub struct FjallStore {
    keyspace: Keyspace,
    partition: Partition,
    persist_mode: PersistMode,
    data_dir: PathBuf,

    /// Serializes writers so read-compare-write is a single step
    write_lock: Mutex<()>,
}

impl FjallStore {
    /// Open (or create) the ledger described by `config`
    pub fn open(config: LedgerConfig) -> Result<Self> {
        let data_dir = match config.data_dir.clone() {
            Some(dir) => dir,
            // Keep the directory around; it is owned by whoever opened it
            None => tempfile::tempdir()?.keep(),
        };

        Self::open_at_path(&data_dir, config)
    }

    /// Open storage at a specific path, ignoring `config.data_dir`
    pub fn open_at_path(path: &Path, config: LedgerConfig) -> Result<Self> {
        // Ensure directory exists
        std::fs::create_dir_all(path)?;

        let keyspace = fjall::Config::new(path)
            .cache_size(config.block_cache_size)
            .open()?;

        let partition = keyspace.open_partition(
            &config.partition,
            PartitionCreateOptions::default().compression(config.compression),
        )?;

        tracing::debug!(
            "Opened ledger partition {} at {}",
            config.partition,
            path.display()
        );

        Ok(Self {
            keyspace,
            partition,
            persist_mode: config.persist_mode,
            data_dir: path.to_path_buf(),
            write_lock: Mutex::new(()),
        })
    }

    /// Directory holding this ledger's files
    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }

    fn write(&self, key: &str, value: Vec<u8>) -> Result<()> {
        self.partition.insert(key, value)?;
        self.keyspace.persist(self.persist_mode)?;
        Ok(())
    }
}

impl RecordStore for FjallStore {
    fn get(&self, key: &str) -> Result<Option<Vec<u8>>> {
        Ok(self.partition.get(key)?.map(|bytes| bytes.to_vec()))
    }

    fn put(&self, key: &str, value: Vec<u8>) -> Result<()> {
        let _guard = self.write_lock.lock();
        self.write(key, value)
    }

    fn compare_and_swap(&self, key: &str, expected: Option<&[u8]>, new: Vec<u8>) -> Result<bool> {
        let _guard = self.write_lock.lock();

        let current = self.partition.get(key)?;
        if current.as_deref() != expected {
            return Ok(false);
        }

        self.write(key, new)?;
        Ok(true)
    }

    fn contains(&self, key: &str) -> Result<bool> {
        Ok(self.partition.contains_key(key)?)
    }
}

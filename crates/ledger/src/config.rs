//! Ledger configuration

use std::path::PathBuf;

/// Configuration for the durable ledger store
#[derive(Clone)]
pub struct LedgerConfig {
    /// Directory for ledger data. `None` opens a fresh temporary directory.
    pub data_dir: Option<PathBuf>,

    /// Name of the partition holding all records
    pub partition: String,

    /// Block cache size for Fjall (in bytes)
    pub block_cache_size: u64,

    /// Compression type for records
    pub compression: fjall::CompressionType,

    /// Persist mode applied after every write
    pub persist_mode: fjall::PersistMode,
}

impl Default for LedgerConfig {
    fn default() -> Self {
        Self {
            data_dir: None,
            partition: "ledger".to_string(),
            block_cache_size: 64 * 1024 * 1024, // 64 MB
            compression: fjall::CompressionType::Lz4,
            persist_mode: fjall::PersistMode::Buffer,
        }
    }
}

impl LedgerConfig {
    /// Create a new config with the given data directory
    pub fn new(data_dir: impl Into<PathBuf>) -> Self {
        Self {
            data_dir: Some(data_dir.into()),
            ..Default::default()
        }
    }

    /// Set partition name
    pub fn with_partition(mut self, partition: impl Into<String>) -> Self {
        self.partition = partition.into();
        self
    }

    /// Set block cache size
    pub fn with_block_cache_size(mut self, size: u64) -> Self {
        self.block_cache_size = size;
        self
    }

    /// Set compression type
    pub fn with_compression(mut self, compression: fjall::CompressionType) -> Self {
        self.compression = compression;
        self
    }

    /// Set persist mode
    pub fn with_persist_mode(mut self, mode: fjall::PersistMode) -> Self {
        self.persist_mode = mode;
        self
    }
}

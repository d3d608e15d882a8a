//! Error types for ledger stores

use thiserror::Error;

/// Result type for ledger operations
pub type Result<T> = std::result::Result<T, Error>;

/// Error types that can occur while reading or writing records
#[derive(Error, Debug)]
pub enum Error {
    #[error("Fjall error: {0}")]
    Fjall(#[from] fjall::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// A read-modify-write lost every compare-and-swap race it attempted
    #[error("Contention on key {key}: gave up after {attempts} attempts")]
    Contention { key: String, attempts: usize },

    #[error("{0}")]
    Other(String),
}

//! Key/value record stores for the commit coordinator
//!
//! The coordinator treats the ledger as an external collaborator that can
//! get and put opaque byte records by key. This crate defines that contract
//! (`RecordStore`) together with two adapters:
//! - `MemoryStore`: process memory, for tests and embedding
//! - `FjallStore`: durable storage in a single Fjall partition
//!
//! Both adapters provide `compare_and_swap`, which callers use to turn a
//! read-modify-write into a single atomic step.

pub mod config;
pub mod durable;
pub mod error;
pub mod memory;
pub mod store;

// Re-export main types
pub use config::LedgerConfig;
pub use durable::FjallStore;
pub use error::{Error, Result};
pub use memory::MemoryStore;
pub use store::RecordStore;

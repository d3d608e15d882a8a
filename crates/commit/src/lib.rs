//! Multi-party commit coordinator
//!
//! A transaction names the peers that must agree; each peer votes once; the
//! coordinator derives a single final decision (commit or abort) once every
//! vote is in, a peer votes abort, or the deadline passes with votes still
//! outstanding. All state lives in a key/value ledger (`proven-ledger`).
//!
//! Entry points:
//! - `CommitCoordinator`: typed operations
//! - `Dispatcher`: named operations with string arguments

pub mod clock;
pub mod config;
pub mod coordinator;
pub mod dispatch;
pub mod error;
pub mod evaluation;
pub mod registry;
pub mod repository;
pub mod types;

pub use clock::{Clock, ManualClock, SystemClock};
pub use config::{CoordinatorConfig, REGISTERED_PEERS_KEY};
pub use coordinator::CommitCoordinator;
pub use dispatch::{Dispatcher, Function, InvocationResponse};
pub use error::{CommitError, Result};
pub use evaluation::{EvaluationMode, Verdict, evaluate};
pub use registry::PeerRegistry;
pub use repository::{Mutation, TransactionRepository};
pub use types::{
    FinalDecisionResponse, NewTransactionRequest, Peer, PeerUpdateRequest, RegisteredPeer,
    Transaction, VoteValue,
};

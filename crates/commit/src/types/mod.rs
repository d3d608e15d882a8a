//! Record and wire types for the commit coordinator

pub mod request;
pub mod transaction;
pub mod vote;

pub use request::{
    FinalDecisionResponse, NewTransactionRequest, PeerRef, PeerUpdateRequest, RegisteredPeer,
};
pub use transaction::{Peer, Transaction};
pub use vote::VoteValue;

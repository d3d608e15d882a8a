//! Coordinator configuration

use crate::evaluation::EvaluationMode;
use chrono::TimeDelta;

/// Reserved ledger key holding the peer registry
pub const REGISTERED_PEERS_KEY: &str = "RegisteredPeers";

/// Configuration for the commit coordinator
#[derive(Debug, Clone)]
pub struct CoordinatorConfig {
    /// How long peers have to vote, counted from creation
    pub vote_timeout: TimeDelta,

    /// Rule used to derive a decision from the votes
    pub evaluation_mode: EvaluationMode,

    /// Ledger key of the peer registry
    pub registry_key: String,

    /// Make registering an already registered peer a no-op
    pub dedupe_registered_peers: bool,

    /// Compare-and-swap attempts per read-modify-write before giving up
    pub max_update_attempts: usize,
}

impl Default for CoordinatorConfig {
    fn default() -> Self {
        Self {
            vote_timeout: TimeDelta::minutes(5),
            evaluation_mode: EvaluationMode::AllPeers,
            registry_key: REGISTERED_PEERS_KEY.to_string(),
            dedupe_registered_peers: false,
            max_update_attempts: 16,
        }
    }
}

impl CoordinatorConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set vote timeout
    pub fn with_vote_timeout(mut self, timeout: TimeDelta) -> Self {
        self.vote_timeout = timeout;
        self
    }

    /// Set evaluation mode
    pub fn with_evaluation_mode(mut self, mode: EvaluationMode) -> Self {
        self.evaluation_mode = mode;
        self
    }

    /// Set registry key
    pub fn with_registry_key(mut self, key: impl Into<String>) -> Self {
        self.registry_key = key.into();
        self
    }

    /// Enable or disable registry de-duplication
    pub fn with_dedupe_registered_peers(mut self, dedupe: bool) -> Self {
        self.dedupe_registered_peers = dedupe;
        self
    }

    /// Set compare-and-swap attempts (at least one)
    pub fn with_max_update_attempts(mut self, attempts: usize) -> Self {
        self.max_update_attempts = attempts.max(1);
        self
    }
}

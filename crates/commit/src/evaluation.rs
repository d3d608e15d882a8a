//! Vote evaluation
//!
//! Derives a transaction's final decision from its peers' votes and its
//! deadline. Evaluation is a pure function of a transaction snapshot and a
//! point in time; callers decide whether and how to persist the result.

use crate::error::{CommitError, Result};
use crate::types::{Transaction, VoteValue};
use chrono::{DateTime, Utc};

/// Rule used to turn votes into a decision
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum EvaluationMode {
    /// Look at the first peer only.
    ///
    /// Reproduces the historical ledger program, whose loop returned on the
    /// first iteration: an abort (or a missed deadline) by the first peer
    /// aborts, anything else stays pending. Transactions with more than one
    /// peer can therefore never commit through voting under this rule.
    FirstPeer,

    /// Fold over every peer: any abort aborts, any pending vote past the
    /// deadline aborts, any pending vote before it waits, unanimous commit
    /// commits.
    #[default]
    AllPeers,
}

/// Outcome of an evaluation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verdict {
    /// Not enough information yet
    Pending,
    /// A final decision (`Commit` or `Abort`)
    Decided(VoteValue),
}

impl Verdict {
    /// The decision this verdict stands for (`Pending` when undecided)
    pub fn decision(&self) -> VoteValue {
        match self {
            Verdict::Pending => VoteValue::Pending,
            Verdict::Decided(decision) => *decision,
        }
    }

    pub fn is_decided(&self) -> bool {
        matches!(self, Verdict::Decided(_))
    }
}

/// Evaluate `transaction` at time `now`
///
/// A deadline is missed when `now` is strictly after `expires_at`.
pub fn evaluate(
    transaction: &Transaction,
    now: DateTime<Utc>,
    mode: EvaluationMode,
) -> Result<Verdict> {
    let Some(first) = transaction.involved_peers.first() else {
        return Err(CommitError::InvalidTransaction(format!(
            "transaction {} has no involved peers",
            transaction.transaction_id
        )));
    };

    let expired = now > transaction.expires_at;

    let verdict = match mode {
        EvaluationMode::FirstPeer => match first.decision {
            VoteValue::Abort => Verdict::Decided(VoteValue::Abort),
            VoteValue::Pending if expired => Verdict::Decided(VoteValue::Abort),
            _ => Verdict::Pending,
        },
        EvaluationMode::AllPeers => {
            let votes = || transaction.involved_peers.iter().map(|p| p.decision);

            if votes().any(|v| v == VoteValue::Abort) {
                Verdict::Decided(VoteValue::Abort)
            } else if votes().any(|v| v == VoteValue::Pending) {
                if expired {
                    Verdict::Decided(VoteValue::Abort)
                } else {
                    Verdict::Pending
                }
            } else {
                Verdict::Decided(VoteValue::Commit)
            }
        }
    };

    Ok(verdict)
}

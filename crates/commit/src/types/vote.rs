//! Vote and decision values
//!
//! The ledger records these as single-letter sentinels (`"P"`, `"C"`, `"A"`).
//! An empty string is what an unset field looks like in older records, so it
//! decodes to `Pending` like `"P"` does. Long names are accepted on input.

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

/// A peer's vote, or a transaction's final decision
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum VoteValue {
    /// No vote yet / no decision yet
    #[default]
    Pending,
    /// Agree to commit
    Commit,
    /// Refuse; absorbs every other vote
    Abort,
}

impl VoteValue {
    /// Sentinel stored in the ledger
    pub fn as_str(&self) -> &'static str {
        match self {
            VoteValue::Pending => "P",
            VoteValue::Commit => "C",
            VoteValue::Abort => "A",
        }
    }

    /// Whether this is a final decision (`Commit` or `Abort`)
    pub fn is_terminal(&self) -> bool {
        !matches!(self, VoteValue::Pending)
    }
}

impl fmt::Display for VoteValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            VoteValue::Pending => "Pending",
            VoteValue::Commit => "Commit",
            VoteValue::Abort => "Abort",
        };
        f.write_str(name)
    }
}

impl FromStr for VoteValue {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "" | "P" => return Ok(VoteValue::Pending),
            "C" => return Ok(VoteValue::Commit),
            "A" => return Ok(VoteValue::Abort),
            _ => {}
        }

        if s.eq_ignore_ascii_case("pending") {
            Ok(VoteValue::Pending)
        } else if s.eq_ignore_ascii_case("commit") {
            Ok(VoteValue::Commit)
        } else if s.eq_ignore_ascii_case("abort") {
            Ok(VoteValue::Abort)
        } else {
            Err(format!("Unknown vote value: {:?}", s))
        }
    }
}

impl Serialize for VoteValue {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for VoteValue {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(serde::de::Error::custom)
    }
}

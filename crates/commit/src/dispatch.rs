//! Named-operation dispatch
//!
//! Callers reach the coordinator through a function name and a flat list of
//! string arguments. JSON payloads are decoded here; results come back as
//! bytes, and failures as a message, so that no error ever escapes as a
//! panic or takes the host down.

use crate::coordinator::CommitCoordinator;
use crate::error::{CommitError, Result};
use crate::types::{NewTransactionRequest, PeerUpdateRequest};
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

/// Operations reachable through the dispatcher
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Function {
    AddTransaction,
    QueryTransaction,
    MakePeerDecision,
    QueryFinalDecision,
    RegisterPeer,
    GetRegisteredPeers,
}

impl Function {
    pub const ALL: [Function; 6] = [
        Function::AddTransaction,
        Function::QueryTransaction,
        Function::MakePeerDecision,
        Function::QueryFinalDecision,
        Function::RegisterPeer,
        Function::GetRegisteredPeers,
    ];

    /// Name callers use to invoke this operation
    pub fn name(&self) -> &'static str {
        match self {
            Function::AddTransaction => "addTransaction",
            Function::QueryTransaction => "queryTransaction",
            Function::MakePeerDecision => "makePeerDecision",
            Function::QueryFinalDecision => "queryFinalDecision",
            Function::RegisterPeer => "registerPeer",
            Function::GetRegisteredPeers => "getRegisteredPeers",
        }
    }
}

impl fmt::Display for Function {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Function {
    type Err = CommitError;

    fn from_str(s: &str) -> Result<Self> {
        Function::ALL
            .into_iter()
            .find(|function| function.name() == s)
            .ok_or_else(|| CommitError::InvalidFunction(s.to_string()))
    }
}

/// Response handed back to the caller of a named operation
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InvocationResponse {
    /// Operation succeeded, with an optional payload
    Success(Option<Vec<u8>>),

    /// Operation failed; nothing was persisted
    Error(String),
}

impl InvocationResponse {
    pub fn is_success(&self) -> bool {
        matches!(self, InvocationResponse::Success(_))
    }

    /// Payload of a successful response
    pub fn payload(&self) -> Option<&[u8]> {
        match self {
            InvocationResponse::Success(payload) => payload.as_deref(),
            InvocationResponse::Error(_) => None,
        }
    }
}

impl From<Result<Option<Vec<u8>>>> for InvocationResponse {
    fn from(result: Result<Option<Vec<u8>>>) -> Self {
        match result {
            Ok(payload) => InvocationResponse::Success(payload),
            Err(e) => InvocationResponse::Error(e.to_string()),
        }
    }
}

/// Routes named operations to a coordinator
#[derive(Clone)]
pub struct Dispatcher {
    coordinator: Arc<CommitCoordinator>,
}

impl Dispatcher {
    pub fn new(coordinator: Arc<CommitCoordinator>) -> Self {
        Self { coordinator }
    }

    pub fn coordinator(&self) -> &CommitCoordinator {
        &self.coordinator
    }

    /// Invoke `function`, reporting failures as `InvocationResponse::Error`
    pub fn invoke<A: AsRef<str>>(&self, function: &str, args: &[A]) -> InvocationResponse {
        let result = self.try_invoke(function, args);
        if let Err(e) = &result {
            tracing::debug!("{} failed: {}", function, e);
        }
        result.into()
    }

    /// Invoke `function`, keeping the typed error
    pub fn try_invoke<A: AsRef<str>>(&self, function: &str, args: &[A]) -> Result<Option<Vec<u8>>> {
        let function = function.parse::<Function>().inspect_err(|_| {
            tracing::warn!("Unknown function requested: {}", function);
        })?;

        match function {
            Function::AddTransaction => {
                let request: NewTransactionRequest = decode_payload(first_arg(args)?)?;
                self.coordinator.add_transaction(&request)?;
                Ok(None)
            }
            Function::QueryTransaction => {
                if args.len() != 1 {
                    return Err(CommitError::InvalidInput(format!(
                        "expected 1 argument, got {}",
                        args.len()
                    )));
                }
                let payload = self.coordinator.query_transaction(args[0].as_ref())?;
                Ok(Some(payload))
            }
            Function::MakePeerDecision => {
                let request: PeerUpdateRequest = decode_payload(first_arg(args)?)?;
                self.coordinator.make_peer_decision(&request)?;
                Ok(None)
            }
            Function::QueryFinalDecision => {
                let response = self.coordinator.query_final_decision(first_arg(args)?)?;
                Ok(Some(serde_json::to_vec(&response)?))
            }
            Function::RegisterPeer => {
                self.coordinator.register_peer(first_arg(args)?)?;
                Ok(None)
            }
            Function::GetRegisteredPeers => Ok(Some(self.coordinator.registered_peers_raw()?)),
        }
    }
}

/// First argument; any further arguments are ignored
fn first_arg<A: AsRef<str>>(args: &[A]) -> Result<&str> {
    args.first()
        .map(AsRef::as_ref)
        .ok_or_else(|| CommitError::InvalidInput("expected at least 1 argument".to_string()))
}

fn decode_payload<T: serde::de::DeserializeOwned>(raw: &str) -> Result<T> {
    serde_json::from_str(raw)
        .map_err(|e| CommitError::InvalidInput(format!("invalid parameter: {}", e)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_function_names_round_trip() {
        for function in Function::ALL {
            assert_eq!(function.name().parse::<Function>().unwrap(), function);
        }
        assert!(matches!(
            "deleteTransaction".parse::<Function>(),
            Err(CommitError::InvalidFunction(name)) if name == "deleteTransaction"
        ));
        // Names are case sensitive
        assert!("AddTransaction".parse::<Function>().is_err());
    }

    #[test]
    fn test_response_from_result() {
        let ok = InvocationResponse::from(Ok(Some(b"x".to_vec())));
        assert!(ok.is_success());
        assert_eq!(ok.payload(), Some(&b"x"[..]));

        let err = InvocationResponse::from(Err(CommitError::NotFound("tx1".to_string())));
        assert_eq!(
            err,
            InvocationResponse::Error("Transaction does not exist: tx1".to_string())
        );
        assert_eq!(err.payload(), None);
    }

    #[test]
    fn test_first_arg() {
        let none: [&str; 0] = [];
        assert!(matches!(first_arg(&none), Err(CommitError::InvalidInput(_))));
        assert_eq!(first_arg(&["a", "b"]).unwrap(), "a");
    }
}

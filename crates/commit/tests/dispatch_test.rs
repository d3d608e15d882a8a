//! Integration tests for named-operation dispatch

use chrono::{TimeDelta, TimeZone, Utc};
use proven_commit::{
    CommitCoordinator, CommitError, CoordinatorConfig, Dispatcher, InvocationResponse,
    ManualClock, Transaction, VoteValue,
};
use proven_ledger::MemoryStore;
use std::sync::Arc;

fn dispatcher() -> (Arc<ManualClock>, Dispatcher) {
    let store = Arc::new(MemoryStore::new());
    let clock = Arc::new(ManualClock::new(
        Utc.with_ymd_and_hms(2024, 3, 1, 9, 0, 0).unwrap(),
    ));
    let coordinator =
        CommitCoordinator::with_config(store, CoordinatorConfig::default(), clock.clone());
    (clock, Dispatcher::new(Arc::new(coordinator)))
}

fn ok(response: InvocationResponse) -> Option<Vec<u8>> {
    match response {
        InvocationResponse::Success(payload) => payload,
        InvocationResponse::Error(e) => panic!("Expected success, got error: {}", e),
    }
}

fn json(payload: Option<Vec<u8>>) -> serde_json::Value {
    serde_json::from_slice(&payload.expect("Expected a payload")).unwrap()
}

#[test]
fn test_full_commit_flow() {
    let (_clock, d) = dispatcher();

    let created = d.invoke(
        "addTransaction",
        &[r#"{"TransactionID":"tx1","InvolvedPeers":[{"PeerID":"p1"},{"PeerID":"p2"}]}"#],
    );
    assert_eq!(ok(created), None);

    let record = json(ok(d.invoke("queryTransaction", &["tx1"])));
    assert_eq!(record["TransactionID"], "tx1");
    assert_eq!(record["FinalDecision"], "P");
    assert_eq!(record["InvolvedPeers"][1]["PeerDecision"], "P");
    assert_eq!(record["TransactionExpire"], "2024-03-01T09:05:00Z");

    for peer in ["p1", "p2"] {
        let vote = format!(
            r#"{{"TransactionID":"tx1","PeerID":"{}","Decision":"C"}}"#,
            peer
        );
        assert_eq!(ok(d.invoke("makePeerDecision", &[vote])), None);
    }

    let decision = ok(d.invoke("queryFinalDecision", &["tx1"])).unwrap();
    assert_eq!(
        String::from_utf8(decision).unwrap(),
        r#"{"TransactionID":"tx1","FinalDecision":"C"}"#
    );
}

#[test]
fn test_timeout_flow() {
    let (clock, d) = dispatcher();
    ok(d.invoke(
        "addTransaction",
        &[r#"{"TransactionID":"tx1","InvolvedPeers":[{"PeerID":"p1"},{"PeerID":"p2"}]}"#],
    ));
    ok(d.invoke(
        "makePeerDecision",
        &[r#"{"TransactionID":"tx1","PeerID":"p1","Decision":"Commit"}"#],
    ));

    let decision = json(ok(d.invoke("queryFinalDecision", &["tx1"])));
    assert_eq!(decision["FinalDecision"], "P");

    clock.advance(TimeDelta::minutes(5) + TimeDelta::milliseconds(1));
    let decision = json(ok(d.invoke("queryFinalDecision", &["tx1"])));
    assert_eq!(decision["FinalDecision"], "A");

    let record: Transaction =
        serde_json::from_slice(&ok(d.invoke("queryTransaction", &["tx1"])).unwrap()).unwrap();
    assert_eq!(record.final_decision, VoteValue::Abort);
}

#[test]
fn test_unknown_function() {
    let (_clock, d) = dispatcher();
    let no_args: [&str; 0] = [];

    assert_eq!(
        d.invoke("dropTransaction", &no_args),
        InvocationResponse::Error("Invalid function: dropTransaction".to_string())
    );
    assert!(matches!(
        d.try_invoke("dropTransaction", &no_args),
        Err(CommitError::InvalidFunction(_))
    ));
}

#[test]
fn test_argument_counts() {
    let (_clock, d) = dispatcher();
    let no_args: [&str; 0] = [];

    for function in [
        "addTransaction",
        "queryTransaction",
        "makePeerDecision",
        "queryFinalDecision",
        "registerPeer",
    ] {
        assert!(
            matches!(
                d.try_invoke(function, &no_args),
                Err(CommitError::InvalidInput(_))
            ),
            "{} without arguments",
            function
        );
    }

    // queryTransaction takes exactly one argument
    assert!(matches!(
        d.try_invoke("queryTransaction", &["tx1", "extra"]),
        Err(CommitError::InvalidInput(_))
    ));

    // Others ignore trailing arguments
    ok(d.invoke("registerPeer", &["p1", "ignored"]));
    let peers = json(ok(d.invoke("getRegisteredPeers", &["ignored"])));
    assert_eq!(peers, serde_json::json!([{"PeerID": "p1"}]));
}

#[test]
fn test_malformed_payloads() {
    let (_clock, d) = dispatcher();

    for (function, payload) in [
        ("addTransaction", "not json"),
        ("addTransaction", r#"{"TransactionID": 7}"#),
        ("addTransaction", r#"{"TransactionID":"tx1","InvolvedPeers":[]}"#),
        ("addTransaction", r#"{"InvolvedPeers":[{"PeerID":"p1"}]}"#),
        ("makePeerDecision", "[1, 2]"),
        ("makePeerDecision", r#"{"PeerID":"p1","Decision":"C"}"#),
    ] {
        assert!(
            matches!(
                d.try_invoke(function, &[payload]),
                Err(CommitError::InvalidInput(_))
            ),
            "{} with {}",
            function,
            payload
        );
    }

    let response = d.invoke("addTransaction", &["not json"]);
    assert!(!response.is_success());
}

#[test]
fn test_error_kinds_surface_through_try_invoke() {
    let (_clock, d) = dispatcher();
    let create = r#"{"TransactionID":"tx1","InvolvedPeers":[{"PeerID":"p1"},{"PeerID":"p2"}]}"#;

    ok(d.invoke("addTransaction", &[create]));
    assert!(matches!(
        d.try_invoke("addTransaction", &[create]),
        Err(CommitError::AlreadyExists(_))
    ));
    assert!(matches!(
        d.try_invoke("queryTransaction", &["tx2"]),
        Err(CommitError::NotFound(_))
    ));
    assert!(matches!(
        d.try_invoke(
            "makePeerDecision",
            &[r#"{"TransactionID":"tx1","PeerID":"p9","Decision":"Commit"}"#]
        ),
        Err(CommitError::PeerNotFound { .. })
    ));
    assert!(matches!(
        d.try_invoke(
            "makePeerDecision",
            &[r#"{"TransactionID":"tx2","PeerID":"p1","Decision":"C"}"#]
        ),
        Err(CommitError::NotFound(_))
    ));

    // Failures never poison later calls
    let decision = json(ok(d.invoke("queryFinalDecision", &["tx1"])));
    assert_eq!(decision["FinalDecision"], "P");
}

#[test]
fn test_registered_peers() {
    let (_clock, d) = dispatcher();
    let no_args: [&str; 0] = [];

    assert_eq!(ok(d.invoke("getRegisteredPeers", &no_args)), Some(b"[]".to_vec()));

    ok(d.invoke("registerPeer", &["p1"]));
    ok(d.invoke("registerPeer", &["p2"]));

    assert_eq!(
        ok(d.invoke("getRegisteredPeers", &no_args)),
        Some(br#"[{"PeerID":"p1"},{"PeerID":"p2"}]"#.to_vec())
    );
    assert_eq!(d.coordinator().registered_peers().unwrap().len(), 2);

    assert!(matches!(
        d.try_invoke("registerPeer", &[""]),
        Err(CommitError::InvalidInput(_))
    ));
}

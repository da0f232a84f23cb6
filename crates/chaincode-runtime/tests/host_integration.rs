//! # Host Integration Tests
//!
//! Feeds protocol lines through `ChaincodeHost` and checks replies and
//! committed ledger state.

use asset_chaincode::adapters::{InMemoryLedger, StateDatabase};
use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;
use chaincode_runtime::{ChaincodeHost, HostConfig, InvocationReply};
use serde_json::{json, Value};
use std::sync::Arc;

fn request(function: &str, args: &[&str], transient: Option<(&str, Value)>) -> String {
    let transient = match transient {
        Some((key, value)) => json!({ key: STANDARD.encode(value.to_string()) }),
        None => json!({}),
    };
    json!({ "function": function, "args": args, "transient": transient }).to_string()
}

fn create_line(name: &str, owner: &str, secret: &str) -> String {
    request(
        "create",
        &[],
        Some(("asset", json!({ "name": name, "owner": owner, "secret": secret }))),
    )
}

fn payload_json(reply: &InvocationReply) -> Value {
    serde_json::from_slice(&reply.payload_bytes()).unwrap()
}

#[test]
fn test_create_commits_both_records() {
    let host = ChaincodeHost::new(&HostConfig::default());
    assert!(host.init().is_success());

    let reply = host.handle_line(&create_line("Asset1", "tom", "h1"));
    assert_eq!(reply.status, 200, "{}", reply.message);
    assert_eq!(reply.committed_writes, 2);
    assert!(host.ledger().contains("collectionAssets", "Asset1"));
    assert!(host.ledger().contains("collectionAssetPrivateDetails", "Asset1"));

    let read = host.handle_line(&request("read", &["Asset1"], None));
    assert_eq!(
        payload_json(&read),
        json!({ "docType": "Asset", "name": "Asset1", "owner": "tom" })
    );
    assert_eq!(read.committed_writes, 0);
}

#[test]
fn test_transfer_and_delete_round_trip() {
    let host = ChaincodeHost::new(&HostConfig::default());
    host.handle_line(&create_line("Asset1", "tom", "h1"));

    let transfer = host.handle_line(&request(
        "transfer",
        &[],
        Some(("asset_owner", json!({ "name": "Asset1", "owner": "jerry" }))),
    ));
    assert_eq!(transfer.status, 200);
    assert_eq!(transfer.committed_writes, 1);

    let owned = host.handle_line(&request("queryByOwner", &["jerry"], None));
    assert_eq!(payload_json(&owned)[0]["Key"], "Asset1");

    let delete = host.handle_line(&request(
        "delete",
        &[],
        Some(("asset_delete", json!({ "name": "Asset1" }))),
    ));
    assert_eq!(delete.status, 200);
    assert_eq!(delete.committed_writes, 2);
    assert!(host.ledger().is_empty());
}

#[test]
fn test_failed_invocation_leaves_ledger_unchanged() {
    let host = ChaincodeHost::new(&HostConfig::default());
    host.handle_line(&create_line("Asset1", "tom", "h1"));

    let duplicate = host.handle_line(&create_line("Asset1", "jerry", "h2"));
    assert_eq!(duplicate.status, 500);
    assert_eq!(duplicate.message, "asset already exists: Asset1");
    assert_eq!(duplicate.committed_writes, 0);
    assert!(duplicate.payload.is_empty());

    let details = host.handle_line(&request("readConfidentialDetails", &["Asset1"], None));
    assert_eq!(payload_json(&details)["secret"], "h1");
}

#[test]
fn test_leveldb_host_rejects_rich_queries() {
    let config = HostConfig {
        state_db: StateDatabase::GoLevelDb,
        ..HostConfig::default()
    };
    let host = ChaincodeHost::new(&config);

    let reply = host.handle_line(&request("queryAdHoc", &[r#"{"selector":{}}"#], None));
    assert_eq!(reply.status, 500);
    assert_eq!(reply.message, "rich queries are not supported by the state database");

    let range = host.handle_line(&request("rangeByName", &["", ""], None));
    assert_eq!(range.status, 200);
    assert_eq!(range.payload, "[]");
}

#[test]
fn test_shared_ledger_is_visible_to_host() {
    let ledger = Arc::new(InMemoryLedger::new());
    ledger
        .insert(
            "collectionAssets",
            "Seeded",
            br#"{"docType":"Asset","name":"Seeded","owner":"spike"}"#.to_vec(),
        )
        .unwrap();

    let host = ChaincodeHost::with_ledger(&HostConfig::default(), Arc::clone(&ledger));
    let reply = host.handle_line(&request("rangeByName", &["", ""], None));
    assert_eq!(payload_json(&reply)[0]["Key"], "Seeded");
    assert_eq!(ledger.open_cursors(), 0);
}

#[test]
fn test_reply_serializes_as_one_json_line() {
    let host = ChaincodeHost::new(&HostConfig::default());
    let reply = host.handle_line(&request("read", &["ghost"], None));
    let line = serde_json::to_string(&reply).unwrap();
    assert!(!line.contains('\n'));

    let parsed: Value = serde_json::from_str(&line).unwrap();
    assert_eq!(parsed["status"], 500);
    assert_eq!(parsed["message"], "Asset does not exist: ghost");
    assert_eq!(parsed["encoding"], "utf8");
}

//! # Asset Lifecycle Integration Tests
//!
//! Drives the chaincode through its entry points against in-memory ledgers.
//!
//! ## Test Categories
//!
//! 1. **Lifecycle** - create, read, transfer, delete round trips
//! 2. **Queries** - range and selector results, cursor release
//! 3. **Input Rejection** - nothing is written for invalid input
//! 4. **Partial Failure** - faulty store versus transaction simulation
//! 5. **Confidentiality** - secrets never reach responses or errors

use asset_chaincode::errors::StoreError;
use asset_chaincode::ports::{LedgerStore, ResultsIterator};
use asset_chaincode::prelude::*;
use serde_json::{json, Value};

// =============================================================================
// TEST HELPERS
// =============================================================================

fn init_test_logging() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter("asset_chaincode=debug")
        .with_test_writer()
        .try_init();
}

const PUBLIC: &str = "collectionAssets";
const PRIVATE: &str = "collectionAssetPrivateDetails";

fn create(name: &str, owner: &str, secret: &str) -> Invocation {
    let payload = json!({ "name": name, "owner": owner, "secret": secret });
    Invocation::new("create", Vec::<String>::new())
        .with_transient("asset", serde_json::to_vec(&payload).unwrap())
}

fn transfer(name: &str, owner: &str) -> Invocation {
    let payload = json!({ "name": name, "owner": owner });
    Invocation::new("transfer", Vec::<String>::new())
        .with_transient("asset_owner", serde_json::to_vec(&payload).unwrap())
}

fn delete(name: &str) -> Invocation {
    let payload = json!({ "name": name });
    Invocation::new("delete", Vec::<String>::new())
        .with_transient("asset_delete", serde_json::to_vec(&payload).unwrap())
}

fn query_keys(response: &Response) -> Vec<String> {
    assert!(response.is_success(), "query failed: {}", response.message);
    let parsed: Vec<Value> = serde_json::from_slice(&response.payload).unwrap();
    parsed
        .iter()
        .map(|entry| entry["Key"].as_str().unwrap().to_string())
        .collect()
}

/// Fails every write to one collection.
struct FailingWrites {
    inner: InMemoryLedger,
    failing_collection: &'static str,
}

impl LedgerStore for FailingWrites {
    fn get_private_data(&self, collection: &str, key: &str) -> Result<Option<Vec<u8>>, StoreError> {
        self.inner.get_private_data(collection, key)
    }

    fn put_private_data(
        &self,
        collection: &str,
        key: &str,
        value: &[u8],
    ) -> Result<(), StoreError> {
        if collection == self.failing_collection {
            return Err(StoreError::Unavailable("disk full".to_string()));
        }
        self.inner.put_private_data(collection, key, value)
    }

    fn del_private_data(&self, collection: &str, key: &str) -> Result<(), StoreError> {
        if collection == self.failing_collection {
            return Err(StoreError::Unavailable("disk full".to_string()));
        }
        self.inner.del_private_data(collection, key)
    }

    fn get_private_data_by_range(
        &self,
        collection: &str,
        start_key: &str,
        end_key: &str,
    ) -> Result<ResultsIterator<'_>, StoreError> {
        self.inner.get_private_data_by_range(collection, start_key, end_key)
    }

    fn get_private_data_query_result(
        &self,
        collection: &str,
        query: &str,
    ) -> Result<ResultsIterator<'_>, StoreError> {
        self.inner.get_private_data_query_result(collection, query)
    }
}

// =============================================================================
// LIFECYCLE
// =============================================================================

#[test]
fn test_full_lifecycle() {
    init_test_logging();
    let ledger = InMemoryLedger::new();
    let chaincode = Chaincode::default();

    assert!(chaincode.init().is_success());
    assert!(chaincode.invoke(&ledger, &create("Asset1", "tom", "h1")).is_success());

    let read = chaincode.invoke(&ledger, &Invocation::new("read", ["Asset1"]));
    assert_eq!(
        serde_json::from_slice::<Value>(&read.payload).unwrap(),
        json!({ "docType": "Asset", "name": "Asset1", "owner": "tom" })
    );

    let details = chaincode.invoke(
        &ledger,
        &Invocation::new("readConfidentialDetails", ["Asset1"]),
    );
    assert_eq!(
        serde_json::from_slice::<Value>(&details.payload).unwrap(),
        json!({ "docType": "AssetConfidentialDetails", "name": "Asset1", "secret": "h1" })
    );

    assert!(chaincode.invoke(&ledger, &transfer("Asset1", "jerry")).is_success());
    let read = chaincode.invoke(&ledger, &Invocation::new("read", ["Asset1"]));
    assert_eq!(
        serde_json::from_slice::<Value>(&read.payload).unwrap()["owner"],
        "jerry"
    );

    assert!(chaincode.invoke(&ledger, &delete("Asset1")).is_success());
    let read = chaincode.invoke(&ledger, &Invocation::new("read", ["Asset1"]));
    assert_eq!(read.status, 500);
    assert_eq!(read.message, "Asset does not exist: Asset1");
    assert!(ledger.is_empty());
}

#[test]
fn test_duplicate_create_keeps_first_records() {
    let ledger = InMemoryLedger::new();
    let chaincode = Chaincode::default();

    assert!(chaincode.invoke(&ledger, &create("Asset1", "tom", "h1")).is_success());
    let second = chaincode.invoke(&ledger, &create("Asset1", "jerry", "h2"));
    assert_eq!(second.status, 500);
    assert_eq!(second.message, "asset already exists: Asset1");

    let details = chaincode.invoke(
        &ledger,
        &Invocation::new("readConfidentialDetails", ["Asset1"]),
    );
    assert_eq!(
        serde_json::from_slice::<Value>(&details.payload).unwrap()["secret"],
        "h1"
    );
}

#[test]
fn test_configured_collections_are_used() {
    let ledger = InMemoryLedger::new();
    let config = ChaincodeConfig::default()
        .with_public_collection("pub")
        .with_private_collection("priv");
    let chaincode = Chaincode::new(config);

    assert!(chaincode.invoke(&ledger, &create("Asset1", "tom", "h1")).is_success());
    assert!(ledger.contains("pub", "Asset1"));
    assert!(ledger.contains("priv", "Asset1"));
    assert!(!ledger.contains(PUBLIC, "Asset1"));
}

// =============================================================================
// QUERIES
// =============================================================================

#[test]
fn test_range_and_owner_queries() {
    let ledger = InMemoryLedger::new();
    let chaincode = Chaincode::default();
    let owners = [
        ("Asset1", "tom"),
        ("Asset2", "jerry"),
        ("Asset3", "tom"),
        ("Asset4", "spike"),
    ];
    for (name, owner) in owners {
        assert!(chaincode.invoke(&ledger, &create(name, owner, "s")).is_success());
    }

    let range = chaincode.invoke(&ledger, &Invocation::new("rangeByName", ["Asset2", "Asset4"]));
    assert_eq!(query_keys(&range), vec!["Asset2", "Asset3"]);

    let all = chaincode.invoke(&ledger, &Invocation::new("rangeByName", ["", ""]));
    assert_eq!(query_keys(&all).len(), 4);

    let owned = chaincode.invoke(&ledger, &Invocation::new("queryByOwner", ["tom"]));
    assert_eq!(query_keys(&owned), vec!["Asset1", "Asset3"]);

    let adhoc = chaincode.invoke(
        &ledger,
        &Invocation::new("queryAdHoc", [r#"{"selector":{"owner":{"$in":["jerry","spike"]}}}"#]),
    );
    assert_eq!(query_keys(&adhoc), vec!["Asset2", "Asset4"]);

    // Query results embed the stored records verbatim
    let parsed: Vec<Value> = serde_json::from_slice(&owned.payload).unwrap();
    assert_eq!(
        parsed[0]["Record"],
        json!({ "docType": "Asset", "name": "Asset1", "owner": "tom" })
    );

    assert_eq!(ledger.open_cursors(), 0);
}

#[test]
fn test_empty_query_result() {
    let ledger = InMemoryLedger::new();
    let response =
        Chaincode::default().invoke(&ledger, &Invocation::new("queryByOwner", ["nobody"]));
    assert!(response.is_success());
    assert_eq!(response.payload, b"[]");
}

#[test]
fn test_rich_query_on_leveldb() {
    let ledger = InMemoryLedger::without_rich_query();
    let response = Chaincode::default().invoke(&ledger, &Invocation::new("queryByOwner", ["tom"]));
    assert_eq!(response.status, 500);
    assert_eq!(
        response.message,
        "rich queries are not supported by the state database"
    );
}

#[test]
fn test_unsupported_selector_operator_rejected() {
    let ledger = InMemoryLedger::new();
    ledger
        .insert(PUBLIC, "Asset1", br#"{"docType":"Asset","name":"Asset1","owner":"tom"}"#.to_vec())
        .unwrap();

    let response = Chaincode::default().invoke(
        &ledger,
        &Invocation::new("queryAdHoc", [r#"{"selector":{"owner":{"$regex":"t"}}}"#]),
    );
    assert_eq!(response.status, 500);
    assert!(response.message.starts_with("failed to read state: invalid query"));
    assert_eq!(ledger.open_cursors(), 0);
}

// =============================================================================
// INPUT REJECTION
// =============================================================================

#[test]
fn test_invalid_input_writes_nothing() {
    let ledger = InMemoryLedger::new();
    let chaincode = Chaincode::default();

    let cases = [
        (
            Invocation::new("create", Vec::<String>::new()),
            "asset must be a key in the transient map",
        ),
        (
            Invocation::new("create", Vec::<String>::new()).with_transient("asset", Vec::new()),
            "asset value in the transient map must be a non-empty JSON string",
        ),
        (
            Invocation::new("create", Vec::<String>::new())
                .with_transient("asset", br#"{"name":"Asset1","owner":"tom"}"#.to_vec()),
            "secret field must be a non-empty string",
        ),
        (
            Invocation::new("create", ["extra"]),
            "incorrect number of arguments for create: expecting 0, got 1",
        ),
        (
            Invocation::new("mint", Vec::<String>::new()),
            "received unknown function invocation: mint",
        ),
    ];

    for (invocation, expected) in cases {
        let response = chaincode.invoke(&ledger, &invocation);
        assert_eq!(response.status, 500);
        assert_eq!(response.message, expected);
    }
    assert!(ledger.is_empty());
}

#[test]
fn test_malformed_transient_json() {
    let ledger = InMemoryLedger::new();
    let invocation = Invocation::new("transfer", Vec::<String>::new())
        .with_transient("asset_owner", b"{not json".to_vec());

    let response = Chaincode::default().invoke(&ledger, &invocation);
    assert_eq!(response.status, 500);
    assert!(response
        .message
        .starts_with("failed to decode JSON of transient key asset_owner"));
}

#[test]
fn test_positional_transient_payload_rejected() {
    let ledger = InMemoryLedger::new();
    let chaincode = Chaincode::default();

    // Field order of an older client; the hash must never land in `owner`
    let positional = Invocation::new("create", Vec::<String>::new())
        .with_transient("asset", br#"["Asset1","f00dfeed","tom"]"#.to_vec());
    let response = chaincode.invoke(&ledger, &positional);
    assert_eq!(response.status, 500);
    assert!(response
        .message
        .starts_with("failed to decode JSON of transient key asset"));
    assert!(!response.message.contains("f00dfeed"));
    assert!(ledger.is_empty());

    let empty = Invocation::new("delete", Vec::<String>::new())
        .with_transient("asset_delete", b"[]".to_vec());
    let response = chaincode.invoke(&ledger, &empty);
    assert!(response
        .message
        .starts_with("failed to decode JSON of transient key asset_delete"));
}

// =============================================================================
// PARTIAL FAILURE
// =============================================================================

#[test]
fn test_direct_store_keeps_first_write_on_failure() {
    let store = FailingWrites {
        inner: InMemoryLedger::new(),
        failing_collection: PRIVATE,
    };

    let response = Chaincode::default().invoke(&store, &create("Asset1", "tom", "h1"));
    assert_eq!(response.status, 500);
    assert_eq!(response.message, "failed to write state: ledger unavailable: disk full");

    // The public write was issued before the private one failed
    assert!(store.inner.contains(PUBLIC, "Asset1"));
    assert!(!store.inner.contains(PRIVATE, "Asset1"));
}

#[test]
fn test_simulated_transaction_discards_failed_invocation() {
    let ledger = InMemoryLedger::new();
    let chaincode = Chaincode::default();

    let sim = TxSimulator::new(&ledger);
    let response = chaincode.invoke(&sim, &create("Asset1", "tom", ""));
    assert_eq!(response.status, 500);
    sim.discard();
    assert!(ledger.is_empty());

    let sim = TxSimulator::new(&ledger);
    assert!(chaincode.invoke(&sim, &create("Asset1", "tom", "h1")).is_success());
    // Uncommitted writes are invisible
    assert!(!ledger.contains(PUBLIC, "Asset1"));
    assert_eq!(sim.commit().unwrap(), 2);
    assert!(ledger.contains(PUBLIC, "Asset1"));
    assert!(ledger.contains(PRIVATE, "Asset1"));
}

// =============================================================================
// CONFIDENTIALITY
// =============================================================================

#[test]
fn test_secret_absent_from_public_surfaces() {
    init_test_logging();
    let ledger = InMemoryLedger::new();
    let chaincode = Chaincode::default();
    let secret = "s3cr3t-value";

    assert!(chaincode.invoke(&ledger, &create("Asset1", "tom", secret)).is_success());

    let duplicate = chaincode.invoke(&ledger, &create("Asset1", "tom", secret));
    assert!(!duplicate.message.contains(secret));

    let read = chaincode.invoke(&ledger, &Invocation::new("read", ["Asset1"]));
    assert!(!String::from_utf8_lossy(&read.payload).contains(secret));

    let range = chaincode.invoke(&ledger, &Invocation::new("rangeByName", ["", ""]));
    assert!(!String::from_utf8_lossy(&range.payload).contains(secret));

    // A malformed payload carrying the secret is not echoed back
    let malformed = Invocation::new("create", Vec::<String>::new())
        .with_transient("asset", format!(r#"{{"name":"A","secret":{secret}}}"#).into_bytes());
    let response = chaincode.invoke(&ledger, &malformed);
    assert_eq!(response.status, 500);
    assert!(!response.message.contains(secret));
}

//! In-memory ledger for tests and the development host.
//!
//! Collections are ordered maps, so range scans come back ascending by key.
//! Rich queries are evaluated by the [`selector`](super::selector) engine
//! when the ledger emulates CouchDB, and rejected when it emulates LevelDB.

use super::selector::SelectorQuery;
use crate::errors::StoreError;
use crate::ports::{KeyValue, LedgerStore, QueryCursor, ResultsIterator};
use std::collections::{BTreeMap, HashMap};
use std::fmt;
use std::ops::Bound;
use std::str::FromStr;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, RwLock};
use tracing::trace;

/// State database flavour emulated by [`InMemoryLedger`].
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum StateDatabase {
    /// Key/value plus JSON selector queries.
    #[default]
    CouchDb,
    /// Key/value only.
    GoLevelDb,
}

impl StateDatabase {
    #[must_use]
    pub fn supports_rich_query(self) -> bool {
        matches!(self, Self::CouchDb)
    }
}

impl fmt::Display for StateDatabase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::CouchDb => f.write_str("couchdb"),
            Self::GoLevelDb => f.write_str("goleveldb"),
        }
    }
}

impl FromStr for StateDatabase {
    type Err = StoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "couchdb" => Ok(Self::CouchDb),
            "goleveldb" | "leveldb" => Ok(Self::GoLevelDb),
            other => Err(StoreError::Unavailable(format!(
                "unknown state database: {other}"
            ))),
        }
    }
}

type Collection = BTreeMap<String, Vec<u8>>;

/// One buffered mutation: `Some` writes, `None` deletes.
pub type WriteOp = (String, String, Option<Vec<u8>>);

/// In-memory implementation of [`LedgerStore`].
pub struct InMemoryLedger {
    collections: RwLock<HashMap<String, Collection>>,
    state_db: StateDatabase,
    open_cursors: Arc<AtomicUsize>,
}

impl InMemoryLedger {
    /// Ledger with rich-query support.
    pub fn new() -> Self {
        Self::with_state_database(StateDatabase::CouchDb)
    }

    /// Ledger that rejects rich queries.
    pub fn without_rich_query() -> Self {
        Self::with_state_database(StateDatabase::GoLevelDb)
    }

    pub fn with_state_database(state_db: StateDatabase) -> Self {
        Self {
            collections: RwLock::new(HashMap::new()),
            state_db,
            open_cursors: Arc::new(AtomicUsize::new(0)),
        }
    }

    #[must_use]
    pub fn state_database(&self) -> StateDatabase {
        self.state_db
    }

    /// Seed a raw value, bypassing any chaincode validation.
    pub fn insert(
        &self,
        collection: &str,
        key: impl Into<String>,
        value: Vec<u8>,
    ) -> Result<(), StoreError> {
        let mut collections = self
            .collections
            .write()
            .map_err(|_| StoreError::LockPoisoned)?;
        collections
            .entry(collection.to_string())
            .or_default()
            .insert(key.into(), value);
        Ok(())
    }

    /// Whether a key is present. A poisoned lock reads as absent.
    #[must_use]
    pub fn contains(&self, collection: &str, key: &str) -> bool {
        self.collections
            .read()
            .map(|c| c.get(collection).is_some_and(|coll| coll.contains_key(key)))
            .unwrap_or(false)
    }

    /// Number of keys in a collection.
    #[must_use]
    pub fn len(&self, collection: &str) -> usize {
        self.collections
            .read()
            .map(|c| c.get(collection).map_or(0, BTreeMap::len))
            .unwrap_or(0)
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.collections
            .read()
            .map(|c| c.values().all(BTreeMap::is_empty))
            .unwrap_or(true)
    }

    /// Cursors handed out and not yet closed.
    #[must_use]
    pub fn open_cursors(&self) -> usize {
        self.open_cursors.load(Ordering::SeqCst)
    }

    /// Apply a batch of mutations under one lock acquisition.
    ///
    /// Returns the number of operations applied.
    pub fn apply_write_set(
        &self,
        writes: impl IntoIterator<Item = WriteOp>,
    ) -> Result<usize, StoreError> {
        let mut collections = self
            .collections
            .write()
            .map_err(|_| StoreError::LockPoisoned)?;
        let mut applied = 0;
        for (collection, key, value) in writes {
            match value {
                Some(bytes) => {
                    collections.entry(collection).or_default().insert(key, bytes);
                }
                None => {
                    if let Some(coll) = collections.get_mut(&collection) {
                        coll.remove(&key);
                    }
                }
            }
            applied += 1;
        }
        Ok(applied)
    }

    fn open_cursor(&self, results: Vec<KeyValue>) -> ResultsIterator<'_> {
        self.open_cursors.fetch_add(1, Ordering::SeqCst);
        trace!(results = results.len(), "Cursor opened");
        ResultsIterator::new(MemoryCursor {
            results: results.into_iter(),
            open_cursors: Arc::clone(&self.open_cursors),
            open: true,
        })
    }
}

impl Default for InMemoryLedger {
    fn default() -> Self {
        Self::new()
    }
}

impl LedgerStore for InMemoryLedger {
    fn get_private_data(&self, collection: &str, key: &str) -> Result<Option<Vec<u8>>, StoreError> {
        let collections = self
            .collections
            .read()
            .map_err(|_| StoreError::LockPoisoned)?;
        Ok(collections.get(collection).and_then(|c| c.get(key)).cloned())
    }

    fn put_private_data(
        &self,
        collection: &str,
        key: &str,
        value: &[u8],
    ) -> Result<(), StoreError> {
        self.insert(collection, key, value.to_vec())
    }

    fn del_private_data(&self, collection: &str, key: &str) -> Result<(), StoreError> {
        let mut collections = self
            .collections
            .write()
            .map_err(|_| StoreError::LockPoisoned)?;
        if let Some(coll) = collections.get_mut(collection) {
            coll.remove(key);
        }
        Ok(())
    }

    fn get_private_data_by_range(
        &self,
        collection: &str,
        start_key: &str,
        end_key: &str,
    ) -> Result<ResultsIterator<'_>, StoreError> {
        let collections = self
            .collections
            .read()
            .map_err(|_| StoreError::LockPoisoned)?;

        let lower = if start_key.is_empty() {
            Bound::Unbounded
        } else {
            Bound::Included(start_key)
        };
        let upper = if end_key.is_empty() {
            Bound::Unbounded
        } else {
            Bound::Excluded(end_key)
        };

        // BTreeMap::range panics on an inverted range
        let inverted = !start_key.is_empty() && !end_key.is_empty() && start_key >= end_key;
        let results = match collections.get(collection) {
            Some(coll) if !inverted => coll
                .range::<str, _>((lower, upper))
                .map(|(k, v)| KeyValue::new(k.clone(), v.clone()))
                .collect(),
            _ => Vec::new(),
        };
        drop(collections);

        Ok(self.open_cursor(results))
    }

    fn get_private_data_query_result(
        &self,
        collection: &str,
        query: &str,
    ) -> Result<ResultsIterator<'_>, StoreError> {
        if !self.state_db.supports_rich_query() {
            return Err(StoreError::QueryEngineUnsupported);
        }
        let query = SelectorQuery::parse(query)?;

        let collections = self
            .collections
            .read()
            .map_err(|_| StoreError::LockPoisoned)?;
        let results = match collections.get(collection) {
            Some(coll) => query.execute(coll.iter()),
            None => Vec::new(),
        };
        drop(collections);

        Ok(self.open_cursor(results))
    }
}

/// Snapshot cursor; decrements the ledger's open-cursor count on close.
struct MemoryCursor {
    results: std::vec::IntoIter<KeyValue>,
    open_cursors: Arc<AtomicUsize>,
    open: bool,
}

impl QueryCursor for MemoryCursor {
    fn next_result(&mut self) -> Option<Result<KeyValue, StoreError>> {
        if !self.open {
            return None;
        }
        self.results.next().map(Ok)
    }

    fn close(&mut self) -> Result<(), StoreError> {
        if self.open {
            self.open = false;
            self.open_cursors.fetch_sub(1, Ordering::SeqCst);
        }
        Ok(())
    }
}

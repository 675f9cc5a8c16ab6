//! Indexed key/value store abstraction
//!
//! The attribute manager persists its records through this trait. Records are
//! JSON objects grouped into named object stores; each store can declare
//! secondary indexes over top-level fields and is scanned through a cursor.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;
use thiserror::Error;

/// Errors raised by an [`AttributeStore`]
#[derive(Debug, Clone, PartialEq, Error)]
pub enum AttributeStoreError {
    #[error("object store `{0}` does not exist")]
    StoreNotFound(String),

    #[error("object store `{0}` already exists")]
    StoreExists(String),

    #[error("object store `{store}` has no index on `{index}`")]
    IndexNotFound { store: String, index: String },

    #[error("unique index `{index}` of `{store}` already holds {value}")]
    UniqueViolation {
        store: String,
        index: String,
        value: String,
    },

    #[error("object store `{0}` has run out of keys")]
    KeysExhausted(String),

    #[error("record cannot be stored: {0}")]
    Serialization(String),

    #[error("store unavailable: {0}")]
    Unavailable(String),
}

/// Result type for store operations
pub type StoreResult<T> = Result<T, AttributeStoreError>;

/// Primary key of a record, assigned by the store when not supplied
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct StoreKey(u64);

impl StoreKey {
    pub fn from_raw(raw: u64) -> Self {
        Self(raw)
    }

    pub fn raw(&self) -> u64 {
        self.0
    }
}

impl fmt::Display for StoreKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Secondary index over one top-level record field
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IndexSpec {
    pub field: String,
    pub unique: bool,
}

impl IndexSpec {
    pub fn new(field: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            unique: false,
        }
    }

    pub fn unique(field: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            unique: true,
        }
    }
}

/// Name and indexes of an object store
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoreSchema {
    pub name: String,
    pub indexes: Vec<IndexSpec>,
}

impl StoreSchema {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            indexes: Vec::new(),
        }
    }

    pub fn with_index(mut self, index: IndexSpec) -> Self {
        self.indexes.push(index);
        self
    }
}

/// Snapshot of the records matching an index lookup, in key order
#[derive(Debug)]
pub struct IndexCursor {
    records: std::vec::IntoIter<(StoreKey, Value)>,
}

impl IndexCursor {
    pub fn new(records: Vec<(StoreKey, Value)>) -> Self {
        Self {
            records: records.into_iter(),
        }
    }

    /// Records not yet visited
    pub fn remaining(&self) -> usize {
        self.records.len()
    }
}

impl Iterator for IndexCursor {
    type Item = (StoreKey, Value);

    fn next(&mut self) -> Option<Self::Item> {
        self.records.next()
    }
}

/// Asynchronous indexed key/value store
#[async_trait]
pub trait AttributeStore: Send + Sync {
    /// Create an object store. Fails with `StoreExists` if the name is taken.
    async fn create_store(&self, schema: StoreSchema) -> StoreResult<()>;

    /// Drop an object store and all its records
    async fn delete_store(&self, store: &str) -> StoreResult<()>;

    /// Insert or overwrite a record; `None` lets the store assign a key
    async fn put(&self, store: &str, key: Option<StoreKey>, value: Value) -> StoreResult<StoreKey>;

    async fn get(&self, store: &str, key: StoreKey) -> StoreResult<Option<Value>>;

    /// Delete a record. Returns whether it existed.
    async fn delete(&self, store: &str, key: StoreKey) -> StoreResult<bool>;

    /// Records whose indexed `field` equals `value`
    async fn open_index_cursor(&self, store: &str, field: &str, value: &Value) -> StoreResult<IndexCursor>;

    /// Every record of the store, in key order
    async fn records(&self, store: &str) -> StoreResult<Vec<(StoreKey, Value)>>;

    async fn store_exists(&self, store: &str) -> bool;
}

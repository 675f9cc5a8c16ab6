//! In-process implementation of [`AttributeStore`]

use super::attribute_store::{
    AttributeStore, AttributeStoreError, IndexCursor, StoreKey, StoreResult, StoreSchema,
};
use async_trait::async_trait;
use parking_lot::RwLock;
use serde_json::Value;
use std::collections::{BTreeMap, BTreeSet, HashMap};
use tracing::{debug, info};

#[derive(Debug)]
struct ObjectStore {
    schema: StoreSchema,
    next_key: u64,
    records: BTreeMap<StoreKey, Value>,
    /// field → canonical value → keys
    indexes: HashMap<String, BTreeMap<String, BTreeSet<StoreKey>>>,
}

impl ObjectStore {
    fn new(schema: StoreSchema) -> Self {
        let indexes = schema
            .indexes
            .iter()
            .map(|index| (index.field.clone(), BTreeMap::new()))
            .collect();
        Self {
            schema,
            next_key: 1,
            records: BTreeMap::new(),
            indexes,
        }
    }

    fn index_key(record: &Value, field: &str) -> Option<String> {
        match record.get(field) {
            None | Some(Value::Null) => None,
            Some(value) => Some(value.to_string()),
        }
    }

    fn check_unique(&self, key: StoreKey, record: &Value) -> StoreResult<()> {
        for index in self.schema.indexes.iter().filter(|index| index.unique) {
            let Some(value) = Self::index_key(record, &index.field) else {
                continue;
            };
            let taken = self
                .indexes
                .get(&index.field)
                .and_then(|entries| entries.get(&value))
                .is_some_and(|keys| keys.iter().any(|k| *k != key));
            if taken {
                return Err(AttributeStoreError::UniqueViolation {
                    store: self.schema.name.clone(),
                    index: index.field.clone(),
                    value,
                });
            }
        }
        Ok(())
    }

    fn unindex(&mut self, key: StoreKey, record: &Value) {
        for (field, entries) in self.indexes.iter_mut() {
            if let Some(value) = Self::index_key(record, field) {
                if let Some(keys) = entries.get_mut(&value) {
                    keys.remove(&key);
                    if keys.is_empty() {
                        entries.remove(&value);
                    }
                }
            }
        }
    }

    fn index(&mut self, key: StoreKey, record: &Value) {
        for (field, entries) in self.indexes.iter_mut() {
            if let Some(value) = Self::index_key(record, field) {
                entries.entry(value).or_default().insert(key);
            }
        }
    }

    fn put(&mut self, key: Option<StoreKey>, record: Value) -> StoreResult<StoreKey> {
        if !record.is_object() {
            return Err(AttributeStoreError::Serialization(format!(
                "records must be JSON objects, got {record}"
            )));
        }
        let key = key.unwrap_or(StoreKey::from_raw(self.next_key));
        let next_key = key
            .raw()
            .checked_add(1)
            .ok_or_else(|| AttributeStoreError::KeysExhausted(self.schema.name.clone()))?;
        self.check_unique(key, &record)?;

        if let Some(previous) = self.records.remove(&key) {
            self.unindex(key, &previous);
        }
        self.index(key, &record);
        self.records.insert(key, record);
        self.next_key = self.next_key.max(next_key);
        Ok(key)
    }

    fn delete(&mut self, key: StoreKey) -> bool {
        match self.records.remove(&key) {
            Some(previous) => {
                self.unindex(key, &previous);
                true
            }
            None => false,
        }
    }
}

/// Multimap-backed store living in process memory.
///
/// Locks are only held for the duration of a single call and never across an
/// `.await`.
#[derive(Debug, Default)]
pub struct InMemoryAttributeStore {
    stores: RwLock<HashMap<String, ObjectStore>>,
}

impl InMemoryAttributeStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of records in `store`, if it exists
    pub fn len(&self, store: &str) -> Option<usize> {
        self.stores.read().get(store).map(|s| s.records.len())
    }

    fn not_found(store: &str) -> AttributeStoreError {
        AttributeStoreError::StoreNotFound(store.to_string())
    }
}

#[async_trait]
impl AttributeStore for InMemoryAttributeStore {
    async fn create_store(&self, schema: StoreSchema) -> StoreResult<()> {
        let mut stores = self.stores.write();
        if stores.contains_key(&schema.name) {
            return Err(AttributeStoreError::StoreExists(schema.name));
        }
        info!(store = %schema.name, indexes = schema.indexes.len(), "object store created");
        stores.insert(schema.name.clone(), ObjectStore::new(schema));
        Ok(())
    }

    async fn delete_store(&self, store: &str) -> StoreResult<()> {
        match self.stores.write().remove(store) {
            Some(_) => {
                info!(store, "object store deleted");
                Ok(())
            }
            None => Err(Self::not_found(store)),
        }
    }

    async fn put(&self, store: &str, key: Option<StoreKey>, value: Value) -> StoreResult<StoreKey> {
        let mut stores = self.stores.write();
        let object_store = stores.get_mut(store).ok_or_else(|| Self::not_found(store))?;
        let key = object_store.put(key, value)?;
        debug!(store, key = %key, "record stored");
        Ok(key)
    }

    async fn get(&self, store: &str, key: StoreKey) -> StoreResult<Option<Value>> {
        let stores = self.stores.read();
        let object_store = stores.get(store).ok_or_else(|| Self::not_found(store))?;
        Ok(object_store.records.get(&key).cloned())
    }

    async fn delete(&self, store: &str, key: StoreKey) -> StoreResult<bool> {
        let mut stores = self.stores.write();
        let object_store = stores.get_mut(store).ok_or_else(|| Self::not_found(store))?;
        Ok(object_store.delete(key))
    }

    async fn open_index_cursor(&self, store: &str, field: &str, value: &Value) -> StoreResult<IndexCursor> {
        let stores = self.stores.read();
        let object_store = stores.get(store).ok_or_else(|| Self::not_found(store))?;
        let entries = object_store
            .indexes
            .get(field)
            .ok_or_else(|| AttributeStoreError::IndexNotFound {
                store: store.to_string(),
                index: field.to_string(),
            })?;

        let records = entries
            .get(&value.to_string())
            .map(|keys| {
                keys.iter()
                    .filter_map(|key| object_store.records.get(key).map(|record| (*key, record.clone())))
                    .collect()
            })
            .unwrap_or_default();
        Ok(IndexCursor::new(records))
    }

    async fn records(&self, store: &str) -> StoreResult<Vec<(StoreKey, Value)>> {
        let stores = self.stores.read();
        let object_store = stores.get(store).ok_or_else(|| Self::not_found(store))?;
        Ok(object_store
            .records
            .iter()
            .map(|(key, record)| (*key, record.clone()))
            .collect())
    }

    async fn store_exists(&self, store: &str) -> bool {
        self.stores.read().contains_key(store)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::IndexSpec;
    use serde_json::json;

    async fn people() -> InMemoryAttributeStore {
        let store = InMemoryAttributeStore::new();
        store
            .create_store(
                StoreSchema::new("people")
                    .with_index(IndexSpec::new("group"))
                    .with_index(IndexSpec::unique("email")),
            )
            .await
            .unwrap();
        store
    }

    #[tokio::test]
    async fn test_put_assigns_increasing_keys() {
        let store = people().await;
        let a = store.put("people", None, json!({"group": 1})).await.unwrap();
        let b = store.put("people", None, json!({"group": 1})).await.unwrap();
        assert!(b > a);
        assert_eq!(store.get("people", a).await.unwrap(), Some(json!({"group": 1})));
    }

    #[tokio::test]
    async fn test_last_key_is_refused_without_writing() {
        let store = people().await;
        let err = store
            .put("people", Some(StoreKey::from_raw(u64::MAX)), json!({"group": 9}))
            .await
            .unwrap_err();
        assert_eq!(err, AttributeStoreError::KeysExhausted("people".to_string()));
        assert_eq!(store.len("people"), Some(0));
        assert_eq!(store.open_index_cursor("people", "group", &json!(9)).await.unwrap().count(), 0);

        // the key sequence is unaffected
        let key = store.put("people", None, json!({"group": 1})).await.unwrap();
        assert_eq!(key, StoreKey::from_raw(1));
    }

    #[tokio::test]
    async fn test_index_cursor_follows_updates_and_deletes() {
        let store = people().await;
        let a = store.put("people", None, json!({"group": 1})).await.unwrap();
        let b = store.put("people", None, json!({"group": 1})).await.unwrap();
        store.put("people", None, json!({"group": 2})).await.unwrap();

        let cursor = store.open_index_cursor("people", "group", &json!(1)).await.unwrap();
        assert_eq!(cursor.remaining(), 2);

        store.put("people", Some(a), json!({"group": 2})).await.unwrap();
        assert!(store.delete("people", b).await.unwrap());
        let keys: Vec<StoreKey> = store
            .open_index_cursor("people", "group", &json!(1))
            .await
            .unwrap()
            .map(|(key, _)| key)
            .collect();
        assert!(keys.is_empty());
        assert_eq!(store.open_index_cursor("people", "group", &json!(2)).await.unwrap().count(), 2);
    }

    #[tokio::test]
    async fn test_unique_index_rejects_duplicates() {
        let store = people().await;
        let key = store.put("people", None, json!({"email": "a@b"})).await.unwrap();
        let err = store.put("people", None, json!({"email": "a@b"})).await.unwrap_err();
        assert!(matches!(err, AttributeStoreError::UniqueViolation { .. }));
        // rewriting the same record is not a violation
        store.put("people", Some(key), json!({"email": "a@b", "x": 1})).await.unwrap();
        assert_eq!(store.len("people"), Some(1));
    }

    #[tokio::test]
    async fn test_missing_store_and_index() {
        let store = people().await;
        assert!(matches!(
            store.get("nope", StoreKey::from_raw(1)).await,
            Err(AttributeStoreError::StoreNotFound(_))
        ));
        assert!(matches!(
            store.open_index_cursor("people", "age", &json!(3)).await,
            Err(AttributeStoreError::IndexNotFound { .. })
        ));
        assert!(matches!(
            store.create_store(StoreSchema::new("people")).await,
            Err(AttributeStoreError::StoreExists(_))
        ));
    }

    #[tokio::test]
    async fn test_rejects_non_object_records() {
        let store = people().await;
        assert!(matches!(
            store.put("people", None, json!(3)).await,
            Err(AttributeStoreError::Serialization(_))
        ));
    }
}

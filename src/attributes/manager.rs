//! Attribute manager over an [`AttributeStore`]

use super::{AttributeBatchReport, AttributeDefinition, AttributeError, AttributeMap, AttributeResult};
use crate::infrastructure::{AttributeStore, AttributeStoreError, IndexSpec, StoreKey, StoreSchema};
use indexmap::IndexSet;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use std::fmt;
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::{debug, info, warn};

const VALUE_STORE: &str = "attribute";
const DEFINITION_STORE: &str = "attributeNameId";

/// Owned attribute lookup, detached from the manager's lifetime
pub type AttributeFuture = Pin<Box<dyn Future<Output = AttributeResult<AttributeMap>> + Send + 'static>>;

/// One value of one attribute for one vertex name
#[derive(Debug, Clone, Serialize, Deserialize)]
struct AttributeValueRecord {
    /// Vertex name
    name: String,
    #[serde(rename = "attrId")]
    attr_id: StoreKey,
    value: Value,
}

/// Persists typed attributes keyed by vertex name.
///
/// Cheap to clone; clones share the store and the write gate. Multi-step
/// writes hold the gate for their whole duration so they never interleave.
/// Reads don't take it.
#[derive(Clone)]
pub struct AttributeManager {
    store: Arc<dyn AttributeStore>,
    write_gate: Arc<Mutex<()>>,
}

impl fmt::Debug for AttributeManager {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AttributeManager").finish_non_exhaustive()
    }
}

impl AttributeManager {
    /// Wrap a store. Call [`open`](Self::open) before use.
    pub fn new(store: Arc<dyn AttributeStore>) -> Self {
        Self {
            store,
            write_gate: Arc::new(Mutex::new(())),
        }
    }

    /// Create the object stores if they don't exist yet
    pub async fn open(&self) -> AttributeResult<()> {
        let schemas = [
            StoreSchema::new(VALUE_STORE)
                .with_index(IndexSpec::new("name"))
                .with_index(IndexSpec::new("attrId")),
            StoreSchema::new(DEFINITION_STORE).with_index(IndexSpec::unique("name")),
        ];
        for schema in schemas {
            if !self.store.store_exists(&schema.name).await {
                self.store.create_store(schema).await?;
            }
        }
        Ok(())
    }

    /// Drop every definition and value and start over
    pub async fn reset(&self) -> AttributeResult<()> {
        let _guard = self.write_gate.lock().await;
        for store in [VALUE_STORE, DEFINITION_STORE] {
            if self.store.store_exists(store).await {
                self.store.delete_store(store).await?;
            }
        }
        info!("attribute stores reset");
        self.open().await
    }

    /// Declare `name` and give every listed vertex the default value.
    ///
    /// The definition is written first; each vertex value is then written on
    /// its own, so one failing vertex does not undo the others.
    pub async fn add_attribute<I, S>(
        &self,
        vertex_names: I,
        name: &str,
        attribute_type: &str,
        default: Value,
    ) -> AttributeResult<AttributeBatchReport>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let vertex_names: IndexSet<String> = vertex_names.into_iter().map(Into::into).collect();
        let _guard = self.write_gate.lock().await;

        if self.find_definition(name).await?.is_some() {
            return Err(AttributeError::DuplicateDefinition(name.to_string()));
        }
        let definition = AttributeDefinition {
            name: name.to_string(),
            attribute_type: attribute_type.to_string(),
        };
        let definition_key = self
            .store
            .put(DEFINITION_STORE, None, encode(&definition)?)
            .await?;

        let mut report = AttributeBatchReport {
            definition: definition_key,
            written: 0,
            failed: Vec::new(),
        };
        for vertex_name in vertex_names {
            let record = AttributeValueRecord {
                name: vertex_name,
                attr_id: definition_key,
                value: default.clone(),
            };
            match self.store.put(VALUE_STORE, None, encode(&record)?).await {
                Ok(_) => report.written += 1,
                Err(e) => {
                    warn!(attribute = name, vertex = %record.name, error = %e, "attribute value not written");
                    report.failed.push((record.name, e));
                }
            }
        }
        debug!(attribute = name, written = report.written, failed = report.failed.len(), "attribute added");
        Ok(report)
    }

    /// Remove the definition of `name` and every value pointing at it.
    /// Returns the number of values removed.
    pub async fn remove_attribute(&self, name: &str) -> AttributeResult<usize> {
        let _guard = self.write_gate.lock().await;
        let (definition_key, _) = self
            .find_definition(name)
            .await?
            .ok_or_else(|| AttributeError::DefinitionNotFound(name.to_string()))?;
        self.store.delete(DEFINITION_STORE, definition_key).await?;

        let cursor = self
            .store
            .open_index_cursor(VALUE_STORE, "attrId", &json!(definition_key))
            .await?;
        let mut removed = 0;
        for (key, _) in cursor {
            if self.store.delete(VALUE_STORE, key).await? {
                removed += 1;
            }
        }
        debug!(attribute = name, removed, "attribute removed");
        Ok(removed)
    }

    /// All attributes of the vertices called `vertex_name`.
    ///
    /// Values whose definition no longer exists are skipped.
    pub async fn vertex_attributes(&self, vertex_name: &str) -> AttributeResult<AttributeMap> {
        let cursor = self
            .store
            .open_index_cursor(VALUE_STORE, "name", &json!(vertex_name))
            .await?;

        let mut attributes = AttributeMap::new();
        for (key, raw) in cursor {
            let record: AttributeValueRecord = decode(VALUE_STORE, key, raw)?;
            match self.store.get(DEFINITION_STORE, record.attr_id).await? {
                Some(raw) => {
                    let definition: AttributeDefinition = decode(DEFINITION_STORE, record.attr_id, raw)?;
                    attributes.insert(definition.name, record.value);
                }
                None => debug!(vertex = vertex_name, attr_id = %record.attr_id, "value without definition skipped"),
            }
        }
        Ok(attributes)
    }

    /// Same as [`vertex_attributes`](Self::vertex_attributes) but owning
    /// everything it needs, so it can be awaited after the caller returns
    pub fn fetch_vertex_attributes(&self, vertex_name: impl Into<String>) -> AttributeFuture {
        let manager = self.clone();
        let vertex_name = vertex_name.into();
        Box::pin(async move { manager.vertex_attributes(&vertex_name).await })
    }

    /// Set the value of an existing attribute for one vertex name
    pub async fn set_vertex_attribute(&self, vertex_name: &str, name: &str, value: Value) -> AttributeResult<()> {
        let _guard = self.write_gate.lock().await;
        let (definition_key, _) = self
            .find_definition(name)
            .await?
            .ok_or_else(|| AttributeError::DefinitionNotFound(name.to_string()))?;

        let mut existing = None;
        let cursor = self
            .store
            .open_index_cursor(VALUE_STORE, "name", &json!(vertex_name))
            .await?;
        for (key, raw) in cursor {
            let record: AttributeValueRecord = decode(VALUE_STORE, key, raw)?;
            if record.attr_id == definition_key {
                existing = Some(key);
                break;
            }
        }

        let record = AttributeValueRecord {
            name: vertex_name.to_string(),
            attr_id: definition_key,
            value,
        };
        self.store.put(VALUE_STORE, existing, encode(&record)?).await?;
        Ok(())
    }

    /// Delete every value stored for `vertex_name`. Returns how many went.
    pub async fn remove_vertex_values(&self, vertex_name: &str) -> AttributeResult<usize> {
        let _guard = self.write_gate.lock().await;
        let cursor = self
            .store
            .open_index_cursor(VALUE_STORE, "name", &json!(vertex_name))
            .await?;
        let mut removed = 0;
        for (key, _) in cursor {
            if self.store.delete(VALUE_STORE, key).await? {
                removed += 1;
            }
        }
        if removed > 0 {
            debug!(vertex = vertex_name, removed, "vertex attribute values purged");
        }
        Ok(removed)
    }

    /// Every declared attribute
    pub async fn definitions(&self) -> AttributeResult<Vec<AttributeDefinition>> {
        self.store
            .records(DEFINITION_STORE)
            .await?
            .into_iter()
            .map(|(key, raw)| decode(DEFINITION_STORE, key, raw))
            .collect()
    }

    async fn find_definition(&self, name: &str) -> AttributeResult<Option<(StoreKey, AttributeDefinition)>> {
        let mut cursor = self
            .store
            .open_index_cursor(DEFINITION_STORE, "name", &json!(name))
            .await?;
        match cursor.next() {
            Some((key, raw)) => Ok(Some((key, decode(DEFINITION_STORE, key, raw)?))),
            None => Ok(None),
        }
    }
}

fn encode<T: Serialize>(record: &T) -> AttributeResult<Value> {
    serde_json::to_value(record).map_err(|e| AttributeStoreError::Serialization(e.to_string()).into())
}

fn decode<T: DeserializeOwned>(store: &str, key: StoreKey, raw: Value) -> AttributeResult<T> {
    serde_json::from_value(raw).map_err(|e| AttributeError::CorruptRecord {
        store: store.to_string(),
        key,
        reason: e.to_string(),
    })
}

//! Named vertex attributes
//!
//! Attributes are declared once by name and then hold one value per vertex
//! *name*. They live in an [`AttributeStore`](crate::infrastructure::AttributeStore)
//! and are read and written asynchronously, independent of rendering.

mod manager;

pub use manager::{AttributeFuture, AttributeManager};

use crate::infrastructure::{AttributeStoreError, StoreKey};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;
use thiserror::Error;

/// Attribute name → value for one vertex
pub type AttributeMap = BTreeMap<String, Value>;

/// Errors that can occur during attribute operations
#[derive(Debug, Clone, PartialEq, Error)]
pub enum AttributeError {
    #[error(transparent)]
    Store(#[from] AttributeStoreError),

    #[error("attribute `{0}` is not defined")]
    DefinitionNotFound(String),

    #[error("attribute `{0}` is already defined")]
    DuplicateDefinition(String),

    #[error("corrupt record {key} in `{store}`: {reason}")]
    CorruptRecord {
        store: String,
        key: StoreKey,
        reason: String,
    },
}

/// Result type for attribute operations
pub type AttributeResult<T> = Result<T, AttributeError>;

/// Declaration of an attribute
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AttributeDefinition {
    pub name: String,
    /// Free-form type tag such as "number" or "string"
    #[serde(rename = "type")]
    pub attribute_type: String,
}

/// Outcome of a multi-vertex write
#[derive(Debug, Clone, PartialEq)]
pub struct AttributeBatchReport {
    /// Key of the definition record the values point at
    pub definition: StoreKey,
    pub written: usize,
    /// Vertex names whose value could not be written
    pub failed: Vec<(String, AttributeStoreError)>,
}

impl AttributeBatchReport {
    pub fn is_complete(&self) -> bool {
        self.failed.is_empty()
    }
}

//! Infrastructure layer implementations
//!
//! The storage seam used by the attribute manager and the bundled in-process
//! backend. Hosts with a real database implement [`AttributeStore`] for it.

mod attribute_store;
mod memory_store;

pub use attribute_store::{
    AttributeStore, AttributeStoreError, IndexCursor, IndexSpec, StoreKey, StoreResult,
    StoreSchema,
};
pub use memory_store::InMemoryAttributeStore;

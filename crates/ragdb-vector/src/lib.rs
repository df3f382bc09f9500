//! LanceDB-backed vector persistence and the serving-path retrieval
//! filter. `get_store` is the single construction point: it dispatches on
//! the configured store kind and wires in the active embedding provider.

use std::sync::Arc;

use anyhow::Result;

use ragdb_core::config::{Settings, VectorStoreKind};
use ragdb_core::traits::Embedder;

pub mod manifest;
pub mod retrieval;
pub mod schema;
pub mod store;

pub use retrieval::{search, SCORE_THRESHOLD};
pub use store::LanceVectorStore;

/// Construct the configured vector store implementation.
///
/// Dispatch is pure: one concrete backend per enum variant, and an
/// unrecognized kind is rejected when the configuration is deserialized
/// rather than defaulting silently.
pub fn get_store(settings: &Settings, embedder: Arc<dyn Embedder>) -> Result<LanceVectorStore> {
    match settings.vector_store {
        VectorStoreKind::Lance => Ok(LanceVectorStore::new(settings.db_path(), embedder)),
    }
}

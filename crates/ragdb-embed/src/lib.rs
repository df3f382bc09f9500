//! Embedding providers.
//!
//! One implementation per configured backend: hosted OpenAI and Google
//! APIs, and a local BGE-M3 model executed with candle for fully offline
//! operation. `use_fake_embeddings` swaps in the deterministic hash
//! embedder for fast tests.

use std::sync::Arc;

use anyhow::Result;
use tracing::info;

use ragdb_core::config::{EmbeddingProvider, Settings};
use ragdb_core::traits::Embedder;

mod device;
pub mod fake;
pub mod google;
pub mod local;
pub mod openai;
mod pooling;
mod tokenize;

pub use fake::{FakeEmbedder, FAKE_DIM};
pub use google::GoogleEmbedder;
pub use local::{LocalEmbedder, LOCAL_DIM};
pub use openai::OpenAiEmbedder;

/// Construct the configured embedding provider.
///
/// Provider selection is a closed enum, so an unsupported value is already
/// rejected when the configuration is loaded. The local variant fails here
/// when its model directory is missing; hosted variants defer credential
/// checks to the first call.
pub fn get_embedder(settings: &Settings) -> Result<Arc<dyn Embedder>> {
    if settings.use_fake_embeddings {
        info!("using deterministic fake embeddings");
        return Ok(Arc::new(FakeEmbedder::default()));
    }
    match settings.embedding_provider {
        EmbeddingProvider::Openai => {
            info!("using OpenAI embeddings: {}", settings.openai_embedding_model);
            Ok(Arc::new(OpenAiEmbedder::new(settings)))
        }
        EmbeddingProvider::Google => {
            info!("using Google embeddings: {}", settings.google_embedding_model);
            Ok(Arc::new(GoogleEmbedder::new(settings)))
        }
        EmbeddingProvider::Huggingface => {
            info!("using local embeddings from {}", settings.local_model_dir);
            Ok(Arc::new(LocalEmbedder::new(&settings.model_dir())?))
        }
    }
}

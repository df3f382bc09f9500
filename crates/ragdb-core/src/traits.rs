use std::sync::Arc;

use async_trait::async_trait;

use crate::types::{DocumentChunk, ScoredChunk};

/// Maps text to fixed-dimension vectors. One implementation per provider;
/// all vectors from a given implementation share `dim()` and are
/// L2-normalized.
#[async_trait]
pub trait Embedder: Send + Sync {
    /// Stable identifier for the provider/model (e.g. `openai:text-embedding-3-small:d1536`).
    /// Persisted with the store and validated on read.
    fn id(&self) -> &str;

    /// Embedding dimensionality.
    fn dim(&self) -> usize;

    /// Compute embeddings for a batch of input texts, one vector per text.
    async fn embed_batch(&self, texts: &[String]) -> anyhow::Result<Vec<Vec<f32>>>;

    /// Embed a single query string.
    async fn embed_query(&self, text: &str) -> anyhow::Result<Vec<f32>> {
        let mut batch = self.embed_batch(&[text.to_string()]).await?;
        batch
            .pop()
            .ok_or_else(|| anyhow::anyhow!("embed_batch returned no vector for query"))
    }
}

/// Persists embedded chunks and answers nearest-neighbor queries.
#[async_trait]
pub trait VectorStore: Send + Sync {
    /// Embed and persist `chunks`, replacing any existing store wholesale.
    async fn write(&self, chunks: &[DocumentChunk]) -> anyhow::Result<()>;

    /// Return up to `k` neighbors of `query`, ordered by descending
    /// relevance score. When `score_threshold` is given, neighbors scoring
    /// below it are dropped as a post-pass.
    async fn read_nearest(
        &self,
        query: &str,
        k: usize,
        score_threshold: Option<f32>,
    ) -> anyhow::Result<Vec<ScoredChunk>>;
}

/// Fixed-k neighbor-fetch view over a [`VectorStore`], used by the answer
/// pipeline. Sugar over `read_nearest` with no threshold.
#[derive(Clone)]
pub struct Retriever {
    store: Arc<dyn VectorStore>,
    k: usize,
}

impl Retriever {
    pub const DEFAULT_K: usize = 5;

    pub fn new(store: Arc<dyn VectorStore>) -> Self {
        Self { store, k: Self::DEFAULT_K }
    }

    pub async fn retrieve(&self, query: &str) -> anyhow::Result<Vec<ScoredChunk>> {
        self.store.read_nearest(query, self.k, None).await
    }
}

/// A hosted large language model that turns a prompt into plain text.
#[async_trait]
pub trait ChatModel: Send + Sync {
    async fn generate(&self, prompt: &str) -> anyhow::Result<String>;
}

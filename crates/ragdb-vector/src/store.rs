//! LanceDB-backed vector store.
//!
//! Ingestion deletes any existing store wholesale and rewrites it; queries
//! only read. There is no incremental upsert: rebuilding from scratch is
//! what keeps a store from ever mixing embedding dimensions.

use std::fs;
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{anyhow, Result};
use async_trait::async_trait;
use futures::TryStreamExt;
use indicatif::{ProgressBar, ProgressStyle};
use lancedb::query::{ExecutableQuery, QueryBase};
use lancedb::{connect, Connection, DistanceType};
use tracing::{info, warn};

use arrow_array::{
    Float32Array, Int32Array, RecordBatch, RecordBatchIterator, StringArray,
};

use ragdb_core::error::Error;
use ragdb_core::traits::{Embedder, VectorStore};
use ragdb_core::types::{DocumentChunk, Meta, ScoredChunk};

use crate::manifest::StoreManifest;
use crate::schema::{build_arrow_schema, TABLE_NAME};

const EMBED_BATCH: usize = 64;

pub struct LanceVectorStore {
    path: PathBuf,
    embedder: Arc<dyn Embedder>,
}

impl LanceVectorStore {
    pub fn new(path: PathBuf, embedder: Arc<dyn Embedder>) -> Self {
        Self { path, embedder }
    }

    pub fn path(&self) -> &std::path::Path {
        &self.path
    }

    async fn connect(&self) -> Result<Connection> {
        Ok(connect(self.path.to_string_lossy().as_ref()).execute().await?)
    }

    async fn insert_batch(
        &self,
        db: &Connection,
        chunks: &[DocumentChunk],
        embeddings: &[Vec<f32>],
        id_offset: usize,
    ) -> Result<()> {
        let dim = self.embedder.dim();
        for e in embeddings {
            if e.len() != dim {
                return Err(Error::Operation(format!(
                    "embedding dimension {} does not match provider dimension {dim}",
                    e.len()
                ))
                .into());
            }
        }
        let schema = build_arrow_schema(dim as i32);
        let record_batch = chunks_to_record_batch(chunks, embeddings, id_offset, dim)?;
        let reader = Box::new(RecordBatchIterator::new(
            vec![Ok(record_batch)].into_iter(),
            schema,
        ));
        if db.table_names().execute().await?.contains(&TABLE_NAME.to_string()) {
            db.open_table(TABLE_NAME).execute().await?.add(reader).execute().await?;
        } else {
            db.create_table(TABLE_NAME, reader).execute().await?;
        }
        Ok(())
    }
}

#[async_trait]
impl VectorStore for LanceVectorStore {
    async fn write(&self, chunks: &[DocumentChunk]) -> Result<()> {
        if chunks.is_empty() {
            warn!("no chunks provided, skipping vector store write");
            return Ok(());
        }
        if self.path.exists() {
            // Irreversible: the whole store is rebuilt on every ingest.
            warn!("removing existing vector store at {}", self.path.display());
            fs::remove_dir_all(&self.path)?;
        }
        fs::create_dir_all(&self.path)?;

        let db = self.connect().await?;
        let pb = ProgressBar::new(chunks.len() as u64);
        pb.set_style(
            ProgressStyle::default_bar()
                .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} chunks ({percent}%) {msg}")
                .map_err(|e| anyhow!("progress template: {e}"))?
                .progress_chars("#>-"),
        );

        let mut written = 0usize;
        for batch in chunks.chunks(EMBED_BATCH) {
            let texts: Vec<String> = batch.iter().map(|c| c.content.clone()).collect();
            let embeddings = self.embedder.embed_batch(&texts).await?;
            self.insert_batch(&db, batch, &embeddings, written).await?;
            written += batch.len();
            pb.set_position(written as u64);
        }
        pb.finish_with_message("vector store write complete");

        StoreManifest::for_embedder(&*self.embedder).write(&self.path)?;
        info!("persisted {} chunks to {}", written, self.path.display());
        Ok(())
    }

    async fn read_nearest(
        &self,
        query: &str,
        k: usize,
        score_threshold: Option<f32>,
    ) -> Result<Vec<ScoredChunk>> {
        if !self.path.exists() {
            return Err(Error::NotFound(format!(
                "vector store not found at {}; run ingestion first",
                self.path.display()
            ))
            .into());
        }
        StoreManifest::read(&self.path)?.ensure_matches(&*self.embedder)?;

        let query_vec = self.embedder.embed_query(query).await?;
        let db = self.connect().await?;
        let table = db.open_table(TABLE_NAME).execute().await?;
        let mut stream = table
            .vector_search(query_vec)?
            .distance_type(DistanceType::Cosine)
            .limit(k)
            .execute()
            .await?;

        let mut results = Vec::new();
        while let Some(batch) = stream.try_next().await? {
            let contents = string_column(&batch, "content")?;
            let metadatas = string_column(&batch, "metadata")?;
            let distances = float_column(&batch, "_distance")?;
            for i in 0..batch.num_rows() {
                let metadata: Meta =
                    serde_json::from_str(metadatas.value(i)).unwrap_or_default();
                results.push(ScoredChunk {
                    content: contents.value(i).to_string(),
                    metadata,
                    score: 1.0 - distances.value(i),
                });
            }
        }
        Ok(rank_results(results, score_threshold, k))
    }
}

/// Post-pass over raw neighbor hits: drop anything below the threshold,
/// order by descending score, keep the best `k`.
pub fn rank_results(
    mut results: Vec<ScoredChunk>,
    score_threshold: Option<f32>,
    k: usize,
) -> Vec<ScoredChunk> {
    if let Some(threshold) = score_threshold {
        results.retain(|r| r.score >= threshold);
    }
    results.sort_by(|a, b| b.score.partial_cmp(&a.score).unwrap_or(std::cmp::Ordering::Equal));
    results.truncate(k);
    results
}

fn chunks_to_record_batch(
    chunks: &[DocumentChunk],
    embeddings: &[Vec<f32>],
    id_offset: usize,
    dim: usize,
) -> Result<RecordBatch> {
    let schema = build_arrow_schema(dim as i32);
    let mut ids = Vec::new();
    let mut sources = Vec::new();
    let mut start_indices = Vec::new();
    let mut contents = Vec::new();
    let mut metadatas = Vec::new();
    let mut vectors: Vec<Option<Vec<Option<f32>>>> = Vec::new();
    for (i, (chunk, vector)) in chunks.iter().zip(embeddings.iter()).enumerate() {
        ids.push(format!("{}:{}", chunk.source(), id_offset + i));
        sources.push(chunk.source().to_string());
        start_indices.push(chunk.start_index as i32);
        contents.push(chunk.content.clone());
        metadatas.push(serde_json::to_string(&chunk.metadata)?);
        vectors.push(Some(vector.iter().map(|&x| Some(x)).collect()));
    }
    let record_batch = RecordBatch::try_new(
        schema,
        vec![
            Arc::new(StringArray::from(ids)),
            Arc::new(StringArray::from(sources)),
            Arc::new(Int32Array::from(start_indices)),
            Arc::new(StringArray::from(contents)),
            Arc::new(StringArray::from(metadatas)),
            Arc::new(arrow_array::FixedSizeListArray::from_iter_primitive::<
                arrow_array::types::Float32Type,
                _,
                _,
            >(vectors.into_iter(), dim as i32)),
        ],
    )?;
    Ok(record_batch)
}

fn string_column<'a>(batch: &'a RecordBatch, name: &str) -> Result<&'a StringArray> {
    batch
        .column_by_name(name)
        .and_then(|c| c.as_any().downcast_ref::<StringArray>())
        .ok_or_else(|| anyhow!("column '{name}' missing from result batch"))
}

fn float_column<'a>(batch: &'a RecordBatch, name: &str) -> Result<&'a Float32Array> {
    batch
        .column_by_name(name)
        .and_then(|c| c.as_any().downcast_ref::<Float32Array>())
        .ok_or_else(|| anyhow!("column '{name}' missing from result batch"))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scored(score: f32) -> ScoredChunk {
        ScoredChunk { content: format!("chunk {score}"), metadata: Meta::new(), score }
    }

    #[test]
    fn threshold_keeps_only_relevant_hits_in_order() {
        let hits = vec![scored(0.5), scored(0.9), scored(0.1), scored(0.2)];
        let ranked = rank_results(hits, Some(0.3), 10);

        let scores: Vec<f32> = ranked.iter().map(|r| r.score).collect();
        assert_eq!(scores, vec![0.9, 0.5]);
    }

    #[test]
    fn k_caps_the_result_count() {
        let hits = vec![scored(0.9), scored(0.8), scored(0.7)];
        let ranked = rank_results(hits, None, 2);
        assert_eq!(ranked.len(), 2);
        assert_eq!(ranked[0].score, 0.9);
    }
}

//! Serving-path retrieval: threshold-filtered similarity search reshaped
//! into the HTTP response payload.

use anyhow::Result;

use ragdb_core::traits::VectorStore;
use ragdb_core::types::{ScoredChunk, SearchMatch, META_ROW, META_SOURCE};

/// Neighbors scoring below this are never served.
pub const SCORE_THRESHOLD: f32 = 0.3;

/// Run a similarity query and reshape the hits for the API.
///
/// A blank query short-circuits to an empty result set without touching
/// the store.
pub async fn search(store: &dyn VectorStore, query: &str, k: usize) -> Result<Vec<SearchMatch>> {
    if query.trim().is_empty() {
        return Ok(Vec::new());
    }
    let hits = store.read_nearest(query, k, Some(SCORE_THRESHOLD)).await?;
    Ok(hits.into_iter().map(format_match).collect())
}

fn format_match(chunk: ScoredChunk) -> SearchMatch {
    let source = chunk
        .metadata
        .get(META_SOURCE)
        .cloned()
        .unwrap_or_else(|| "Unknown".to_string());
    let id = chunk
        .metadata
        .get(META_ROW)
        .cloned()
        .unwrap_or_else(|| "N/A".to_string());
    SearchMatch {
        content: chunk.content,
        job_title: source.clone(),
        source,
        score: round4(chunk.score),
        id,
    }
}

fn round4(score: f32) -> f32 {
    (score * 10_000.0).round() / 10_000.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use ragdb_core::types::{DocumentChunk, Meta};
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[derive(Default)]
    struct CountingStore {
        calls: AtomicUsize,
    }

    #[async_trait]
    impl VectorStore for CountingStore {
        async fn write(&self, _chunks: &[DocumentChunk]) -> Result<()> {
            Ok(())
        }

        async fn read_nearest(
            &self,
            _query: &str,
            _k: usize,
            _score_threshold: Option<f32>,
        ) -> Result<Vec<ScoredChunk>> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            let mut metadata = Meta::new();
            metadata.insert(META_SOURCE.to_string(), "Rust Engineer".to_string());
            metadata.insert(META_ROW.to_string(), "7".to_string());
            Ok(vec![ScoredChunk {
                content: "chunk body".to_string(),
                metadata,
                score: 0.123_456,
            }])
        }
    }

    #[tokio::test]
    async fn blank_query_never_contacts_the_store() {
        let store = CountingStore::default();
        let results = search(&store, "   ", 5).await.expect("search");
        assert!(results.is_empty());
        assert_eq!(store.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn matches_are_reshaped_with_rounded_scores() {
        let store = CountingStore::default();
        let results = search(&store, "query", 5).await.expect("search");

        assert_eq!(results.len(), 1);
        assert_eq!(store.calls.load(Ordering::SeqCst), 1);
        let m = &results[0];
        assert_eq!(m.source, "Rust Engineer");
        assert_eq!(m.job_title, "Rust Engineer");
        assert_eq!(m.id, "7");
        assert_eq!(m.score, 0.1235);
    }

    #[tokio::test]
    async fn missing_row_metadata_falls_back_to_na() {
        struct BareStore;

        #[async_trait]
        impl VectorStore for BareStore {
            async fn write(&self, _chunks: &[DocumentChunk]) -> Result<()> {
                Ok(())
            }
            async fn read_nearest(
                &self,
                _query: &str,
                _k: usize,
                _score_threshold: Option<f32>,
            ) -> Result<Vec<ScoredChunk>> {
                Ok(vec![ScoredChunk {
                    content: "pdf chunk".to_string(),
                    metadata: Meta::new(),
                    score: 0.9,
                }])
            }
        }

        let results = search(&BareStore, "query", 5).await.expect("search");
        assert_eq!(results[0].id, "N/A");
        assert_eq!(results[0].source, "Unknown");
    }
}

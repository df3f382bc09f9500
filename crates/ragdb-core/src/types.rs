//! Domain types shared by the ingestion, storage and serving layers.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Flat string metadata attached to documents and chunks.
pub type Meta = HashMap<String, String>;

/// Metadata key always present on loaded documents: the originating file
/// path, or for CSV rows the value of the designated source column.
pub const META_SOURCE: &str = "source";
/// Metadata key carrying the 0-based row index for CSV-sourced documents.
pub const META_ROW: &str = "row";
/// Metadata key carrying the originating file path for CSV rows, where
/// `source` holds the row title instead.
pub const META_PATH: &str = "path";

/// A raw text record produced by the document loader.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Document {
    pub content: String,
    pub metadata: Meta,
}

impl Document {
    /// Build a document with only the `source` metadata key set.
    pub fn from_source(content: impl Into<String>, source: impl Into<String>) -> Self {
        let mut metadata = Meta::new();
        metadata.insert(META_SOURCE.to_string(), source.into());
        Self { content: content.into(), metadata }
    }

    pub fn source(&self) -> &str {
        self.metadata.get(META_SOURCE).map(String::as_str).unwrap_or("Unknown")
    }
}

/// A bounded-length window of a parent document, the unit of embedding
/// and retrieval.
///
/// `metadata` is inherited verbatim from the parent; `start_index` is the
/// character offset of the window inside the parent content.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DocumentChunk {
    pub content: String,
    pub metadata: Meta,
    pub start_index: usize,
}

impl DocumentChunk {
    pub fn source(&self) -> &str {
        self.metadata.get(META_SOURCE).map(String::as_str).unwrap_or("Unknown")
    }
}

/// A stored chunk returned by a nearest-neighbor query.
///
/// `score` is a cosine-derived relevance measure, higher is better,
/// roughly in `[0, 1]` for normalized embeddings.
#[derive(Debug, Clone)]
pub struct ScoredChunk {
    pub content: String,
    pub metadata: Meta,
    pub score: f32,
}

/// One formatted result row of the serving path.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchMatch {
    pub content: String,
    pub source: String,
    pub job_title: String,
    pub score: f32,
    pub id: String,
}

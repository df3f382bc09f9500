//! Configuration loading and path helpers.
//!
//! Uses Figment to merge struct defaults + `ragdb.toml` + `RAGDB_*` env
//! vars into one immutable [`Settings`] value, constructed once at process
//! start and passed by reference into every component constructor.

use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::error::Error;

/// Which hosted LLM answers queries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LlmProvider {
    Openai,
    Google,
}

/// Which backend maps text to vectors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EmbeddingProvider {
    Openai,
    Google,
    /// Local model executed with candle; no network dependency.
    Huggingface,
}

/// Which vector store implementation persists embedded chunks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VectorStoreKind {
    Lance,
}

/// Process-wide settings, immutable after load.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub llm_provider: LlmProvider,
    pub embedding_provider: EmbeddingProvider,
    pub vector_store: VectorStoreKind,

    pub openai_api_key: Option<String>,
    pub google_api_key: Option<String>,

    pub openai_model_name: String,
    pub google_model_name: String,
    pub openai_embedding_model: String,
    pub google_embedding_model: String,
    /// Directory holding tokenizer.json / config.json / pytorch_model.bin
    /// for the local embedding model.
    pub local_model_dir: String,

    pub chunk_size: usize,
    pub chunk_overlap: usize,
    pub vector_db_path: String,

    /// CSV column mapped into the `source` metadata field.
    pub csv_source_column: String,
    /// File extensions the loader picks up.
    pub ingest_extensions: Vec<String>,

    /// Directory the HTTP server serves `index.html` from.
    pub static_dir: String,
    pub log_level: String,

    /// Swap every embedding provider for the deterministic hash embedder.
    /// Test/dev switch; never enable for real ingestion.
    pub use_fake_embeddings: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            llm_provider: LlmProvider::Google,
            embedding_provider: EmbeddingProvider::Openai,
            vector_store: VectorStoreKind::Lance,
            openai_api_key: None,
            google_api_key: None,
            openai_model_name: "gpt-4o".to_string(),
            google_model_name: "gemini-1.5-flash".to_string(),
            openai_embedding_model: "text-embedding-3-small".to_string(),
            google_embedding_model: "embedding-001".to_string(),
            local_model_dir: "models/bge-m3".to_string(),
            chunk_size: 1000,
            chunk_overlap: 200,
            vector_db_path: "data/vector_store".to_string(),
            csv_source_column: "job_title".to_string(),
            ingest_extensions: vec!["pdf".to_string(), "csv".to_string(), "txt".to_string()],
            static_dir: "static".to_string(),
            log_level: "info".to_string(),
            use_fake_embeddings: false,
        }
    }
}

impl Settings {
    /// Load from defaults + `ragdb.toml` + `RAGDB_*` environment variables.
    pub fn load() -> anyhow::Result<Self> {
        Self::from_figment(Self::figment())
    }

    pub fn figment() -> Figment {
        Figment::from(Serialized::defaults(Settings::default()))
            .merge(Toml::file("ragdb.toml"))
            .merge(Env::prefixed("RAGDB_"))
    }

    pub fn from_figment(figment: Figment) -> anyhow::Result<Self> {
        let settings: Settings = figment
            .extract()
            .map_err(|e| Error::InvalidConfig(e.to_string()))?;
        settings.validate()?;
        Ok(settings)
    }

    fn validate(&self) -> anyhow::Result<()> {
        if self.chunk_size == 0 {
            return Err(Error::InvalidConfig("chunk_size must be positive".to_string()).into());
        }
        if self.chunk_overlap >= self.chunk_size {
            return Err(Error::InvalidConfig(format!(
                "chunk_overlap ({}) must be smaller than chunk_size ({})",
                self.chunk_overlap, self.chunk_size
            ))
            .into());
        }
        Ok(())
    }

    /// Expanded persistence path of the vector store.
    pub fn db_path(&self) -> PathBuf {
        expand_path(&self.vector_db_path)
    }

    /// Expanded directory of the local embedding model.
    pub fn model_dir(&self) -> PathBuf {
        expand_path(&self.local_model_dir)
    }
}

/// Expand a user-provided path string:
/// - Expands leading '~' to the user's home directory
/// - Expands ${VAR} and $VAR environment variables
/// - Returns a PathBuf without attempting to canonicalize
pub fn expand_path<S: AsRef<str>>(input: S) -> PathBuf {
    let s = input.as_ref();
    let expanded_env = shellexpand::env(s).unwrap_or(std::borrow::Cow::Borrowed(s));
    let expanded = shellexpand::tilde(&expanded_env);
    PathBuf::from(expanded.as_ref())
}

/// Resolve a possibly relative path against a given base directory after
/// expansion. Absolute paths are returned as-is.
pub fn resolve_with_base<S: AsRef<str>>(base: &Path, p: S) -> PathBuf {
    let p = expand_path(p);
    if p.is_absolute() {
        p
    } else {
        base.join(p)
    }
}

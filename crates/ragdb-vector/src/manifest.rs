//! Store manifest: records which embedding provider built a persisted
//! store so a later query cannot silently mix embedding spaces.

use std::fs;
use std::path::Path;

use anyhow::Result;
use serde::{Deserialize, Serialize};

use ragdb_core::error::Error;
use ragdb_core::traits::Embedder;

pub const MANIFEST_FILE: &str = "manifest.json";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoreManifest {
    /// Stable provider/model identifier, e.g. `openai:text-embedding-3-small:d1536`.
    pub embedder: String,
    pub dim: usize,
}

impl StoreManifest {
    pub fn for_embedder(embedder: &dyn Embedder) -> Self {
        Self { embedder: embedder.id().to_string(), dim: embedder.dim() }
    }

    pub fn write(&self, store_dir: &Path) -> Result<()> {
        let path = store_dir.join(MANIFEST_FILE);
        fs::write(&path, serde_json::to_string_pretty(self)?)?;
        Ok(())
    }

    pub fn read(store_dir: &Path) -> Result<Self> {
        let path = store_dir.join(MANIFEST_FILE);
        let raw = fs::read_to_string(&path).map_err(|_| {
            Error::Operation(format!(
                "vector store at {} has no manifest; re-run ingestion to rebuild it",
                store_dir.display()
            ))
        })?;
        Ok(serde_json::from_str(&raw)?)
    }

    /// Fail fast when the store was built with a different provider than
    /// the one configured now; mixed embedding spaces would otherwise
    /// produce meaningless similarity scores.
    pub fn ensure_matches(&self, embedder: &dyn Embedder) -> Result<()> {
        if self.embedder != embedder.id() {
            return Err(Error::InvalidConfig(format!(
                "vector store was built with embedder '{}' but '{}' is configured; \
                 re-run ingestion with the current provider",
                self.embedder,
                embedder.id()
            ))
            .into());
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;

    struct IdOnly(&'static str);

    #[async_trait]
    impl Embedder for IdOnly {
        fn id(&self) -> &str {
            self.0
        }
        fn dim(&self) -> usize {
            4
        }
        async fn embed_batch(&self, _texts: &[String]) -> anyhow::Result<Vec<Vec<f32>>> {
            unreachable!("not exercised")
        }
    }

    #[test]
    fn roundtrips_through_disk() {
        let tmp = tempfile::tempdir().unwrap();
        let manifest = StoreManifest::for_embedder(&IdOnly("fake:d4"));
        manifest.write(tmp.path()).unwrap();

        let loaded = StoreManifest::read(tmp.path()).unwrap();
        assert_eq!(loaded, manifest);
        assert!(loaded.ensure_matches(&IdOnly("fake:d4")).is_ok());
    }

    #[test]
    fn mismatched_embedder_is_a_config_error() {
        let manifest = StoreManifest::for_embedder(&IdOnly("openai:small:d1536"));
        let err = manifest.ensure_matches(&IdOnly("google:embedding-001:d768")).unwrap_err();
        assert!(err.to_string().contains("re-run ingestion"));
    }
}

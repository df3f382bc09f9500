//! OpenAI embeddings over the `/v1/embeddings` endpoint.

use anyhow::Result;
use async_trait::async_trait;
use serde::Deserialize;
use serde_json::json;

use ragdb_core::config::Settings;
use ragdb_core::error::Error;
use ragdb_core::traits::Embedder;

const EMBEDDINGS_URL: &str = "https://api.openai.com/v1/embeddings";

pub struct OpenAiEmbedder {
    client: reqwest::Client,
    api_key: Option<String>,
    model: String,
    dim: usize,
    id: String,
}

impl OpenAiEmbedder {
    pub fn new(settings: &Settings) -> Self {
        let model = settings.openai_embedding_model.clone();
        let dim = model_dim(&model);
        let id = format!("openai:{model}:d{dim}");
        Self {
            client: reqwest::Client::new(),
            api_key: settings.openai_api_key.clone(),
            model,
            dim,
            id,
        }
    }

    fn key(&self) -> Result<&str> {
        // Credential absence surfaces at call time, not construction.
        self.api_key
            .as_deref()
            .ok_or_else(|| Error::Provider("openai_api_key is not configured".to_string()).into())
    }
}

fn model_dim(model: &str) -> usize {
    match model {
        "text-embedding-3-large" => 3072,
        // text-embedding-3-small and text-embedding-ada-002
        _ => 1536,
    }
}

#[derive(Deserialize)]
struct EmbeddingsResponse {
    data: Vec<EmbeddingRow>,
}

#[derive(Deserialize)]
struct EmbeddingRow {
    embedding: Vec<f32>,
}

#[async_trait]
impl Embedder for OpenAiEmbedder {
    fn id(&self) -> &str {
        &self.id
    }

    fn dim(&self) -> usize {
        self.dim
    }

    async fn embed_batch(&self, texts: &[String]) -> Result<Vec<Vec<f32>>> {
        if texts.is_empty() {
            return Ok(Vec::new());
        }
        let key = self.key()?;
        let response = self
            .client
            .post(EMBEDDINGS_URL)
            .bearer_auth(key)
            .json(&json!({ "model": self.model, "input": texts }))
            .send()
            .await
            .map_err(|e| Error::Provider(format!("openai embeddings request failed: {e}")))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(Error::Provider(format!(
                "openai embeddings returned {status}: {body}"
            ))
            .into());
        }

        let parsed: EmbeddingsResponse = response
            .json()
            .await
            .map_err(|e| Error::Provider(format!("openai embeddings response malformed: {e}")))?;
        Ok(parsed.data.into_iter().map(|row| row.embedding).collect())
    }
}

//! Google Gemini embeddings over the Generative Language API
//! (`batchEmbedContents`).

use anyhow::Result;
use async_trait::async_trait;
use serde::Deserialize;
use serde_json::json;

use ragdb_core::config::Settings;
use ragdb_core::error::Error;
use ragdb_core::traits::Embedder;

const API_BASE: &str = "https://generativelanguage.googleapis.com/v1beta";
const GOOGLE_DIM: usize = 768;

pub struct GoogleEmbedder {
    client: reqwest::Client,
    api_key: Option<String>,
    model: String,
    id: String,
}

impl GoogleEmbedder {
    pub fn new(settings: &Settings) -> Self {
        // Accept both "embedding-001" and "models/embedding-001".
        let model = settings
            .google_embedding_model
            .trim_start_matches("models/")
            .to_string();
        let id = format!("google:{model}:d{GOOGLE_DIM}");
        Self {
            client: reqwest::Client::new(),
            api_key: settings.google_api_key.clone(),
            model,
            id,
        }
    }

    fn key(&self) -> Result<&str> {
        self.api_key
            .as_deref()
            .ok_or_else(|| Error::Provider("google_api_key is not configured".to_string()).into())
    }
}

#[derive(Deserialize)]
struct BatchEmbedResponse {
    embeddings: Vec<EmbeddingValues>,
}

#[derive(Deserialize)]
struct EmbeddingValues {
    values: Vec<f32>,
}

#[async_trait]
impl Embedder for GoogleEmbedder {
    fn id(&self) -> &str {
        &self.id
    }

    fn dim(&self) -> usize {
        GOOGLE_DIM
    }

    async fn embed_batch(&self, texts: &[String]) -> Result<Vec<Vec<f32>>> {
        if texts.is_empty() {
            return Ok(Vec::new());
        }
        let key = self.key()?;
        let url = format!("{API_BASE}/models/{}:batchEmbedContents?key={key}", self.model);
        let requests: Vec<_> = texts
            .iter()
            .map(|text| {
                json!({
                    "model": format!("models/{}", self.model),
                    "content": { "parts": [{ "text": text }] },
                })
            })
            .collect();

        let response = self
            .client
            .post(&url)
            .json(&json!({ "requests": requests }))
            .send()
            .await
            .map_err(|e| Error::Provider(format!("google embeddings request failed: {e}")))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(Error::Provider(format!(
                "google embeddings returned {status}: {body}"
            ))
            .into());
        }

        let parsed: BatchEmbedResponse = response
            .json()
            .await
            .map_err(|e| Error::Provider(format!("google embeddings response malformed: {e}")))?;
        Ok(parsed.embeddings.into_iter().map(|e| e.values).collect())
    }
}

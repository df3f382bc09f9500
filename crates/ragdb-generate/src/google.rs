//! Google Gemini generation over the Generative Language API.

use anyhow::Result;
use async_trait::async_trait;
use serde::Deserialize;
use serde_json::json;

use ragdb_core::config::Settings;
use ragdb_core::error::Error;
use ragdb_core::traits::ChatModel;

const API_BASE: &str = "https://generativelanguage.googleapis.com/v1beta";

pub struct GoogleChat {
    client: reqwest::Client,
    api_key: Option<String>,
    model: String,
}

impl GoogleChat {
    pub fn new(settings: &Settings) -> Self {
        Self {
            client: reqwest::Client::new(),
            api_key: settings.google_api_key.clone(),
            model: settings.google_model_name.clone(),
        }
    }
}

#[derive(Deserialize)]
struct GenerateResponse {
    candidates: Vec<Candidate>,
}

#[derive(Deserialize)]
struct Candidate {
    content: Content,
}

#[derive(Deserialize)]
struct Content {
    parts: Vec<Part>,
}

#[derive(Deserialize)]
struct Part {
    text: String,
}

#[async_trait]
impl ChatModel for GoogleChat {
    async fn generate(&self, prompt: &str) -> Result<String> {
        let key = self
            .api_key
            .as_deref()
            .ok_or_else(|| Error::Provider("google_api_key is not configured".to_string()))?;
        let url = format!("{API_BASE}/models/{}:generateContent?key={key}", self.model);

        let response = self
            .client
            .post(&url)
            .json(&json!({
                "contents": [{ "parts": [{ "text": prompt }] }],
                "generationConfig": { "temperature": 0 },
            }))
            .send()
            .await
            .map_err(|e| Error::Provider(format!("google chat request failed: {e}")))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(Error::Provider(format!("google chat returned {status}: {body}")).into());
        }

        let parsed: GenerateResponse = response
            .json()
            .await
            .map_err(|e| Error::Provider(format!("google chat response malformed: {e}")))?;
        parsed
            .candidates
            .into_iter()
            .next()
            .and_then(|c| c.content.parts.into_iter().next())
            .map(|p| p.text)
            .ok_or_else(|| Error::Provider("google chat returned no candidates".to_string()).into())
    }
}

//! OpenAI chat completions.

use anyhow::Result;
use async_trait::async_trait;
use serde::Deserialize;
use serde_json::json;

use ragdb_core::config::Settings;
use ragdb_core::error::Error;
use ragdb_core::traits::ChatModel;

const CHAT_URL: &str = "https://api.openai.com/v1/chat/completions";

pub struct OpenAiChat {
    client: reqwest::Client,
    api_key: Option<String>,
    model: String,
}

impl OpenAiChat {
    pub fn new(settings: &Settings) -> Self {
        Self {
            client: reqwest::Client::new(),
            api_key: settings.openai_api_key.clone(),
            model: settings.openai_model_name.clone(),
        }
    }
}

#[derive(Deserialize)]
struct ChatResponse {
    choices: Vec<Choice>,
}

#[derive(Deserialize)]
struct Choice {
    message: Message,
}

#[derive(Deserialize)]
struct Message {
    content: String,
}

#[async_trait]
impl ChatModel for OpenAiChat {
    async fn generate(&self, prompt: &str) -> Result<String> {
        let key = self
            .api_key
            .as_deref()
            .ok_or_else(|| Error::Provider("openai_api_key is not configured".to_string()))?;

        let response = self
            .client
            .post(CHAT_URL)
            .bearer_auth(key)
            .json(&json!({
                "model": self.model,
                "temperature": 0,
                "messages": [{ "role": "user", "content": prompt }],
            }))
            .send()
            .await
            .map_err(|e| Error::Provider(format!("openai chat request failed: {e}")))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(Error::Provider(format!("openai chat returned {status}: {body}")).into());
        }

        let parsed: ChatResponse = response
            .json()
            .await
            .map_err(|e| Error::Provider(format!("openai chat response malformed: {e}")))?;
        parsed
            .choices
            .into_iter()
            .next()
            .map(|c| c.message.content)
            .ok_or_else(|| Error::Provider("openai chat returned no choices".to_string()).into())
    }
}

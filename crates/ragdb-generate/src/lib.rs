//! LLM selection and the RAG answer pipeline.

use std::sync::Arc;

use anyhow::Result;
use tracing::info;

use ragdb_core::config::{LlmProvider, Settings};
use ragdb_core::traits::ChatModel;

pub mod chain;
pub mod google;
pub mod openai;

pub use chain::{format_context, AnswerPipeline};
pub use google::GoogleChat;
pub use openai::OpenAiChat;

/// Construct the configured chat model. Mirrors the store factory policy:
/// dispatch on a closed enum, so unsupported values fail when the
/// configuration is loaded, not mid-query.
pub fn get_chat_model(settings: &Settings) -> Result<Arc<dyn ChatModel>> {
    match settings.llm_provider {
        LlmProvider::Openai => {
            info!("initializing OpenAI model: {}", settings.openai_model_name);
            Ok(Arc::new(OpenAiChat::new(settings)))
        }
        LlmProvider::Google => {
            info!("initializing Google Gemini model: {}", settings.google_model_name);
            Ok(Arc::new(GoogleChat::new(settings)))
        }
    }
}

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use async_trait::async_trait;

use ragdb_core::config::{LlmProvider, Settings};
use ragdb_core::traits::{ChatModel, Retriever, VectorStore};
use ragdb_core::types::{DocumentChunk, Meta, ScoredChunk};
use ragdb_generate::{format_context, get_chat_model, AnswerPipeline};

struct CannedStore {
    requested_k: AtomicUsize,
}

#[async_trait]
impl VectorStore for CannedStore {
    async fn write(&self, _chunks: &[DocumentChunk]) -> anyhow::Result<()> {
        Ok(())
    }

    async fn read_nearest(
        &self,
        _query: &str,
        k: usize,
        _score_threshold: Option<f32>,
    ) -> anyhow::Result<Vec<ScoredChunk>> {
        self.requested_k.store(k, Ordering::SeqCst);
        Ok(vec![
            ScoredChunk { content: "first chunk".to_string(), metadata: Meta::new(), score: 0.9 },
            ScoredChunk { content: "second chunk".to_string(), metadata: Meta::new(), score: 0.8 },
        ])
    }
}

/// Echoes the prompt back so tests can inspect what the model was given.
struct EchoModel;

#[async_trait]
impl ChatModel for EchoModel {
    async fn generate(&self, prompt: &str) -> anyhow::Result<String> {
        Ok(prompt.to_string())
    }
}

#[test]
fn context_joins_chunks_with_blank_lines() {
    let chunks = vec![
        ScoredChunk { content: "alpha".to_string(), metadata: Meta::new(), score: 1.0 },
        ScoredChunk { content: "beta".to_string(), metadata: Meta::new(), score: 0.5 },
    ];
    assert_eq!(format_context(&chunks), "alpha\n\nbeta");
    assert_eq!(format_context(&[]), "");
}

#[tokio::test]
async fn pipeline_fills_template_with_context_and_question() {
    let store = Arc::new(CannedStore { requested_k: AtomicUsize::new(0) });
    let pipeline = AnswerPipeline::new(Retriever::new(store.clone()), Arc::new(EchoModel));

    let prompt = pipeline.answer("what is in the corpus?").await.expect("answer");

    assert!(prompt.contains("first chunk\n\nsecond chunk"));
    assert!(prompt.contains("Question: what is in the corpus?"));
    assert!(prompt.starts_with("Answer the question based only on the following context:"));
    assert_eq!(store.requested_k.load(Ordering::SeqCst), Retriever::DEFAULT_K);
}

#[test]
fn factory_selects_the_configured_provider() {
    let mut settings = Settings::default();
    settings.llm_provider = LlmProvider::Openai;
    assert!(get_chat_model(&settings).is_ok());

    settings.llm_provider = LlmProvider::Google;
    assert!(get_chat_model(&settings).is_ok());
}

#[tokio::test]
async fn missing_key_surfaces_at_generation_time() {
    let settings = Settings::default();
    let model = ragdb_generate::GoogleChat::new(&settings);

    let err = model.generate("prompt").await.expect_err("no key configured");
    assert!(err.to_string().contains("google_api_key"));
}

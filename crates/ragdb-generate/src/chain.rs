//! The answer pipeline: retrieve context, fill the prompt template, call
//! the model, return plain text.

use std::sync::Arc;

use anyhow::Result;

use ragdb_core::traits::{ChatModel, Retriever};
use ragdb_core::types::ScoredChunk;

const PROMPT_TEMPLATE: &str = "\
Answer the question based only on the following context:
{context}

Question: {question}
";

pub struct AnswerPipeline {
    retriever: Retriever,
    model: Arc<dyn ChatModel>,
}

impl AnswerPipeline {
    pub fn new(retriever: Retriever, model: Arc<dyn ChatModel>) -> Self {
        Self { retriever, model }
    }

    /// Retrieve the top chunks for `question`, condition the model on them
    /// and return its text output. Provider failures propagate untouched;
    /// there is no retry.
    pub async fn answer(&self, question: &str) -> Result<String> {
        let chunks = self.retriever.retrieve(question).await?;
        let prompt = fill_prompt(&format_context(&chunks), question);
        self.model.generate(&prompt).await
    }
}

/// Concatenate chunk texts with a blank-line separator.
pub fn format_context(chunks: &[ScoredChunk]) -> String {
    chunks.iter().map(|c| c.content.as_str()).collect::<Vec<_>>().join("\n\n")
}

pub fn fill_prompt(context: &str, question: &str) -> String {
    PROMPT_TEMPLATE
        .replace("{context}", context)
        .replace("{question}", question)
}

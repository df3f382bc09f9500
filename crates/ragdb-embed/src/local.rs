//! Local embedding provider: BGE-M3 (XLM-RoBERTa) executed with candle.
//!
//! Loads tokenizer, config and weights from a model directory on disk and
//! runs entirely offline. Vectors are masked-mean pooled and L2-normalized.

use std::path::Path;

use anyhow::{anyhow, Result};
use async_trait::async_trait;
use candle_core::{DType, Device, Tensor};
use candle_nn::VarBuilder;
use candle_transformers::models::xlm_roberta::{Config as XLMRobertaConfig, XLMRobertaModel};
use tokenizers::Tokenizer;
use tracing::info;

use ragdb_core::error::Error;
use ragdb_core::traits::Embedder;

use crate::device::select_device;
use crate::pooling::masked_mean_l2;
use crate::tokenize::tokenize_on_device;

/// Embedding dimensionality of BGE-M3.
pub const LOCAL_DIM: usize = 1024;
const MAX_LEN: usize = 256;

pub struct LocalEmbedder {
    model: XLMRobertaModel,
    tokenizer: Tokenizer,
    device: Device,
    id: String,
}

impl LocalEmbedder {
    /// Load the model from `model_dir`, which must contain
    /// `tokenizer.json`, `config.json` and `pytorch_model.bin`.
    pub fn new(model_dir: &Path) -> Result<Self> {
        if !model_dir.is_dir() {
            return Err(Error::NotFound(format!(
                "local embedding model directory {} does not exist",
                model_dir.display()
            ))
            .into());
        }
        let device = select_device();

        let tokenizer_path = model_dir.join("tokenizer.json");
        let tokenizer = Tokenizer::from_file(&tokenizer_path)
            .map_err(|e| anyhow!("Failed to load tokenizer from {}: {}", tokenizer_path.display(), e))?;

        let config_path = model_dir.join("config.json");
        let config: XLMRobertaConfig =
            serde_json::from_str(&std::fs::read_to_string(&config_path)?)?;

        let weights_path = model_dir.join("pytorch_model.bin");
        let weights = candle_core::pickle::read_all(&weights_path)?;
        let weights_map: std::collections::HashMap<String, Tensor> =
            weights.into_iter().collect();
        let vb = VarBuilder::from_tensors(weights_map, DType::F32, &device);
        let model = XLMRobertaModel::new(&config, vb)?;

        let name = model_dir
            .file_name()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_else(|| "bge-m3".to_string());
        let id = format!("huggingface:{name}:d{LOCAL_DIM}");
        info!("loaded local embedding model from {}", model_dir.display());
        Ok(Self { model, tokenizer, device, id })
    }

    fn embed_one(&self, text: &str) -> Result<Vec<f32>> {
        let (input_ids, attention_mask) =
            tokenize_on_device(&self.tokenizer, text, MAX_LEN, &self.device)?;
        let token_type_ids = Tensor::zeros((1, MAX_LEN), DType::I64, &self.device)?;
        let hidden_states = self.model.forward(
            &input_ids,
            &attention_mask,
            &token_type_ids,
            None,
            None,
            None,
        )?;
        let pooled = masked_mean_l2(&hidden_states, &attention_mask)?;
        let vector: Vec<f32> = pooled.to_device(&Device::Cpu)?.squeeze(0)?.to_vec1()?;
        if vector.len() != LOCAL_DIM {
            return Err(anyhow!(
                "unexpected embedding dimension {} (wanted {LOCAL_DIM})",
                vector.len()
            ));
        }
        Ok(vector)
    }
}

#[async_trait]
impl Embedder for LocalEmbedder {
    fn id(&self) -> &str {
        &self.id
    }

    fn dim(&self) -> usize {
        LOCAL_DIM
    }

    async fn embed_batch(&self, texts: &[String]) -> Result<Vec<Vec<f32>>> {
        let mut vectors = Vec::with_capacity(texts.len());
        for text in texts {
            vectors.push(self.embed_one(text)?);
        }
        Ok(vectors)
    }
}

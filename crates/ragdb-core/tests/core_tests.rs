use figment::{
    providers::{Format, Serialized, Toml},
    Figment,
};

use ragdb_core::config::{expand_path, EmbeddingProvider, LlmProvider, Settings, VectorStoreKind};
use ragdb_core::types::{Document, META_SOURCE};

fn figment_with(toml: &str) -> Figment {
    Figment::from(Serialized::defaults(Settings::default())).merge(Toml::string(toml))
}

#[test]
fn defaults_match_documented_surface() {
    let settings = Settings::from_figment(figment_with("")).expect("defaults are valid");

    assert_eq!(settings.llm_provider, LlmProvider::Google);
    assert_eq!(settings.embedding_provider, EmbeddingProvider::Openai);
    assert_eq!(settings.vector_store, VectorStoreKind::Lance);
    assert_eq!(settings.chunk_size, 1000);
    assert_eq!(settings.chunk_overlap, 200);
    assert_eq!(settings.vector_db_path, "data/vector_store");
    assert_eq!(settings.log_level, "info");
    assert!(!settings.use_fake_embeddings);
}

#[test]
fn toml_overrides_defaults() {
    let settings = Settings::from_figment(figment_with(
        r#"
        llm_provider = "openai"
        embedding_provider = "huggingface"
        chunk_size = 500
        chunk_overlap = 50
        "#,
    ))
    .expect("valid override");

    assert_eq!(settings.llm_provider, LlmProvider::Openai);
    assert_eq!(settings.embedding_provider, EmbeddingProvider::Huggingface);
    assert_eq!(settings.chunk_size, 500);
    assert_eq!(settings.chunk_overlap, 50);
}

#[test]
fn overlap_must_stay_below_chunk_size() {
    let err = Settings::from_figment(figment_with(
        r#"
        chunk_size = 100
        chunk_overlap = 100
        "#,
    ))
    .expect_err("overlap >= size is a configuration error");

    assert!(err.to_string().contains("chunk_overlap"));
}

#[test]
fn unknown_provider_is_rejected_at_load() {
    let err = Settings::from_figment(figment_with(r#"llm_provider = "acme""#))
        .expect_err("unsupported provider must fail fast");

    assert!(err.to_string().contains("Invalid configuration"));
}

#[test]
fn expand_path_passes_plain_paths_through() {
    assert_eq!(expand_path("data/vector_store"), std::path::PathBuf::from("data/vector_store"));
}

#[test]
fn document_source_falls_back_to_unknown() {
    let doc = Document { content: "text".to_string(), metadata: Default::default() };
    assert_eq!(doc.source(), "Unknown");

    let doc = Document::from_source("text", "jobs.csv");
    assert_eq!(doc.metadata.get(META_SOURCE).map(String::as_str), Some("jobs.csv"));
    assert_eq!(doc.source(), "jobs.csv");
}

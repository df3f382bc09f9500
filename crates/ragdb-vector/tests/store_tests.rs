use std::sync::Arc;

use ragdb_core::error::Error;
use ragdb_core::traits::VectorStore;
use ragdb_core::types::{DocumentChunk, Meta, META_SOURCE};
use ragdb_embed::FakeEmbedder;
use ragdb_vector::LanceVectorStore;

fn chunk(content: &str, source: &str, start_index: usize) -> DocumentChunk {
    let mut metadata = Meta::new();
    metadata.insert(META_SOURCE.to_string(), source.to_string());
    DocumentChunk { content: content.to_string(), metadata, start_index }
}

#[tokio::test]
async fn read_on_missing_store_is_not_found() {
    let tmp = tempfile::tempdir().unwrap();
    let store = LanceVectorStore::new(tmp.path().join("absent"), Arc::new(FakeEmbedder::default()));

    let err = store.read_nearest("anything", 5, None).await.expect_err("must fail");
    match err.downcast_ref::<Error>() {
        Some(Error::NotFound(msg)) => assert!(msg.contains("run ingestion")),
        other => panic!("expected NotFound, got {other:?}"),
    }
}

#[tokio::test]
async fn empty_write_is_a_warned_noop() {
    let tmp = tempfile::tempdir().unwrap();
    let path = tmp.path().join("store");
    let store = LanceVectorStore::new(path.clone(), Arc::new(FakeEmbedder::default()));

    store.write(&[]).await.expect("no-op");
    assert!(!path.exists(), "nothing is persisted for an empty batch");
}

#[tokio::test]
async fn write_then_read_roundtrip() {
    let tmp = tempfile::tempdir().unwrap();
    let path = tmp.path().join("store");
    let store = LanceVectorStore::new(path.clone(), Arc::new(FakeEmbedder::default()));

    let chunks = vec![
        chunk("the quick brown fox jumps over the lazy dog", "animals.txt", 0),
        chunk("rust compiles to fast native machine code", "rust.txt", 0),
        chunk("embedding vectors power semantic retrieval", "search.txt", 0),
    ];
    store.write(&chunks).await.expect("write");
    assert!(path.exists());

    let hits = store
        .read_nearest("rust compiles to fast native machine code", 2, None)
        .await
        .expect("read");
    assert!(!hits.is_empty());
    assert!(hits.len() <= 2);
    // Identical text embeds identically, so the matching chunk leads.
    assert_eq!(hits[0].content, "rust compiles to fast native machine code");
    assert_eq!(hits[0].metadata.get(META_SOURCE).map(String::as_str), Some("rust.txt"));
    for pair in hits.windows(2) {
        assert!(pair[0].score >= pair[1].score, "descending relevance order");
    }
}

#[tokio::test]
async fn rewrite_replaces_previous_contents() {
    let tmp = tempfile::tempdir().unwrap();
    let path = tmp.path().join("store");
    let store = LanceVectorStore::new(path.clone(), Arc::new(FakeEmbedder::default()));

    store
        .write(&[chunk("first generation corpus", "old.txt", 0)])
        .await
        .expect("first write");
    store
        .write(&[chunk("second generation corpus", "new.txt", 0)])
        .await
        .expect("second write");

    let hits = store.read_nearest("generation corpus", 10, None).await.expect("read");
    assert_eq!(hits.len(), 1, "old rows are gone after the rewrite");
    assert_eq!(hits[0].metadata.get(META_SOURCE).map(String::as_str), Some("new.txt"));
}

#[tokio::test]
async fn mismatched_embedder_fails_instead_of_scoring_garbage() {
    let tmp = tempfile::tempdir().unwrap();
    let path = tmp.path().join("store");

    let writer = LanceVectorStore::new(path.clone(), Arc::new(FakeEmbedder::default()));
    writer.write(&[chunk("some corpus", "a.txt", 0)]).await.expect("write");

    // Same on-disk store, different provider identity (dim differs too).
    let reader = LanceVectorStore::new(path, Arc::new(FakeEmbedder::new(128)));
    let err = reader.read_nearest("some corpus", 5, None).await.expect_err("must fail");
    assert!(err.to_string().contains("re-run ingestion"));
}

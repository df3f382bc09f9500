//! CLI entry point.
//!
//! `ragdb ingest --data <dir>` loads, chunks and persists documents;
//! `ragdb query --q "<question>"` retrieves context and prints a
//! model-generated answer. Ingestion failures exit non-zero; query
//! failures print an error and exit normally.

use std::env;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use tracing::{info, warn};

use ragdb_core::config::Settings;
use ragdb_core::error::Error;
use ragdb_core::traits::{Retriever, VectorStore};
use ragdb_embed::get_embedder;
use ragdb_generate::{get_chat_model, AnswerPipeline};
use ragdb_ingest::{load_documents, split_documents};
use ragdb_vector::get_store;

fn parse_args() -> (String, Vec<String>) {
    let mut args: Vec<String> = env::args().collect();
    let prog = args.remove(0);
    if args.is_empty() {
        eprintln!("Usage: {prog} <ingest|query> [--data <dir>] [--q <question>]");
        std::process::exit(1);
    }
    let cmd = args.remove(0);
    (cmd, args)
}

fn flag_value(args: &[String], flag: &str) -> Option<String> {
    args.iter().position(|a| a == flag).and_then(|i| args.get(i + 1)).cloned()
}

fn init_tracing(level: &str) {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(level.to_string()));
    tracing_subscriber::fmt().with_env_filter(filter).init();
}

fn main() -> anyhow::Result<()> {
    let settings = Settings::load().map_err(|e| {
        eprintln!("Error loading config: {e}");
        e
    })?;
    init_tracing(&settings.log_level);

    let (cmd, args) = parse_args();
    let runtime = tokio::runtime::Runtime::new()?;
    match cmd.as_str() {
        "ingest" => {
            let data_dir = flag_value(&args, "--data")
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from("data/raw"));
            runtime.block_on(ingest(&settings, &data_dir))?;
        }
        "query" => {
            let question = flag_value(&args, "--q").unwrap_or_else(|| {
                eprintln!("Error: please provide a question using --q");
                std::process::exit(1);
            });
            runtime.block_on(query(&settings, &question));
        }
        _ => {
            eprintln!("Unknown command: {cmd}");
            std::process::exit(1);
        }
    }
    Ok(())
}

async fn ingest(settings: &Settings, data_dir: &Path) -> anyhow::Result<()> {
    info!("starting ingestion from {}", data_dir.display());

    let docs = load_documents(data_dir, settings)?;
    if docs.is_empty() {
        warn!("no documents loaded, aborting ingestion");
        return Ok(());
    }

    let chunks = split_documents(&docs, None, settings);
    info!("creating vector store with {} chunks", chunks.len());

    let embedder = get_embedder(settings)?;
    let store = get_store(settings, embedder)?;
    store.write(&chunks).await?;

    println!("Ingestion complete ({} chunks persisted).", chunks.len());
    Ok(())
}

/// Query failures are reported to the operator but do not change the exit
/// status; re-asking is the recovery path.
async fn query(settings: &Settings, question: &str) {
    match run_query(settings, question).await {
        Ok(answer) => println!("\nAnswer: {answer}"),
        Err(e) => match e.downcast_ref::<Error>() {
            Some(Error::NotFound(_)) => eprintln!("Error: {e}"),
            _ => {
                tracing::error!("error generating response: {e:#}");
                eprintln!("An error occurred while generating the answer.");
            }
        },
    }
}

async fn run_query(settings: &Settings, question: &str) -> anyhow::Result<String> {
    let embedder = get_embedder(settings)?;
    let store = Arc::new(get_store(settings, embedder)?);
    // Surface the missing-store case before any provider call is made.
    if !store.path().exists() {
        return Err(Error::NotFound(format!(
            "vector store not found at {}; run ingestion first",
            store.path().display()
        ))
        .into());
    }

    let retriever = Retriever::new(store as Arc<dyn VectorStore>);
    let model = get_chat_model(settings)?;
    let pipeline = AnswerPipeline::new(retriever, model);

    println!("Thinking...");
    pipeline.answer(question).await
}

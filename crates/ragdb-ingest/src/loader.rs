//! Directory loader: scans for supported files and dispatches by extension
//! to a format-specific parser.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::Result;
use tracing::{info, warn};

use ragdb_core::config::Settings;
use ragdb_core::error::Error;
use ragdb_core::types::{Document, Meta, META_PATH, META_ROW, META_SOURCE};

/// Load every supported file under `dir` into raw [`Document`] records.
///
/// A file that fails to parse is logged and skipped; the batch continues.
/// A directory with no supported files yields an empty vector, not an
/// error; the caller decides whether that aborts the pipeline.
pub fn load_documents(dir: &Path, settings: &Settings) -> Result<Vec<Document>> {
    if !dir.is_dir() {
        return Err(Error::NotFound(format!(
            "document directory {} does not exist",
            dir.display()
        ))
        .into());
    }

    let files = list_supported_files(dir, &settings.ingest_extensions);
    let mut documents = Vec::new();
    for path in &files {
        match load_file(path, settings) {
            Ok(mut docs) => documents.append(&mut docs),
            Err(e) => warn!("skipping {}: {e:#}", path.display()),
        }
    }
    info!(
        "loaded {} documents from {} files under {}",
        documents.len(),
        files.len(),
        dir.display()
    );
    Ok(documents)
}

fn list_supported_files(root: &Path, extensions: &[String]) -> Vec<PathBuf> {
    let mut files = Vec::new();
    for entry in walkdir::WalkDir::new(root)
        .into_iter()
        .filter_map(|e| e.ok())
        .filter(|e| e.file_type().is_file())
    {
        let path = entry.path();
        let matched = path
            .extension()
            .and_then(|s| s.to_str())
            .map(|ext| extensions.iter().any(|e| ext.eq_ignore_ascii_case(e)))
            .unwrap_or(false);
        if matched {
            files.push(path.to_path_buf());
        }
    }
    files.sort();
    files
}

fn load_file(path: &Path, settings: &Settings) -> Result<Vec<Document>> {
    let ext = path
        .extension()
        .and_then(|s| s.to_str())
        .unwrap_or_default()
        .to_ascii_lowercase();
    match ext.as_str() {
        "pdf" => load_pdf(path),
        "csv" => load_csv(path, &settings.csv_source_column),
        _ => load_text(path),
    }
}

fn load_pdf(path: &Path) -> Result<Vec<Document>> {
    let text = pdf_extract::extract_text(path)
        .map_err(|e| anyhow::anyhow!("pdf extraction failed: {e}"))?;
    Ok(vec![Document::from_source(text, path.to_string_lossy())])
}

/// One document per CSV row. The content lists every `header: value` pair;
/// the designated source column becomes the `source` metadata field so the
/// serving path can report row titles instead of file paths.
fn load_csv(path: &Path, source_column: &str) -> Result<Vec<Document>> {
    let mut reader = csv::Reader::from_path(path)?;
    let headers = reader.headers()?.clone();
    let source_idx = headers.iter().position(|h| h == source_column);

    let mut documents = Vec::new();
    for (row, record) in reader.records().enumerate() {
        let record = record?;
        let content = headers
            .iter()
            .zip(record.iter())
            .map(|(header, value)| format!("{header}: {value}"))
            .collect::<Vec<_>>()
            .join("\n");

        let source = source_idx
            .and_then(|i| record.get(i))
            .filter(|v| !v.is_empty())
            .map(str::to_string)
            .unwrap_or_else(|| path.to_string_lossy().into_owned());

        let mut metadata = Meta::new();
        metadata.insert(META_SOURCE.to_string(), source);
        metadata.insert(META_ROW.to_string(), row.to_string());
        metadata.insert(META_PATH.to_string(), path.to_string_lossy().into_owned());
        documents.push(Document { content, metadata });
    }
    Ok(documents)
}

fn load_text(path: &Path) -> Result<Vec<Document>> {
    let content = match fs::read_to_string(path) {
        Ok(content) => content,
        Err(_) => String::from_utf8_lossy(&fs::read(path)?).to_string(),
    };
    Ok(vec![Document::from_source(content, path.to_string_lossy())])
}

//! Boundary-preserving text splitter.
//!
//! A window of `chunk_size` characters is cut back to the latest paragraph
//! break, then newline, then space inside the window before falling back to
//! a hard character cut. Consecutive windows share `chunk_overlap`
//! characters. Offsets are character offsets into the parent content.

use tracing::info;

use ragdb_core::config::Settings;
use ragdb_core::types::{Document, DocumentChunk};

/// Split `documents` into overlapping chunks.
///
/// Effective chunk size is the explicit `chunk_size` argument when given,
/// else `settings.chunk_size`; overlap always comes from settings. Every
/// chunk inherits its parent's metadata verbatim and records the character
/// offset it starts at.
pub fn split_documents(
    documents: &[Document],
    chunk_size: Option<usize>,
    settings: &Settings,
) -> Vec<DocumentChunk> {
    let size = chunk_size.unwrap_or(settings.chunk_size);
    info!("splitting {} documents with chunk_size={size}", documents.len());

    let mut chunks = Vec::new();
    for doc in documents {
        for (start_index, content) in split_text(&doc.content, size, settings.chunk_overlap) {
            chunks.push(DocumentChunk {
                content,
                metadata: doc.metadata.clone(),
                start_index,
            });
        }
    }
    info!("created {} chunks", chunks.len());
    chunks
}

/// Split raw text into `(start_offset, content)` windows.
///
/// Guarantees: every window is at most `chunk_size` characters; the union
/// of windows covers the whole input; the split position always advances.
pub fn split_text(text: &str, chunk_size: usize, chunk_overlap: usize) -> Vec<(usize, String)> {
    assert!(chunk_size > 0, "chunk_size must be positive");
    assert!(chunk_overlap < chunk_size, "overlap must be smaller than chunk_size");

    let chars: Vec<char> = text.chars().collect();
    let total = chars.len();
    if total == 0 {
        return Vec::new();
    }

    let mut windows = Vec::new();
    let mut start = 0usize;
    loop {
        let window_end = (start + chunk_size).min(total);
        let end = if window_end == total {
            total
        } else {
            cut_point(&chars, start, window_end, chunk_size)
        };

        windows.push((start, chars[start..end].iter().collect::<String>()));
        if end == total {
            break;
        }
        // Carry `chunk_overlap` characters into the next window, but never
        // move backwards past the previous start.
        start = end.saturating_sub(chunk_overlap).max(start + 1);
    }
    windows
}

/// Latest acceptable cut inside the window: after a paragraph break, else
/// after a newline, else after a space, else the window edge. Boundaries in
/// the front half of the window are ignored so a separator carried in via
/// the overlap cannot produce a degenerate sliver chunk.
fn cut_point(chars: &[char], start: usize, window_end: usize, chunk_size: usize) -> usize {
    let floor = start + chunk_size / 2;
    for i in (floor.max(start + 1)..window_end).rev() {
        if chars[i - 1] == '\n' && chars[i] == '\n' {
            return i + 1;
        }
    }
    for i in (floor..window_end).rev() {
        if chars[i] == '\n' {
            return i + 1;
        }
    }
    for i in (floor..window_end).rev() {
        if chars[i] == ' ' {
            return i + 1;
        }
    }
    window_end
}

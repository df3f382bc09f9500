//! Document loading and chunking.
//!
//! `loader` turns a directory of PDF/CSV/text files into flat [`Document`]
//! records; `splitter` cuts those into overlapping character windows ready
//! for embedding.
//!
//! [`Document`]: ragdb_core::types::Document

pub mod loader;
pub mod splitter;

pub use loader::load_documents;
pub use splitter::{split_documents, split_text};

//! pdfsearch-text
//!
//! Lexical retrieval: a tantivy token pipeline (see `analyzer`) feeding an
//! in-memory BM25 index (see `index`).
pub mod analyzer;
pub mod index;

pub use analyzer::Analyzer;
pub use index::{Bm25Params, LexicalIndex};

//! In-memory semantic index.
//!
//! `VectorIndex` holds one embedding per chunk and answers exact cosine
//! top-k queries; `EmbeddingCache` lets rebuilds skip chunks whose text was
//! already embedded by the same embedder.
pub mod cache;
pub mod index;
pub mod search;

pub use cache::{hash_content, CacheEntry, EmbeddingCache};
pub use index::VectorIndex;

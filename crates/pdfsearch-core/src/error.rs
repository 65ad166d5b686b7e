use thiserror::Error;

use crate::types::ChunkId;

#[derive(Debug, Error)]
pub enum Error {
    #[error("Invalid query: {0}")]
    InvalidQuery(String),

    #[error("Index not ready: store is at version {store_version}, indexes built from {index_version:?}")]
    IndexNotReady {
        store_version: u64,
        index_version: Option<u64>,
    },

    #[error("Embedding unavailable: {0}")]
    EmbeddingUnavailable(String),

    #[error("Embedding dimension mismatch: expected {expected}, got {actual}")]
    DimensionMismatch { expected: usize, actual: usize },

    #[error("Chunk not found: {0}")]
    NotFound(ChunkId),

    #[error("Failed to extract text from {source_name}: {reason}")]
    Extraction { source_name: String, reason: String },

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
}

impl Error {
    /// Failures confined to the embedding path. A hybrid query survives these
    /// by falling back to lexical results.
    pub fn is_semantic_failure(&self) -> bool {
        matches!(self, Error::EmbeddingUnavailable(_) | Error::DimensionMismatch { .. })
    }
}

pub type Result<T> = std::result::Result<T, Error>;

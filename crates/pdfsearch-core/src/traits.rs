use crate::error::Result;

/// Text → fixed-length vector collaborator. Implementations may block on I/O;
/// callers run them off the async executor.
pub trait Embedder: Send + Sync {
    /// Stable identifier for the provider/model (e.g. `hashing:d256`).
    fn id(&self) -> &str;
    /// Embedding dimensionality (D).
    fn dim(&self) -> usize;
    fn embed_batch(&self, texts: &[String]) -> anyhow::Result<Vec<Vec<f32>>>;
}

/// Raw document bytes → plain text collaborator.
pub trait TextExtractor: Send + Sync {
    /// Fails with `Error::Extraction` on malformed input.
    fn extract_text(&self, source_name: &str, bytes: &[u8]) -> Result<String>;
}

use std::collections::HashSet;
use std::sync::Arc;

use tracing::{info, instrument};

use pdfsearch_core::types::{Chunk, ChunkId};
use pdfsearch_core::{Error, Result};
use pdfsearch_embed::EmbeddingGateway;

use crate::cache::{hash_content, CacheEntry, EmbeddingCache};

pub(crate) struct Entry {
    pub(crate) chunk_id: ChunkId,
    pub(crate) vector: Arc<[f32]>,
    pub(crate) norm: f32,
}

/// Exact nearest-neighbour index: every stored vector is scored against the
/// query. All vectors share the dimension fixed at construction.
pub struct VectorIndex {
    pub(crate) dim: usize,
    pub(crate) entries: Vec<Entry>,
    ids: HashSet<ChunkId>,
}

impl VectorIndex {
    pub fn new(dim: usize) -> Self {
        Self { dim, entries: Vec::new(), ids: HashSet::new() }
    }

    /// Rejects vectors whose length differs from the index dimension.
    /// Re-inserting an id replaces its vector.
    pub fn insert(&mut self, chunk_id: ChunkId, vector: impl Into<Arc<[f32]>>) -> Result<()> {
        let vector: Arc<[f32]> = vector.into();
        if vector.len() != self.dim {
            return Err(Error::DimensionMismatch { expected: self.dim, actual: vector.len() });
        }
        let norm = vector.iter().map(|x| x * x).sum::<f32>().sqrt();
        if !self.ids.insert(chunk_id) {
            self.entries.retain(|e| e.chunk_id != chunk_id);
        }
        self.entries.push(Entry { chunk_id, vector, norm });
        Ok(())
    }

    /// Embeds every chunk through `gateway`, reusing cached vectors.
    ///
    /// All-or-nothing: on any gateway or dimension error no index is returned,
    /// so the caller keeps whatever index it already had.
    #[instrument(skip_all, fields(chunks = chunks.len(), embedder = gateway.embedder_id()))]
    pub async fn build(chunks: &[Chunk], gateway: &EmbeddingGateway, cache: &EmbeddingCache) -> Result<Self> {
        let embedder_id = gateway.embedder_id().to_string();
        let hashes: Vec<String> = chunks.iter().map(|c| hash_content(&c.text)).collect();
        let mut vectors = cache.get_many(&embedder_id, &hashes);

        let mut missing_hashes: Vec<String> = Vec::new();
        let mut missing_texts: Vec<String> = Vec::new();
        let mut pending: HashSet<&str> = HashSet::new();
        for (chunk, hash) in chunks.iter().zip(&hashes) {
            if !vectors.contains_key(hash) && pending.insert(hash.as_str()) {
                missing_hashes.push(hash.clone());
                missing_texts.push(chunk.text.clone());
            }
        }
        let reused = chunks.len() - missing_texts.len();

        let fresh = if missing_texts.is_empty() { Vec::new() } else { gateway.embed_batch(&missing_texts).await? };
        let fresh_entries: Vec<CacheEntry> = missing_hashes
            .into_iter()
            .zip(fresh)
            .map(|(content_hash, vector)| CacheEntry { content_hash, embedder_id: embedder_id.clone(), vector: vector.into() })
            .collect();
        for e in &fresh_entries {
            vectors.insert(e.content_hash.clone(), Arc::clone(&e.vector));
        }

        let mut index = Self::new(gateway.dim());
        for (chunk, hash) in chunks.iter().zip(&hashes) {
            let vector = vectors
                .get(hash)
                .cloned()
                .ok_or_else(|| Error::EmbeddingUnavailable(format!("no embedding produced for chunk {}", chunk.id)))?;
            index.insert(chunk.id, vector)?;
        }
        // Only vectors that made it into a complete index are cached.
        cache.put_many(&fresh_entries);

        info!(vectors = index.len(), embedded = fresh_entries.len(), reused, "vector index built");
        Ok(index)
    }

    pub fn dim(&self) -> usize {
        self.dim
    }

    pub fn contains(&self, chunk_id: ChunkId) -> bool {
        self.ids.contains(&chunk_id)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

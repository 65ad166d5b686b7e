//! In-memory embedding cache keyed by `(embedder_id, content_hash)`.
//!
//! The cache is consulted before calling the gateway and written through on
//! misses, so rebuilding after an ingest only embeds chunks that are new.
//! Entries from another embedder never match.
use std::collections::HashMap;
use std::sync::Arc;

use parking_lot::RwLock;

pub fn hash_content(s: &str) -> String {
    blake3::hash(s.as_bytes()).to_hex().to_string()
}

#[derive(Clone, Debug)]
pub struct CacheEntry {
    pub content_hash: String,
    pub embedder_id: String,
    pub vector: Arc<[f32]>,
}

#[derive(Default)]
pub struct EmbeddingCache {
    entries: RwLock<HashMap<(String, String), Arc<[f32]>>>,
}

impl EmbeddingCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get_many(&self, embedder_id: &str, hashes: &[String]) -> HashMap<String, Arc<[f32]>> {
        let entries = self.entries.read();
        hashes
            .iter()
            .filter_map(|h| {
                entries
                    .get(&(embedder_id.to_string(), h.clone()))
                    .map(|v| (h.clone(), Arc::clone(v)))
            })
            .collect()
    }

    pub fn put_many(&self, new_entries: &[CacheEntry]) {
        if new_entries.is_empty() {
            return;
        }
        let mut entries = self.entries.write();
        for e in new_entries {
            entries.insert((e.embedder_id.clone(), e.content_hash.clone()), Arc::clone(&e.vector));
        }
    }

    pub fn len(&self) -> usize {
        self.entries.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.read().is_empty()
    }

    pub fn clear(&self) {
        self.entries.write().clear();
    }
}

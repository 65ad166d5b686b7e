use std::sync::Arc;

use tracing::{debug, info};

use crate::chunker::TextSplitter;
use crate::error::{Error, Result};
use crate::types::{Chunk, ChunkId};

/// Ordered, append-only collection of chunks.
///
/// Every append that adds at least one chunk bumps `version`; indexes record
/// the version they were built from and are stale once it moves on.
/// Chunks live behind an `Arc` so index builds can take a snapshot without
/// copying while later appends copy-on-write.
#[derive(Debug, Default)]
pub struct ChunkStore {
    chunks: Arc<Vec<Chunk>>,
    version: u64,
    splitter: TextSplitter,
}

impl ChunkStore {
    pub fn new(splitter: TextSplitter) -> Self {
        Self { chunks: Arc::new(Vec::new()), version: 0, splitter }
    }

    pub fn add_document(&mut self, source_name: &str, text: &str) -> Vec<ChunkId> {
        let pieces = self.splitter.split(text);
        if pieces.is_empty() {
            debug!(source = source_name, "document produced no chunks");
            return Vec::new();
        }
        let chunks = Arc::make_mut(&mut self.chunks);
        let first = chunks.len();
        chunks.extend(pieces.into_iter().enumerate().map(|(position, text)| Chunk {
            id: first + position,
            text,
            source_document: source_name.to_string(),
            position,
        }));
        self.version += 1;
        let ids: Vec<ChunkId> = (first..chunks.len()).collect();
        info!(source = source_name, chunks = ids.len(), version = self.version, "document added");
        ids
    }

    pub fn get(&self, id: ChunkId) -> Result<&Chunk> {
        self.chunks.get(id).ok_or(Error::NotFound(id))
    }

    pub fn all(&self) -> &[Chunk] {
        &self.chunks
    }

    pub fn snapshot(&self) -> Arc<Vec<Chunk>> {
        Arc::clone(&self.chunks)
    }

    pub fn size(&self) -> usize {
        self.chunks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.chunks.is_empty()
    }

    pub fn version(&self) -> u64 {
        self.version
    }
}

use tracing::debug;

use pdfsearch_core::types::{rank_top_k, ScoredResult, SearchMode};
use pdfsearch_core::{Error, Result};
use pdfsearch_embed::EmbeddingGateway;

use crate::index::VectorIndex;

/// Cosine similarity given precomputed norms; 0 when either vector is zero.
fn cosine(a: &[f32], a_norm: f32, b: &[f32], b_norm: f32) -> f32 {
    if a_norm == 0.0 || b_norm == 0.0 {
        return 0.0;
    }
    let dot: f32 = a.iter().zip(b).map(|(x, y)| x * y).sum();
    dot / (a_norm * b_norm)
}

impl VectorIndex {
    /// Top `top_k` stored vectors by cosine similarity to `query_vec`,
    /// ties by ascending chunk id.
    pub fn search_vec(&self, query_vec: &[f32], top_k: usize) -> Result<Vec<ScoredResult>> {
        if query_vec.len() != self.dim {
            return Err(Error::DimensionMismatch { expected: self.dim, actual: query_vec.len() });
        }
        if self.entries.is_empty() || top_k == 0 {
            return Ok(Vec::new());
        }
        let q_norm = query_vec.iter().map(|x| x * x).sum::<f32>().sqrt();
        let mut results: Vec<ScoredResult> = self
            .entries
            .iter()
            .map(|e| ScoredResult::new(e.chunk_id, cosine(query_vec, q_norm, &e.vector, e.norm), SearchMode::Semantic))
            .collect();
        rank_top_k(&mut results, top_k);
        Ok(results)
    }

    /// Embeds `query_text` through the gateway, then runs [`search_vec`](Self::search_vec).
    /// An empty index answers without calling the gateway.
    pub async fn search(&self, gateway: &EmbeddingGateway, query_text: &str, top_k: usize) -> Result<Vec<ScoredResult>> {
        if self.entries.is_empty() || top_k == 0 {
            return Ok(Vec::new());
        }
        let query_vec = gateway.embed(query_text).await?;
        let results = self.search_vec(&query_vec, top_k)?;
        debug!(hits = results.len(), "semantic search");
        Ok(results)
    }
}

//! Domain types shared by the lexical, vector and hybrid engines.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::{Error, Result};

/// Dense, 0-based identifier assigned by the chunk store at insertion.
pub type ChunkId = usize;

/// A contiguous span of extracted document text; the unit of indexing and retrieval.
///
/// - `id`: position in the chunk store, stable for the lifetime of a built index pair
/// - `source_document`: name of the document the text came from
/// - `position`: order of this chunk within its source document
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Chunk {
    pub id: ChunkId,
    pub text: String,
    pub source_document: String,
    pub position: usize,
}

/// Retrieval strategy. Doubles as the query mode and as the method tag on a result.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SearchMode {
    Lexical,
    Semantic,
    Hybrid,
}

impl SearchMode {
    pub const ALL: [SearchMode; 3] = [SearchMode::Lexical, SearchMode::Semantic, SearchMode::Hybrid];

    pub fn as_str(&self) -> &'static str {
        match self {
            SearchMode::Lexical => "lexical",
            SearchMode::Semantic => "semantic",
            SearchMode::Hybrid => "hybrid",
        }
    }
}

impl fmt::Display for SearchMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SearchMode {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "lexical" | "bm25" | "keyword" => Ok(SearchMode::Lexical),
            "semantic" | "vector" | "dense" => Ok(SearchMode::Semantic),
            "hybrid" | "ensemble" => Ok(SearchMode::Hybrid),
            other => Err(format!("unknown search mode '{other}' (expected lexical, semantic or hybrid)")),
        }
    }
}

/// One ranked hit. `raw_score` is method-specific (BM25, cosine, fused);
/// higher is always better.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoredResult {
    pub chunk_id: ChunkId,
    pub raw_score: f32,
    pub normalized_score: f32,
    pub method: SearchMode,
}

impl ScoredResult {
    pub fn new(chunk_id: ChunkId, raw_score: f32, method: SearchMode) -> Self {
        Self { chunk_id, raw_score, normalized_score: raw_score, method }
    }
}

/// Orders by descending `raw_score`, ties by ascending chunk id, and keeps the first `top_k`.
pub fn rank_top_k(results: &mut Vec<ScoredResult>, top_k: usize) {
    results.sort_by(|a, b| b.raw_score.total_cmp(&a.raw_score).then(a.chunk_id.cmp(&b.chunk_id)));
    results.truncate(top_k);
}

/// Relative weight of each method in hybrid fusion.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct WeightPolicy {
    pub lexical_weight: f32,
    pub semantic_weight: f32,
}

impl Default for WeightPolicy {
    fn default() -> Self {
        Self { lexical_weight: 0.3, semantic_weight: 0.7 }
    }
}

impl WeightPolicy {
    pub fn new(lexical_weight: f32, semantic_weight: f32) -> Result<Self> {
        let policy = Self { lexical_weight, semantic_weight };
        policy.validate()?;
        Ok(policy)
    }

    pub fn validate(&self) -> Result<()> {
        for (name, w) in [("lexical_weight", self.lexical_weight), ("semantic_weight", self.semantic_weight)] {
            if !w.is_finite() || !(0.0..=1.0).contains(&w) {
                return Err(Error::InvalidConfig(format!("{name} must be within [0, 1], got {w}")));
            }
        }
        Ok(())
    }
}

/// Result of one orchestrated query.
///
/// `degraded` is set when a hybrid query lost its semantic half and fell back
/// to lexical results; `degraded_reason` then carries the gateway error.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchResponse {
    pub mode: SearchMode,
    pub results: Vec<ScoredResult>,
    pub degraded: bool,
    pub degraded_reason: Option<String>,
}

impl SearchResponse {
    pub fn complete(mode: SearchMode, results: Vec<ScoredResult>) -> Self {
        Self { mode, results, degraded: false, degraded_reason: None }
    }

    pub fn degraded(mode: SearchMode, results: Vec<ScoredResult>, reason: impl Into<String>) -> Self {
        Self { mode, results, degraded: true, degraded_reason: Some(reason.into()) }
    }

    pub fn chunk_ids(&self) -> Vec<ChunkId> {
        self.results.iter().map(|r| r.chunk_id).collect()
    }
}

/// Per-document outcome of a batch ingestion. Failed documents do not stop the batch.
#[derive(Debug, Default)]
pub struct IngestReport {
    pub ingested: Vec<(String, Vec<ChunkId>)>,
    pub failures: Vec<(String, Error)>,
}

impl IngestReport {
    pub fn chunk_count(&self) -> usize {
        self.ingested.iter().map(|(_, ids)| ids.len()).sum()
    }
}

use std::collections::{HashMap, HashSet};

use tracing::{debug, instrument};

use pdfsearch_core::config::LexicalSettings;
use pdfsearch_core::types::{rank_top_k, Chunk, ChunkId, ScoredResult, SearchMode};

use crate::analyzer::{tokenize_with, Analyzer};

/// BM25 free parameters: `k1` saturates term frequency, `b` scales length normalization.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bm25Params {
	pub k1: f32,
	pub b: f32,
}

impl Default for Bm25Params {
	fn default() -> Self {
		Self { k1: 1.5, b: 0.75 }
	}
}

impl From<&LexicalSettings> for Bm25Params {
	fn from(s: &LexicalSettings) -> Self {
		Self { k1: s.k1, b: s.b }
	}
}

#[derive(Debug, Clone, Copy)]
struct Posting {
	chunk_id: ChunkId,
	tf: u32,
}

/// Immutable BM25 index over a chunk list. Rebuilt from scratch whenever the
/// chunk store changes.
pub struct LexicalIndex {
	params: Bm25Params,
	analyzer: Analyzer,
	postings: HashMap<String, Vec<Posting>>,
	chunk_lens: HashMap<ChunkId, u32>,
	num_chunks: usize,
	avg_len: f32,
}

impl LexicalIndex {
	#[instrument(skip_all, fields(chunks = chunks.len()))]
	pub fn build(chunks: &[Chunk], params: Bm25Params, analyzer: Analyzer) -> Self {
		let mut handle = analyzer.handle();
		let mut postings: HashMap<String, Vec<Posting>> = HashMap::new();
		let mut chunk_lens = HashMap::with_capacity(chunks.len());
		let mut total_len = 0u64;

		for chunk in chunks {
			let tokens = tokenize_with(&mut handle, &chunk.text);
			let mut tf: HashMap<String, u32> = HashMap::new();
			for token in tokens.iter() {
				*tf.entry(token.clone()).or_insert(0) += 1;
			}
			for (term, tf) in tf {
				postings.entry(term).or_default().push(Posting { chunk_id: chunk.id, tf });
			}
			chunk_lens.insert(chunk.id, tokens.len() as u32);
			total_len += tokens.len() as u64;
		}

		let num_chunks = chunks.len();
		let avg_len = if num_chunks == 0 { 0.0 } else { total_len as f32 / num_chunks as f32 };
		debug!(terms = postings.len(), avg_len, "lexical index built");
		Self { params, analyzer, postings, chunk_lens, num_chunks, avg_len }
	}

	/// `ln(1 + (N - df + 0.5) / (df + 0.5))`; always positive.
	fn idf(&self, df: usize) -> f32 {
		let n = self.num_chunks as f32;
		let df = df as f32;
		(1.0 + (n - df + 0.5) / (df + 0.5)).ln()
	}

	fn term_weight(&self, tf: u32, chunk_len: u32) -> f32 {
		let Bm25Params { k1, b } = self.params;
		let tf = tf as f32;
		let len_ratio = if self.avg_len > 0.0 { chunk_len as f32 / self.avg_len } else { 0.0 };
		(tf * (k1 + 1.0)) / (tf + k1 * (1.0 - b + b * len_ratio))
	}

	/// Top `top_k` chunks sharing at least one term with the query.
	pub fn search(&self, query_text: &str, top_k: usize) -> Vec<ScoredResult> {
		if self.num_chunks == 0 || top_k == 0 {
			return Vec::new();
		}
		let terms: HashSet<String> = self.analyzer.tokenize(query_text).into_iter().collect();

		let mut scores: HashMap<ChunkId, f32> = HashMap::new();
		for term in &terms {
			let Some(postings) = self.postings.get(term) else { continue };
			let idf = self.idf(postings.len());
			for p in postings {
				let len = self.chunk_lens.get(&p.chunk_id).copied().unwrap_or(0);
				*scores.entry(p.chunk_id).or_insert(0.0) += idf * self.term_weight(p.tf, len);
			}
		}

		let mut results: Vec<ScoredResult> = scores
			.into_iter()
			.filter(|(_, score)| *score > 0.0)
			.map(|(id, score)| ScoredResult::new(id, score, SearchMode::Lexical))
			.collect();
		rank_top_k(&mut results, top_k);
		debug!(terms = terms.len(), hits = results.len(), "lexical search");
		results
	}

	/// Number of chunks containing `term` (after analysis).
	pub fn doc_freq(&self, term: &str) -> usize {
		self.analyzer
			.tokenize(term)
			.first()
			.and_then(|t| self.postings.get(t))
			.map_or(0, Vec::len)
	}

	pub fn params(&self) -> Bm25Params {
		self.params
	}

	pub fn avg_len(&self) -> f32 {
		self.avg_len
	}

	pub fn len(&self) -> usize {
		self.num_chunks
	}

	pub fn is_empty(&self) -> bool {
		self.num_chunks == 0
	}
}

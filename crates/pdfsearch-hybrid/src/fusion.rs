use std::collections::BTreeMap;

use pdfsearch_core::types::{rank_top_k, ChunkId, ScoredResult, SearchMode, WeightPolicy};

/// Rescales `normalized_score` to `[0, 1]` over the given list:
/// `(raw - min) / (max - min)`. A list whose scores are all equal
/// (a single result included) gets `1.0` everywhere.
pub fn min_max_normalize(results: &mut [ScoredResult]) {
    let Some(first) = results.first() else { return };
    let (min, max) = results
        .iter()
        .fold((first.raw_score, first.raw_score), |(lo, hi), r| (lo.min(r.raw_score), hi.max(r.raw_score)));
    let range = max - min;
    for r in results.iter_mut() {
        r.normalized_score = if range > 0.0 { (r.raw_score - min) / range } else { 1.0 };
    }
}

/// Weighted fusion of already-normalized lexical and semantic candidates.
///
/// A chunk missing from one side contributes 0 for that side. The fused
/// score lands in both `raw_score` and `normalized_score`.
pub fn fuse(lexical: &[ScoredResult], semantic: &[ScoredResult], policy: WeightPolicy, top_k: usize) -> Vec<ScoredResult> {
    let mut combined: BTreeMap<ChunkId, (f32, f32)> = BTreeMap::new();
    for r in lexical {
        combined.entry(r.chunk_id).or_default().0 = r.normalized_score;
    }
    for r in semantic {
        combined.entry(r.chunk_id).or_default().1 = r.normalized_score;
    }

    let mut fused: Vec<ScoredResult> = combined
        .into_iter()
        .map(|(chunk_id, (lex, sem))| {
            let score = policy.lexical_weight * lex + policy.semantic_weight * sem;
            ScoredResult::new(chunk_id, score, SearchMode::Hybrid)
        })
        .collect();
    rank_top_k(&mut fused, top_k);
    fused
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scored(id: ChunkId, raw: f32, method: SearchMode) -> ScoredResult {
        ScoredResult::new(id, raw, method)
    }

    #[test]
    fn normalizes_to_unit_range() {
        let mut r = vec![scored(0, 2.0, SearchMode::Lexical), scored(1, 4.0, SearchMode::Lexical), scored(2, 3.0, SearchMode::Lexical)];
        min_max_normalize(&mut r);
        assert_eq!(r[0].normalized_score, 0.0);
        assert_eq!(r[1].normalized_score, 1.0);
        assert!((r[2].normalized_score - 0.5).abs() < 1e-6);
        assert_eq!(r[1].raw_score, 4.0);
    }

    #[test]
    fn degenerate_range_is_one() {
        let mut single = vec![scored(7, 0.2, SearchMode::Semantic)];
        min_max_normalize(&mut single);
        assert_eq!(single[0].normalized_score, 1.0);

        let mut equal = vec![scored(0, 3.0, SearchMode::Lexical), scored(1, 3.0, SearchMode::Lexical)];
        min_max_normalize(&mut equal);
        assert!(equal.iter().all(|r| r.normalized_score == 1.0));

        let mut empty: Vec<ScoredResult> = Vec::new();
        min_max_normalize(&mut empty);
        assert!(empty.is_empty());
    }

    #[test]
    fn one_sided_chunks_contribute_zero() {
        let mut lex = vec![scored(0, 5.0, SearchMode::Lexical), scored(1, 1.0, SearchMode::Lexical)];
        let mut sem = vec![scored(1, 0.9, SearchMode::Semantic), scored(2, 0.1, SearchMode::Semantic)];
        min_max_normalize(&mut lex);
        min_max_normalize(&mut sem);

        let fused = fuse(&lex, &sem, WeightPolicy::default(), 10);
        let by_id = |id: ChunkId| fused.iter().find(|r| r.chunk_id == id).map(|r| r.raw_score);
        assert!((by_id(0).unwrap_or_default() - 0.3).abs() < 1e-6);
        assert!((by_id(1).unwrap_or_default() - 0.7).abs() < 1e-6);
        assert_eq!(by_id(2), Some(0.0));
        assert_eq!(fused[0].chunk_id, 1);
        assert!(fused.iter().all(|r| r.method == SearchMode::Hybrid && r.raw_score == r.normalized_score));
    }

    #[test]
    fn fused_ties_break_by_id_and_truncate() {
        let lex = vec![scored(4, 1.0, SearchMode::Lexical)];
        let sem = vec![scored(2, 1.0, SearchMode::Semantic)];
        let policy = WeightPolicy { lexical_weight: 0.5, semantic_weight: 0.5 };
        let fused = fuse(&lex, &sem, policy, 1);
        assert_eq!(fused.len(), 1);
        assert_eq!(fused[0].chunk_id, 2);
    }
}

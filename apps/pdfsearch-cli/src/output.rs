//! Output formatting for search responses.
//!
//! Human output lists each method's results as its own section; `--json`
//! emits one object per method for scripting.
use serde::Serialize;

use pdfsearch_core::types::{SearchMode, SearchResponse};
use pdfsearch_core::Result;
use pdfsearch_hybrid::HybridSearchEngine;

const SNIPPET_MAX_LEN: usize = 200;

/// One ranked passage with its source and scores.
#[derive(Debug, Clone, Serialize)]
pub struct ResultRow {
    pub rank: usize,
    pub chunk_id: usize,
    pub source: String,
    pub position: usize,
    pub method: SearchMode,
    pub raw_score: f32,
    pub normalized_score: f32,
    pub snippet: String,
}

/// A response resolved against the engine's chunks.
#[derive(Debug, Clone, Serialize)]
pub struct ModeOutput {
    pub mode: SearchMode,
    pub degraded: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub degraded_reason: Option<String>,
    pub results: Vec<ResultRow>,
}

#[derive(Serialize)]
struct JsonOutput<'a> {
    query: &'a str,
    modes: &'a [ModeOutput],
}

pub fn resolve(engine: &HybridSearchEngine, response: SearchResponse) -> Result<ModeOutput> {
    let mut results = Vec::with_capacity(response.results.len());
    for (i, r) in response.results.iter().enumerate() {
        let chunk = engine.chunk(r.chunk_id)?;
        results.push(ResultRow {
            rank: i + 1,
            chunk_id: r.chunk_id,
            source: chunk.source_document,
            position: chunk.position,
            method: r.method,
            raw_score: r.raw_score,
            normalized_score: r.normalized_score,
            snippet: truncate_text(&chunk.text, SNIPPET_MAX_LEN),
        });
    }
    Ok(ModeOutput {
        mode: response.mode,
        degraded: response.degraded,
        degraded_reason: response.degraded_reason,
        results,
    })
}

pub fn format_json(query: &str, outputs: &[ModeOutput]) -> String {
    serde_json::to_string_pretty(&JsonOutput { query, modes: outputs }).unwrap_or_else(|_| "{}".to_string())
}

pub fn format_human(query: &str, outputs: &[ModeOutput]) -> String {
    let mut out = String::new();
    for output in outputs {
        out.push_str(&format!("\n🔍 {} results for \"{}\"\n", title(output.mode), query));
        if output.degraded {
            let reason = output.degraded_reason.as_deref().unwrap_or("unknown error");
            out.push_str(&format!("⚠️  Semantic search unavailable ({reason}); showing keyword results only\n"));
        }
        if output.results.is_empty() {
            out.push_str("   No results found\n");
            continue;
        }
        for row in &output.results {
            out.push_str(&format!(
                "\n  {}. score={:.4}  normalized={:.2}  {} #{}  [{}]\n",
                row.rank, row.raw_score, row.normalized_score, row.source, row.position, row.method
            ));
            out.push_str(&format!("     📝 {}\n", row.snippet));
        }
    }
    out
}

fn title(mode: SearchMode) -> &'static str {
    match mode {
        SearchMode::Lexical => "BM25 (keyword)",
        SearchMode::Semantic => "Semantic (vector)",
        SearchMode::Hybrid => "Hybrid (ensemble)",
    }
}

/// Collapses whitespace and cuts at `max_len` chars, appending `...` when cut.
pub fn truncate_text(text: &str, max_len: usize) -> String {
    let flat = text.split_whitespace().collect::<Vec<_>>().join(" ");
    if flat.chars().count() <= max_len {
        return flat;
    }
    let cut: String = flat.chars().take(max_len).collect();
    format!("{}...", cut.trim_end())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn truncate_keeps_short_text() {
        assert_eq!(truncate_text("a  short\n text", 50), "a short text");
    }

    #[test]
    fn truncate_cuts_on_char_boundary() {
        let text = "é".repeat(10);
        assert_eq!(truncate_text(&text, 4), "éééé...");
    }

    #[test]
    fn degraded_sections_say_so() {
        let outputs = vec![ModeOutput {
            mode: SearchMode::Hybrid,
            degraded: true,
            degraded_reason: Some("timed out".into()),
            results: Vec::new(),
        }];
        let text = format_human("cat", &outputs);
        assert!(text.contains("Hybrid (ensemble)"));
        assert!(text.contains("timed out"));
        assert!(text.contains("No results found"));
    }
}

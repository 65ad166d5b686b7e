//! Recursive character text splitter.
//!
//! Text is split on the first separator that occurs in it; pieces that are
//! still longer than `max_chars` are split again with the remaining
//! separators. Short pieces are merged back into chunks of at most
//! `max_chars` characters, with up to `overlap_chars` of trailing context
//! repeated at the start of the next chunk.
use std::collections::VecDeque;

use tracing::warn;

use crate::config::ChunkingConfig;

#[derive(Debug, Clone, Default)]
pub struct TextSplitter {
    config: ChunkingConfig,
}

fn char_len(s: &str) -> usize {
    s.chars().count()
}

impl TextSplitter {
    pub fn new(config: ChunkingConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &ChunkingConfig {
        &self.config
    }

    pub fn split(&self, text: &str) -> Vec<String> {
        if text.trim().is_empty() {
            return Vec::new();
        }
        self.split_recursive(text, &self.config.separators)
    }

    fn split_recursive(&self, text: &str, separators: &[String]) -> Vec<String> {
        // First separator present in the text; "" (per-char) always matches.
        let (idx, separator) = separators
            .iter()
            .enumerate()
            .find(|(_, sep)| sep.is_empty() || text.contains(sep.as_str()))
            .map(|(i, sep)| (i, sep.as_str()))
            .unwrap_or((separators.len(), ""));
        let remaining = separators.get(idx + 1..).unwrap_or(&[]);

        let pieces: Vec<String> = if separator.is_empty() {
            text.chars().map(String::from).collect()
        } else {
            text.split(separator).map(str::to_string).collect()
        };

        let mut chunks = Vec::new();
        let mut short: Vec<String> = Vec::new();
        for piece in pieces {
            if char_len(&piece) < self.config.max_chars {
                short.push(piece);
                continue;
            }
            if !short.is_empty() {
                chunks.extend(self.merge(&short, separator));
                short.clear();
            }
            if remaining.is_empty() {
                let piece = piece.trim();
                if !piece.is_empty() {
                    chunks.push(piece.to_string());
                }
            } else {
                chunks.extend(self.split_recursive(&piece, remaining));
            }
        }
        if !short.is_empty() {
            chunks.extend(self.merge(&short, separator));
        }
        chunks
    }

    fn merge(&self, pieces: &[String], separator: &str) -> Vec<String> {
        let sep_len = char_len(separator);
        let max = self.config.max_chars;
        let overlap = self.config.overlap_chars;

        let mut chunks = Vec::new();
        let mut window: VecDeque<(&str, usize)> = VecDeque::new();
        let mut total = 0usize;

        for piece in pieces {
            let len = char_len(piece);
            let joint = if window.is_empty() { 0 } else { sep_len };
            if total + len + joint > max {
                if total > max {
                    warn!(chunk_chars = total, max_chars = max, "chunk exceeds configured size");
                }
                if !window.is_empty() {
                    push_joined(&mut chunks, &window, separator);
                    // Keep a tail of the window as overlap for the next chunk.
                    loop {
                        let joint = if window.is_empty() { 0 } else { sep_len };
                        if total <= overlap && (total == 0 || total + len + joint <= max) {
                            break;
                        }
                        let Some((_, front_len)) = window.pop_front() else { break };
                        let joint = if window.is_empty() { 0 } else { sep_len };
                        total -= front_len + joint;
                    }
                }
            }
            let joint = if window.is_empty() { 0 } else { sep_len };
            window.push_back((piece.as_str(), len));
            total += len + joint;
        }
        push_joined(&mut chunks, &window, separator);
        chunks
    }
}

fn push_joined(chunks: &mut Vec<String>, window: &VecDeque<(&str, usize)>, separator: &str) {
    let joined = window.iter().map(|(p, _)| *p).collect::<Vec<_>>().join(separator);
    let joined = joined.trim();
    if !joined.is_empty() {
        chunks.push(joined.to_string());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn splitter(max_chars: usize, overlap_chars: usize) -> TextSplitter {
        TextSplitter::new(ChunkingConfig { max_chars, overlap_chars, ..ChunkingConfig::default() })
    }

    #[test]
    fn short_text_is_one_chunk() {
        let chunks = splitter(1000, 200).split("  Short text.  ");
        assert_eq!(chunks, vec!["Short text.".to_string()]);
    }

    #[test]
    fn blank_text_yields_nothing() {
        assert!(splitter(1000, 200).split(" \n\n \t").is_empty());
    }

    #[test]
    fn paragraphs_merge_until_limit() {
        let text = "alpha beta\n\ngamma delta\n\nepsilon zeta";
        let chunks = splitter(25, 0).split(text);
        assert_eq!(chunks, vec!["alpha beta\n\ngamma delta".to_string(), "epsilon zeta".to_string()]);
    }

    #[test]
    fn chunks_respect_max_chars() {
        let text = "word ".repeat(500);
        for chunk in splitter(100, 20).split(&text) {
            assert!(chunk.chars().count() <= 100, "chunk too long: {}", chunk.len());
        }
    }

    #[test]
    fn overlap_repeats_trailing_words() {
        let text = "one two three four five six seven eight nine ten";
        let chunks = splitter(20, 10).split(text);
        assert!(chunks.len() > 1);
        for pair in chunks.windows(2) {
            let last_word = pair[0].split(' ').last().unwrap_or_default();
            assert!(pair[1].split(' ').any(|w| w == last_word), "{:?} should overlap {:?}", pair[1], pair[0]);
        }
    }

    #[test]
    fn unbreakable_text_falls_back_to_characters() {
        let text = "x".repeat(25);
        let chunks = splitter(10, 0).split(&text);
        assert_eq!(chunks.len(), 3);
        assert!(chunks.iter().all(|c| c.chars().count() <= 10));
    }
}

//! Layered configuration and path helpers.
//!
//! Uses Figment to merge built-in defaults + `config.toml` + `config.<env>.toml`
//! + `APP_*` env vars (nested keys separated by `__`). Provides helpers to
//! expand `~` and `${VAR}` and to resolve relative paths against a base directory.
use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};
use serde::{Deserialize, Serialize};
use std::env;
use std::path::{Path, PathBuf};

use crate::error::{Error, Result};
use crate::types::WeightPolicy;

/// Recursive character splitting parameters. Lengths are in chars.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ChunkingConfig {
    pub max_chars: usize,
    pub overlap_chars: usize,
    pub separators: Vec<String>,
}

impl Default for ChunkingConfig {
    fn default() -> Self {
        Self {
            max_chars: 1000,
            overlap_chars: 200,
            separators: ["\n\n", "\n", ". ", " ", ""].iter().map(|s| s.to_string()).collect(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LexicalSettings {
    pub k1: f32,
    pub b: f32,
    pub remove_stopwords: bool,
}

impl Default for LexicalSettings {
    fn default() -> Self {
        Self { k1: 1.5, b: 0.75, remove_stopwords: true }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EmbeddingSettings {
    /// `hashing` (offline, deterministic) or `openai` (remote).
    pub provider: String,
    pub model: String,
    pub endpoint: String,
    pub dimension: usize,
    /// Falls back to `OPENAI_API_KEY` when unset.
    pub api_key: Option<String>,
    pub timeout_secs: u64,
    pub batch_size: usize,
    pub max_retries: u32,
}

impl Default for EmbeddingSettings {
    fn default() -> Self {
        Self {
            provider: "openai".to_string(),
            model: "text-embedding-ada-002".to_string(),
            endpoint: "https://api.openai.com/v1/embeddings".to_string(),
            dimension: 1536,
            api_key: None,
            timeout_secs: 30,
            batch_size: 64,
            max_retries: 3,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchSettings {
    pub default_top_k: usize,
    pub candidate_multiplier: usize,
    pub min_candidates: usize,
    pub weights: WeightPolicy,
}

impl Default for SearchSettings {
    fn default() -> Self {
        Self { default_top_k: 3, candidate_multiplier: 3, min_candidates: 20, weights: WeightPolicy::default() }
    }
}

impl SearchSettings {
    /// Candidates requested from each index before hybrid fusion.
    pub fn candidate_count(&self, top_k: usize) -> usize {
        top_k.saturating_mul(self.candidate_multiplier).max(self.min_candidates).max(top_k)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub chunking: ChunkingConfig,
    pub lexical: LexicalSettings,
    pub embedding: EmbeddingSettings,
    pub search: SearchSettings,
}

impl Settings {
    pub fn validate(&self) -> Result<()> {
        let invalid = |msg: String| Err(Error::InvalidConfig(msg));
        if self.chunking.max_chars == 0 {
            return invalid("chunking.max_chars must be positive".into());
        }
        if self.chunking.overlap_chars >= self.chunking.max_chars {
            return invalid(format!(
                "chunking.overlap_chars ({}) must be smaller than chunking.max_chars ({})",
                self.chunking.overlap_chars, self.chunking.max_chars
            ));
        }
        if !(self.lexical.k1.is_finite() && self.lexical.k1 > 0.0) {
            return invalid(format!("lexical.k1 must be positive, got {}", self.lexical.k1));
        }
        if !(0.0..=1.0).contains(&self.lexical.b) {
            return invalid(format!("lexical.b must be within [0, 1], got {}", self.lexical.b));
        }
        if self.embedding.dimension == 0 {
            return invalid("embedding.dimension must be positive".into());
        }
        if self.embedding.batch_size == 0 || self.embedding.timeout_secs == 0 {
            return invalid("embedding.batch_size and embedding.timeout_secs must be positive".into());
        }
        self.search.weights.validate()
    }
}

pub struct Config {
    figment: Figment,
}

impl Config {
    pub fn load() -> anyhow::Result<Self> {
        let env_name = env::var("RUST_ENV").unwrap_or_else(|_| "dev".to_string());

        let mut figment = Figment::from(Serialized::defaults(Settings::default())).merge(Toml::file("config.toml"));
        match env_name.as_str() {
            "dev" | "development" => figment = figment.merge(Toml::file("config.dev.toml")),
            "prod" | "production" => figment = figment.merge(Toml::file("config.prod.toml")),
            "test" | "testing" => figment = figment.merge(Toml::file("config.test.toml")),
            _ => {}
        }
        figment = figment.merge(Env::prefixed("APP_").split("__"));

        let config = Self { figment };
        config.settings()?;
        Ok(config)
    }

    /// Wraps an explicit figment; defaults are layered underneath.
    pub fn from_figment(figment: Figment) -> Self {
        Self { figment: Figment::from(Serialized::defaults(Settings::default())).merge(figment) }
    }

    pub fn get<T>(&self, key: &str) -> anyhow::Result<T>
    where
        T: serde::de::DeserializeOwned,
    {
        self.figment
            .extract_inner(key)
            .map_err(|e| anyhow::anyhow!("Failed to get '{}': {}", key, e))
    }

    pub fn settings(&self) -> anyhow::Result<Settings> {
        let settings: Settings = self
            .figment
            .extract()
            .map_err(|e| anyhow::anyhow!("Failed to read settings: {}", e))?;
        settings.validate()?;
        Ok(settings)
    }
}

/// Expand a user-provided path string:
/// - Expands leading '~' to the user's home directory
/// - Expands ${VAR} and $VAR environment variables
/// - Returns a PathBuf without attempting to canonicalize
pub fn expand_path<S: AsRef<str>>(input: S) -> PathBuf {
    let s = input.as_ref();
    let expanded_env = shellexpand::env(s).unwrap_or(std::borrow::Cow::Borrowed(s));
    let expanded = shellexpand::tilde(&expanded_env);
    PathBuf::from(expanded.as_ref())
}

/// Resolve a possibly relative path against a given base directory after expansion.
/// If `p` is absolute, it's returned as-is; otherwise `base.join(p)` is returned.
pub fn resolve_with_base<S: AsRef<str>>(base: &Path, p: S) -> PathBuf {
    let p = expand_path(p);
    if p.is_absolute() { p } else { base.join(p) }
}

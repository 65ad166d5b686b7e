//! Embedding providers and the gateway the indexes talk to.
use std::sync::Arc;

use anyhow::{bail, Result};
use tracing::info;

use pdfsearch_core::config::EmbeddingSettings;
pub use pdfsearch_core::traits::Embedder;

pub mod gateway;
pub mod hashing;
pub mod remote;

pub use gateway::EmbeddingGateway;
pub use hashing::HashingEmbedder;
pub use remote::OpenAiEmbedder;

/// Provider selected by `embedding.provider`; `APP_USE_FAKE_EMBEDDINGS=1`
/// forces the hashing embedder.
pub fn default_embedder(settings: &EmbeddingSettings) -> Result<Arc<dyn Embedder>> {
    let use_fake = std::env::var("APP_USE_FAKE_EMBEDDINGS")
        .ok()
        .map(|v| v == "1" || v.eq_ignore_ascii_case("true"))
        .unwrap_or(false);
    if use_fake {
        info!(dim = settings.dimension, "using hashing embedder (APP_USE_FAKE_EMBEDDINGS)");
        return Ok(Arc::new(HashingEmbedder::new(settings.dimension)));
    }
    match settings.provider.to_ascii_lowercase().as_str() {
        "hashing" | "fake" => Ok(Arc::new(HashingEmbedder::new(settings.dimension))),
        "openai" => {
            let embedder = OpenAiEmbedder::from_settings(settings)?;
            info!(model = %settings.model, endpoint = %settings.endpoint, "using remote embedder");
            Ok(Arc::new(embedder))
        }
        other => bail!("Unknown embedding provider '{other}' (expected 'openai' or 'hashing')"),
    }
}

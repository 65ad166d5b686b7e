use std::sync::Arc;
use std::time::Duration;

use tracing::{debug, warn};

use pdfsearch_core::config::EmbeddingSettings;
use pdfsearch_core::traits::Embedder;
use pdfsearch_core::{Error, Result};

/// Async boundary around a blocking [`Embedder`].
///
/// Each request runs on tokio's blocking pool under a timeout, so a slow or
/// hung provider fails only the caller's embedding step. Every provider
/// failure is reported as `Error::EmbeddingUnavailable`.
#[derive(Clone)]
pub struct EmbeddingGateway {
    embedder: Arc<dyn Embedder>,
    timeout: Duration,
    batch_size: usize,
}

impl EmbeddingGateway {
    pub fn new(embedder: Arc<dyn Embedder>, timeout: Duration, batch_size: usize) -> Self {
        Self { embedder, timeout, batch_size: batch_size.max(1) }
    }

    pub fn from_settings(embedder: Arc<dyn Embedder>, settings: &EmbeddingSettings) -> Self {
        Self::new(embedder, Duration::from_secs(settings.timeout_secs), settings.batch_size)
    }

    pub fn embedder_id(&self) -> &str {
        self.embedder.id()
    }

    pub fn dim(&self) -> usize {
        self.embedder.dim()
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    pub async fn embed(&self, text: &str) -> Result<Vec<f32>> {
        let mut out = self.request(vec![text.to_string()]).await?;
        out.pop().ok_or_else(|| Error::EmbeddingUnavailable("provider returned no embedding".into()))
    }

    /// Embeds `texts` in order, `batch_size` inputs per provider call.
    /// Fails as a whole if any batch fails.
    pub async fn embed_batch(&self, texts: &[String]) -> Result<Vec<Vec<f32>>> {
        let mut out = Vec::with_capacity(texts.len());
        for batch in texts.chunks(self.batch_size) {
            out.extend(self.request(batch.to_vec()).await?);
        }
        Ok(out)
    }

    async fn request(&self, texts: Vec<String>) -> Result<Vec<Vec<f32>>> {
        let expected = texts.len();
        let embedder = Arc::clone(&self.embedder);
        let task = tokio::task::spawn_blocking(move || embedder.embed_batch(&texts));

        let embeddings = match tokio::time::timeout(self.timeout, task).await {
            Err(_) => {
                warn!(timeout_ms = self.timeout.as_millis() as u64, "embedding request timed out");
                return Err(Error::EmbeddingUnavailable(format!("timed out after {:?}", self.timeout)));
            }
            Ok(Err(join_err)) => {
                return Err(Error::EmbeddingUnavailable(format!("embedding task failed: {join_err}")));
            }
            Ok(Ok(Err(e))) => return Err(Error::EmbeddingUnavailable(format!("{e:#}"))),
            Ok(Ok(Ok(embeddings))) => embeddings,
        };

        if embeddings.len() != expected {
            return Err(Error::EmbeddingUnavailable(format!(
                "provider returned {} embeddings for {} inputs",
                embeddings.len(),
                expected
            )));
        }
        debug!(inputs = expected, embedder = self.embedder.id(), "embedded batch");
        Ok(embeddings)
    }
}

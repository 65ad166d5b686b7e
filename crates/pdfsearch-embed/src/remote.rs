//! OpenAI-compatible HTTP embedding provider.
//!
//! Posts batches to a `/v1/embeddings` endpoint with bearer auth and retries
//! failed requests with exponential backoff. Calls block; run them through
//! the gateway, which moves them onto tokio's blocking pool.

use std::sync::OnceLock;
use std::time::Duration;

use anyhow::{anyhow, bail, Context, Result};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use pdfsearch_core::config::EmbeddingSettings;
use pdfsearch_core::traits::Embedder;

#[derive(Serialize)]
struct EmbedRequest<'a> {
    model: &'a str,
    input: &'a [String],
}

#[derive(Deserialize)]
struct EmbedResponse {
    data: Vec<EmbedData>,
}

#[derive(Deserialize)]
struct EmbedData {
    index: usize,
    embedding: Vec<f32>,
}

pub struct OpenAiEmbedder {
    endpoint: String,
    model: String,
    api_key: String,
    dim: usize,
    max_retries: u32,
    request_timeout: Duration,
    id: String,
    // Built lazily on first use: the blocking client must not be created on an async worker.
    client: OnceLock<reqwest::blocking::Client>,
}

impl OpenAiEmbedder {
    pub fn new(settings: &EmbeddingSettings, api_key: String) -> Self {
        Self {
            endpoint: settings.endpoint.clone(),
            model: settings.model.clone(),
            api_key,
            dim: settings.dimension,
            max_retries: settings.max_retries,
            request_timeout: Duration::from_secs(settings.timeout_secs),
            id: format!("openai:{}:d{}", settings.model, settings.dimension),
            client: OnceLock::new(),
        }
    }

    /// Uses `settings.api_key`, then `OPENAI_API_KEY`.
    pub fn from_settings(settings: &EmbeddingSettings) -> Result<Self> {
        let api_key = settings
            .api_key
            .clone()
            .filter(|k| !k.trim().is_empty())
            .or_else(|| std::env::var("OPENAI_API_KEY").ok().filter(|k| !k.trim().is_empty()))
            .ok_or_else(|| {
                anyhow!("No API key for embedding provider: set OPENAI_API_KEY or APP_EMBEDDING__API_KEY, or use APP_EMBEDDING__PROVIDER=hashing")
            })?;
        Ok(Self::new(settings, api_key))
    }

    fn client(&self) -> Result<&reqwest::blocking::Client> {
        if let Some(client) = self.client.get() {
            return Ok(client);
        }
        let client = reqwest::blocking::Client::builder()
            .timeout(self.request_timeout)
            .build()
            .context("Failed to build HTTP client")?;
        Ok(self.client.get_or_init(|| client))
    }

    fn send_request(&self, texts: &[String]) -> Result<Vec<Vec<f32>>> {
        let response = self
            .client()?
            .post(&self.endpoint)
            .bearer_auth(&self.api_key)
            .json(&EmbedRequest { model: &self.model, input: texts })
            .send()
            .context("HTTP error")?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().unwrap_or_default();
            bail!("API returned {status}: {body}");
        }

        let mut resp: EmbedResponse = response.json().context("JSON parse error")?;
        if resp.data.len() != texts.len() {
            bail!("API returned {} embeddings for {} inputs", resp.data.len(), texts.len());
        }
        resp.data.sort_by_key(|d| d.index);
        Ok(resp.data.into_iter().map(|d| d.embedding).collect())
    }
}

impl Embedder for OpenAiEmbedder {
    fn id(&self) -> &str {
        &self.id
    }

    fn dim(&self) -> usize {
        self.dim
    }

    fn embed_batch(&self, texts: &[String]) -> Result<Vec<Vec<f32>>> {
        if texts.is_empty() {
            return Ok(Vec::new());
        }
        let mut last_err = None;
        for attempt in 0..=self.max_retries {
            if attempt > 0 {
                let delay = Duration::from_millis(250 * 2u64.pow(attempt - 1));
                std::thread::sleep(delay);
                debug!(attempt, "retrying embedding request");
            }
            match self.send_request(texts) {
                Ok(embeddings) => return Ok(embeddings),
                Err(e) => {
                    warn!(attempt, error = %e, "embedding request failed");
                    last_err = Some(e);
                }
            }
        }
        Err(last_err.unwrap_or_else(|| anyhow!("all retries exhausted")))
    }
}

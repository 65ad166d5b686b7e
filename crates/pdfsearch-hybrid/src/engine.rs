use std::sync::Arc;

use parking_lot::RwLock;
use tracing::{debug, error, info, instrument, warn};

use pdfsearch_core::chunker::TextSplitter;
use pdfsearch_core::config::Settings;
use pdfsearch_core::store::ChunkStore;
use pdfsearch_core::traits::{Embedder, TextExtractor};
use pdfsearch_core::types::{Chunk, ChunkId, IngestReport, SearchMode, SearchResponse, WeightPolicy};
use pdfsearch_core::{Error, Result};
use pdfsearch_embed::EmbeddingGateway;
use pdfsearch_text::{Analyzer, Bm25Params, LexicalIndex};
use pdfsearch_vector::{EmbeddingCache, VectorIndex};

use crate::fusion::{fuse, min_max_normalize};

/// Lexical and vector indexes built together from one chunk-store version.
pub struct IndexSnapshot {
    pub store_version: u64,
    pub embedder_id: String,
    pub chunks: Arc<Vec<Chunk>>,
    pub lexical: LexicalIndex,
    pub vector: VectorIndex,
}

impl IndexSnapshot {
    fn chunk(&self, id: ChunkId) -> Option<&Chunk> {
        self.chunks.get(id).filter(|c| c.id == id)
    }
}

/// Ingests documents into a chunk store and answers lexical, semantic and
/// hybrid queries against the last built [`IndexSnapshot`].
///
/// All methods take `&self`; share the engine through an `Arc`. Queries hold
/// their own `Arc` to the snapshot they started on, so a concurrent rebuild
/// never changes results mid-query.
pub struct HybridSearchEngine {
    settings: Settings,
    analyzer: Analyzer,
    store: RwLock<ChunkStore>,
    gateway: RwLock<EmbeddingGateway>,
    cache: EmbeddingCache,
    active: RwLock<Option<Arc<IndexSnapshot>>>,
}

impl HybridSearchEngine {
    pub fn new(settings: Settings, embedder: Arc<dyn Embedder>) -> Result<Self> {
        settings.validate()?;
        let store = ChunkStore::new(TextSplitter::new(settings.chunking.clone()));
        let gateway = EmbeddingGateway::from_settings(embedder, &settings.embedding);
        let analyzer = Analyzer::new(settings.lexical.remove_stopwords);
        Ok(Self {
            settings,
            analyzer,
            store: RwLock::new(store),
            gateway: RwLock::new(gateway),
            cache: EmbeddingCache::new(),
            active: RwLock::new(None),
        })
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    /// Splits `raw_text` into chunks and appends them. Indexes go stale until
    /// the next [`build_indexes`](Self::build_indexes).
    pub fn ingest(&self, source_name: &str, raw_text: &str) -> Vec<ChunkId> {
        self.store.write().add_document(source_name, raw_text)
    }

    /// Extracts and ingests each `(name, bytes)` document. A document that
    /// fails extraction is recorded in the report and the rest continue.
    pub fn ingest_batch<I, B>(&self, documents: I, extractor: &dyn TextExtractor) -> IngestReport
    where
        I: IntoIterator<Item = (String, B)>,
        B: AsRef<[u8]>,
    {
        let mut report = IngestReport::default();
        for (name, bytes) in documents {
            match extractor.extract_text(&name, bytes.as_ref()) {
                Ok(text) => {
                    let ids = self.ingest(&name, &text);
                    report.ingested.push((name, ids));
                }
                Err(e) => {
                    warn!(source = %name, error = %e, "skipping document");
                    report.failures.push((name, e));
                }
            }
        }
        info!(
            documents = report.ingested.len(),
            chunks = report.chunk_count(),
            failures = report.failures.len(),
            "batch ingested"
        );
        report
    }

    /// Rebuilds both indexes from the current store contents and swaps them in.
    ///
    /// On error the previously active snapshot stays in place. A build that
    /// finishes after a newer one has been installed is discarded.
    #[instrument(skip_all)]
    pub async fn build_indexes(&self) -> Result<()> {
        let (chunks, store_version) = {
            let store = self.store.read();
            (store.snapshot(), store.version())
        };
        let gateway = self.gateway.read().clone();

        let lexical = LexicalIndex::build(&chunks, Bm25Params::from(&self.settings.lexical), self.analyzer.clone());
        let vector = VectorIndex::build(&chunks, &gateway, &self.cache).await?;

        let snapshot = Arc::new(IndexSnapshot {
            store_version,
            embedder_id: gateway.embedder_id().to_string(),
            chunks,
            lexical,
            vector,
        });

        let mut active = self.active.write();
        if let Some(current) = active.as_ref() {
            if current.store_version > store_version {
                info!(
                    built = store_version,
                    active = current.store_version,
                    "discarding index build older than the active snapshot"
                );
                return Ok(());
            }
        }
        info!(
            store_version,
            chunks = snapshot.chunks.len(),
            embedder = %snapshot.embedder_id,
            "index snapshot swapped in"
        );
        *active = Some(snapshot);
        Ok(())
    }

    /// The active snapshot if it matches the store version and the embedder of `gateway`.
    fn current_snapshot(&self, gateway: &EmbeddingGateway) -> Result<Arc<IndexSnapshot>> {
        let store_version = self.store.read().version();
        let active = self.active.read().clone();
        match active {
            Some(s) if s.store_version == store_version && s.embedder_id == gateway.embedder_id() => Ok(s),
            other => Err(Error::IndexNotReady { store_version, index_version: other.map(|s| s.store_version) }),
        }
    }

    #[instrument(skip_all, fields(mode = %mode, top_k = top_k))]
    pub async fn search(
        &self,
        query_text: &str,
        mode: SearchMode,
        top_k: usize,
        policy: WeightPolicy,
    ) -> Result<SearchResponse> {
        if query_text.trim().is_empty() {
            return Err(Error::InvalidQuery("query must not be empty".into()));
        }
        policy.validate()?;
        let gateway = self.gateway.read().clone();
        let snapshot = self.current_snapshot(&gateway)?;

        let response = match mode {
            SearchMode::Lexical => {
                let mut results = snapshot.lexical.search(query_text, top_k);
                min_max_normalize(&mut results);
                SearchResponse::complete(mode, results)
            }
            SearchMode::Semantic => {
                let mut results = snapshot.vector.search(&gateway, query_text, top_k).await?;
                min_max_normalize(&mut results);
                SearchResponse::complete(mode, results)
            }
            SearchMode::Hybrid => self.hybrid(&snapshot, &gateway, query_text, top_k, policy).await?,
        };

        for r in &response.results {
            if snapshot.chunk(r.chunk_id).is_none() {
                error!(chunk_id = r.chunk_id, store_version = snapshot.store_version, "index references a missing chunk");
                return Err(Error::NotFound(r.chunk_id));
            }
        }
        debug!(hits = response.results.len(), degraded = response.degraded, "query answered");
        Ok(response)
    }

    /// [`search`](Self::search) with the configured default `top_k` and weights.
    pub async fn search_default(&self, query_text: &str, mode: SearchMode) -> Result<SearchResponse> {
        let search = &self.settings.search;
        self.search(query_text, mode, search.default_top_k, search.weights).await
    }

    async fn hybrid(
        &self,
        snapshot: &IndexSnapshot,
        gateway: &EmbeddingGateway,
        query_text: &str,
        top_k: usize,
        policy: WeightPolicy,
    ) -> Result<SearchResponse> {
        let candidates = self.settings.search.candidate_count(top_k);
        let (semantic, mut lexical) = tokio::join!(
            snapshot.vector.search(gateway, query_text, candidates),
            async { snapshot.lexical.search(query_text, candidates) }
        );

        match semantic {
            Ok(mut semantic) => {
                min_max_normalize(&mut lexical);
                min_max_normalize(&mut semantic);
                Ok(SearchResponse::complete(SearchMode::Hybrid, fuse(&lexical, &semantic, policy, top_k)))
            }
            Err(e) if e.is_semantic_failure() => {
                warn!(error = %e, "semantic search failed, serving lexical results only");
                lexical.truncate(top_k);
                min_max_normalize(&mut lexical);
                Ok(SearchResponse::degraded(SearchMode::Hybrid, lexical, e.to_string()))
            }
            Err(e) => Err(e),
        }
    }

    /// Looks the chunk up in the active snapshot first, then in the store.
    pub fn chunk(&self, id: ChunkId) -> Result<Chunk> {
        if let Some(chunk) = self.active.read().as_ref().and_then(|s| s.chunk(id).cloned()) {
            return Ok(chunk);
        }
        self.store.read().get(id).cloned()
    }

    pub fn chunk_count(&self) -> usize {
        self.store.read().size()
    }

    pub fn store_version(&self) -> u64 {
        self.store.read().version()
    }

    pub fn is_ready(&self) -> bool {
        let gateway = self.gateway.read().clone();
        self.current_snapshot(&gateway).is_ok()
    }

    pub fn embedder_id(&self) -> String {
        self.gateway.read().embedder_id().to_string()
    }

    /// Switches the embedding provider. The active snapshot stays in memory but
    /// is stale until the next build.
    pub fn replace_embedder(&self, embedder: Arc<dyn Embedder>) {
        let gateway = EmbeddingGateway::from_settings(embedder, &self.settings.embedding);
        info!(embedder = gateway.embedder_id(), "embedder replaced");
        *self.gateway.write() = gateway;
    }
}

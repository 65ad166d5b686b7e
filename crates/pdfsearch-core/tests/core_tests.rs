use figment::providers::{Format, Toml};
use figment::Figment;

use pdfsearch_core::chunker::TextSplitter;
use pdfsearch_core::config::{ChunkingConfig, Config, Settings};
use pdfsearch_core::store::ChunkStore;
use pdfsearch_core::types::{SearchMode, WeightPolicy};
use pdfsearch_core::Error;

fn small_store() -> ChunkStore {
    ChunkStore::new(TextSplitter::new(ChunkingConfig { max_chars: 30, overlap_chars: 0, ..ChunkingConfig::default() }))
}

#[test]
fn add_document_assigns_dense_sequential_ids() {
    let mut store = small_store();
    let first = store.add_document("a.pdf", "alpha bravo charlie\n\ndelta echo foxtrot");
    let second = store.add_document("b.pdf", "golf hotel");

    assert_eq!(first, vec![0, 1]);
    assert_eq!(second, vec![2]);
    assert_eq!(store.size(), 3);

    let ids: Vec<usize> = store.all().iter().map(|c| c.id).collect();
    assert_eq!(ids, vec![0, 1, 2], "all() is in id order");

    let chunk = store.get(1).expect("chunk 1");
    assert_eq!(chunk.source_document, "a.pdf");
    assert_eq!(chunk.position, 1);
    assert_eq!(store.get(2).expect("chunk 2").position, 0, "position restarts per document");
}

#[test]
fn get_missing_chunk_is_not_found() {
    let store = small_store();
    assert!(matches!(store.get(7), Err(Error::NotFound(7))));
}

#[test]
fn version_moves_only_when_chunks_are_added() {
    let mut store = small_store();
    assert_eq!(store.version(), 0);
    store.add_document("a.pdf", "some text");
    assert_eq!(store.version(), 1);
    store.add_document("blank.pdf", "   \n\n  ");
    assert_eq!(store.version(), 1, "empty documents do not invalidate indexes");
    store.add_document("b.pdf", "more text");
    assert_eq!(store.version(), 2);
}

#[test]
fn snapshot_is_unaffected_by_later_appends() {
    let mut store = small_store();
    store.add_document("a.pdf", "first");
    let snapshot = store.snapshot();
    store.add_document("b.pdf", "second");
    assert_eq!(snapshot.len(), 1);
    assert_eq!(store.size(), 2);
}

#[test]
fn weight_policy_defaults_and_bounds() {
    let policy = WeightPolicy::default();
    assert_eq!(policy.lexical_weight, 0.3);
    assert_eq!(policy.semantic_weight, 0.7);

    assert!(WeightPolicy::new(1.0, 0.0).is_ok());
    assert!(matches!(WeightPolicy::new(1.5, 0.0), Err(Error::InvalidConfig(_))));
    assert!(matches!(WeightPolicy::new(0.5, f32::NAN), Err(Error::InvalidConfig(_))));
    assert!(matches!(WeightPolicy::new(-0.1, 0.5), Err(Error::InvalidConfig(_))));
}

#[test]
fn search_mode_parses_aliases() {
    assert_eq!("BM25".parse::<SearchMode>(), Ok(SearchMode::Lexical));
    assert_eq!(" vector ".parse::<SearchMode>(), Ok(SearchMode::Semantic));
    assert_eq!("ensemble".parse::<SearchMode>(), Ok(SearchMode::Hybrid));
    assert!("fuzzy".parse::<SearchMode>().is_err());
    assert_eq!(serde_json::to_string(&SearchMode::Hybrid).expect("json"), "\"hybrid\"");
}

#[test]
fn settings_have_expected_defaults() {
    let settings = Config::from_figment(Figment::new()).settings().expect("settings");
    assert_eq!(settings, Settings::default());
    assert_eq!(settings.chunking.max_chars, 1000);
    assert_eq!(settings.chunking.overlap_chars, 200);
    assert_eq!(settings.lexical.k1, 1.5);
    assert_eq!(settings.lexical.b, 0.75);
    assert_eq!(settings.search.default_top_k, 3);
    assert_eq!(settings.search.candidate_count(3), 20);
    assert_eq!(settings.search.candidate_count(10), 30);
}

#[test]
fn toml_overrides_merge_over_defaults() {
    let figment = Figment::new().merge(Toml::string(
        r#"
        [search]
        default_top_k = 5
        [search.weights]
        lexical_weight = 0.5
        semantic_weight = 0.5
        [embedding]
        provider = "hashing"
        dimension = 64
        "#,
    ));
    let config = Config::from_figment(figment);
    let settings = config.settings().expect("settings");
    assert_eq!(settings.search.default_top_k, 5);
    assert_eq!(settings.search.weights, WeightPolicy { lexical_weight: 0.5, semantic_weight: 0.5 });
    assert_eq!(settings.embedding.provider, "hashing");
    assert_eq!(settings.embedding.timeout_secs, 30, "untouched keys keep defaults");
    assert_eq!(config.get::<usize>("embedding.dimension").expect("dimension"), 64);
}

#[test]
fn invalid_settings_are_rejected() {
    let figment = Figment::new().merge(Toml::string("[chunking]\nmax_chars = 100\noverlap_chars = 100\n"));
    assert!(Config::from_figment(figment).settings().is_err());

    let figment = Figment::new().merge(Toml::string("[search.weights]\nlexical_weight = 2.0\n"));
    assert!(Config::from_figment(figment).settings().is_err());
}

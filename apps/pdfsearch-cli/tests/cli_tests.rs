use std::fs;
use std::sync::Arc;

use pdfsearch_cli::extract::{collect_files, display_name, DocumentExtractor};
use pdfsearch_cli::{ingest_paths, output};
use pdfsearch_core::config::Settings;
use pdfsearch_core::traits::TextExtractor;
use pdfsearch_core::types::{SearchMode, WeightPolicy};
use pdfsearch_core::Error;
use pdfsearch_embed::HashingEmbedder;
use pdfsearch_hybrid::HybridSearchEngine;

fn engine() -> HybridSearchEngine {
    HybridSearchEngine::new(Settings::default(), Arc::new(HashingEmbedder::new(64))).expect("engine")
}

#[test]
fn text_files_extract_as_utf8() {
    let text = DocumentExtractor.extract_text("notes.md", "# Heading\nbody".as_bytes()).expect("utf8");
    assert_eq!(text, "# Heading\nbody");

    let err = DocumentExtractor.extract_text("notes.txt", &[0xff, 0xfe]).expect_err("invalid utf8");
    assert!(matches!(err, Error::Extraction { ref source_name, .. } if source_name == "notes.txt"));
}

#[test]
fn malformed_pdf_is_an_extraction_error() {
    let err = DocumentExtractor.extract_text("broken.pdf", b"definitely not a pdf").expect_err("bad pdf");
    assert!(matches!(err, Error::Extraction { .. }));
}

#[test]
fn directories_expand_to_supported_files() {
    let dir = tempfile::tempdir().expect("tempdir");
    fs::create_dir(dir.path().join("nested")).expect("mkdir");
    fs::write(dir.path().join("b.txt"), "b").expect("write");
    fs::write(dir.path().join("a.md"), "a").expect("write");
    fs::write(dir.path().join("nested").join("c.PDF"), "c").expect("write");
    fs::write(dir.path().join("image.png"), "x").expect("write");

    let files = collect_files(&[dir.path().to_path_buf()]);
    let names: Vec<String> = files.iter().map(|p| display_name(p)).collect();
    assert_eq!(names.len(), 3);
    assert!(names.contains(&"a.md".to_string()));
    assert!(names.contains(&"b.txt".to_string()));
    assert!(names.contains(&"c.PDF".to_string()));
    assert!(!names.contains(&"image.png".to_string()));
}

#[tokio::test]
async fn ingest_search_and_render() {
    let dir = tempfile::tempdir().expect("tempdir");
    fs::write(dir.path().join("cats.txt"), "the cat sat on the mat").expect("write");
    fs::write(dir.path().join("dogs.txt"), "dogs bark loudly").expect("write");
    fs::write(dir.path().join("binary.txt"), [0xffu8, 0x00, 0xfe]).expect("write");
    let missing = dir.path().join("missing.txt");

    let engine = engine();
    let report = ingest_paths(&engine, &[dir.path().to_path_buf(), missing], false).expect("ingest");
    assert_eq!(report.ingested.len(), 2);
    assert_eq!(report.failures.len(), 2);
    assert!(report.failures.iter().any(|(name, _)| name == "missing.txt"));
    assert!(report.failures.iter().any(|(name, _)| name == "binary.txt"));

    engine.build_indexes().await.expect("build");
    let response = engine.search("cat", SearchMode::Lexical, 3, WeightPolicy::default()).await.expect("search");
    let resolved = output::resolve(&engine, response).expect("resolve");
    assert_eq!(resolved.results.len(), 1);
    assert_eq!(resolved.results[0].source, "cats.txt");
    assert_eq!(resolved.results[0].rank, 1);

    let human = output::format_human("cat", std::slice::from_ref(&resolved));
    assert!(human.contains("cats.txt"));
    let json: serde_json::Value = serde_json::from_str(&output::format_json("cat", &[resolved])).expect("json");
    assert_eq!(json["query"], "cat");
    assert_eq!(json["modes"][0]["mode"], "lexical");
    assert_eq!(json["modes"][0]["results"][0]["source"], "cats.txt");
}

#[test]
fn empty_input_is_an_error() {
    let dir = tempfile::tempdir().expect("tempdir");
    assert!(ingest_paths(&engine(), &[dir.path().to_path_buf()], false).is_err());
}

//! Building blocks of the `pdfsearch` binary: file extraction, ingestion
//! with progress reporting, result formatting and the interactive loop parser.
use std::path::PathBuf;

use anyhow::{bail, Result};
use indicatif::{ProgressBar, ProgressStyle};

use pdfsearch_core::types::IngestReport;
use pdfsearch_core::Error;
use pdfsearch_hybrid::HybridSearchEngine;

pub mod extract;
pub mod output;
pub mod repl;

use extract::DocumentExtractor;

/// Reads, extracts and ingests every supported file under `inputs`.
/// Unreadable and unextractable files are reported, not fatal.
pub fn ingest_paths(engine: &HybridSearchEngine, inputs: &[PathBuf], show_progress: bool) -> Result<IngestReport> {
    let files = extract::collect_files(inputs);
    if files.is_empty() {
        bail!("No supported documents (.pdf, .txt, .md) found");
    }
    let (documents, unreadable) = extract::read_documents(&files);

    let pb = if show_progress { ProgressBar::new(documents.len() as u64) } else { ProgressBar::hidden() };
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} files {msg}")?
            .progress_chars("#>-"),
    );
    let mut report = engine.ingest_batch(
        documents.into_iter().inspect(|(name, _)| {
            pb.set_message(name.clone());
            pb.inc(1);
        }),
        &DocumentExtractor,
    );
    pb.finish_and_clear();

    report.failures.extend(
        unreadable
            .into_iter()
            .map(|(name, reason)| (name.clone(), Error::Extraction { source_name: name, reason })),
    );
    Ok(report)
}

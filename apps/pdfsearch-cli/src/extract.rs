//! File discovery and text extraction for ingestion.
use std::fs;
use std::path::{Path, PathBuf};

use tracing::debug;
use walkdir::WalkDir;

use pdfsearch_core::traits::TextExtractor;
use pdfsearch_core::{Error, Result};

const SUPPORTED_EXTENSIONS: &[&str] = &["pdf", "txt", "md"];

/// Extracts text from PDFs through `pdf-extract`; `.txt`/`.md` and other
/// non-PDF input must be UTF-8.
#[derive(Debug, Default, Clone, Copy)]
pub struct DocumentExtractor;

impl DocumentExtractor {
    fn is_pdf(source_name: &str, bytes: &[u8]) -> bool {
        bytes.starts_with(b"%PDF")
            || Path::new(source_name)
                .extension()
                .is_some_and(|ext| ext.eq_ignore_ascii_case("pdf"))
    }
}

impl TextExtractor for DocumentExtractor {
    fn extract_text(&self, source_name: &str, bytes: &[u8]) -> Result<String> {
        let extraction = |reason: String| Error::Extraction { source_name: source_name.to_string(), reason };
        if Self::is_pdf(source_name, bytes) {
            let text = pdf_extract::extract_text_from_mem(bytes).map_err(|e| extraction(e.to_string()))?;
            if text.trim().is_empty() {
                return Err(extraction("no extractable text (scanned PDF?)".into()));
            }
            debug!(source = source_name, chars = text.len(), "extracted pdf text");
            Ok(text)
        } else {
            String::from_utf8(bytes.to_vec()).map_err(|e| extraction(format!("not valid UTF-8: {e}")))
        }
    }
}

fn is_supported(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| SUPPORTED_EXTENSIONS.iter().any(|s| ext.eq_ignore_ascii_case(s)))
}

/// Expands directories into the supported files beneath them (sorted) and
/// keeps explicitly named files as given.
pub fn collect_files(inputs: &[PathBuf]) -> Vec<PathBuf> {
    let mut files = Vec::new();
    for input in inputs {
        if input.is_dir() {
            let mut found: Vec<PathBuf> = WalkDir::new(input)
                .into_iter()
                .filter_map(|e| e.ok())
                .filter(|e| e.file_type().is_file() && is_supported(e.path()))
                .map(|e| e.into_path())
                .collect();
            found.sort();
            files.extend(found);
        } else {
            files.push(input.clone());
        }
    }
    files
}

/// Reads each file into memory. Unreadable files come back as failures with
/// the I/O error text.
pub fn read_documents(files: &[PathBuf]) -> (Vec<(String, Vec<u8>)>, Vec<(String, String)>) {
    let mut documents = Vec::with_capacity(files.len());
    let mut failures = Vec::new();
    for path in files {
        let name = display_name(path);
        match fs::read(path) {
            Ok(bytes) => documents.push((name, bytes)),
            Err(e) => failures.push((name, e.to_string())),
        }
    }
    (documents, failures)
}

/// File name without directories, falling back to the full path.
pub fn display_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

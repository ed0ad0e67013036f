//! Turns uploaded bytes into reading text.
//!
//! Plain text passes through untouched. Page-oriented documents go through a
//! [`PageSource`], are decoded page by page in order and joined with a single space.
//! Any failure aborts the whole ingestion; callers never see partial text.

use lopdf::Document;
use std::fs;
use std::path::Path;
use thiserror::Error;
use tracing::{debug, info, warn};

const PDF_MAGIC: &[u8] = b"%PDF-";
const BYTE_ORDER_MARK: char = '\u{feff}';

#[derive(Debug, Error)]
pub enum IngestError {
    #[error("unsupported source format: {name}")]
    UnsupportedFormat { name: String },
    #[error("source contains no readable text")]
    Empty,
    #[error("failed to open document: {message}")]
    Document { message: String },
    #[error("failed to decode page {page}: {message}")]
    Decode { page: usize, message: String },
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceKind {
    PlainText,
    Paged,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IngestedText {
    pub source_name: String,
    pub kind: SourceKind,
    pub text: String,
}

/// A document whose text is extracted one page at a time. Pages are 1-based.
pub trait PageSource {
    fn page_count(&self) -> usize;
    fn page_text(&self, page: usize) -> Result<String, IngestError>;
}

/// PDF pages backed by `lopdf`.
pub struct PdfPages {
    document: Document,
    page_numbers: Vec<u32>,
}

impl PdfPages {
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, IngestError> {
        let document = Document::load_mem(bytes).map_err(|err| IngestError::Document {
            message: err.to_string(),
        })?;
        let page_numbers = document.get_pages().keys().copied().collect();
        Ok(Self {
            document,
            page_numbers,
        })
    }
}

impl PageSource for PdfPages {
    fn page_count(&self) -> usize {
        self.page_numbers.len()
    }

    fn page_text(&self, page: usize) -> Result<String, IngestError> {
        let number = page
            .checked_sub(1)
            .and_then(|idx| self.page_numbers.get(idx))
            .copied()
            .ok_or_else(|| IngestError::Decode {
                page,
                message: "page out of range".to_string(),
            })?;
        self.document
            .extract_text(&[number])
            .map_err(|err| IngestError::Decode {
                page,
                message: err.to_string(),
            })
    }
}

/// Decode every page in order and join them with single spaces.
pub fn extract_pages(source: &dyn PageSource) -> Result<String, IngestError> {
    let total = source.page_count();
    let mut pages = Vec::with_capacity(total);
    for page in 1..=total {
        let text = source.page_text(page)?;
        debug!(page, total, chars = text.len(), "Decoded page");
        pages.push(text);
    }
    Ok(pages.join(" ").trim().to_string())
}

pub fn detect_kind(bytes: &[u8], source_name: &str) -> Result<SourceKind, IngestError> {
    let extension = Path::new(source_name)
        .extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| ext.to_ascii_lowercase());
    match extension.as_deref() {
        Some("pdf") => Ok(SourceKind::Paged),
        None if bytes.starts_with(PDF_MAGIC) => Ok(SourceKind::Paged),
        Some("txt") | None => Ok(SourceKind::PlainText),
        Some(_) => Err(IngestError::UnsupportedFormat {
            name: source_name.to_string(),
        }),
    }
}

/// Ingest an uploaded file's bytes.
pub fn ingest_bytes(bytes: &[u8], source_name: &str) -> Result<IngestedText, IngestError> {
    let kind = detect_kind(bytes, source_name)?;
    info!(source = source_name, bytes = bytes.len(), ?kind, "Ingesting source");
    let text = match kind {
        SourceKind::PlainText => {
            let text = String::from_utf8_lossy(bytes);
            text.strip_prefix(BYTE_ORDER_MARK).unwrap_or(&*text).to_string()
        }
        SourceKind::Paged => extract_pages(&PdfPages::from_bytes(bytes)?)?,
    };
    if text.trim().is_empty() {
        warn!(source = source_name, "Source has no readable text");
        return Err(IngestError::Empty);
    }
    info!(source = source_name, chars = text.len(), "Finished ingesting source");
    Ok(IngestedText {
        source_name: source_name.to_string(),
        kind,
        text,
    })
}

/// Read `path` from disk and ingest it under its file name.
pub fn ingest_path(path: &Path) -> Result<IngestedText, IngestError> {
    let bytes = fs::read(path)?;
    let name = path
        .file_name()
        .and_then(|name| name.to_str())
        .unwrap_or("document");
    ingest_bytes(&bytes, name)
}

//! PDF text extractor backed by `lopdf`.

use crate::plugins::{ContentExtractor, Plugin};
use crate::{ArchivistError, Result};
use lopdf::Document;
use std::path::Path;

/// Extracts the text layer of every page, pages separated by blank lines.
///
/// Scanned PDFs without a text layer yield empty text.
pub struct PdfExtractor;

impl PdfExtractor {
    pub fn new() -> Self {
        Self
    }
}

impl Default for PdfExtractor {
    fn default() -> Self {
        Self::new()
    }
}

impl Plugin for PdfExtractor {
    fn name(&self) -> &str {
        "pdf-extractor"
    }

    fn version(&self) -> String {
        env!("CARGO_PKG_VERSION").to_string()
    }

    fn initialize(&self) -> Result<()> {
        Ok(())
    }

    fn shutdown(&self) -> Result<()> {
        Ok(())
    }

    fn description(&self) -> &str {
        "Extracts text from PDF documents"
    }
}

impl ContentExtractor for PdfExtractor {
    fn supported_extensions(&self) -> &[&str] {
        &["pdf"]
    }

    fn extract(&self, path: &Path, _extension: &str) -> Result<String> {
        let document = Document::load(path).map_err(|e| match e {
            lopdf::Error::IO(io_err) => ArchivistError::Io(io_err),
            other => ArchivistError::parsing_with_source(format!("Failed to load PDF {}", path.display()), other),
        })?;

        let mut pages = Vec::new();
        for page_number in document.get_pages().keys() {
            match document.extract_text(&[*page_number]) {
                Ok(text) => pages.push(text.trim_end().to_string()),
                Err(e) => {
                    tracing::warn!("Skipping page {} of {}: {}", page_number, path.display(), e);
                }
            }
        }

        Ok(pages.join("\n\n"))
    }
}

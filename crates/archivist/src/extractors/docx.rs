//! DOCX extractor backed by `docx-lite`.

use crate::core::io::read_file_sync;
use crate::plugins::{ContentExtractor, Plugin};
use crate::{ArchivistError, Result};
use std::io::Cursor;
use std::path::Path;

/// Extracts paragraph text from Word documents, followed by table rows.
///
/// Table cells are joined with tabs, one row per line.
pub struct DocxExtractor;

impl DocxExtractor {
    pub fn new() -> Self {
        Self
    }
}

impl Default for DocxExtractor {
    fn default() -> Self {
        Self::new()
    }
}

impl Plugin for DocxExtractor {
    fn name(&self) -> &str {
        "docx-extractor"
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
        "Extracts text from Microsoft Word (.docx) documents"
    }
}

fn table_to_text(table: &docx_lite::Table) -> String {
    table
        .rows
        .iter()
        .map(|row| {
            row.cells
                .iter()
                .map(|cell| {
                    cell.paragraphs
                        .iter()
                        .map(|para| para.to_text())
                        .collect::<Vec<_>>()
                        .join(" ")
                        .trim()
                        .to_string()
                })
                .collect::<Vec<_>>()
                .join("\t")
        })
        .collect::<Vec<_>>()
        .join("\n")
}

impl ContentExtractor for DocxExtractor {
    fn supported_extensions(&self) -> &[&str] {
        &["docx"]
    }

    fn extract(&self, path: &Path, _extension: &str) -> Result<String> {
        let bytes = read_file_sync(path)?;
        let document = docx_lite::parse_document(Cursor::new(bytes))
            .map_err(|e| ArchivistError::parsing(format!("DOCX parsing failed for {}: {}", path.display(), e)))?;

        let mut text = document.extract_text().trim_end().to_string();
        for table in &document.tables {
            let rendered = table_to_text(table);
            if rendered.is_empty() {
                continue;
            }
            if !text.is_empty() {
                text.push_str("\n\n");
            }
            text.push_str(&rendered);
        }

        Ok(text)
    }
}

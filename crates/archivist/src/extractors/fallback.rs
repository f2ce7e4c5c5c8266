//! Fallback extractor for extensions no other extractor claims.
//!
//! Content that looks textual is returned as lossy UTF-8. Content with NUL bytes
//! in its first block is treated as binary and rejected.

use crate::core::io::read_file_sync;
use crate::plugins::{ContentExtractor, Plugin};
use crate::{ArchivistError, Result};
use std::path::Path;

const BINARY_SNIFF_LEN: usize = 8192;

pub struct FallbackExtractor;

impl FallbackExtractor {
    pub fn new() -> Self {
        Self
    }
}

impl Default for FallbackExtractor {
    fn default() -> Self {
        Self::new()
    }
}

impl Plugin for FallbackExtractor {
    fn name(&self) -> &str {
        "fallback-extractor"
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
}

impl ContentExtractor for FallbackExtractor {
    fn supported_extensions(&self) -> &[&str] {
        &[]
    }

    fn priority(&self) -> i32 {
        0
    }

    fn extract(&self, path: &Path, extension: &str) -> Result<String> {
        let bytes = read_file_sync(path)?;
        let sniff = &bytes[..bytes.len().min(BINARY_SNIFF_LEN)];

        if sniff.contains(&0) {
            let label = if extension.is_empty() {
                "files without extension".to_string()
            } else {
                format!(".{} files", extension)
            };
            return Err(ArchivistError::UnsupportedFormat(format!(
                "Binary content in {} cannot be extracted ({})",
                path.display(),
                label
            )));
        }

        Ok(String::from_utf8_lossy(&bytes).into_owned())
    }
}

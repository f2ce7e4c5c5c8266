//! Plain text extractor.

use crate::Result;
use crate::core::io::read_file_sync;
use crate::plugins::{ContentExtractor, Plugin};
use std::path::Path;

/// Extensions read as text without any transformation.
pub const TEXT_EXTENSIONS: &[&str] = &[
    "txt", "md", "markdown", "csv", "tsv", "json", "yaml", "yml", "toml", "xml", "html", "htm", "log", "rst",
    "org", "tex", "ini", "cfg", "conf", "properties", "sql", "sh",
];

/// Plain text extractor.
///
/// Returns file content unchanged. Invalid UTF-8 sequences are replaced.
pub struct PlainTextExtractor;

impl PlainTextExtractor {
    pub fn new() -> Self {
        Self
    }
}

impl Default for PlainTextExtractor {
    fn default() -> Self {
        Self::new()
    }
}

impl Plugin for PlainTextExtractor {
    fn name(&self) -> &str {
        "plain-text-extractor"
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
        "Reads plain text and text-based markup files"
    }
}

impl ContentExtractor for PlainTextExtractor {
    fn supported_extensions(&self) -> &[&str] {
        TEXT_EXTENSIONS
    }

    fn extract(&self, path: &Path, _extension: &str) -> Result<String> {
        let bytes = read_file_sync(path)?;
        Ok(match String::from_utf8(bytes) {
            Ok(text) => text,
            Err(e) => String::from_utf8_lossy(e.as_bytes()).into_owned(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    #[test]
    fn test_plain_text_is_returned_verbatim() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("notes.md");
        fs::write(&path, "# Title\n\nbody\n\n").unwrap();

        let text = PlainTextExtractor::new().extract(&path, "md").unwrap();
        assert_eq!(text, "# Title\n\nbody\n\n");
    }

    #[test]
    fn test_invalid_utf8_is_replaced() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("broken.txt");
        fs::write(&path, [b'o', b'k', 0xFF]).unwrap();

        let text = PlainTextExtractor::new().extract(&path, "txt").unwrap();
        assert!(text.starts_with("ok"));
        assert!(text.contains('\u{FFFD}'));
    }

    #[test]
    fn test_plugin_metadata() {
        let extractor = PlainTextExtractor::new();
        assert_eq!(extractor.name(), "plain-text-extractor");
        assert_eq!(extractor.priority(), 50);
        assert!(extractor.supported_extensions().contains(&"txt"));
    }
}

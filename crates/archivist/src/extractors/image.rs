//! Image extractor.
//!
//! Images carry no extractable text without OCR, so this extractor describes the
//! file instead: name, MIME type and size.

use crate::Result;
use crate::core::mime::detect_mime_type;
use crate::plugins::{ContentExtractor, Plugin};
use std::path::Path;

pub struct ImageExtractor;

impl ImageExtractor {
    pub fn new() -> Self {
        Self
    }
}

impl Default for ImageExtractor {
    fn default() -> Self {
        Self::new()
    }
}

impl Plugin for ImageExtractor {
    fn name(&self) -> &str {
        "image-extractor"
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
        "Describes image files (MIME type and size)"
    }
}

impl ContentExtractor for ImageExtractor {
    fn supported_extensions(&self) -> &[&str] {
        &["jpg", "jpeg", "png", "gif", "bmp", "webp", "svg", "tif", "tiff"]
    }

    fn extract(&self, path: &Path, _extension: &str) -> Result<String> {
        let size = std::fs::metadata(path)?.len();
        let name = path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_default();

        Ok(format!(
            "Image file: {}\nMIME Type: {}\nFile Size: {} bytes\n\
             Note: This is an image file. Text extraction from images requires OCR capability.",
            name,
            detect_mime_type(path),
            size
        ))
    }
}

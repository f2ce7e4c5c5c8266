//! Built-in content extractors.
//!
//! All extractors implement the `ContentExtractor` plugin trait and are
//! registered through [`register_default_extractors`].

use crate::Result;
use crate::plugins::ExtractorRegistry;
use std::sync::Arc;

pub mod fallback;
pub mod image;
pub mod text;

#[cfg(feature = "office")]
pub mod docx;
#[cfg(feature = "pdf")]
pub mod pdf;

pub use fallback::FallbackExtractor;
pub use image::ImageExtractor;
pub use text::PlainTextExtractor;

#[cfg(feature = "office")]
pub use docx::DocxExtractor;
#[cfg(feature = "pdf")]
pub use pdf::PdfExtractor;

/// Register the built-in extractors and the fallback with `registry`.
pub fn register_default_extractors(registry: &mut ExtractorRegistry) -> Result<()> {
    registry.register(Arc::new(PlainTextExtractor::new()))?;
    registry.register(Arc::new(ImageExtractor::new()))?;

    #[cfg(feature = "pdf")]
    registry.register(Arc::new(PdfExtractor::new()))?;
    #[cfg(feature = "office")]
    registry.register(Arc::new(DocxExtractor::new()))?;

    registry.set_fallback(Arc::new(FallbackExtractor::new()))?;

    Ok(())
}

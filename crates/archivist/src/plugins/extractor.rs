//! Content extractor plugin trait.
//!
//! Content extractors turn a stored file into searchable text. The store picks
//! one per lower-cased file extension through the
//! [`ExtractorRegistry`](super::registry::ExtractorRegistry).

use crate::Result;
use crate::plugins::Plugin;
use std::path::Path;

/// Trait for content extractor plugins.
///
/// # Example
///
/// ```rust
/// use archivist::plugins::{ContentExtractor, Plugin};
/// use archivist::Result;
/// use std::path::Path;
///
/// struct UpperCaseExtractor;
///
/// impl Plugin for UpperCaseExtractor {
///     fn name(&self) -> &str { "upper-case-extractor" }
///     fn version(&self) -> String { "1.0.0".to_string() }
///     fn initialize(&self) -> Result<()> { Ok(()) }
///     fn shutdown(&self) -> Result<()> { Ok(()) }
/// }
///
/// impl ContentExtractor for UpperCaseExtractor {
///     fn supported_extensions(&self) -> &[&str] {
///         &["shout"]
///     }
///
///     fn extract(&self, path: &Path, _extension: &str) -> Result<String> {
///         Ok(std::fs::read_to_string(path)?.to_uppercase())
///     }
/// }
/// ```
pub trait ContentExtractor: Plugin {
    /// Lower-case extensions (without the dot) this extractor handles.
    fn supported_extensions(&self) -> &[&str];

    /// Selection priority; the highest priority wins per extension.
    ///
    /// Built-ins use 50. Use a higher value to override them.
    fn priority(&self) -> i32 {
        50
    }

    /// Extract text from the file at `path`.
    ///
    /// `extension` is the lower-cased extension the extractor was selected by,
    /// empty for files without one.
    ///
    /// # Errors
    ///
    /// - `ArchivistError::Io` when the file cannot be read
    /// - `ArchivistError::Parsing` when the content is malformed
    /// - `ArchivistError::UnsupportedFormat` when the content cannot be represented as text
    fn extract(&self, path: &Path, extension: &str) -> Result<String>;
}

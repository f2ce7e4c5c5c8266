//! Plugin system.
//!
//! Content extraction is pluggable: every extractor implements [`Plugin`] plus
//! [`ContentExtractor`] and is registered with an [`ExtractorRegistry`].

pub mod extractor;
pub mod registry;
pub mod traits;

pub use extractor::ContentExtractor;
pub use registry::ExtractorRegistry;
pub use traits::Plugin;

//! Error types for Archivist.
//!
//! All fallible library operations return [`Result`], which carries an
//! [`ArchivistError`]. The variants follow a few rules:
//!
//! - `Io` wraps `std::io::Error` unchanged. File system failures bubble up via `?`
//!   and are reported to protocol clients verbatim.
//! - `Validation` covers bad identifiers, bad configuration and bad parameters.
//! - `Parsing` and `UnsupportedFormat` come from content extractors.
//! - `NotFound` is reserved for knowledge-store files that do not exist.
//!
//! # Example
//!
//! ```rust
//! use archivist::{ArchivistError, Result};
//!
//! fn require_text(content: &str) -> Result<&str> {
//!     if content.is_empty() {
//!         return Err(ArchivistError::validation("content is empty"));
//!     }
//!     Ok(content)
//! }
//!
//! assert!(require_text("").is_err());
//! ```
use thiserror::Error;

/// Result type alias using `ArchivistError`.
pub type Result<T> = std::result::Result<T, ArchivistError>;

/// Main error type for all Archivist operations.
#[derive(Debug, Error)]
pub enum ArchivistError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Parsing error: {message}")]
    Parsing {
        message: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    #[error("Validation error: {message}")]
    Validation {
        message: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    #[error("Serialization error: {message}")]
    Serialization {
        message: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    #[error("File not found: {0}")]
    NotFound(String),

    #[error("Unsupported format: {0}")]
    UnsupportedFormat(String),

    #[error("Plugin error in '{plugin_name}': {message}")]
    Plugin { message: String, plugin_name: String },

    #[error("{0}")]
    Other(String),
}

impl From<serde_json::Error> for ArchivistError {
    fn from(err: serde_json::Error) -> Self {
        ArchivistError::Serialization {
            message: err.to_string(),
            source: Some(Box::new(err)),
        }
    }
}

#[cfg(feature = "pdf")]
impl From<lopdf::Error> for ArchivistError {
    fn from(err: lopdf::Error) -> Self {
        ArchivistError::Parsing {
            message: err.to_string(),
            source: Some(Box::new(err)),
        }
    }
}

macro_rules! error_constructor {
    ($name:ident, $variant:ident) => {
        pastey::paste! {
            #[doc = "Create a " $variant " error"]
            pub fn $name<S: Into<String>>(message: S) -> Self {
                Self::$variant {
                    message: message.into(),
                    source: None,
                }
            }

            #[doc = "Create a " $variant " error with source"]
            pub fn [<$name _with_source>]<S: Into<String>, E: std::error::Error + Send + Sync + 'static>(
                message: S,
                source: E,
            ) -> Self {
                Self::$variant {
                    message: message.into(),
                    source: Some(Box::new(source)),
                }
            }
        }
    };
}

impl ArchivistError {
    error_constructor!(parsing, Parsing);
    error_constructor!(validation, Validation);
    error_constructor!(serialization, Serialization);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_io_error_from() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
        let err: ArchivistError = io_err.into();
        assert!(matches!(err, ArchivistError::Io(_)));
        assert!(err.to_string().contains("IO error"));
    }

    #[test]
    fn test_validation_error_with_source() {
        let source = std::io::Error::new(std::io::ErrorKind::InvalidInput, "bad param");
        let err = ArchivistError::validation_with_source("invalid input", source);
        assert_eq!(err.to_string(), "Validation error: invalid input");
        assert!(std::error::Error::source(&err).is_some());
    }

    #[test]
    fn test_parsing_error() {
        let err = ArchivistError::parsing("corrupt document");
        assert_eq!(err.to_string(), "Parsing error: corrupt document");
        assert!(std::error::Error::source(&err).is_none());
    }

    #[test]
    fn test_not_found_error() {
        let err = ArchivistError::NotFound("notes/a.txt".to_string());
        assert_eq!(err.to_string(), "File not found: notes/a.txt");
    }

    #[test]
    fn test_plugin_error() {
        let err = ArchivistError::Plugin {
            message: "extraction failed".to_string(),
            plugin_name: "pdf-extractor".to_string(),
        };
        assert_eq!(err.to_string(), "Plugin error in 'pdf-extractor': extraction failed");
    }

    #[test]
    fn test_serde_json_error_conversion() {
        let json_err = serde_json::from_str::<serde_json::Value>("{not json").unwrap_err();
        let err: ArchivistError = json_err.into();
        assert!(matches!(err, ArchivistError::Serialization { .. }));
        assert!(err.to_string().contains("Serialization error"));
    }

    #[test]
    fn test_io_error_bubbles_unchanged() {
        fn read_file() -> Result<String> {
            let content = std::fs::read_to_string("/nonexistent/archivist/file.txt")?;
            Ok(content)
        }

        assert!(matches!(read_file().unwrap_err(), ArchivistError::Io(_)));
    }
}

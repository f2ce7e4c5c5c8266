//! Configuration loading and management.
//!
//! Server configuration can be loaded from TOML, YAML or JSON files, discovered
//! from an `archivist.toml` in the current directory or any parent, and then
//! adjusted through environment variables.

use crate::{ArchivistError, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Name of the configuration file searched for by [`ServerConfig::discover`].
pub const CONFIG_FILE_NAME: &str = "archivist.toml";

/// Environment variable overriding [`ServerConfig::store_path`].
pub const STORE_PATH_ENV: &str = "ARCHIVIST_STORE_PATH";

/// Environment variable overriding [`ServerConfig::metadata_file`].
pub const METADATA_FILE_ENV: &str = "ARCHIVIST_METADATA_FILE";

/// Main server configuration.
///
/// # Example
///
/// ```rust
/// use archivist::core::config::ServerConfig;
///
/// let config = ServerConfig::default();
/// assert_eq!(config.large_file_threshold, 50_000);
/// assert!(config.metadata_path().ends_with("file-metadata.json"));
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Root directory of the knowledge store (created on demand)
    #[serde(default = "default_store_path")]
    pub store_path: PathBuf,

    /// File name of the metadata catalog document, relative to `store_path`
    #[serde(default = "default_metadata_file")]
    pub metadata_file: String,

    /// Character count above which a file is flagged as large
    #[serde(default = "default_large_file_threshold")]
    pub large_file_threshold: usize,

    /// Name reported in the `initialize` handshake
    #[serde(default = "default_server_name")]
    pub server_name: String,

    /// Version reported in the `initialize` handshake
    #[serde(default = "default_server_version")]
    pub server_version: String,

    /// MCP protocol revision reported in the `initialize` handshake
    #[serde(default = "default_protocol_version")]
    pub protocol_version: String,
}

fn default_store_path() -> PathBuf {
    PathBuf::from("./knowledgeStore")
}
fn default_metadata_file() -> String {
    "file-metadata.json".to_string()
}
fn default_large_file_threshold() -> usize {
    50_000
}
fn default_server_name() -> String {
    "Knowledge Store MCP Server".to_string()
}
fn default_server_version() -> String {
    env!("CARGO_PKG_VERSION").to_string()
}
fn default_protocol_version() -> String {
    "2024-11-05".to_string()
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            store_path: default_store_path(),
            metadata_file: default_metadata_file(),
            large_file_threshold: default_large_file_threshold(),
            server_name: default_server_name(),
            server_version: default_server_version(),
            protocol_version: default_protocol_version(),
        }
    }
}

impl ServerConfig {
    /// Configuration rooted at `store_path`, everything else default.
    pub fn with_store_path(store_path: impl Into<PathBuf>) -> Self {
        Self {
            store_path: store_path.into(),
            ..Default::default()
        }
    }

    /// Full path of the metadata catalog document.
    pub fn metadata_path(&self) -> PathBuf {
        self.store_path.join(&self.metadata_file)
    }

    /// Load configuration from a TOML file.
    ///
    /// # Errors
    ///
    /// Returns `ArchivistError::Validation` if the file can't be read or is invalid TOML.
    pub fn from_toml_file(path: impl AsRef<Path>) -> Result<Self> {
        let content = read_config(path.as_ref())?;
        toml::from_str(&content)
            .map_err(|e| ArchivistError::validation(format!("Invalid TOML in {}: {}", path.as_ref().display(), e)))
    }

    /// Load configuration from a YAML file.
    pub fn from_yaml_file(path: impl AsRef<Path>) -> Result<Self> {
        let content = read_config(path.as_ref())?;
        serde_yaml_ng::from_str(&content)
            .map_err(|e| ArchivistError::validation(format!("Invalid YAML in {}: {}", path.as_ref().display(), e)))
    }

    /// Load configuration from a JSON file.
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self> {
        let content = read_config(path.as_ref())?;
        serde_json::from_str(&content)
            .map_err(|e| ArchivistError::validation(format!("Invalid JSON in {}: {}", path.as_ref().display(), e)))
    }

    /// Load configuration, choosing the format from the file extension.
    ///
    /// `.toml`, `.yaml`/`.yml` and `.json` are recognized.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let extension = path
            .extension()
            .and_then(|ext| ext.to_str())
            .map(|ext| ext.to_ascii_lowercase());

        match extension.as_deref() {
            Some("toml") => Self::from_toml_file(path),
            Some("yaml") | Some("yml") => Self::from_yaml_file(path),
            Some("json") => Self::from_json_file(path),
            _ => Err(ArchivistError::validation(format!(
                "Unsupported config file format: {} (expected .toml, .yaml, .yml or .json)",
                path.display()
            ))),
        }
    }

    /// Discover configuration file in parent directories.
    ///
    /// Searches for `archivist.toml` in the current directory and its parents.
    ///
    /// # Returns
    ///
    /// - `Some(config)` if found
    /// - `None` if no config file found
    pub fn discover() -> Result<Option<Self>> {
        let mut current = std::env::current_dir().map_err(ArchivistError::Io)?;

        loop {
            let candidate = current.join(CONFIG_FILE_NAME);
            if candidate.exists() {
                tracing::info!("Loading configuration from {}", candidate.display());
                return Ok(Some(Self::from_toml_file(candidate)?));
            }

            if let Some(parent) = current.parent() {
                current = parent.to_path_buf();
            } else {
                break;
            }
        }

        Ok(None)
    }

    /// Apply `ARCHIVIST_STORE_PATH` / `ARCHIVIST_METADATA_FILE` overrides.
    pub fn apply_env_overrides(mut self) -> Self {
        if let Ok(path) = std::env::var(STORE_PATH_ENV)
            && !path.trim().is_empty()
        {
            tracing::debug!("{} overrides store path: {}", STORE_PATH_ENV, path);
            self.store_path = PathBuf::from(path);
        }

        if let Ok(file) = std::env::var(METADATA_FILE_ENV)
            && !file.trim().is_empty()
        {
            self.metadata_file = file;
        }

        self
    }

    /// Reject configurations the store cannot work with.
    pub fn validate(&self) -> Result<()> {
        if self.metadata_file.trim().is_empty() {
            return Err(ArchivistError::validation("metadata_file cannot be empty"));
        }
        if Path::new(&self.metadata_file).components().count() != 1 {
            return Err(ArchivistError::validation(format!(
                "metadata_file must be a plain file name, got '{}'",
                self.metadata_file
            )));
        }
        if self.large_file_threshold == 0 {
            return Err(ArchivistError::validation("large_file_threshold must be greater than 0"));
        }
        Ok(())
    }
}

fn read_config(path: &Path) -> Result<String> {
    std::fs::read_to_string(path)
        .map_err(|e| ArchivistError::validation(format!("Failed to read config file {}: {}", path.display(), e)))
}

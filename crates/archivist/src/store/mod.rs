//! Knowledge store.
//!
//! A directory tree of documents addressed by `/`-separated identifiers relative to
//! the store root. Content is read through the [`ExtractorRegistry`], and every
//! write or read keeps the [`MetadataCatalog`] in step.

pub mod format;

use crate::catalog::MetadataCatalog;
use crate::core::config::ServerConfig;
use crate::core::io::{extension_of, normalize_identifier, resolve_identifier, to_identifier, traverse_directory};
use crate::core::mime::detect_mime_type;
use crate::plugins::{ExtractorRegistry, Plugin};
use crate::types::{FileInfo, FileMetadata, MetadataPatch};
use crate::{ArchivistError, Result};
use chrono::{DateTime, Utc};
use parking_lot::RwLock;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// Document directory plus its metadata catalog.
#[derive(Debug)]
pub struct KnowledgeStore {
    root: PathBuf,
    metadata_file: String,
    large_file_threshold: usize,
    catalog: Arc<MetadataCatalog>,
    extractors: RwLock<ExtractorRegistry>,
}

impl KnowledgeStore {
    /// Open the store described by `config` with the built-in extractors.
    ///
    /// Creates the root directory when it does not exist.
    pub fn new(config: &ServerConfig, catalog: Arc<MetadataCatalog>) -> Result<Self> {
        Self::with_registry(config, catalog, ExtractorRegistry::with_defaults()?)
    }

    /// Open the store with a caller-supplied extractor registry.
    pub fn with_registry(
        config: &ServerConfig,
        catalog: Arc<MetadataCatalog>,
        extractors: ExtractorRegistry,
    ) -> Result<Self> {
        fs::create_dir_all(&config.store_path)?;
        tracing::info!("Knowledge store initialized at {}", config.store_path.display());

        Ok(Self {
            root: config.store_path.clone(),
            metadata_file: config.metadata_file.clone(),
            large_file_threshold: config.large_file_threshold,
            catalog,
            extractors: RwLock::new(extractors),
        })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn catalog(&self) -> &Arc<MetadataCatalog> {
        &self.catalog
    }

    /// Every regular file under the root, recursively, sorted by identifier.
    ///
    /// The catalog document and its temporary files are not listed.
    pub fn list_files(&self) -> Result<Vec<String>> {
        fs::create_dir_all(&self.root)?;

        let paths = traverse_directory(&self.root, true, None::<fn(&Path) -> bool>)?;
        let mut files: Vec<String> = paths
            .iter()
            .filter_map(|path| to_identifier(&self.root, path))
            .filter(|identifier| !self.is_catalog_file(identifier))
            .collect();

        files.sort();
        Ok(files)
    }

    fn is_catalog_file(&self, identifier: &str) -> bool {
        identifier == self.metadata_file || identifier.starts_with(&format!(".{}.tmp.", self.metadata_file))
    }

    /// Extracted text of `name`; records the access in the catalog.
    ///
    /// # Errors
    ///
    /// - `ArchivistError::Validation` for identifiers outside the store
    /// - `ArchivistError::NotFound` when the file does not exist
    /// - extractor errors otherwise
    pub fn read_file(&self, name: &str) -> Result<String> {
        let identifier = normalize_identifier(name)?;
        let content = self.extract(&identifier)?;

        if let Err(e) = self.catalog.touch(&identifier) {
            tracing::warn!("Failed to record access to {}: {}", identifier, e);
        }

        Ok(content)
    }

    fn extract(&self, identifier: &str) -> Result<String> {
        let path = resolve_identifier(&self.root, identifier)?;
        if !path.is_file() {
            return Err(ArchivistError::NotFound(identifier.to_string()));
        }

        let extension = extension_of(identifier);
        let extractor = self.extractors.read().get(&extension)?;
        tracing::debug!("Extracting {} with {}", identifier, extractor.name());
        extractor.extract(&path, &extension)
    }

    /// Identifiers of files whose extracted text contains `query`, case-insensitively.
    ///
    /// Files that fail to extract are skipped. Access times are not touched.
    pub fn search_files(&self, query: &str) -> Result<Vec<String>> {
        let needle = query.to_lowercase();
        let mut matches = Vec::new();

        for identifier in self.list_files()? {
            match self.extract(&identifier) {
                Ok(content) => {
                    if content.to_lowercase().contains(&needle) {
                        matches.push(identifier);
                    }
                }
                Err(e) => {
                    tracing::warn!("Skipping {} during search: {}", identifier, e);
                }
            }
        }

        Ok(matches)
    }

    /// Write `content` to `name`, creating parent directories, and update its record.
    ///
    /// Returns the updated metadata record.
    pub fn write_file(&self, name: &str, content: &str) -> Result<FileMetadata> {
        let identifier = normalize_identifier(name)?;
        if self.is_catalog_file(&identifier) {
            return Err(ArchivistError::validation(format!(
                "{} is reserved for the metadata catalog",
                identifier
            )));
        }

        let path = resolve_identifier(&self.root, &identifier)?;
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&path, content)?;

        let chars = content.chars().count();
        let size = content.len() as u64;
        let large = chars > self.large_file_threshold;
        let modified = fs::metadata(&path)
            .and_then(|meta| meta.modified())
            .map(DateTime::<Utc>::from)
            .unwrap_or_else(|_| Utc::now());

        let metadata = self.catalog.update_with(&identifier, |metadata| {
            metadata.size = size;
            metadata.estimated_tokens = (chars / 4) as u64;
            metadata.is_large_file = large;
            metadata.last_modified = Some(modified);
        })?;

        tracing::debug!("Wrote {} ({} bytes)", identifier, size);
        Ok(metadata)
    }

    /// Filesystem facts about `name`.
    pub fn file_info(&self, name: &str) -> Result<FileInfo> {
        let identifier = normalize_identifier(name)?;
        let path = resolve_identifier(&self.root, &identifier)?;

        let meta = match fs::metadata(&path) {
            Ok(meta) if meta.is_file() => meta,
            Ok(_) => return Err(ArchivistError::NotFound(identifier)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Err(ArchivistError::NotFound(identifier)),
            Err(e) => return Err(ArchivistError::Io(e)),
        };

        Ok(FileInfo {
            size: meta.len(),
            last_modified: meta.modified().ok().map(DateTime::<Utc>::from),
            mime_type: detect_mime_type(&path),
            extension: extension_of(&identifier),
            filename: identifier,
        })
    }

    /// Metadata for every listed file, creating records where missing.
    pub fn list_files_with_metadata(&self) -> Result<Vec<FileMetadata>> {
        self.list_files()?
            .iter()
            .map(|identifier| self.catalog.get_or_create(identifier))
            .collect()
    }

    /// Overwrite only the fields present in `patch` and persist.
    pub fn update_metadata(&self, name: &str, patch: &MetadataPatch) -> Result<FileMetadata> {
        let identifier = normalize_identifier(name)?;
        self.catalog.update_with(&identifier, |metadata| patch.apply(metadata))
    }

    /// Flush the catalog and shut down every registered extractor.
    ///
    /// Reads fail with `UnsupportedFormat` afterwards.
    pub fn shutdown(&self) -> Result<()> {
        self.catalog.flush()?;
        self.extractors.write().shutdown_all()?;
        tracing::info!("Knowledge store at {} shut down", self.root.display());
        Ok(())
    }
}

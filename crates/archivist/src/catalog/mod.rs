//! Metadata catalog.
//!
//! An in-memory map of per-file [`FileMetadata`] records backed by a single JSON
//! document under the store root. Records are created lazily with defaults probed
//! from the filesystem, and the whole map is rewritten after every mutation.
//!
//! # Thread Safety
//!
//! Records live in a `DashMap`, so lookups and per-record updates from many threads
//! do not block each other. Persistence takes a `parking_lot::Mutex` so only one
//! snapshot is written at a time. Each snapshot is written to a temporary file and
//! renamed over the document, which therefore never holds a partial write.
//!
//! Records for files deleted from disk are never pruned.
//!
//! Every mutation serializes the full map, so catalogs beyond a few thousand files
//! will spend noticeable time in persistence.

use crate::core::config::ServerConfig;
use crate::core::io::{extension_of, resolve_identifier};
use crate::core::mime::{category_for_extension, default_tags, detect_mime_type};
use crate::types::{CatalogOverview, FileMetadata};
use crate::{ArchivistError, Result};
use chrono::{DateTime, Utc};
use dashmap::DashMap;
use parking_lot::Mutex;
use std::cmp::Ordering;
use std::collections::{BTreeMap, HashMap};
use std::fs;
use std::path::{Path, PathBuf};

/// Concurrent metadata catalog persisted as one JSON document.
#[derive(Debug)]
pub struct MetadataCatalog {
    root: PathBuf,
    document: PathBuf,
    large_file_threshold: usize,
    records: DashMap<String, FileMetadata>,
    persist_lock: Mutex<()>,
}

impl MetadataCatalog {
    /// Open the catalog for `config`, loading the document when it exists.
    ///
    /// # Errors
    ///
    /// Returns `ArchivistError::Io` if the document cannot be read and
    /// `ArchivistError::Serialization` if it is not a valid catalog.
    pub fn open(config: &ServerConfig) -> Result<Self> {
        let catalog = Self {
            root: config.store_path.clone(),
            document: config.metadata_path(),
            large_file_threshold: config.large_file_threshold,
            records: DashMap::new(),
            persist_lock: Mutex::new(()),
        };
        catalog.load()?;
        Ok(catalog)
    }

    fn load(&self) -> Result<()> {
        if !self.document.exists() {
            tracing::debug!("No metadata document at {}, starting empty", self.document.display());
            return Ok(());
        }

        let content = fs::read_to_string(&self.document)?;
        let records: HashMap<String, FileMetadata> = serde_json::from_str(&content).map_err(|e| {
            ArchivistError::serialization_with_source(
                format!("Invalid metadata document {}", self.document.display()),
                e,
            )
        })?;

        let count = records.len();
        for (filename, metadata) in records {
            self.records.insert(filename, metadata);
        }

        tracing::info!("Loaded metadata for {} files", count);
        Ok(())
    }

    /// Path of the backing JSON document.
    pub fn document_path(&self) -> &Path {
        &self.document
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Existing record for `filename`, without creating one.
    pub fn get(&self, filename: &str) -> Option<FileMetadata> {
        self.records.get(filename).map(|entry| entry.value().clone())
    }

    /// Record for `filename`, creating it from filesystem defaults when absent.
    ///
    /// Creation is memoized but not persisted; the record reaches disk with the
    /// next mutation.
    pub fn get_or_create(&self, filename: &str) -> Result<FileMetadata> {
        if let Some(existing) = self.records.get(filename) {
            return Ok(existing.value().clone());
        }

        let defaults = self.default_metadata(filename)?;
        let entry = self.records.entry(filename.to_string()).or_insert(defaults);
        Ok(entry.value().clone())
    }

    /// Replace the record for `filename` and persist.
    pub fn update(&self, filename: &str, mut metadata: FileMetadata) -> Result<()> {
        metadata.filename = filename.to_string();
        self.records.insert(filename.to_string(), metadata);
        self.persist()
    }

    /// Atomically modify the record for `filename` (created when absent) and persist.
    ///
    /// Returns the record as stored after `f` ran.
    pub fn update_with<F>(&self, filename: &str, f: F) -> Result<FileMetadata>
    where
        F: FnOnce(&mut FileMetadata),
    {
        let defaults = if self.records.contains_key(filename) {
            None
        } else {
            Some(self.default_metadata(filename)?)
        };

        let updated = {
            let mut entry = self
                .records
                .entry(filename.to_string())
                .or_insert_with(|| defaults.unwrap_or_else(|| FileMetadata::new(filename)));
            f(entry.value_mut());
            entry.value().clone()
        };

        self.persist()?;
        Ok(updated)
    }

    /// Set `lastAccessed` to now and persist.
    pub fn touch(&self, filename: &str) -> Result<()> {
        self.update_with(filename, |metadata| metadata.last_accessed = Some(Utc::now()))?;
        Ok(())
    }

    /// Case-insensitive OR match over filename, description, tags, category and summary.
    ///
    /// Results are sorted by filename.
    pub fn search(&self, query: &str) -> Vec<FileMetadata> {
        let query = query.to_lowercase();
        let mut results: Vec<FileMetadata> = self
            .records
            .iter()
            .filter(|entry| matches_query(entry.value(), &query))
            .map(|entry| entry.value().clone())
            .collect();

        results.sort_by(|a, b| a.filename.cmp(&b.filename));
        results
    }

    /// Records whose category equals `category` exactly.
    ///
    /// Sorted by `lastModified` descending; records without one come last. Ties are
    /// broken by filename.
    pub fn by_category(&self, category: &str) -> Vec<FileMetadata> {
        let mut results: Vec<FileMetadata> = self
            .records
            .iter()
            .filter(|entry| entry.value().category == category)
            .map(|entry| entry.value().clone())
            .collect();

        results.sort_by(|a, b| newest_first(a.last_modified, b.last_modified).then_with(|| a.filename.cmp(&b.filename)));
        results
    }

    /// The `limit` most recently accessed records; never-accessed records come last.
    pub fn recent(&self, limit: usize) -> Vec<FileMetadata> {
        let mut results: Vec<FileMetadata> = self.records.iter().map(|entry| entry.value().clone()).collect();
        results.sort_by(|a, b| newest_first(a.last_accessed, b.last_accessed).then_with(|| a.filename.cmp(&b.filename)));
        results.truncate(limit);
        results
    }

    /// Aggregate statistics computed by a full scan.
    pub fn overview(&self) -> CatalogOverview {
        let mut total_files = 0;
        let mut total_size = 0u64;
        let mut large_files = 0;
        let mut category_counts: HashMap<String, usize> = HashMap::new();

        for entry in self.records.iter() {
            let metadata = entry.value();
            total_files += 1;
            total_size = total_size.saturating_add(metadata.size);
            if metadata.is_large_file {
                large_files += 1;
            }
            *category_counts.entry(metadata.category.clone()).or_insert(0) += 1;
        }

        CatalogOverview {
            total_files,
            total_size,
            large_files,
            category_counts,
            last_updated: Utc::now(),
        }
    }

    /// Write the current state to disk.
    pub fn flush(&self) -> Result<()> {
        self.persist()
    }

    fn persist(&self) -> Result<()> {
        let _guard = self.persist_lock.lock();

        let snapshot: BTreeMap<String, FileMetadata> = self
            .records
            .iter()
            .map(|entry| (entry.key().clone(), entry.value().clone()))
            .collect();
        let serialized = serde_json::to_string_pretty(&snapshot)?;

        if let Some(parent) = self.document.parent() {
            fs::create_dir_all(parent)?;
        }

        let file_name = self
            .document
            .file_name()
            .and_then(|name| name.to_str())
            .ok_or_else(|| ArchivistError::validation("metadata document has no file name"))?;
        let temp_path = self
            .document
            .with_file_name(format!(".{}.tmp.{}", file_name, std::process::id()));

        fs::write(&temp_path, serialized)?;
        if let Err(e) = fs::rename(&temp_path, &self.document) {
            let _ = fs::remove_file(&temp_path);
            return Err(ArchivistError::Io(e));
        }

        tracing::debug!("Saved metadata for {} files", snapshot.len());
        Ok(())
    }

    fn default_metadata(&self, filename: &str) -> Result<FileMetadata> {
        let path = resolve_identifier(&self.root, filename)?;
        let extension = extension_of(filename);

        let mut metadata = FileMetadata::new(filename);
        metadata.category = category_for_extension(&extension).to_string();
        metadata.tags = default_tags(filename);
        metadata.mime_type = Some(detect_mime_type(filename));

        match fs::metadata(&path) {
            Ok(fs_meta) if fs_meta.is_file() => {
                metadata.size = fs_meta.len();
                metadata.estimated_tokens = fs_meta.len() / 4;
                metadata.is_large_file = fs_meta.len() > self.large_file_threshold as u64;
                metadata.last_modified = fs_meta.modified().ok().map(DateTime::<Utc>::from);
            }
            Ok(_) => {}
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
            Err(e) => {
                tracing::warn!("Could not probe {}: {}", path.display(), e);
            }
        }

        Ok(metadata)
    }
}

fn matches_query(metadata: &FileMetadata, query: &str) -> bool {
    let contains = |value: &str| value.to_lowercase().contains(query);

    contains(metadata.filename.as_str())
        || metadata.description.as_deref().is_some_and(contains)
        || metadata.tags.iter().any(|tag| contains(tag.as_str()))
        || contains(metadata.category.as_str())
        || metadata.summary.as_deref().is_some_and(contains)
}

fn newest_first(a: Option<DateTime<Utc>>, b: Option<DateTime<Utc>>) -> Ordering {
    match (a, b) {
        (Some(a), Some(b)) => b.cmp(&a),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}

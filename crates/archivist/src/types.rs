//! Shared data types for the catalog, the store and the protocol surfaces.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};

/// Metadata record for a single knowledge-store file.
///
/// Serialized with camelCase keys to stay compatible with existing catalog
/// documents. Timestamps are RFC 3339 UTC.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FileMetadata {
    /// Store identifier, `/`-separated and relative to the store root
    pub filename: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub summary: Option<String>,

    #[serde(default)]
    pub tags: Vec<String>,

    #[serde(default = "default_category")]
    pub category: String,

    /// Size in bytes
    #[serde(default)]
    pub size: u64,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mime_type: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_modified: Option<DateTime<Utc>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_accessed: Option<DateTime<Utc>>,

    #[serde(default)]
    pub estimated_tokens: u64,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub language: Option<String>,

    #[serde(default)]
    pub is_large_file: bool,

    #[serde(default)]
    pub custom_properties: BTreeMap<String, String>,
}

fn default_category() -> String {
    crate::core::mime::DEFAULT_CATEGORY.to_string()
}

impl FileMetadata {
    /// Empty record for `filename` with category `other`.
    pub fn new(filename: impl Into<String>) -> Self {
        Self {
            filename: filename.into(),
            description: None,
            summary: None,
            tags: Vec::new(),
            category: default_category(),
            size: 0,
            mime_type: None,
            last_modified: None,
            last_accessed: None,
            estimated_tokens: 0,
            language: None,
            is_large_file: false,
            custom_properties: BTreeMap::new(),
        }
    }
}

/// Partial metadata update. Only fields that are `Some` overwrite the record.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MetadataPatch {
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub tags: Option<Vec<String>>,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub summary: Option<String>,
}

impl MetadataPatch {
    pub fn is_empty(&self) -> bool {
        self.description.is_none() && self.tags.is_none() && self.category.is_none() && self.summary.is_none()
    }

    /// Overwrite the provided fields of `metadata`.
    pub fn apply(&self, metadata: &mut FileMetadata) {
        if let Some(description) = &self.description {
            metadata.description = Some(description.clone());
        }
        if let Some(tags) = &self.tags {
            metadata.tags = tags.clone();
        }
        if let Some(category) = &self.category {
            metadata.category = category.clone();
        }
        if let Some(summary) = &self.summary {
            metadata.summary = Some(summary.clone());
        }
    }
}

/// Aggregate statistics over the whole catalog.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CatalogOverview {
    pub total_files: usize,
    /// Sum of record sizes in bytes
    pub total_size: u64,
    pub large_files: usize,
    pub category_counts: HashMap<String, usize>,
    pub last_updated: DateTime<Utc>,
}

/// Filesystem facts about a single store file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FileInfo {
    pub filename: String,
    pub size: u64,
    pub last_modified: Option<DateTime<Utc>>,
    pub mime_type: String,
    pub extension: String,
}

//! Extractor registration and lookup.
//!
//! Extractors are keyed by lower-cased file extension. Several extractors may
//! claim the same extension; the one with the highest priority wins. Extensions
//! nobody claims go to the fallback extractor when one is set.

use crate::plugins::{ContentExtractor, Plugin};
use crate::{ArchivistError, Result};
use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;

/// Validate a plugin name before registration.
///
/// Names cannot be empty or contain whitespace.
fn validate_plugin_name(name: &str) -> Result<()> {
    if name.is_empty() {
        return Err(ArchivistError::validation("Plugin name cannot be empty"));
    }

    if name.contains(char::is_whitespace) {
        return Err(ArchivistError::validation(format!(
            "Plugin name '{}' cannot contain whitespace",
            name
        )));
    }

    Ok(())
}

/// Registry mapping file extensions to content extractors.
///
/// # Example
///
/// ```rust
/// use archivist::plugins::{ExtractorRegistry, Plugin};
///
/// let registry = ExtractorRegistry::with_defaults().unwrap();
/// let extractor = registry.get("md").unwrap();
/// assert_eq!(extractor.name(), "plain-text-extractor");
/// ```
pub struct ExtractorRegistry {
    extractors: HashMap<String, BTreeMap<i32, Arc<dyn ContentExtractor>>>,
    name_index: HashMap<String, Vec<(String, i32)>>,
    fallback: Option<Arc<dyn ContentExtractor>>,
}

impl ExtractorRegistry {
    /// Create a new empty registry without a fallback.
    pub fn new() -> Self {
        Self {
            extractors: HashMap::new(),
            name_index: HashMap::new(),
            fallback: None,
        }
    }

    /// Registry populated with the built-in extractors and fallback.
    pub fn with_defaults() -> Result<Self> {
        let mut registry = Self::new();
        crate::extractors::register_default_extractors(&mut registry)?;
        Ok(registry)
    }

    /// Register an extractor for every extension it supports.
    ///
    /// The extractor is initialized before it becomes visible.
    pub fn register(&mut self, extractor: Arc<dyn ContentExtractor>) -> Result<()> {
        let name = extractor.name().to_string();
        let priority = extractor.priority();
        let extensions: Vec<String> = extractor
            .supported_extensions()
            .iter()
            .map(|ext| ext.trim_start_matches('.').to_lowercase())
            .collect();

        validate_plugin_name(&name)?;

        extractor.initialize()?;

        let mut index_entries = Vec::new();
        for extension in &extensions {
            self.extractors
                .entry(extension.clone())
                .or_default()
                .insert(priority, Arc::clone(&extractor));
            index_entries.push((extension.clone(), priority));
        }

        tracing::debug!("Registered extractor '{}' for {} extensions", name, extensions.len());
        self.name_index.insert(name, index_entries);

        Ok(())
    }

    /// Set the extractor used for extensions no registered extractor claims.
    pub fn set_fallback(&mut self, extractor: Arc<dyn ContentExtractor>) -> Result<()> {
        validate_plugin_name(extractor.name())?;
        extractor.initialize()?;

        if let Some(previous) = self.fallback.replace(extractor) {
            previous.shutdown()?;
        }
        Ok(())
    }

    /// Highest-priority extractor for a lower-cased extension.
    ///
    /// # Errors
    ///
    /// Returns `ArchivistError::UnsupportedFormat` when nothing claims the
    /// extension and no fallback is set.
    pub fn get(&self, extension: &str) -> Result<Arc<dyn ContentExtractor>> {
        let extension = extension.to_lowercase();

        if let Some(priority_map) = self.extractors.get(&extension)
            && let Some((_priority, extractor)) = priority_map.iter().next_back()
        {
            return Ok(Arc::clone(extractor));
        }

        if let Some(fallback) = &self.fallback {
            return Ok(Arc::clone(fallback));
        }

        Err(ArchivistError::UnsupportedFormat(format!(
            "No extractor for extension '{}'",
            extension
        )))
    }

    /// Names of all registered extractors, sorted.
    pub fn list(&self) -> Vec<String> {
        let mut names: Vec<String> = self.name_index.keys().cloned().collect();
        names.sort();
        names
    }

    /// Remove an extractor and shut it down.
    pub fn remove(&mut self, name: &str) -> Result<()> {
        let index_entries = match self.name_index.remove(name) {
            Some(entries) => entries,
            None => return Ok(()),
        };

        let mut extractor_to_shutdown: Option<Arc<dyn ContentExtractor>> = None;

        for (extension, priority) in index_entries {
            if let Some(priority_map) = self.extractors.get_mut(&extension) {
                if let Some(extractor) = priority_map.remove(&priority)
                    && extractor_to_shutdown.is_none()
                {
                    extractor_to_shutdown = Some(extractor);
                }

                if priority_map.is_empty() {
                    self.extractors.remove(&extension);
                }
            }
        }

        if let Some(extractor) = extractor_to_shutdown {
            extractor.shutdown()?;
        }

        Ok(())
    }

    /// Shut down every extractor, including the fallback, and clear the registry.
    pub fn shutdown_all(&mut self) -> Result<()> {
        for name in self.list() {
            self.remove(&name)?;
        }
        if let Some(fallback) = self.fallback.take() {
            fallback.shutdown()?;
        }
        Ok(())
    }
}

impl Default for ExtractorRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for ExtractorRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ExtractorRegistry")
            .field("extractors", &self.list())
            .field("fallback", &self.fallback.as_ref().map(|e| e.name().to_string()))
            .finish()
    }
}

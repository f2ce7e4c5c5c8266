//! File I/O utilities.
//!
//! Store identifiers are `/`-separated paths relative to the store root. This module
//! turns identifiers into filesystem paths (and back), and walks the store tree.

use crate::{ArchivistError, Result};
use std::path::{Component, Path, PathBuf};

/// Read a file synchronously.
///
/// # Errors
///
/// Returns `ArchivistError::Io` for I/O errors (these always bubble up).
pub fn read_file_sync(path: impl AsRef<Path>) -> Result<Vec<u8>> {
    std::fs::read(path.as_ref()).map_err(ArchivistError::Io)
}

/// Resolve a store identifier to a path under `root`.
///
/// Backslashes are treated as separators, empty and `.` segments are dropped.
///
/// # Errors
///
/// Returns `ArchivistError::Validation` if the identifier is empty, absolute, or
/// contains a `..` segment.
pub fn resolve_identifier(root: &Path, identifier: &str) -> Result<PathBuf> {
    let normalized = normalize_identifier(identifier)?;
    let mut path = root.to_path_buf();
    for segment in normalized.split('/') {
        path.push(segment);
    }
    Ok(path)
}

/// Normalize a store identifier to its canonical `a/b/c.txt` form.
pub fn normalize_identifier(identifier: &str) -> Result<String> {
    let trimmed = identifier.trim();
    if trimmed.is_empty() {
        return Err(ArchivistError::validation("File name cannot be empty"));
    }

    let unified = trimmed.replace('\\', "/");
    if unified.starts_with('/') || Path::new(&unified).is_absolute() || has_drive_prefix(&unified) {
        return Err(ArchivistError::validation(format!(
            "Absolute paths are not allowed: {}",
            identifier
        )));
    }

    let mut segments = Vec::new();
    for component in Path::new(&unified).components() {
        match component {
            Component::Normal(segment) => {
                let segment = segment.to_str().ok_or_else(|| {
                    ArchivistError::validation(format!("File name is not valid UTF-8: {}", identifier))
                })?;
                segments.push(segment);
            }
            Component::CurDir => {}
            Component::ParentDir => {
                return Err(ArchivistError::validation(format!(
                    "Path escapes the knowledge store: {}",
                    identifier
                )));
            }
            Component::RootDir | Component::Prefix(_) => {
                return Err(ArchivistError::validation(format!(
                    "Absolute paths are not allowed: {}",
                    identifier
                )));
            }
        }
    }

    if segments.is_empty() {
        return Err(ArchivistError::validation("File name cannot be empty"));
    }

    Ok(segments.join("/"))
}

fn has_drive_prefix(identifier: &str) -> bool {
    let bytes = identifier.as_bytes();
    bytes.len() >= 2 && bytes[0].is_ascii_alphabetic() && bytes[1] == b':'
}

/// Convert a path under `root` back to a store identifier.
///
/// Returns `None` for paths outside `root` or with non UTF-8 segments.
pub fn to_identifier(root: &Path, path: &Path) -> Option<String> {
    let relative = path.strip_prefix(root).ok()?;
    let segments = relative
        .components()
        .map(|component| match component {
            Component::Normal(segment) => segment.to_str(),
            _ => None,
        })
        .collect::<Option<Vec<_>>>()?;

    if segments.is_empty() {
        None
    } else {
        Some(segments.join("/"))
    }
}

/// Lower-cased extension of an identifier or path, empty when there is none.
pub fn extension_of(name: impl AsRef<Path>) -> String {
    name.as_ref()
        .extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| ext.to_lowercase())
        .unwrap_or_default()
}

/// Traverse a directory and return all file paths matching a filter.
///
/// # Errors
///
/// Returns `ArchivistError::Validation` if `dir` is not a directory and
/// `ArchivistError::Io` for I/O errors.
pub fn traverse_directory<F>(dir: impl AsRef<Path>, recursive: bool, filter: Option<F>) -> Result<Vec<PathBuf>>
where
    F: Fn(&Path) -> bool,
{
    let dir = dir.as_ref();
    let mut files = Vec::new();

    if !dir.is_dir() {
        return Err(ArchivistError::validation(format!(
            "Path is not a directory: {}",
            dir.display()
        )));
    }

    traverse_directory_impl(dir, recursive, &filter, &mut files)?;
    Ok(files)
}

fn traverse_directory_impl<F>(dir: &Path, recursive: bool, filter: &Option<F>, files: &mut Vec<PathBuf>) -> Result<()>
where
    F: Fn(&Path) -> bool,
{
    let entries = std::fs::read_dir(dir).map_err(ArchivistError::Io)?;

    for entry in entries {
        let entry = entry.map_err(ArchivistError::Io)?;
        let path = entry.path();

        if path.is_file() {
            let should_include = match filter {
                Some(f) => f(&path),
                None => true,
            };

            if should_include {
                files.push(path);
            }
        } else if path.is_dir() && recursive {
            traverse_directory_impl(&path, recursive, filter, files)?;
        }
    }

    Ok(())
}

//! Flat directory of page images addressed by filename

use crate::blob::atomic::atomic_write;
use crate::errors::{blob_missing, invalid_blob_name, io_error, Result};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

/// What `remove` found
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RemoveOutcome {
    Removed,
    /// Nothing to delete; already gone or never written
    Missing,
}

/// Filesystem blob store rooted at one directory
#[derive(Debug, Clone)]
pub struct FsBlobStore {
    root: PathBuf,
}

impl FsBlobStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Create the root directory if needed
    pub fn ensure_root(&self) -> Result<()> {
        fs::create_dir_all(&self.root).map_err(|e| io_error("ensure_blob_root", e))
    }

    /// Resolve a blob name to its path under the root
    ///
    /// # Errors
    ///
    /// Returns `InvalidInput` for empty names, names with path separators,
    /// and `.`/`..`.
    pub fn path_for(&self, name: &str) -> Result<PathBuf> {
        let valid = !name.is_empty()
            && name != "."
            && name != ".."
            && !name.contains(|c: char| c == '/' || c == '\\' || c == '\0');
        if !valid {
            return Err(invalid_blob_name(name));
        }
        Ok(self.root.join(name))
    }

    /// Write `content` under `name`, atomically
    pub fn write(&self, name: &str, content: &[u8]) -> Result<()> {
        let path = self.path_for(name)?;
        atomic_write(&path, content)?;
        tracing::debug!(filename = name, size_bytes = content.len(), "Wrote blob");
        Ok(())
    }

    pub fn read(&self, name: &str) -> Result<Vec<u8>> {
        let path = self.path_for(name)?;
        match fs::read(&path) {
            Ok(bytes) => Ok(bytes),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Err(blob_missing(name)),
            Err(e) => Err(io_error("read_blob", e)),
        }
    }

    pub fn exists(&self, name: &str) -> bool {
        self.path_for(name).map(|p| p.is_file()).unwrap_or(false)
    }

    /// Delete a blob, reporting `Missing` rather than failing when absent
    ///
    /// # Errors
    ///
    /// Any I/O failure other than "not found".
    pub fn remove(&self, name: &str) -> Result<RemoveOutcome> {
        let path = self.path_for(name)?;
        match fs::remove_file(&path) {
            Ok(()) => {
                tracing::debug!(filename = name, "Removed blob");
                Ok(RemoveOutcome::Removed)
            }
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(RemoveOutcome::Missing),
            Err(e) => Err(io_error("remove_blob", e)),
        }
    }

    /// Names of all stored blobs, sorted; in-flight temp files are skipped
    pub fn list(&self) -> Result<Vec<String>> {
        let entries = match fs::read_dir(&self.root) {
            Ok(entries) => entries,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(io_error("list_blobs", e)),
        };

        let mut names = Vec::new();
        for entry in entries {
            let entry = entry.map_err(|e| io_error("list_blobs", e))?;
            let is_file = entry
                .file_type()
                .map(|t| t.is_file())
                .unwrap_or(false);
            let name = entry.file_name().to_string_lossy().into_owned();
            if is_file && !name.starts_with('.') {
                names.push(name);
            }
        }
        names.sort();
        Ok(names)
    }
}

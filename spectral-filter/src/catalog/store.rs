//! On-disk storage for downloaded filter files.
//!
//! Each filter lives at `<root>/<safe_name>.xml`. Files are kept as a cache
//! and only removed when the catalog reports the filter as invalid.

use std::path::{Path, PathBuf};

use log::{info, warn};

use crate::error::{FilterError, Result};

/// Directory of downloaded filter files (by default `Filters/`)
#[derive(Debug, Clone)]
pub struct FilterStore {
    root: PathBuf,
}

impl FilterStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Path of the file holding the filter with the given safe name
    pub fn path_for(&self, safe_name: &str) -> PathBuf {
        self.root.join(format!("{safe_name}.xml"))
    }

    /// Whether a file for this filter is already present
    pub fn contains(&self, safe_name: &str) -> bool {
        self.path_for(safe_name).is_file()
    }

    /// Create the storage directory if it doesn't exist
    pub fn ensure_dir(&self) -> Result<()> {
        std::fs::create_dir_all(&self.root).map_err(|e| FilterError::io(&self.root, e))
    }

    /// Delete the stored file for a filter.
    ///
    /// A failed deletion is logged and otherwise ignored: if the file is
    /// already gone there is nothing stale left to clean up.
    pub fn invalidate(&self, safe_name: &str) {
        let path = self.path_for(safe_name);
        match std::fs::remove_file(&path) {
            Ok(()) => info!("Removed invalid filter file {}", path.display()),
            Err(e) => warn!("Could not remove filter file {}: {e}", path.display()),
        }
    }

    /// List the safe names of all filters currently stored.
    ///
    /// Returns an empty list if the storage directory does not exist yet.
    pub fn list(&self) -> Result<Vec<String>> {
        if !self.root.exists() {
            return Ok(Vec::new());
        }

        let mut names = Vec::new();
        let entries = std::fs::read_dir(&self.root).map_err(|e| FilterError::io(&self.root, e))?;
        for entry in entries {
            let path = entry.map_err(|e| FilterError::io(&self.root, e))?.path();
            if path.extension().and_then(|s| s.to_str()) == Some("xml") {
                if let Some(stem) = path.file_stem().and_then(|s| s.to_str()) {
                    names.push(stem.to_string());
                }
            }
        }
        names.sort();
        Ok(names)
    }
}

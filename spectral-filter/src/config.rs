//! Pipeline configuration loaded from a YAML document.
//!
//! Only the `filter` section is required. The `catalog` and `storage`
//! sections fall back to the public SVO Filter Profile Service and a
//! `Filters/` directory relative to the working directory.

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::Deserialize;

use crate::error::{FilterError, Result};

/// Default endpoint of the SVO Filter Profile Service
pub const DEFAULT_CATALOG_ENDPOINT: &str = "https://svo2.cab.inta-csic.es/theory/fps/fps.php";

/// Hard cap on the catalog request
pub const DEFAULT_TIMEOUT_SECS: u64 = 10;

/// Default directory for downloaded filter files
pub const DEFAULT_STORAGE_DIR: &str = "Filters";

/// Top-level configuration document
#[derive(Debug, Clone, Deserialize)]
pub struct PipelineConfig {
    #[serde(default)]
    pub filter: Option<FilterSection>,

    #[serde(default)]
    pub catalog: CatalogSection,

    #[serde(default)]
    pub storage: StorageSection,
}

/// The `filter` section, keyed the way the catalog names its fields
#[derive(Debug, Clone, Default, Deserialize)]
pub struct FilterSection {
    #[serde(rename = "Telescope_Name", default)]
    pub telescope_name: Option<String>,

    #[serde(rename = "Instrument", default)]
    pub instrument: Option<String>,

    #[serde(rename = "Filter_ID", default)]
    pub filter_id: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CatalogSection {
    #[serde(default = "default_endpoint")]
    pub endpoint: String,

    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

impl CatalogSection {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

impl Default for CatalogSection {
    fn default() -> Self {
        Self {
            endpoint: default_endpoint(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct StorageSection {
    #[serde(default = "default_storage_dir")]
    pub directory: PathBuf,
}

impl Default for StorageSection {
    fn default() -> Self {
        Self {
            directory: default_storage_dir(),
        }
    }
}

fn default_endpoint() -> String {
    DEFAULT_CATALOG_ENDPOINT.to_string()
}

fn default_timeout_secs() -> u64 {
    DEFAULT_TIMEOUT_SECS
}

fn default_storage_dir() -> PathBuf {
    PathBuf::from(DEFAULT_STORAGE_DIR)
}

impl PipelineConfig {
    /// Load configuration from a YAML file
    ///
    /// # Errors
    ///
    /// Returns `FilterError::Io` if the file cannot be read and
    /// `FilterError::Config` if it is not a valid configuration document.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| FilterError::io(path, e))?;
        Self::from_yaml(&content)
            .map_err(|e| FilterError::Config(format!("{}: {e}", path.display())))
    }

    /// Parse configuration from YAML text
    pub fn from_yaml(content: &str) -> std::result::Result<Self, String> {
        serde_yaml::from_str(content).map_err(|e| e.to_string())
    }

    /// Configuration for an explicit filter with default catalog and storage
    pub fn for_filter(telescope: &str, instrument: &str, filter_id: &str) -> Self {
        Self {
            filter: Some(FilterSection {
                telescope_name: Some(telescope.to_string()),
                instrument: Some(instrument.to_string()),
                filter_id: Some(filter_id.to_string()),
            }),
            catalog: CatalogSection::default(),
            storage: StorageSection::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_full_document() {
        let yaml = r#"
filter:
  Telescope_Name: Generic
  Instrument: Johnson
  Filter_ID: V
catalog:
  endpoint: http://localhost:8080/fps.php
  timeout_secs: 3
storage:
  directory: /tmp/filters
"#;
        let config = PipelineConfig::from_yaml(yaml).unwrap();
        let filter = config.filter.unwrap();
        assert_eq!(filter.telescope_name.as_deref(), Some("Generic"));
        assert_eq!(filter.instrument.as_deref(), Some("Johnson"));
        assert_eq!(filter.filter_id.as_deref(), Some("V"));
        assert_eq!(config.catalog.endpoint, "http://localhost:8080/fps.php");
        assert_eq!(config.catalog.timeout(), Duration::from_secs(3));
        assert_eq!(config.storage.directory, PathBuf::from("/tmp/filters"));
    }

    #[test]
    fn test_defaults_applied() {
        let yaml = "filter:\n  Telescope_Name: Generic\n  Instrument: Johnson\n  Filter_ID: V\n";
        let config = PipelineConfig::from_yaml(yaml).unwrap();
        assert_eq!(config.catalog.endpoint, DEFAULT_CATALOG_ENDPOINT);
        assert_eq!(config.catalog.timeout_secs, 10);
        assert_eq!(config.storage.directory, PathBuf::from("Filters"));
    }

    #[test]
    fn test_missing_fields_still_deserialize() {
        // Field presence is checked when the identity is built
        let config = PipelineConfig::from_yaml("filter:\n  Instrument: Johnson\n").unwrap();
        let filter = config.filter.unwrap();
        assert!(filter.telescope_name.is_none());
        assert!(filter.filter_id.is_none());
    }

    #[test]
    fn test_malformed_yaml() {
        assert!(PipelineConfig::from_yaml("filter: [unclosed").is_err());
    }

    #[test]
    fn test_load_unreadable_file() {
        let dir = tempfile::tempdir().unwrap();
        let result = PipelineConfig::load(&dir.path().join("missing.yml"));
        assert!(matches!(result, Err(FilterError::Io { .. })));
    }

    #[test]
    fn test_load_malformed_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bad.yml");
        std::fs::write(&path, "filter: [unclosed").unwrap();
        assert!(matches!(
            PipelineConfig::load(&path),
            Err(FilterError::Config(_))
        ));
    }
}

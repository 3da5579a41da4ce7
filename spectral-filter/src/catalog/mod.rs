//! Filter catalog access
//!
//! This module builds catalog queries from configuration and downloads the
//! filter definition files the catalog returns.

pub mod store;

use std::io::{Read, Write};
use std::time::Duration;

use log::{debug, info};
use ureq::Agent;

use crate::config::{FilterSection, PipelineConfig};
use crate::error::{FilterError, Result};

pub use store::FilterStore;

/// Size of each chunk copied from the response body to disk
pub const CHUNK_SIZE: usize = 8192;

/// A photometric filter as the catalog identifies it
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilterIdentity {
    telescope: String,
    instrument: String,
    filter_id: String,
}

impl FilterIdentity {
    /// Create an identity, rejecting empty components
    pub fn new(telescope: &str, instrument: &str, filter_id: &str) -> Result<Self> {
        Ok(Self {
            telescope: require("Telescope_Name", Some(telescope))?,
            instrument: require("Instrument", Some(instrument))?,
            filter_id: require("Filter_ID", Some(filter_id))?,
        })
    }

    /// Build an identity from the `filter` configuration section
    pub fn from_section(section: &FilterSection) -> Result<Self> {
        Ok(Self {
            telescope: require("Telescope_Name", section.telescope_name.as_deref())?,
            instrument: require("Instrument", section.instrument.as_deref())?,
            filter_id: require("Filter_ID", section.filter_id.as_deref())?,
        })
    }

    pub fn telescope(&self) -> &str {
        &self.telescope
    }

    pub fn instrument(&self) -> &str {
        &self.instrument
    }

    pub fn filter_id(&self) -> &str {
        &self.filter_id
    }

    /// Catalog key in the form `telescope/instrument.filter_id`
    pub fn catalog_key(&self) -> String {
        format!("{}/{}.{}", self.telescope, self.instrument, self.filter_id)
    }

    /// Catalog key with every `/` replaced by `.`, usable as a file name
    pub fn safe_name(&self) -> String {
        self.catalog_key().replace('/', ".")
    }
}

fn require(field: &str, value: Option<&str>) -> Result<String> {
    match value {
        None => Err(FilterError::Config(format!("filter.{field} is missing"))),
        Some(v) if v.trim().is_empty() => {
            Err(FilterError::Config(format!("filter.{field} is empty")))
        }
        Some(v) if v.trim() != v => Err(FilterError::Config(format!(
            "filter.{field} has leading or trailing whitespace: '{v}'"
        ))),
        Some(v) => Ok(v.to_string()),
    }
}

/// A ready-to-issue catalog request
#[derive(Debug, Clone)]
pub struct CatalogQuery {
    pub identity: FilterIdentity,
    pub url: String,
    pub safe_name: String,
}

/// Build the catalog query URL and storage name for the configured filter
///
/// The catalog key is passed as the `ID` parameter with its slash kept, which
/// is the form the catalog expects. Characters not allowed in a URL query,
/// such as spaces, are percent-encoded.
///
/// # Errors
///
/// Returns `FilterError::Config` if the `filter` section or any of its fields
/// is missing, empty or padded with whitespace, or if the endpoint does not
/// form a valid URL.
pub fn build_query(config: &PipelineConfig) -> Result<CatalogQuery> {
    let section = config
        .filter
        .as_ref()
        .ok_or_else(|| FilterError::Config("missing 'filter' section".to_string()))?;
    let identity = FilterIdentity::from_section(section)?;
    query_for(&identity, &config.catalog.endpoint)
}

/// Build the query for an identity against a given endpoint
pub fn query_for(identity: &FilterIdentity, endpoint: &str) -> Result<CatalogQuery> {
    let raw = format!("{endpoint}?ID={}", identity.catalog_key());
    let url = url::Url::parse(&raw)
        .map_err(|e| FilterError::Config(format!("invalid catalog URL '{raw}': {e}")))?;

    Ok(CatalogQuery {
        safe_name: identity.safe_name(),
        identity: identity.clone(),
        url: url.into(),
    })
}

/// Downloads filter files from the catalog into a [`FilterStore`]
pub struct CatalogClient {
    agent: Agent,
    store: FilterStore,
}

impl CatalogClient {
    /// Create a client whose every request is capped at `timeout`
    pub fn new(store: FilterStore, timeout: Duration) -> Self {
        let agent: Agent = Agent::config_builder()
            .timeout_global(Some(timeout))
            .build()
            .into();
        Self { agent, store }
    }

    pub fn store(&self) -> &FilterStore {
        &self.store
    }

    /// Download `url` into `<store>/<safe_name>.xml`
    ///
    /// The body is copied in [`CHUNK_SIZE`] pieces into a temporary file in
    /// the store directory, which replaces the destination only once the
    /// whole body has arrived. A failed download leaves no file behind.
    ///
    /// # Returns
    ///
    /// The safe name, as a handle for the validation and parsing steps
    ///
    /// # Errors
    ///
    /// * `FilterError::Network` - timeout, connection failure, non-success status
    ///   or a failure while reading the body
    /// * `FilterError::Io` - the destination could not be written
    pub fn fetch(&self, url: &str, safe_name: &str) -> Result<String> {
        self.store.ensure_dir()?;
        let destination = self.store.path_for(safe_name);

        info!("Fetching filter {safe_name} from {url}");
        let response = self.agent.get(url).call().map_err(|e| FilterError::Network {
            url: url.to_string(),
            message: e.to_string(),
        })?;

        let mut staged = tempfile::NamedTempFile::new_in(self.store.root())
            .map_err(|e| FilterError::io(self.store.root(), e))?;
        let mut reader = response.into_body().into_reader();
        let mut chunk = [0u8; CHUNK_SIZE];
        let mut total = 0usize;

        loop {
            let n = match reader.read(&mut chunk) {
                Ok(0) => break,
                Ok(n) => n,
                Err(e) if e.kind() == std::io::ErrorKind::Interrupted => continue,
                Err(e) => {
                    return Err(FilterError::Network {
                        url: url.to_string(),
                        message: e.to_string(),
                    })
                }
            };
            staged
                .write_all(&chunk[..n])
                .map_err(|e| FilterError::io(staged.path(), e))?;
            total += n;
        }

        staged
            .flush()
            .map_err(|e| FilterError::io(staged.path(), e))?;
        staged
            .persist(&destination)
            .map_err(|e| FilterError::io(&destination, e.error))?;

        debug!("Wrote {total} bytes to {}", destination.display());
        Ok(safe_name.to_string())
    }
}

//! End-to-end filter retrieval: configuration to resampled transmission.
//!
//! Steps run strictly in sequence and the first failure aborts the run:
//!
//! 1. Build the catalog query from the `filter` configuration section
//! 2. Download the filter file into the store
//! 3. Check the catalog's query status; an `ERROR` status removes the file
//!    and fails with [`FilterError::InvalidFilter`]
//! 4. Parse the transmission table
//! 5. Resample it onto the caller's wavelength grid

use std::path::Path;

use log::info;

use crate::catalog::{build_query, CatalogClient, CatalogQuery, FilterStore};
use crate::config::PipelineConfig;
use crate::error::{FilterError, Result};
use crate::photometry::{FilterCurve, ResampledTransmission};
use crate::votable;

/// Knobs that don't belong in the configuration document
#[derive(Debug, Clone, Copy, Default)]
pub struct PipelineOptions {
    /// Use an already downloaded filter file instead of fetching it again
    pub reuse_cached: bool,
}

/// Retrieves a configured filter and applies it to wavelength grids
pub struct SpectrumFilterPipeline {
    config: PipelineConfig,
    options: PipelineOptions,
}

impl SpectrumFilterPipeline {
    pub fn new(config: PipelineConfig, options: PipelineOptions) -> Self {
        Self { config, options }
    }

    /// Load the configuration document at `config_path`
    pub fn from_config_file(config_path: &Path, options: PipelineOptions) -> Result<Self> {
        Ok(Self::new(PipelineConfig::load(config_path)?, options))
    }

    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    pub fn store(&self) -> FilterStore {
        FilterStore::new(&self.config.storage.directory)
    }

    /// Run steps 1-4 and return the filter's native curve
    pub fn retrieve_curve(&self) -> Result<FilterCurve> {
        let query = build_query(&self.config)?;
        let client = CatalogClient::new(self.store(), self.config.catalog.timeout());
        let store = client.store();

        if self.options.reuse_cached && store.contains(&query.safe_name) {
            info!(
                "Using cached filter file {}",
                store.path_for(&query.safe_name).display()
            );
        } else {
            client.fetch(&query.url, &query.safe_name)?;
        }

        Self::check_valid(store, &query)?;
        info!("Filter {} is valid, parsing", query.identity.catalog_key());

        let curve = votable::parse(store, &query.safe_name)?;
        let (lo, hi) = curve.wavelength_range();
        info!(
            "Filter {} has {} samples spanning {lo:.1}..{hi:.1} Å",
            query.identity.catalog_key(),
            curve.len()
        );
        Ok(curve)
    }

    fn check_valid(store: &FilterStore, query: &CatalogQuery) -> Result<()> {
        if votable::is_valid(store, &query.safe_name)? {
            return Ok(());
        }

        store.invalidate(&query.safe_name);
        Err(FilterError::InvalidFilter {
            key: query.identity.catalog_key(),
        })
    }

    /// Retrieve the filter and resample it onto `target_wavelengths` (Angstrom)
    pub fn run(&self, target_wavelengths: &[f64]) -> Result<ResampledTransmission> {
        let curve = self.retrieve_curve()?;
        curve.resample(target_wavelengths)
    }
}

/// Run the whole pipeline for the configuration document at `config_path`
///
/// # Errors
///
/// Surfaces the error of whichever step failed first; see [`FilterError`].
pub fn run(config_path: &Path, target_wavelengths: &[f64]) -> Result<ResampledTransmission> {
    SpectrumFilterPipeline::from_config_file(config_path, PipelineOptions::default())?
        .run(target_wavelengths)
}

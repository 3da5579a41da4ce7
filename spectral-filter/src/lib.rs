//! Photometric filter retrieval and application for simulated spectra.
//!
//! Filters are identified by telescope, instrument and filter ID, fetched as
//! VOTables from the SVO Filter Profile Service, checked for the catalog's
//! error placeholder, parsed into a transmission curve and resampled onto a
//! spectrum's wavelength grid. The resampled transmission is plain data; the
//! caller decides what to multiply it against.
//!
//! ```no_run
//! use std::path::Path;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let grid = [4000.0, 5500.0, 7000.0];
//! let transmission = spectral_filter::pipeline::run(Path::new("filter_config.yml"), &grid)?;
//! assert_eq!(transmission.len(), 3);
//! # Ok(())
//! # }
//! ```

pub mod algo;
pub mod catalog;
pub mod config;
pub mod error;
pub mod photometry;
pub mod pipeline;
pub mod viz;
pub mod votable;

pub use catalog::{build_query, CatalogClient, CatalogQuery, FilterIdentity, FilterStore};
pub use config::PipelineConfig;
pub use error::{FilterError, Result};
pub use photometry::{FilterCurve, ResampledTransmission, SpectrumTable};
pub use pipeline::{PipelineOptions, SpectrumFilterPipeline};

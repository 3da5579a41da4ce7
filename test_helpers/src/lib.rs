//! Testing infrastructure for the filter pipeline.
//!
//! - [`mock_catalog`]: a local HTTP server standing in for the filter catalog,
//!   able to answer with a document, an HTTP error, or to stall past a
//!   client timeout
//! - [`votable`]: builders for catalog-shaped VOTable documents
//!
//! # Usage
//!
//! ```rust,no_run
//! use test_helpers::mock_catalog::{MockCatalog, MockResponse};
//! use test_helpers::votable::{filter_votable, johnson_v_samples};
//!
//! let catalog = MockCatalog::start(MockResponse::Body(filter_votable(&johnson_v_samples())));
//! let endpoint = catalog.endpoint();
//! // point the pipeline configuration's catalog.endpoint at `endpoint`
//! ```

pub mod mock_catalog;
pub mod votable;

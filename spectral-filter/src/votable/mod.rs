//! Reading the VOTable documents returned by the filter catalog.
//!
//! The catalog answers every query with a VOTable. Its root carries an
//! `INFO` element whose `value` attribute is `ERROR` when the requested ID
//! is unknown; otherwise the filter profile is a table of `TD` cells holding
//! wavelength and transmission values in alternation.

pub mod parse;
pub mod validate;

use std::path::Path;

use crate::error::{FilterError, Result};

pub use parse::{parse, parse_file};
pub use validate::{is_valid, is_valid_file, query_status};

/// Read and parse an XML file, then hand the document to `f`
pub(crate) fn with_document<T>(
    path: &Path,
    f: impl FnOnce(&roxmltree::Document) -> Result<T>,
) -> Result<T> {
    let bytes = std::fs::read(path).map_err(|e| FilterError::io(path, e))?;
    let text = std::str::from_utf8(&bytes)
        .map_err(|e| FilterError::parse(path, format!("file is not valid UTF-8: {e}")))?;
    let doc = roxmltree::Document::parse(text)
        .map_err(|e| FilterError::parse(path, format!("malformed XML: {e}")))?;
    f(&doc)
}

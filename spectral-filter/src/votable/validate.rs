//! Query-status check on downloaded filter files

use std::path::Path;

use log::debug;

use super::with_document;
use crate::catalog::FilterStore;
use crate::error::{FilterError, Result};

/// Status value the catalog uses for an unknown filter ID
pub const ERROR_STATUS: &str = "ERROR";

/// Read the `value` attribute of the document's top-level `INFO` element.
///
/// Returns `Ok(None)` if the element has no `value` attribute.
///
/// # Errors
///
/// * `FilterError::Io` - the file cannot be read
/// * `FilterError::Parse` - the file is not well-formed XML
/// * `FilterError::NotFound` - the root has no `INFO` child
pub fn query_status(path: &Path) -> Result<Option<String>> {
    with_document(path, |doc| {
        let info = doc
            .root_element()
            .children()
            .find(|n| n.is_element() && n.tag_name().name() == "INFO")
            .ok_or_else(|| FilterError::NotFound {
                path: path.to_path_buf(),
                element: "INFO".to_string(),
            })?;
        Ok(info.attribute("value").map(str::to_string))
    })
}

/// Whether the file at `path` holds a real filter rather than an error placeholder.
///
/// Only the literal status `ERROR` is treated as invalid. Any other value,
/// and a missing attribute, count as valid.
pub fn is_valid_file(path: &Path) -> Result<bool> {
    let status = query_status(path)?;
    debug!("Query status of {}: {status:?}", path.display());
    Ok(status.as_deref() != Some(ERROR_STATUS))
}

/// [`is_valid_file`] for the stored filter with the given safe name
pub fn is_valid(store: &FilterStore, safe_name: &str) -> Result<bool> {
    is_valid_file(&store.path_for(safe_name))
}

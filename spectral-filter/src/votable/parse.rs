//! Extraction of the transmission table from a filter VOTable

use std::path::Path;

use log::debug;

use super::with_document;
use crate::catalog::FilterStore;
use crate::error::{FilterError, Result};
use crate::photometry::FilterCurve;

/// Parse the filter curve stored at `path`.
///
/// Every `TD` cell in the document is read in document order. Cells
/// alternate wavelength (Angstrom) and transmission, so even positions are
/// wavelengths and odd positions transmissions.
///
/// # Errors
///
/// Returns `FilterError::Parse` if the XML is malformed, a cell is not a
/// number, the cell count is odd or below 4, or the wavelengths are not
/// strictly increasing. `FilterError::Io` if the file cannot be read.
pub fn parse_file(path: &Path) -> Result<FilterCurve> {
    let cells = with_document(path, |doc| {
        doc.descendants()
            .filter(|n| n.is_element() && n.tag_name().name() == "TD")
            .enumerate()
            .map(|(i, cell)| {
                let text = cell.text().unwrap_or("").trim();
                text.parse::<f64>().map_err(|_| {
                    FilterError::parse(path, format!("cell {i} is not numeric: '{text}'"))
                })
            })
            .collect::<Result<Vec<f64>>>()
    })?;

    if cells.len() % 2 != 0 {
        return Err(FilterError::parse(
            path,
            format!("odd number of data cells ({})", cells.len()),
        ));
    }
    if cells.len() < 4 {
        return Err(FilterError::parse(
            path,
            format!("need at least 2 wavelength/transmission pairs, found {} cells", cells.len()),
        ));
    }

    let (wavelengths, transmissions): (Vec<f64>, Vec<f64>) = cells
        .chunks_exact(2)
        .map(|pair| (pair[0], pair[1]))
        .unzip();
    debug!("Parsed {} samples from {}", wavelengths.len(), path.display());

    FilterCurve::from_table(wavelengths, transmissions)
        .map_err(|e| FilterError::parse(path, e.to_string()))
}

/// [`parse_file`] for the stored filter with the given safe name
pub fn parse(store: &FilterStore, safe_name: &str) -> Result<FilterCurve> {
    parse_file(&store.path_for(safe_name))
}

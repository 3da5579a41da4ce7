//! Simulated spectra supplied by an upstream radiative-transfer run
//!
//! A spectrum table is a wavelength grid (Angstrom) plus one or more
//! luminosity-density series (erg s⁻¹ Å⁻¹) sampled on that grid, e.g. the
//! real-packet, virtual-packet and integrated spectra of a single model.

use std::fs::File;
use std::path::Path;

use log::debug;

use super::ResampledTransmission;
use crate::error::{FilterError, Result};

/// One named luminosity-density series
#[derive(Debug, Clone, PartialEq)]
pub struct SpectrumSeries {
    pub name: String,
    pub values: Vec<f64>,
}

/// Wavelength grid with the series sampled on it
#[derive(Debug, Clone, PartialEq)]
pub struct SpectrumTable {
    wavelengths: Vec<f64>,
    series: Vec<SpectrumSeries>,
}

impl SpectrumTable {
    /// Build a table, checking every series matches the grid length
    pub fn new(wavelengths: Vec<f64>, series: Vec<SpectrumSeries>) -> Result<Self> {
        if series.is_empty() {
            return Err(FilterError::InvalidArgument(
                "a spectrum table needs at least one series".to_string(),
            ));
        }
        for s in &series {
            if s.values.len() != wavelengths.len() {
                return Err(FilterError::InvalidArgument(format!(
                    "series '{}' has {} samples, grid has {}",
                    s.name,
                    s.values.len(),
                    wavelengths.len()
                )));
            }
        }
        Ok(Self {
            wavelengths,
            series,
        })
    }

    /// Load a table from CSV.
    ///
    /// The header row names the columns. The first column is the wavelength
    /// in Angstrom, every other column is a series.
    ///
    /// # Errors
    ///
    /// * `FilterError::Io` - the file cannot be opened
    /// * `FilterError::Parse` - ragged rows or non-numeric cells
    /// * `FilterError::InvalidArgument` - no series columns
    pub fn from_csv(path: &Path) -> Result<Self> {
        let file = File::open(path).map_err(|e| FilterError::io(path, e))?;
        let mut reader = csv::ReaderBuilder::new()
            .has_headers(true)
            .trim(csv::Trim::All)
            .from_reader(file);

        let headers = reader
            .headers()
            .map_err(|e| FilterError::parse(path, e.to_string()))?
            .clone();
        if headers.len() < 2 {
            return Err(FilterError::InvalidArgument(format!(
                "{} needs a wavelength column and at least one series",
                path.display()
            )));
        }

        let mut wavelengths = Vec::new();
        let mut columns: Vec<Vec<f64>> = vec![Vec::new(); headers.len() - 1];

        for (row, record) in reader.records().enumerate() {
            let record = record.map_err(|e| FilterError::parse(path, e.to_string()))?;
            for (col, cell) in record.iter().enumerate() {
                let value: f64 = cell.parse().map_err(|_| {
                    let column = &headers[col];
                    FilterError::parse(
                        path,
                        format!("row {}, column '{column}': '{cell}' is not a number", row + 1),
                    )
                })?;
                if col == 0 {
                    wavelengths.push(value);
                } else {
                    columns[col - 1].push(value);
                }
            }
        }

        debug!(
            "Loaded spectrum {} with {} samples and {} series",
            path.display(),
            wavelengths.len(),
            columns.len()
        );

        let series = headers
            .iter()
            .skip(1)
            .zip(columns)
            .map(|(name, values)| SpectrumSeries {
                name: name.to_string(),
                values,
            })
            .collect();
        Self::new(wavelengths, series)
    }

    /// Wavelength grid in Angstrom
    pub fn wavelengths(&self) -> &[f64] {
        &self.wavelengths
    }

    pub fn series(&self) -> &[SpectrumSeries] {
        &self.series
    }

    pub fn len(&self) -> usize {
        self.wavelengths.len()
    }

    pub fn is_empty(&self) -> bool {
        self.wavelengths.is_empty()
    }

    /// Weight every series by a transmission resampled onto this grid
    pub fn apply_filter(&self, transmission: &ResampledTransmission) -> Result<Self> {
        let series = self
            .series
            .iter()
            .map(|s| {
                Ok(SpectrumSeries {
                    name: s.name.clone(),
                    values: transmission.apply(&s.values)?,
                })
            })
            .collect::<Result<Vec<_>>>()?;

        Ok(Self {
            wavelengths: self.wavelengths.clone(),
            series,
        })
    }
}

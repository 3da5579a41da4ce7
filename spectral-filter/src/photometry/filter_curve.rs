//! Photometric filter transmission curves

use thiserror::Error;
use uom::si::f64::Length;
use uom::si::length::angstrom;

use crate::algo::misc::{interp_all, interp_unchecked, validate_table, InterpError};
use crate::error::{FilterError, Result};

/// Errors that can occur when building a filter curve
#[derive(Debug, Error, PartialEq)]
pub enum FilterCurveError {
    #[error("Wavelength and transmission vectors must have the same length ({0} vs {1})")]
    LengthMismatch(usize, usize),

    #[error("A filter curve needs at least 2 samples, got {0}")]
    TooFewSamples(usize),

    #[error("Wavelengths must be strictly increasing (violated at sample {0})")]
    NotAscending(usize),
}

impl From<InterpError> for FilterCurveError {
    fn from(e: InterpError) -> Self {
        match e {
            InterpError::MismatchedLengths(a, b) => Self::LengthMismatch(a, b),
            InterpError::InsufficientData => Self::TooFewSamples(0),
            InterpError::UnsortedData(i) => Self::NotAscending(i),
        }
    }
}

impl From<InterpError> for FilterError {
    fn from(e: InterpError) -> Self {
        FilterError::InvalidArgument(e.to_string())
    }
}

/// Transmission of a photometric filter as a function of wavelength
///
/// Wavelengths are stored in Angstrom, the unit the catalog publishes.
/// Transmissions are dimensionless fractions, nominally within [0, 1].
#[derive(Debug, Clone, PartialEq)]
pub struct FilterCurve {
    wavelengths: Vec<f64>,
    transmissions: Vec<f64>,
}

impl FilterCurve {
    /// Create a filter curve from wavelength (Angstrom) and transmission tables
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The vectors have different lengths
    /// - Fewer than 2 samples are given
    /// - Wavelengths are not strictly increasing
    pub fn from_table(
        wavelengths: Vec<f64>,
        transmissions: Vec<f64>,
    ) -> std::result::Result<Self, FilterCurveError> {
        if wavelengths.len() == transmissions.len() && wavelengths.len() < 2 {
            return Err(FilterCurveError::TooFewSamples(wavelengths.len()));
        }
        validate_table(&wavelengths, &transmissions)?;

        Ok(Self {
            wavelengths,
            transmissions,
        })
    }

    /// Number of samples
    pub fn len(&self) -> usize {
        self.wavelengths.len()
    }

    /// Always false, a curve has at least two samples
    pub fn is_empty(&self) -> bool {
        self.wavelengths.is_empty()
    }

    /// Sample wavelengths in Angstrom
    pub fn wavelengths(&self) -> &[f64] {
        &self.wavelengths
    }

    /// Sample wavelengths as length quantities
    pub fn wavelength_quantities(&self) -> Vec<Length> {
        self.wavelengths
            .iter()
            .map(|&w| Length::new::<angstrom>(w))
            .collect()
    }

    pub fn transmissions(&self) -> &[f64] {
        &self.transmissions
    }

    /// Shortest and longest sampled wavelength in Angstrom
    pub fn wavelength_range(&self) -> (f64, f64) {
        (self.wavelengths[0], self.wavelengths[self.len() - 1])
    }

    /// Peak transmission of the filter
    pub fn peak_transmission(&self) -> f64 {
        self.transmissions
            .iter()
            .copied()
            .fold(f64::NEG_INFINITY, f64::max)
    }

    /// Transmission at a single wavelength (Angstrom), clamped outside the curve
    pub fn at(&self, wavelength: f64) -> f64 {
        interp_unchecked(wavelength, &self.wavelengths, &self.transmissions)
    }

    /// Resample this curve onto a wavelength grid given in Angstrom
    pub fn resample(&self, target_wavelengths: &[f64]) -> Result<ResampledTransmission> {
        resample(target_wavelengths, self)
    }

    /// Resample this curve onto a grid of length quantities
    pub fn resample_lengths(&self, target: &[Length]) -> Result<ResampledTransmission> {
        let grid: Vec<f64> = target.iter().map(|l| l.get::<angstrom>()).collect();
        resample(&grid, self)
    }
}

/// Transmission values aligned one-to-one with a caller's wavelength grid
#[derive(Debug, Clone, PartialEq)]
pub struct ResampledTransmission(Vec<f64>);

impl ResampledTransmission {
    pub fn values(&self) -> &[f64] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn into_vec(self) -> Vec<f64> {
        self.0
    }

    /// Multiply a flux series sampled on the same grid by this transmission
    ///
    /// # Errors
    ///
    /// Returns `FilterError::InvalidArgument` if the lengths differ.
    pub fn apply(&self, flux: &[f64]) -> Result<Vec<f64>> {
        if flux.len() != self.0.len() {
            return Err(FilterError::InvalidArgument(format!(
                "flux has {} samples but the transmission has {}",
                flux.len(),
                self.0.len()
            )));
        }
        Ok(flux.iter().zip(&self.0).map(|(f, t)| f * t).collect())
    }
}

/// Linearly interpolate a filter curve onto `target_wavelengths` (Angstrom).
///
/// Targets below the first curve sample take the first transmission, targets
/// above the last take the last one. An empty target yields an empty result.
///
/// # Errors
///
/// Returns `FilterError::InvalidArgument` if the curve's wavelengths are not
/// strictly increasing.
pub fn resample(target_wavelengths: &[f64], curve: &FilterCurve) -> Result<ResampledTransmission> {
    resample_table(target_wavelengths, &curve.wavelengths, &curve.transmissions)
}

/// [`resample`] against raw wavelength and transmission tables
pub fn resample_table(
    target_wavelengths: &[f64],
    wavelengths: &[f64],
    transmissions: &[f64],
) -> Result<ResampledTransmission> {
    let values = interp_all(target_wavelengths, wavelengths, transmissions)?;
    Ok(ResampledTransmission(values))
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use uom::si::length::nanometer;

    fn johnson_v_like() -> FilterCurve {
        FilterCurve::from_table(
            vec![4800.0, 5000.0, 5500.0, 6000.0, 6500.0, 7400.0],
            vec![0.0, 0.3, 0.95, 0.6, 0.15, 0.0],
        )
        .unwrap()
    }

    #[test]
    fn test_knots_are_exact() {
        let curve = johnson_v_like();
        let out = curve.resample(curve.wavelengths()).unwrap();
        assert_eq!(out.values(), curve.transmissions());
    }

    #[test]
    fn test_between_knots() {
        let curve = johnson_v_like();
        let out = curve.resample(&[5250.0, 5750.0]).unwrap();
        assert_relative_eq!(out.values()[0], 0.625, epsilon = 1e-12);
        assert_relative_eq!(out.values()[1], 0.775, epsilon = 1e-12);
    }

    #[test]
    fn test_clamped_at_boundaries() {
        let curve = FilterCurve::from_table(vec![5000.0, 6000.0], vec![0.2, 0.7]).unwrap();
        let out = curve.resample(&[500.0, 4999.9, 6000.1, 12000.0]).unwrap();
        assert_eq!(out.values(), &[0.2, 0.2, 0.7, 0.7]);
    }

    #[test]
    fn test_empty_target() {
        let out = johnson_v_like().resample(&[]).unwrap();
        assert!(out.is_empty());
    }

    #[test]
    fn test_resample_table_rejects_unsorted() {
        let result = resample_table(&[5000.0], &[6000.0, 5000.0], &[0.1, 0.2]);
        assert!(matches!(result, Err(FilterError::InvalidArgument(_))));
    }

    #[test]
    fn test_from_table_errors() {
        assert_eq!(
            FilterCurve::from_table(vec![1.0, 2.0], vec![0.5]),
            Err(FilterCurveError::LengthMismatch(2, 1))
        );
        assert_eq!(
            FilterCurve::from_table(vec![1.0], vec![0.5]),
            Err(FilterCurveError::TooFewSamples(1))
        );
        assert_eq!(
            FilterCurve::from_table(vec![1.0, 3.0, 2.0], vec![0.1, 0.2, 0.3]),
            Err(FilterCurveError::NotAscending(2))
        );
    }

    #[test]
    fn test_length_quantities() {
        let curve = johnson_v_like();
        let lengths = curve.wavelength_quantities();
        assert_relative_eq!(lengths[2].get::<nanometer>(), 550.0, epsilon = 1e-9);

        let grid = vec![Length::new::<nanometer>(550.0)];
        let out = curve.resample_lengths(&grid).unwrap();
        assert_relative_eq!(out.values()[0], 0.95, epsilon = 1e-9);
    }

    #[test]
    fn test_apply() {
        let curve = johnson_v_like();
        let transmission = curve.resample(&[5000.0, 5500.0]).unwrap();
        let filtered = transmission.apply(&[10.0, 2.0]).unwrap();
        assert_relative_eq!(filtered[0], 3.0, epsilon = 1e-12);
        assert_relative_eq!(filtered[1], 1.9, epsilon = 1e-12);

        assert!(matches!(
            transmission.apply(&[1.0]),
            Err(FilterError::InvalidArgument(_))
        ));
    }

    #[test]
    fn test_summary_values() {
        let curve = johnson_v_like();
        assert_eq!(curve.len(), 6);
        assert_eq!(curve.wavelength_range(), (4800.0, 7400.0));
        assert_eq!(curve.peak_transmission(), 0.95);
        assert_eq!(curve.at(5500.0), 0.95);
    }
}

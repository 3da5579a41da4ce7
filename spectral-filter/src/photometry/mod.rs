//! Photometry models and utilities

pub mod filter_curve;
pub mod spectrum;

pub use filter_curve::{resample, FilterCurve, FilterCurveError, ResampledTransmission};
pub use spectrum::{SpectrumSeries, SpectrumTable};

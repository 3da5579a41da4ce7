//! PNG plots of spectra and filter transmission curves.

use std::ops::Range;
use std::path::Path;

use plotters::prelude::*;
use thiserror::Error;

use crate::photometry::{ResampledTransmission, SpectrumTable};

/// Errors that can occur while rendering a plot
#[derive(Debug, Error)]
pub enum VizError {
    /// Backend or drawing failure reported by plotters
    #[error("Plot error: {0}")]
    Plot(String),

    /// No finite samples fall inside the requested wavelength window
    #[error("Nothing to plot: {0}")]
    EmptyData(String),
}

pub type Result<T> = std::result::Result<T, VizError>;

/// Wavelength window used by default, in Angstrom
pub const DEFAULT_WAVELENGTH_RANGE: Range<f64> = 500.0..12000.0;

const PLOT_SIZE: (u32, u32) = (1600, 1000);
const SERIES_COLORS: [RGBColor; 6] = [BLUE, RED, GREEN, MAGENTA, CYAN, BLACK];

fn plot_err<E: std::fmt::Display>(e: E) -> VizError {
    VizError::Plot(e.to_string())
}

/// Vertical extent covering every finite value, padded by 5%
pub(crate) fn value_bounds<'a>(series: impl IntoIterator<Item = &'a [f64]>) -> Option<Range<f64>> {
    let (lo, hi) = series
        .into_iter()
        .flat_map(|s| s.iter().copied())
        .filter(|v| v.is_finite())
        .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), v| {
            (lo.min(v), hi.max(v))
        });

    if lo > hi {
        return None;
    }
    let pad = if hi > lo { (hi - lo) * 0.05 } else { lo.abs().max(1.0) * 0.05 };
    Some((lo - pad)..(hi + pad))
}

/// Samples inside the x window, as plot points
fn windowed(xs: &[f64], ys: &[f64], window: &Range<f64>) -> Vec<(f64, f64)> {
    xs.iter()
        .zip(ys)
        .filter(|(x, y)| window.contains(*x) && y.is_finite())
        .map(|(&x, &y)| (x, y))
        .collect()
}

/// How y-axis tick labels are written
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum YLabels {
    /// Luminosity densities spanning many decades
    Scientific,
    /// Dimensionless values in 0..1
    Fraction,
}

impl YLabels {
    fn format(self, v: f64) -> String {
        match self {
            YLabels::Scientific => format!("{v:.2e}"),
            YLabels::Fraction => format!("{v:.2}"),
        }
    }
}

/// Plot every series of a spectrum table
pub fn plot_spectrum(
    table: &SpectrumTable,
    title: &str,
    wavelength_range: Range<f64>,
    path: &Path,
) -> Result<()> {
    let curves: Vec<(String, Vec<(f64, f64)>)> = table
        .series()
        .iter()
        .map(|s| {
            (
                s.name.clone(),
                windowed(table.wavelengths(), &s.values, &wavelength_range),
            )
        })
        .collect();

    draw_lines(
        &curves,
        title,
        "Luminosity Density (erg/s/Angstrom)",
        YLabels::Scientific,
        wavelength_range,
        path,
    )
}

/// Plot a resampled transmission against the grid it was resampled onto
pub fn plot_transmission(
    wavelengths: &[f64],
    transmission: &ResampledTransmission,
    title: &str,
    wavelength_range: Range<f64>,
    path: &Path,
) -> Result<()> {
    let points = windowed(wavelengths, transmission.values(), &wavelength_range);
    draw_lines(
        &[("Transmission".to_string(), points)],
        title,
        "Transmission",
        YLabels::Fraction,
        wavelength_range,
        path,
    )
}

fn draw_lines(
    curves: &[(String, Vec<(f64, f64)>)],
    title: &str,
    y_desc: &str,
    y_labels: YLabels,
    wavelength_range: Range<f64>,
    path: &Path,
) -> Result<()> {
    let ys: Vec<Vec<f64>> = curves
        .iter()
        .map(|(_, pts)| pts.iter().map(|p| p.1).collect())
        .collect();
    let y_range = value_bounds(ys.iter().map(|v| v.as_slice())).ok_or_else(|| {
        VizError::EmptyData(format!(
            "no samples in {:.0}..{:.0} Å",
            wavelength_range.start, wavelength_range.end
        ))
    })?;

    let root = BitMapBackend::new(path, PLOT_SIZE).into_drawing_area();
    root.fill(&WHITE).map_err(plot_err)?;

    let mut chart = ChartBuilder::on(&root)
        .caption(title, ("sans-serif", 32).into_font().color(&BLACK))
        .margin(20)
        .x_label_area_size(50)
        .y_label_area_size(100)
        .build_cartesian_2d(wavelength_range, y_range)
        .map_err(plot_err)?;

    chart
        .configure_mesh()
        .x_desc("Wavelength (Angstrom)")
        .y_desc(y_desc)
        .y_label_formatter(&|v| y_labels.format(*v))
        .axis_desc_style(("sans-serif", 20))
        .label_style(("sans-serif", 16))
        .draw()
        .map_err(plot_err)?;

    for (i, (name, points)) in curves.iter().enumerate() {
        let color = SERIES_COLORS[i % SERIES_COLORS.len()];
        chart
            .draw_series(LineSeries::new(points.iter().copied(), color))
            .map_err(plot_err)?
            .label(name.as_str())
            .legend(move |(x, y)| {
                PathElement::new(vec![(x, y), (x + 20, y)], color.stroke_width(2))
            });
    }

    if curves.len() > 1 {
        chart
            .configure_series_labels()
            .background_style(WHITE.mix(0.8))
            .border_style(BLACK)
            .draw()
            .map_err(plot_err)?;
    }

    root.present().map_err(plot_err)?;
    Ok(())
}

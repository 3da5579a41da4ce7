//! Apply a catalog photometric filter to a simulated spectrum
//!
//! Reads the filter identity from a YAML configuration, downloads the
//! filter profile from the catalog, resamples it onto the spectrum's
//! wavelength grid and writes three plots: the unfiltered spectrum, the
//! resampled transmission curve and the filtered spectrum.

use std::path::PathBuf;

use clap::Parser;
use spectral_filter::photometry::SpectrumTable;
use spectral_filter::viz::{plot_spectrum, plot_transmission, DEFAULT_WAVELENGTH_RANGE};
use spectral_filter::{build_query, PipelineOptions, SpectrumFilterPipeline};

#[derive(Parser, Debug)]
#[command(
    name = "filter_spectrum",
    about = "Weights a simulated spectrum by a photometric filter from the SVO catalog",
    long_about = None
)]
struct Args {
    /// Filter configuration (YAML with a `filter` section)
    #[arg(long, default_value = "filter_config.yml")]
    config: PathBuf,

    /// Spectrum table (CSV: wavelength in Angstrom, then one column per series)
    #[arg(long, required_unless_present = "list_cached")]
    spectrum: Option<PathBuf>,

    /// Directory for the output plots
    #[arg(long, default_value = "plots")]
    output_dir: PathBuf,

    /// Reuse a previously downloaded filter file instead of fetching again
    #[arg(long)]
    reuse_cached: bool,

    /// Lower edge of the plotted wavelength window (Angstrom)
    #[arg(long, default_value_t = DEFAULT_WAVELENGTH_RANGE.start)]
    x_min: f64,

    /// Upper edge of the plotted wavelength window (Angstrom)
    #[arg(long, default_value_t = DEFAULT_WAVELENGTH_RANGE.end)]
    x_max: f64,

    /// List the filter files already downloaded and exit
    #[arg(long)]
    list_cached: bool,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();
    let args = Args::parse();

    let pipeline = SpectrumFilterPipeline::from_config_file(
        &args.config,
        PipelineOptions {
            reuse_cached: args.reuse_cached,
        },
    )?;

    if args.list_cached {
        let store = pipeline.store();
        println!("Filters in {}:", store.root().display());
        for name in store.list()? {
            println!("  {name}");
        }
        return Ok(());
    }

    if args.x_min >= args.x_max {
        return Err(format!(
            "--x-min ({}) must be below --x-max ({})",
            args.x_min, args.x_max
        )
        .into());
    }
    let window = args.x_min..args.x_max;

    let spectrum_path = args
        .spectrum
        .ok_or("--spectrum is required unless --list-cached is given")?;
    let spectrum = SpectrumTable::from_csv(&spectrum_path)?;
    let query = build_query(pipeline.config())?;

    println!("Spectral Filter");
    println!("===============");
    println!("Filter:    {}", query.identity.catalog_key());
    println!("Spectrum:  {} ({} samples)", spectrum_path.display(), spectrum.len());
    println!();

    let curve = pipeline.retrieve_curve()?;
    let transmission = curve.resample(spectrum.wavelengths())?;
    let filtered = spectrum.apply_filter(&transmission)?;

    let (lo, hi) = curve.wavelength_range();
    println!("Curve samples:     {}", curve.len());
    println!("Curve range:       {lo:.1} .. {hi:.1} Å");
    println!("Peak transmission: {:.3}", curve.peak_transmission());

    std::fs::create_dir_all(&args.output_dir)?;
    let unfiltered_path = args.output_dir.join("unfiltered_spectrum.png");
    let curve_path = args
        .output_dir
        .join(format!("{}_transmission.png", query.safe_name));
    let filtered_path = args
        .output_dir
        .join(format!("{}_filtered_spectrum.png", query.safe_name));

    plot_spectrum(
        &spectrum,
        "Unfiltered Model Spectrum",
        window.clone(),
        &unfiltered_path,
    )?;
    plot_transmission(
        spectrum.wavelengths(),
        &transmission,
        "Selected Filter Transmission Curve",
        window.clone(),
        &curve_path,
    )?;
    plot_spectrum(
        &filtered,
        "Filtered Model Spectrum",
        window,
        &filtered_path,
    )?;

    println!();
    println!("Plots saved to:");
    for path in [&unfiltered_path, &curve_path, &filtered_path] {
        println!("  {}", path.display());
    }

    Ok(())
}

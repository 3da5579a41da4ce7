//! End-to-end pipeline runs against a local mock of the filter catalog.

use std::path::{Path, PathBuf};
use std::time::Duration;

use approx::assert_relative_eq;
use spectral_filter::photometry::{SpectrumSeries, SpectrumTable};
use spectral_filter::viz::{plot_spectrum, plot_transmission, DEFAULT_WAVELENGTH_RANGE};
use spectral_filter::{pipeline, FilterError, FilterStore, PipelineOptions, SpectrumFilterPipeline};
use tempfile::TempDir;
use test_helpers::mock_catalog::{MockCatalog, MockResponse};
use test_helpers::votable::{error_votable, filter_votable, johnson_v_samples};

const SAFE_NAME: &str = "Generic.Johnson.V";

struct Workspace {
    dir: TempDir,
    config_path: PathBuf,
}

impl Workspace {
    fn storage(&self) -> PathBuf {
        self.dir.path().join("Filters")
    }

    fn store(&self) -> FilterStore {
        FilterStore::new(self.storage())
    }

    fn filter_file(&self) -> PathBuf {
        self.store().path_for(SAFE_NAME)
    }
}

fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

/// Write a configuration for Generic/Johnson.V pointing at `endpoint`
fn workspace(endpoint: &str, timeout_secs: u64) -> Workspace {
    workspace_with_filter(endpoint, timeout_secs, "Generic", "Johnson", "V")
}

fn workspace_with_filter(
    endpoint: &str,
    timeout_secs: u64,
    telescope: &str,
    instrument: &str,
    filter_id: &str,
) -> Workspace {
    let dir = tempfile::tempdir().unwrap();
    let storage = dir.path().join("Filters");
    let config_path = dir.path().join("filter_config.yml");
    let yaml = format!(
        "filter:\n  Telescope_Name: \"{telescope}\"\n  Instrument: \"{instrument}\"\n  Filter_ID: \"{filter_id}\"\n\
         catalog:\n  endpoint: {endpoint}\n  timeout_secs: {timeout_secs}\n\
         storage:\n  directory: {}\n",
        storage.display()
    );
    std::fs::write(&config_path, yaml).unwrap();
    Workspace { dir, config_path }
}

fn dir_is_empty_or_missing(path: &Path) -> bool {
    match std::fs::read_dir(path) {
        Ok(mut entries) => entries.next().is_none(),
        Err(_) => true,
    }
}

#[test]
fn test_run_resamples_onto_grid() {
    init_logging();
    let catalog = MockCatalog::start(MockResponse::Body(filter_votable(&johnson_v_samples())));
    let ws = workspace(&catalog.endpoint(), 10);

    let transmission = pipeline::run(&ws.config_path, &[4000.0, 5500.0, 7000.0]).unwrap();

    assert_eq!(transmission.len(), 3);
    for &t in transmission.values() {
        assert!((0.0..=1.0).contains(&t), "transmission {t} out of range");
    }
    // 5500 Å is a knot of the fixture curve
    assert_eq!(transmission.values()[1], 0.95);
    assert_relative_eq!(transmission.values()[2], 0.065, epsilon = 1e-12);

    assert!(ws.filter_file().is_file());
    assert_eq!(
        catalog.requests(),
        vec!["/theory/fps/fps.php?ID=Generic/Johnson.V".to_string()]
    );
}

#[test]
fn test_grid_outside_curve_is_clamped() {
    let catalog = MockCatalog::start(MockResponse::Body(filter_votable(&[
        (4000.0, 0.1),
        (5000.0, 0.8),
        (6000.0, 0.3),
    ])));
    let ws = workspace(&catalog.endpoint(), 10);

    let transmission = pipeline::run(&ws.config_path, &[500.0, 12000.0]).unwrap();
    assert_eq!(transmission.values(), &[0.1, 0.3]);
}

#[test]
fn test_empty_grid() {
    let catalog = MockCatalog::start(MockResponse::Body(filter_votable(&johnson_v_samples())));
    let ws = workspace(&catalog.endpoint(), 10);

    let transmission = pipeline::run(&ws.config_path, &[]).unwrap();
    assert!(transmission.is_empty());
}

#[test]
fn test_unknown_filter_removes_file() {
    init_logging();
    let catalog = MockCatalog::start(MockResponse::Body(error_votable("Generic/Johnson.V")));
    let ws = workspace(&catalog.endpoint(), 10);

    let result = pipeline::run(&ws.config_path, &[5500.0]);

    match result {
        Err(FilterError::InvalidFilter { key }) => assert_eq!(key, "Generic/Johnson.V"),
        other => panic!("expected InvalidFilter, got {other:?}"),
    }
    assert!(!ws.filter_file().exists());
}

#[test]
fn test_timeout_before_headers_leaves_no_file() {
    init_logging();
    let catalog = MockCatalog::start(MockResponse::StallHeaders(Duration::from_secs(3)));
    let ws = workspace(&catalog.endpoint(), 1);

    let result = pipeline::run(&ws.config_path, &[5500.0]);

    assert!(matches!(result, Err(FilterError::Network { .. })));
    assert!(!ws.filter_file().exists());
    assert!(dir_is_empty_or_missing(&ws.storage()));
}

#[test]
fn test_timeout_mid_body_leaves_no_file() {
    let partial = filter_votable(&johnson_v_samples());
    let total_len = partial.len() * 2;
    let catalog = MockCatalog::start(MockResponse::StallBody {
        partial,
        total_len,
        delay: Duration::from_secs(3),
    });
    let ws = workspace(&catalog.endpoint(), 1);

    let result = pipeline::run(&ws.config_path, &[5500.0]);

    assert!(matches!(result, Err(FilterError::Network { .. })));
    assert!(!ws.filter_file().exists());
    assert!(dir_is_empty_or_missing(&ws.storage()));
}

#[test]
fn test_http_error_status() {
    let catalog = MockCatalog::start(MockResponse::Status(500));
    let ws = workspace(&catalog.endpoint(), 10);

    let result = pipeline::run(&ws.config_path, &[5500.0]);
    assert!(matches!(result, Err(FilterError::Network { .. })));
    assert!(!ws.filter_file().exists());
}

#[test]
fn test_non_monotonic_curve_is_a_parse_error() {
    let catalog = MockCatalog::start(MockResponse::Body(filter_votable(&[
        (4000.0, 0.1),
        (6000.0, 0.8),
        (5000.0, 0.3),
    ])));
    let ws = workspace(&catalog.endpoint(), 10);

    let result = pipeline::run(&ws.config_path, &[5500.0]);
    assert!(matches!(result, Err(FilterError::Parse { .. })));
}

#[test]
fn test_missing_status_element() {
    let catalog = MockCatalog::start(MockResponse::Body(
        "<VOTABLE><RESOURCE/></VOTABLE>".to_string(),
    ));
    let ws = workspace(&catalog.endpoint(), 10);

    let result = pipeline::run(&ws.config_path, &[5500.0]);
    assert!(matches!(result, Err(FilterError::NotFound { .. })));
}

#[test]
fn test_empty_config_field_makes_no_request() {
    let catalog = MockCatalog::start(MockResponse::Body(filter_votable(&johnson_v_samples())));
    let ws = workspace_with_filter(&catalog.endpoint(), 10, "Generic", "", "V");

    let result = pipeline::run(&ws.config_path, &[5500.0]);

    assert!(matches!(result, Err(FilterError::Config(_))));
    assert!(catalog.requests().is_empty());
}

#[test]
fn test_missing_config_file() {
    let dir = tempfile::tempdir().unwrap();
    let result = pipeline::run(&dir.path().join("filter_config.yml"), &[5500.0]);
    assert!(matches!(result, Err(FilterError::Io { .. })));
}

#[test]
fn test_reuse_cached_skips_download() {
    let catalog = MockCatalog::start(MockResponse::Body(filter_votable(&johnson_v_samples())));
    let ws = workspace(&catalog.endpoint(), 10);
    pipeline::run(&ws.config_path, &[5500.0]).unwrap();
    assert_eq!(catalog.requests().len(), 1);

    let cached = SpectrumFilterPipeline::from_config_file(
        &ws.config_path,
        PipelineOptions { reuse_cached: true },
    )
    .unwrap();
    let transmission = cached.run(&[5300.0]).unwrap();

    assert_eq!(transmission.values(), &[0.92]);
    assert_eq!(catalog.requests().len(), 1);
}

#[test]
fn test_without_reuse_fetches_again() {
    let catalog = MockCatalog::start(MockResponse::Body(filter_votable(&johnson_v_samples())));
    let ws = workspace(&catalog.endpoint(), 10);
    pipeline::run(&ws.config_path, &[5500.0]).unwrap();
    pipeline::run(&ws.config_path, &[5500.0]).unwrap();

    assert_eq!(catalog.requests().len(), 2);
    assert_eq!(ws.store().list().unwrap(), vec![SAFE_NAME.to_string()]);
}

#[test]
#[ignore = "renders PNGs with system fonts"]
fn test_filtered_spectrum_plots() {
    let catalog = MockCatalog::start(MockResponse::Body(filter_votable(&johnson_v_samples())));
    let ws = workspace(&catalog.endpoint(), 10);

    let wavelengths: Vec<f64> = (0..=230).map(|i| 500.0 + 50.0 * i as f64).collect();
    let flux: Vec<f64> = wavelengths
        .iter()
        .map(|w| 1e38 * (-((w - 6000.0) / 2500.0).powi(2)).exp())
        .collect();
    let spectrum = SpectrumTable::new(
        wavelengths.clone(),
        vec![SpectrumSeries {
            name: "integrated".to_string(),
            values: flux,
        }],
    )
    .unwrap();

    let pipeline =
        SpectrumFilterPipeline::from_config_file(&ws.config_path, PipelineOptions::default())
            .unwrap();
    let transmission = pipeline.run(&wavelengths).unwrap();
    let filtered = spectrum.apply_filter(&transmission).unwrap();

    let curve_path = ws.dir.path().join("generic_johnson_v_transmission.png");
    let filtered_path = ws.dir.path().join("generic_johnson_v_filtered.png");
    plot_transmission(
        &wavelengths,
        &transmission,
        "Selected Filter Transmission Curve",
        DEFAULT_WAVELENGTH_RANGE,
        &curve_path,
    )
    .unwrap();
    plot_spectrum(
        &filtered,
        "Filtered Model Spectrum",
        DEFAULT_WAVELENGTH_RANGE,
        &filtered_path,
    )
    .unwrap();

    assert!(curve_path.is_file());
    assert!(filtered_path.is_file());
}

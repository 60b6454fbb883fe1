//! Error Taxonomy Tests
//!
//! Every failure is a typed error that names the violated constraint; no call
//! ever returns a partial or empty-but-successful dataset.

use labelled_image::prelude::*;
use labelled_image::transform::parse_strategies;

fn wave(n: usize) -> Vec<f64> {
    (0..n).map(|i| 10.0 + (i as f64 * 0.6).sin()).collect()
}

fn run(config: DatasetConfig, values: &[f64]) -> Result<LabelledImageDataset> {
    LabelledImagePipeline::with_labeler(config, Box::new(LocalExtremaLabeler)).process_series(values)
}

/// Labeler that emits lower-case category names.
struct LowercaseLabeler;

impl Labeler for LowercaseLabeler {
    fn label(&self, series: &[f64], window_size: usize) -> Result<LabeledSeries> {
        let inner = LocalExtremaLabeler.label(series, window_size)?;
        Ok(LabeledSeries {
            records: inner
                .records
                .into_iter()
                .map(|mut r| {
                    r.label = r.label.to_lowercase();
                    r
                })
                .collect(),
            ..inner
        })
    }

    fn name(&self) -> &str {
        "lowercase"
    }
}

// ============================================================================
// Configuration Errors
// ============================================================================

#[test]
fn test_empty_and_unknown_strategies_are_distinct() {
    let empty = parse_strategies(Vec::<String>::new()).unwrap_err();
    let unknown = parse_strategies(["GASF", "spectrogram"]).unwrap_err();

    assert!(matches!(empty, ImagingError::EmptyStrategySet));
    assert!(matches!(unknown, ImagingError::UnknownStrategy(ref s) if s == "spectrogram"));
    assert!(empty.is_configuration() && unknown.is_configuration());
    assert_ne!(empty.to_string(), unknown.to_string());
    assert!(unknown.to_string().contains("spectrogram"));
}

#[test]
fn test_empty_strategy_list_in_pipeline() {
    let err = run(DatasetConfig::new("Close", 3, 5, vec![]), &wave(20)).unwrap_err();
    assert!(matches!(err, ImagingError::EmptyStrategySet));
}

#[test]
fn test_window_errors_name_the_relationship() {
    let err = run(
        DatasetConfig::new("Close", 9, 4, vec![ImageStrategy::Rp]),
        &wave(40),
    )
    .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Configuration);
    let msg = err.to_string();
    assert!(msg.contains("image window (4)"));
    assert!(msg.contains("= 5"));

    let err = run(
        DatasetConfig::new("Close", 6, 10, vec![ImageStrategy::Rp]),
        &wave(40),
    )
    .unwrap_err();
    assert!(matches!(err, ImagingError::InvalidLabelWindow(6)));
}

#[test]
fn test_bin_count_only_matters_for_mtf() {
    let mut config = DatasetConfig::new("Close", 3, 5, vec![ImageStrategy::Gasf]);
    config.num_bin = 0;
    assert!(run(config.clone(), &wave(20)).is_ok());

    config.strategies.push(ImageStrategy::Mtf);
    assert!(matches!(
        run(config, &wave(20)),
        Err(ImagingError::InvalidBinCount(0))
    ));
}

#[test]
fn test_series_errors() {
    let config = DatasetConfig::new("Close", 3, 5, vec![ImageStrategy::Rp]);

    assert!(matches!(
        run(config.clone(), &[]),
        Err(ImagingError::InvalidSeries(_))
    ));

    let mut values = wave(20);
    values[3] = f64::NEG_INFINITY;
    assert!(matches!(
        run(config.clone(), &values),
        Err(ImagingError::InvalidSeries(_))
    ));

    let mut values = wave(20);
    values[6] = 0.0;
    assert!(run(config.clone(), &values).is_ok());

    let returns = DatasetConfig {
        basis: Basis::Returns,
        ..config
    };
    assert!(matches!(
        run(returns, &values),
        Err(ImagingError::InvalidSeries(ref msg)) if msg.contains("index 6")
    ));
}

#[test]
fn test_missing_column() {
    let table = SeriesTable::from_column("Open", wave(20));
    let config = DatasetConfig::new("Close", 3, 5, vec![ImageStrategy::Rp]);
    let err = data_to_labelled_images(&table, &config).unwrap_err();
    assert!(matches!(err, ImagingError::MissingColumn(ref c) if c == "Close"));
    assert!(err.is_configuration());
}

// ============================================================================
// Label Contract
// ============================================================================

#[test]
fn test_label_contract_violation_is_not_configuration() {
    let config = DatasetConfig::new("Close", 3, 5, vec![ImageStrategy::Rp]);
    let pipeline = LabelledImagePipeline::with_labeler(config, Box::new(LowercaseLabeler));
    let err = pipeline.process_series(&wave(20)).unwrap_err();

    assert_eq!(err.kind(), ErrorKind::LabelContract);
    assert!(!err.is_configuration());
    match err {
        ImagingError::LabelContract { index, label } => {
            assert_eq!(index, 0);
            assert_eq!(label, "hold");
        }
        other => panic!("unexpected error: {other}"),
    }
}

// ============================================================================
// Shape Mismatch
// ============================================================================

#[test]
fn test_mixed_sizes_rejected_under_default_policy() {
    let mut config = DatasetConfig::new("Close", 3, 6, vec![ImageStrategy::Gadf, ImageStrategy::Rp]);
    config.rp_padding = 2;
    let err = run(config, &wave(30)).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::ShapeMismatch);
    assert!(err.to_string().contains("RP"));
}

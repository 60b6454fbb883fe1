//! Pipeline Integration Tests
//!
//! Channel ordering, single vs stacked tensors, one-hot column order and the
//! 40-sample worked example with a padded recurrence plot.

use labelled_image::prelude::*;
use labelled_image::transform::ImageTransform;
use ndarray::{s, Axis};

fn synthetic(n: usize, seed: u64) -> Vec<f64> {
    let mut state = seed;
    (0..n)
        .map(|i| {
            state = state
                .wrapping_mul(6364136223846793005)
                .wrapping_add(1442695040888963407);
            let noise = (state >> 33) as f64 / (1u64 << 31) as f64 - 0.5;
            100.0 + 5.0 * (i as f64 * 0.35).sin() + noise
        })
        .collect()
}

fn single(
    values: &[f64],
    strategy: ImageStrategy,
    num_bin: usize,
    rp_padding: usize,
) -> ndarray::Array3<f64> {
    let mut config = DatasetConfig::new("Close", 3, 14, vec![strategy]);
    config.num_bin = num_bin;
    config.rp_padding = rp_padding;
    let dataset = LabelledImagePipeline::from_config(config)
        .unwrap()
        .process_series(values)
        .unwrap();
    match dataset.images {
        ImageTensor::Single(arr) => arr,
        ImageTensor::Stacked(_) => panic!("single strategy returned a stacked tensor"),
    }
}

// ============================================================================
// Channel Order
// ============================================================================

#[test]
fn test_channel_order_matches_request() {
    let values = synthetic(40, 21);
    let config = DatasetConfig::new(
        "Close",
        3,
        14,
        vec![ImageStrategy::Rp, ImageStrategy::Gasf, ImageStrategy::Mtf],
    );
    let dataset = data_to_labelled_images(&SeriesTable::from_column("Close", values.clone()), &config)
        .unwrap();
    let stacked = dataset.images.as_stacked().unwrap();
    assert_eq!(stacked.shape(), &[26, 14, 14, 3]);

    let expected = [
        single(&values, ImageStrategy::Rp, 5, 0),
        single(&values, ImageStrategy::Gasf, 5, 0),
        single(&values, ImageStrategy::Mtf, 5, 0),
    ];
    for (channel, images) in expected.iter().enumerate() {
        for i in 0..26 {
            assert_eq!(
                stacked.slice(s![i, .., .., channel]),
                images.index_axis(Axis(0), i),
                "channel {channel} image {i}"
            );
        }
    }
}

#[test]
fn test_reversed_request_reverses_channels() {
    let values = synthetic(30, 4);
    let forward = LabelledImagePipeline::from_config(DatasetConfig::new(
        "Close",
        3,
        8,
        vec![ImageStrategy::Gasf, ImageStrategy::Gadf],
    ))
    .unwrap()
    .process_series(&values)
    .unwrap();
    let backward = LabelledImagePipeline::from_config(DatasetConfig::new(
        "Close",
        3,
        8,
        vec![ImageStrategy::Gadf, ImageStrategy::Gasf],
    ))
    .unwrap()
    .process_series(&values)
    .unwrap();

    let f = forward.images.as_stacked().unwrap();
    let b = backward.images.as_stacked().unwrap();
    assert_eq!(f.index_axis(Axis(3), 0), b.index_axis(Axis(3), 1));
    assert_eq!(f.index_axis(Axis(3), 1), b.index_axis(Axis(3), 0));
}

#[test]
fn test_single_strategy_has_no_channel_axis() {
    let values = synthetic(30, 8);
    for strategy in ImageStrategy::ALL {
        let config = DatasetConfig::new("Close", 5, 10, vec![strategy]);
        let dataset = LabelledImagePipeline::from_config(config)
            .unwrap()
            .process_series(&values)
            .unwrap();
        assert_eq!(dataset.images.ndim(), 3, "{strategy}");
        assert_eq!(dataset.images.channels(), 1);
    }
}

#[test]
fn test_channel_axis_size_matches_strategy_count() {
    let values = synthetic(30, 8);
    for k in 2..=4 {
        let config = DatasetConfig::new("Close", 5, 10, ImageStrategy::ALL[..k].to_vec());
        let dataset = LabelledImagePipeline::from_config(config)
            .unwrap()
            .process_series(&values)
            .unwrap();
        assert_eq!(dataset.images.shape(), vec![dataset.len(), 10, 10, k]);
    }
}

#[test]
fn test_duplicate_strategies_get_own_channels() {
    let values = synthetic(30, 8);
    let config = DatasetConfig::new("Close", 3, 6, vec![ImageStrategy::Rp, ImageStrategy::Rp]);
    let dataset = LabelledImagePipeline::from_config(config)
        .unwrap()
        .process_series(&values)
        .unwrap();
    let stacked = dataset.images.as_stacked().unwrap();
    assert_eq!(stacked.shape()[3], 2);
    assert_eq!(stacked.index_axis(Axis(3), 0), stacked.index_axis(Axis(3), 1));
}

// ============================================================================
// Label Encoding
// ============================================================================

#[test]
fn test_one_hot_order_with_hold_only_input() {
    // Strictly increasing: every complete window has its centre in the middle.
    let values: Vec<f64> = (1..=30).map(f64::from).collect();
    let config = DatasetConfig::new("Close", 3, 5, vec![ImageStrategy::Gadf]);
    let dataset = LabelledImagePipeline::from_config(config)
        .unwrap()
        .process_series(&values)
        .unwrap();

    assert_eq!(dataset.image_labels.ncols(), 3);
    assert_eq!(dataset.image_labels.column(0).sum(), 0);
    assert_eq!(dataset.image_labels.column(1).sum(), 0);
    assert_eq!(dataset.image_labels.column(2).len(), dataset.len());
    assert!(dataset.image_labels.column(2).iter().all(|&v| v == 1));
    assert_eq!(dataset.label_names.get(2), Some(TradeAction::Hold));
}

#[test]
fn test_label_name_map_is_canonical() {
    let values = synthetic(50, 13);
    let config = DatasetConfig::new("Close", 5, 6, vec![ImageStrategy::Rp]);
    let dataset = LabelledImagePipeline::from_config(config)
        .unwrap()
        .process_series(&values)
        .unwrap();

    let names: Vec<_> = dataset.label_names.iter().collect();
    assert_eq!(
        names,
        vec![
            (0, TradeAction::Sell),
            (1, TradeAction::Buy),
            (2, TradeAction::Hold)
        ]
    );
    for row in dataset.image_labels.rows() {
        assert_eq!(row.iter().filter(|&&v| v == 1).count(), 1);
    }
    let stats = dataset.label_stats();
    assert!(stats.sell_count > 0 && stats.buy_count > 0 && stats.hold_count > 0);
}

// ============================================================================
// Worked Example: N=40, L=3, W=14, [RP, GASF, MTF], 4 bins, RP padding 1
// ============================================================================

fn worked_example_config(policy: ChannelPolicy) -> DatasetConfig {
    let mut config = DatasetConfig::new(
        "Close",
        3,
        14,
        vec![ImageStrategy::Rp, ImageStrategy::Gasf, ImageStrategy::Mtf],
    );
    config.num_bin = 4;
    config.rp_padding = 1;
    config.channel_policy = policy;
    config
}

#[test]
fn test_worked_example_rejects_mixed_sizes_by_default() {
    let table = SeriesTable::from_column("Close", synthetic(40, 99));
    let err = data_to_labelled_images(&table, &worked_example_config(ChannelPolicy::Reject))
        .unwrap_err();
    assert!(matches!(
        err,
        ImagingError::ChannelShapeMismatch {
            strategy: ImageStrategy::Gasf,
            expected: (15, 15),
            actual: (14, 14)
        }
    ));
    assert_eq!(err.kind(), ErrorKind::ShapeMismatch);
}

#[test]
fn test_worked_example_pad_to_largest() {
    let values = synthetic(40, 99);
    let table = SeriesTable::from_column("Close", values.clone());
    let dataset =
        data_to_labelled_images(&table, &worked_example_config(ChannelPolicy::PadToLargest))
            .unwrap();

    assert_eq!(dataset.len(), 26);
    assert_eq!(dataset.price_at_image.len(), dataset.image_labels.nrows());
    assert_eq!(dataset.images.shape(), vec![26, 15, 15, 3]);

    let stacked = dataset.images.as_stacked().unwrap();
    let rp = single(&values, ImageStrategy::Rp, 4, 1);
    let gasf = single(&values, ImageStrategy::Gasf, 4, 1);
    assert_eq!(rp.shape(), &[26, 15, 15]);
    assert_eq!(gasf.shape(), &[26, 14, 14]);

    assert_eq!(stacked.slice(s![.., .., .., 0]), rp);
    assert_eq!(stacked.slice(s![.., ..14, ..14, 1]), gasf);
    assert!(stacked.slice(s![.., 14, .., 1]).iter().all(|&v| v == 0.0));
    assert!(stacked.slice(s![.., .., 14, 2]).iter().all(|&v| v == 0.0));
}

#[test]
fn test_worked_example_rp_alone() {
    let mut config = DatasetConfig::new("Close", 3, 14, vec![ImageStrategy::Rp]);
    config.rp_padding = 1;
    let dataset = data_to_labelled_images(&SeriesTable::from_column("Close", synthetic(40, 99)), &config)
        .unwrap();
    assert_eq!(dataset.images.shape(), vec![26, 15, 15]);
}

// ============================================================================
// Options Reach Their Transform
// ============================================================================

#[test]
fn test_standardize_flags_rescale_output() {
    let values = synthetic(30, 6);
    let mut config = DatasetConfig::new("Close", 3, 8, vec![ImageStrategy::Gasf]);
    config.standardize_gasf = true;
    let dataset = LabelledImagePipeline::from_config(config)
        .unwrap()
        .process_series(&values)
        .unwrap();
    let images = dataset.images.as_single().unwrap();

    for image in images.axis_iter(Axis(0)) {
        let min = image.iter().copied().fold(f64::INFINITY, f64::min);
        let max = image.iter().copied().fold(f64::NEG_INFINITY, f64::max);
        assert!(min.abs() < 1e-12);
        assert!((max - 1.0).abs() < 1e-12);
    }
}

#[test]
fn test_returns_basis_images_use_returns() {
    let values = synthetic(30, 6);
    let mut config = DatasetConfig::new("Close", 3, 8, vec![ImageStrategy::Rp]);
    config.basis = Basis::Returns;
    let dataset = LabelledImagePipeline::from_config(config)
        .unwrap()
        .process_series(&values)
        .unwrap();

    let returns: Vec<f64> = values.windows(2).map(|p| p[1] / p[0] - 1.0).collect();
    let trimmed = &returns[..returns.len() - 1];
    let expected = labelled_image::transform::RecurrencePlot::new(0, false)
        .transform(trimmed, 8)
        .unwrap();
    assert_eq!(dataset.images.as_single().unwrap(), &expected);
}

#[test]
fn test_returns_basis_tolerates_zero_in_label_only_tail() {
    // N=20, L=3: the return ending at index 19 is trimmed before imaging.
    let mut values = synthetic(20, 9);
    values[18] = 0.0;
    let mut config = DatasetConfig::new("Close", 3, 5, vec![ImageStrategy::Rp]);
    config.basis = Basis::Returns;

    let dataset = LabelledImagePipeline::from_config(config)
        .unwrap()
        .process_series(&values)
        .unwrap();
    assert_eq!(dataset.len(), 14);
    assert_eq!(dataset.images.shape(), vec![14, 5, 5]);
    assert_eq!(dataset.price_at_image.len(), 14);
    assert_eq!(dataset.price_at_image[13], 0.0);
}

#[test]
fn test_builder_and_free_function_agree() {
    let values = synthetic(35, 17);
    let table = SeriesTable::from_column("Adj Close", values);

    let from_builder = DatasetBuilder::new("Adj Close")
        .windows(5, 9)
        .strategy(ImageStrategy::Mtf)
        .strategy(ImageStrategy::Gadf)
        .num_bin(3)
        .build()
        .unwrap()
        .process(&table)
        .unwrap();

    let mut config = DatasetConfig::new(
        "Adj Close",
        5,
        9,
        vec![ImageStrategy::Mtf, ImageStrategy::Gadf],
    );
    config.num_bin = 3;
    let from_fn = data_to_labelled_images(&table, &config).unwrap();

    assert_eq!(from_builder.images, from_fn.images);
    assert_eq!(from_builder.image_labels, from_fn.image_labels);
    assert_eq!(from_builder.price_at_image, from_fn.price_at_image);
}

#[test]
fn test_input_table_is_not_mutated() {
    let values = synthetic(30, 2);
    let table = SeriesTable::from_column("Close", values.clone());
    let config = DatasetConfig::new("Close", 3, 6, vec![ImageStrategy::Rp]);
    let dataset = data_to_labelled_images(&table, &config).unwrap();
    assert_eq!(table.column("Close").unwrap(), values.as_slice());
    assert_eq!(dataset.labelled.original, values);
}

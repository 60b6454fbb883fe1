//! Export Integration Tests
//!
//! Exported `.npy` arrays read back identical to the in-memory dataset.

use labelled_image::prelude::*;
use ndarray::{Array1, Array2, Array4};
use ndarray_npy::ReadNpyExt;
use std::fs::{self, File};
use tempfile::TempDir;

fn wave(n: usize) -> Vec<f64> {
    (0..n)
        .map(|i| 50.0 + 2.0 * (i as f64 * 0.5).sin() + (i % 5) as f64 * 0.1)
        .collect()
}

#[test]
fn test_export_round_trip() {
    let dir = TempDir::new().unwrap();
    let table = SeriesTable::from_column("Close", wave(40));
    let mut config = DatasetConfig::new(
        "Close",
        3,
        14,
        vec![ImageStrategy::Rp, ImageStrategy::Gasf, ImageStrategy::Mtf],
    );
    config.rp_padding = 1;
    config.num_bin = 4;
    config.channel_policy = ChannelPolicy::PadToLargest;
    let dataset = data_to_labelled_images(&table, &config).unwrap();

    let exporter = NumpyExporter::new(dir.path().join("out"));
    let metadata = exporter.export("close", &dataset).unwrap();

    let images =
        Array4::<f64>::read_npy(File::open(exporter.path_for("close", "images.npy")).unwrap())
            .unwrap();
    let labels =
        Array2::<u8>::read_npy(File::open(exporter.path_for("close", "labels.npy")).unwrap())
            .unwrap();
    let prices =
        Array1::<f64>::read_npy(File::open(exporter.path_for("close", "prices.npy")).unwrap())
            .unwrap();

    assert_eq!(&images, dataset.images.as_stacked().unwrap());
    assert_eq!(labels, dataset.image_labels);
    assert_eq!(prices, dataset.price_at_image);

    assert_eq!(metadata.n_images, 26);
    assert_eq!(metadata.image_shape, vec![26, 15, 15, 3]);
    assert_eq!((metadata.start, metadata.end), (13, 39));
    assert_eq!(metadata.config, config);
}

#[test]
fn test_metadata_json_is_readable() {
    let dir = TempDir::new().unwrap();
    let table = SeriesTable::from_column("Close", wave(30));
    let config = DatasetConfig::new("Close", 5, 6, vec![ImageStrategy::Gadf]);
    let dataset = data_to_labelled_images(&table, &config).unwrap();

    let exporter = NumpyExporter::new(dir.path());
    exporter.export("gadf", &dataset).unwrap();

    let text = fs::read_to_string(exporter.path_for("gadf", "metadata.json")).unwrap();
    let json: serde_json::Value = serde_json::from_str(&text).unwrap();
    assert_eq!(json["strategies"], serde_json::json!(["GADF"]));
    assert_eq!(json["label_names"]["0"], "Sell");
    assert_eq!(json["label_names"]["2"], "Hold");
    assert_eq!(json["basis"], "price");
}

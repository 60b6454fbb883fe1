//! End-to-end dataset assembly.
//!
//! # Architecture
//!
//! ```text
//! SeriesTable[column]
//!     │
//!     ├─→ Labeler ──→ LabeledSeries ──→ LabelEncoder ──→ one-hot (N, 3)
//!     │                                                      │
//!     ├─→ Alignment::compute ──→ [start, end) ───────────────┼──→ labels[start..end]
//!     │                                │                     └──→ prices[start..end]
//!     │                                ▼
//!     └─→ image_source (returns?, trimmed by floor(L/2))
//!                     │
//!                     ▼
//!               Dispatcher (one transform per strategy, request order)
//!                     │
//!                     ▼
//!               stack_images ──→ ImageTensor
//! ```
//!
//! Every output is sliced with the same `[start, end)` bound, so image `i`,
//! label row `i` and price `i` all refer to original index `start + i`.
//!
//! # Output Structure
//!
//! | Field | Type | Description |
//! |-------|------|-------------|
//! | `labelled` | `LabeledSeries` | Full labelled table (all N timestamps) |
//! | `price_at_image` | `Array1<f64>` | Series value on each image's last timestamp |
//! | `images` | `ImageTensor` | (n, H, W) or (n, H, W, k) |
//! | `image_labels` | `Array2<u8>` | One-hot (n, 3), columns Sell/Buy/Hold |
//! | `label_names` | `LabelNameMap` | Column → category |
//!
//! # Example
//!
//! ```
//! use labelled_image::prelude::*;
//!
//! let values: Vec<f64> = (0..40).map(|i| 100.0 + (i as f64 * 0.7).sin()).collect();
//! let table = SeriesTable::from_column("Close", values);
//!
//! let config = DatasetConfig::new("Close", 3, 14, vec![ImageStrategy::Gasf, ImageStrategy::Mtf]);
//! let dataset = data_to_labelled_images(&table, &config).unwrap();
//!
//! assert_eq!(dataset.images.shape(), vec![26, 14, 14, 2]);
//! assert_eq!(dataset.image_labels.nrows(), 26);
//! assert_eq!(dataset.price_at_image.len(), 26);
//! ```

use crate::alignment::Alignment;
use crate::config::DatasetConfig;
use crate::error::{ImagingError, Result};
use crate::labeling::{
    LabelEncoder, LabelNameMap, LabelStats, LabeledSeries, Labeler, LocalExtremaLabeler,
    TradeAction,
};
use crate::series::{validate_series, SeriesTable};
use crate::stacking::{stack_images, ImageTensor};
use crate::transform::{Dispatcher, ImageStrategy};
use ndarray::{Array1, Array2};

// ============================================================================
// Dataset
// ============================================================================

/// Aligned images, labels and prices for one series column.
#[derive(Debug, Clone)]
pub struct LabelledImageDataset {
    /// Labelled series over all N timestamps.
    pub labelled: LabeledSeries,

    /// Series value at the timestamp each image ends on.
    pub price_at_image: Array1<f64>,

    /// Image tensor, one image per aligned timestamp.
    pub images: ImageTensor,

    /// One-hot labels (n, 3) aligned with `images`.
    pub image_labels: Array2<u8>,

    /// One-hot column → category.
    pub label_names: LabelNameMap,

    /// Shared slice bounds.
    pub alignment: Alignment,

    /// Configuration the dataset was built with.
    pub config: DatasetConfig,
}

impl LabelledImageDataset {
    /// Number of aligned samples.
    pub fn len(&self) -> usize {
        self.price_at_image.len()
    }

    /// True if no sample was produced.
    pub fn is_empty(&self) -> bool {
        self.price_at_image.is_empty()
    }

    /// Strategies in channel order.
    pub fn strategies(&self) -> &[ImageStrategy] {
        &self.config.strategies
    }

    /// Verify that images, labels and prices have the aligned length and that
    /// the label map is canonical.
    pub fn check_alignment(&self) -> Result<()> {
        let expected = self.alignment.len();
        let images = self.images.num_images();
        let labels = self.image_labels.nrows();
        let prices = self.price_at_image.len();

        if images != expected || labels != expected || prices != expected {
            return Err(ImagingError::AlignmentMismatch {
                expected,
                images,
                labels,
                prices,
            });
        }
        if self.label_names != LabelNameMap::canonical()
            || self.image_labels.ncols() != self.label_names.len()
        {
            return Err(ImagingError::LabelContract {
                index: 0,
                label: format!("non-canonical label columns {:?}", self.label_names),
            });
        }
        Ok(())
    }

    /// Decoded action for every aligned sample.
    pub fn image_actions(&self) -> Vec<TradeAction> {
        self.image_labels
            .rows()
            .into_iter()
            .filter_map(|row| {
                row.iter()
                    .position(|&v| v == 1)
                    .and_then(|col| self.label_names.get(col))
            })
            .collect()
    }

    /// Class distribution of the aligned labels.
    pub fn label_stats(&self) -> LabelStats {
        LabelStats::from_actions(&self.image_actions())
    }

    /// Split into `(labelled, price_at_image, images, image_labels, label_names)`.
    pub fn into_parts(
        self,
    ) -> (
        LabeledSeries,
        Array1<f64>,
        ImageTensor,
        Array2<u8>,
        LabelNameMap,
    ) {
        (
            self.labelled,
            self.price_at_image,
            self.images,
            self.image_labels,
            self.label_names,
        )
    }
}

// ============================================================================
// Pipeline
// ============================================================================

/// Configured dataset builder: one labeler plus one [`DatasetConfig`].
///
/// Processing is a pure function of the input table; the pipeline holds no
/// state between calls.
pub struct LabelledImagePipeline {
    config: DatasetConfig,
    labeler: Box<dyn Labeler>,
}

impl LabelledImagePipeline {
    /// Validate `config` and use the default [`LocalExtremaLabeler`].
    pub fn from_config(config: DatasetConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self::with_labeler(config, Box::new(LocalExtremaLabeler)))
    }

    /// Pipeline with a custom labeler. `config` is validated on each call.
    pub fn with_labeler(config: DatasetConfig, labeler: Box<dyn Labeler>) -> Self {
        Self { config, labeler }
    }

    /// Current configuration.
    pub fn config(&self) -> &DatasetConfig {
        &self.config
    }

    /// Labeler in use.
    pub fn labeler(&self) -> &dyn Labeler {
        self.labeler.as_ref()
    }

    /// Build the dataset from the configured column of `table`.
    pub fn process(&self, table: &SeriesTable) -> Result<LabelledImageDataset> {
        let series = table.column(&self.config.column)?;
        self.process_series(series)
    }

    /// Build the dataset from a bare series.
    pub fn process_series(&self, series: &[f64]) -> Result<LabelledImageDataset> {
        let config = &self.config;
        config.validate()?;
        validate_series(series)?;

        let alignment = Alignment::compute(
            series.len(),
            config.label_window,
            config.image_window,
            config.basis,
        )?;

        // Labels
        let labelled = self.labeler.label(series, config.label_window)?;
        if labelled.len() != series.len() {
            return Err(ImagingError::LabelCount {
                expected: series.len(),
                actual: labelled.len(),
            });
        }
        let encoded = LabelEncoder::encode(labelled.labels())?;
        let aligned_labels = encoded.slice(alignment.start, alignment.end);
        let price_at_image = Array1::from(alignment.slice(series).to_vec());

        // Images
        let source = alignment.image_source(series)?;
        let outputs = Dispatcher::new(config.transform_options()).run(
            &config.strategies,
            &source,
            config.image_window,
            alignment.len(),
        )?;
        let images = stack_images(outputs, config.channel_policy)?;

        let stats = aligned_labels.stats();
        let dataset = LabelledImageDataset {
            labelled,
            price_at_image,
            images,
            image_labels: aligned_labels.matrix,
            label_names: aligned_labels.names,
            alignment,
            config: config.clone(),
        };
        dataset.check_alignment()?;

        log::info!(
            "built dataset '{}' via {}: {} images {:?}, labels sell/buy/hold = {}/{}/{}",
            config.column,
            self.labeler.name(),
            dataset.len(),
            dataset.images.shape(),
            stats.sell_count,
            stats.buy_count,
            stats.hold_count
        );
        if stats.has_minority_class() {
            log::warn!(
                "label distribution for '{}' has a class below 10%: {:?}",
                config.column,
                stats.distribution()
            );
        }

        Ok(dataset)
    }
}

/// Build a labelled image dataset from `config.column` of `table` with the
/// default labeler.
///
/// # Errors
///
/// Any configuration, label-contract or shape error; no partial dataset is
/// ever returned.
pub fn data_to_labelled_images(
    table: &SeriesTable,
    config: &DatasetConfig,
) -> Result<LabelledImageDataset> {
    LabelledImagePipeline::from_config(config.clone())?.process(table)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::alignment::Basis;
    use crate::labeling::LabeledRecord;

    fn series(n: usize) -> Vec<f64> {
        (0..n)
            .map(|i| 50.0 + (i as f64 * 0.9).sin() * 3.0 + (i % 4) as f64 * 0.25)
            .collect()
    }

    struct RenamingLabeler;

    impl Labeler for RenamingLabeler {
        fn label(&self, series: &[f64], window_size: usize) -> Result<LabeledSeries> {
            let records = series
                .iter()
                .enumerate()
                .map(|(i, &v)| LabeledRecord::new(i, v, if i == 7 { "Short" } else { "Hold" }))
                .collect();
            Ok(LabeledSeries {
                records,
                window_size,
                original: series.to_vec(),
            })
        }

        fn name(&self) -> &str {
            "renaming"
        }
    }

    struct ShortLabeler;

    impl Labeler for ShortLabeler {
        fn label(&self, series: &[f64], window_size: usize) -> Result<LabeledSeries> {
            Ok(LabeledSeries {
                records: vec![LabeledRecord::new(0, series[0], "Hold")],
                window_size,
                original: series.to_vec(),
            })
        }

        fn name(&self) -> &str {
            "short"
        }
    }

    #[test]
    fn test_lengths_agree() {
        let config = DatasetConfig::new("Close", 5, 8, vec![ImageStrategy::Rp]);
        let pipeline = LabelledImagePipeline::from_config(config).unwrap();
        let dataset = pipeline.process_series(&series(30)).unwrap();

        assert_eq!(dataset.alignment.start, 7);
        assert_eq!(dataset.alignment.end, 28);
        assert_eq!(dataset.len(), 21);
        assert_eq!(dataset.images.shape(), vec![21, 8, 8]);
        assert_eq!(dataset.image_labels.shape(), &[21, 3]);
        assert_eq!(dataset.labelled.len(), 30);
        assert!(dataset.check_alignment().is_ok());
    }

    #[test]
    fn test_price_and_label_share_timestamp() {
        let values = series(30);
        let config = DatasetConfig::new("Close", 3, 6, vec![ImageStrategy::Gasf]);
        let dataset = LabelledImagePipeline::from_config(config)
            .unwrap()
            .process_series(&values)
            .unwrap();

        let actions = dataset.image_actions();
        for i in 0..dataset.len() {
            let t = dataset.alignment.image_timestamp(i);
            assert_eq!(dataset.price_at_image[i], values[t]);
            assert_eq!(actions[i].name(), dataset.labelled.records[t].label);
        }
    }

    #[test]
    fn test_returns_basis_shifts_start() {
        let values = series(30);
        let mut config = DatasetConfig::new("Close", 3, 6, vec![ImageStrategy::Gadf]);
        let price = data_to_labelled_images(&SeriesTable::from_column("Close", values.clone()), &config)
            .unwrap();
        config.basis = Basis::Returns;
        let returns =
            data_to_labelled_images(&SeriesTable::from_column("Close", values), &config).unwrap();

        assert_eq!(returns.alignment.start, price.alignment.start + 1);
        assert_eq!(returns.len() + 1, price.len());
        assert_eq!(returns.price_at_image[0], price.price_at_image[1]);
    }

    #[test]
    fn test_missing_column() {
        let table = SeriesTable::from_column("Open", series(20));
        let config = DatasetConfig::new("Close", 3, 5, vec![ImageStrategy::Rp]);
        assert!(matches!(
            data_to_labelled_images(&table, &config),
            Err(ImagingError::MissingColumn(ref c)) if c == "Close"
        ));
    }

    #[test]
    fn test_label_contract_violation() {
        let config = DatasetConfig::new("Close", 3, 5, vec![ImageStrategy::Rp]);
        let pipeline = LabelledImagePipeline::with_labeler(config, Box::new(RenamingLabeler));
        let err = pipeline.process_series(&series(20)).unwrap_err();
        assert!(matches!(
            err,
            ImagingError::LabelContract { index: 7, ref label } if label == "Short"
        ));
    }

    #[test]
    fn test_label_count_violation() {
        let config = DatasetConfig::new("Close", 3, 5, vec![ImageStrategy::Rp]);
        let pipeline = LabelledImagePipeline::with_labeler(config, Box::new(ShortLabeler));
        assert!(matches!(
            pipeline.process_series(&series(20)),
            Err(ImagingError::LabelCount {
                expected: 20,
                actual: 1
            })
        ));
    }

    #[test]
    fn test_non_finite_series() {
        let mut values = series(20);
        values[4] = f64::NAN;
        let config = DatasetConfig::new("Close", 3, 5, vec![ImageStrategy::Rp]);
        let pipeline = LabelledImagePipeline::from_config(config).unwrap();
        assert!(matches!(
            pipeline.process_series(&values),
            Err(ImagingError::InvalidSeries(_))
        ));
    }

    #[test]
    fn test_check_alignment_detects_mismatch() {
        let config = DatasetConfig::new("Close", 3, 5, vec![ImageStrategy::Rp]);
        let mut dataset = LabelledImagePipeline::from_config(config)
            .unwrap()
            .process_series(&series(20))
            .unwrap();
        dataset.price_at_image = Array1::zeros(3);
        assert!(matches!(
            dataset.check_alignment(),
            Err(ImagingError::AlignmentMismatch { prices: 3, .. })
        ));
    }

    #[test]
    fn test_into_parts() {
        let config = DatasetConfig::new("Close", 3, 5, vec![ImageStrategy::Mtf]);
        let dataset = LabelledImagePipeline::from_config(config)
            .unwrap()
            .process_series(&series(20))
            .unwrap();
        let n = dataset.len();
        let (labelled, prices, images, labels, names) = dataset.into_parts();
        assert_eq!(labelled.len(), 20);
        assert_eq!(prices.len(), n);
        assert_eq!(images.num_images(), n);
        assert_eq!(labels.nrows(), n);
        assert_eq!(names, LabelNameMap::canonical());
    }

    #[test]
    fn test_label_stats_cover_aligned_range() {
        let config = DatasetConfig::new("Close", 3, 5, vec![ImageStrategy::Rp]);
        let dataset = LabelledImagePipeline::from_config(config)
            .unwrap()
            .process_series(&series(40))
            .unwrap();
        assert_eq!(dataset.label_stats().total, dataset.len());
    }
}

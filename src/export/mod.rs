//! Data Export Module
//!
//! Writes a [`LabelledImageDataset`] to NumPy arrays plus JSON metadata for
//! training an image classifier in Python.
//!
//! # Files
//!
//! | File | dtype | Shape |
//! |------|-------|-------|
//! | `{name}_images.npy` | f64 | (n, H, W) or (n, H, W, k) |
//! | `{name}_labels.npy` | u8 | (n, 3), columns Sell/Buy/Hold |
//! | `{name}_prices.npy` | f64 | (n,) |
//! | `{name}_metadata.json` | - | [`ExportMetadata`] |
//!
//! # Example
//!
//! ```no_run
//! use labelled_image::prelude::*;
//!
//! # fn run(dataset: &LabelledImageDataset) -> labelled_image::Result<()> {
//! let exporter = NumpyExporter::new("output/datasets");
//! let metadata = exporter.export("aapl_close", dataset)?;
//! println!("exported {} images", metadata.n_images);
//! # Ok(())
//! # }
//! ```

use crate::alignment::Basis;
use crate::config::DatasetConfig;
use crate::error::Result;
use crate::pipeline::LabelledImageDataset;
use crate::stacking::ImageTensor;
use crate::transform::ImageStrategy;
use ndarray_npy::WriteNpyExt;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs::{self, File};
use std::io::BufWriter;
use std::path::{Path, PathBuf};

/// Metadata about an exported dataset
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExportMetadata {
    /// Dataset name (file prefix)
    pub name: String,

    /// Number of aligned images / labels / prices
    pub n_images: usize,

    /// Full image tensor shape
    pub image_shape: Vec<usize>,

    /// Strategies in channel order
    pub strategies: Vec<ImageStrategy>,

    /// One-hot column → category name
    pub label_names: BTreeMap<usize, String>,

    /// Aligned label counts by category name
    pub label_distribution: BTreeMap<String, usize>,

    /// Imaging basis
    pub basis: Basis,

    /// First original-series index of the aligned range
    pub start: usize,

    /// One past the last original-series index of the aligned range
    pub end: usize,

    /// Length of the original series
    pub series_len: usize,

    /// Configuration the dataset was built with
    pub config: DatasetConfig,

    /// Export timestamp (RFC 3339)
    pub export_timestamp: String,
}

impl ExportMetadata {
    /// Describe `dataset` as exported under `name` now.
    pub fn from_dataset(name: &str, dataset: &LabelledImageDataset) -> Self {
        Self {
            name: name.to_string(),
            n_images: dataset.len(),
            image_shape: dataset.images.shape(),
            strategies: dataset.strategies().to_vec(),
            label_names: dataset.label_names.to_names(),
            label_distribution: dataset.label_stats().distribution(),
            basis: dataset.alignment.basis,
            start: dataset.alignment.start,
            end: dataset.alignment.end,
            series_len: dataset.alignment.series_len,
            config: dataset.config.clone(),
            export_timestamp: chrono::Utc::now().to_rfc3339(),
        }
    }
}

/// NumPy exporter - exports to .npy files for Python
pub struct NumpyExporter {
    output_dir: PathBuf,
}

impl NumpyExporter {
    /// Create new NumPy exporter
    pub fn new<P: AsRef<Path>>(output_dir: P) -> Self {
        Self {
            output_dir: output_dir.as_ref().to_path_buf(),
        }
    }

    /// Output directory.
    pub fn output_dir(&self) -> &Path {
        &self.output_dir
    }

    /// Path of `{name}_{suffix}` inside the output directory.
    pub fn path_for(&self, name: &str, suffix: &str) -> PathBuf {
        self.output_dir.join(format!("{name}_{suffix}"))
    }

    /// Export a dataset under `name`.
    ///
    /// The dataset's alignment is re-checked first; nothing is written for a
    /// misaligned dataset.
    pub fn export(&self, name: &str, dataset: &LabelledImageDataset) -> Result<ExportMetadata> {
        dataset.check_alignment()?;
        fs::create_dir_all(&self.output_dir)?;

        self.export_images(name, &dataset.images)?;

        let labels_path = self.path_for(name, "labels.npy");
        dataset
            .image_labels
            .write_npy(BufWriter::new(File::create(&labels_path)?))?;

        let prices_path = self.path_for(name, "prices.npy");
        dataset
            .price_at_image
            .write_npy(BufWriter::new(File::create(&prices_path)?))?;

        let metadata = ExportMetadata::from_dataset(name, dataset);
        let metadata_path = self.path_for(name, "metadata.json");
        serde_json::to_writer_pretty(BufWriter::new(File::create(&metadata_path)?), &metadata)?;

        log::info!(
            "exported '{}' to {}: images {:?}, labels {:?}",
            name,
            self.output_dir.display(),
            metadata.image_shape,
            dataset.image_labels.shape()
        );

        Ok(metadata)
    }

    fn export_images(&self, name: &str, images: &ImageTensor) -> Result<()> {
        let path = self.path_for(name, "images.npy");
        let writer = BufWriter::new(File::create(&path)?);
        match images {
            ImageTensor::Single(arr) => arr.write_npy(writer)?,
            ImageTensor::Stacked(arr) => arr.write_npy(writer)?,
        }
        log::debug!("wrote {} {:?}", path.display(), images.shape());
        Ok(())
    }
}

/// Convenience function for direct export
pub fn export_to_numpy<P: AsRef<Path>>(
    dataset: &LabelledImageDataset,
    name: &str,
    output_dir: P,
) -> Result<ExportMetadata> {
    NumpyExporter::new(output_dir).export(name, dataset)
}

//! Prelude module for convenient imports.
//!
//! # Usage
//!
//! ```
//! use labelled_image::prelude::*;
//!
//! let config = DatasetConfig::new("Close", 5, 20, vec![ImageStrategy::Gadf]);
//! let pipeline = LabelledImagePipeline::from_config(config).unwrap();
//! assert_eq!(pipeline.labeler().name(), "local_extrema");
//! ```
//!
//! # What's Included
//!
//! ## Core Pipeline
//! - [`LabelledImagePipeline`] - Configured dataset builder
//! - [`LabelledImageDataset`] - Aligned images, labels and prices
//! - [`data_to_labelled_images`] - One-call entry point
//! - [`DatasetConfig`] / [`DatasetBuilder`] - Configuration
//!
//! ## Inputs
//! - [`SeriesTable`] - Named numeric columns
//!
//! ## Labeling
//! - [`Labeler`] - Labelling seam
//! - [`LocalExtremaLabeler`] - Default labeler
//! - [`TradeAction`] - Label enum (Sell, Buy, Hold)
//! - [`LabelNameMap`] - One-hot column names
//!
//! ## Images
//! - [`ImageStrategy`] - Encoding tags
//! - [`ImageTensor`] - Output tensor
//! - [`ChannelPolicy`] - Mixed image size handling
//! - [`Basis`] - Price or returns
//!
//! ## Export
//! - [`NumpyExporter`] - Export to NumPy format

pub use crate::alignment::{Alignment, Basis};
pub use crate::builder::DatasetBuilder;
pub use crate::config::DatasetConfig;
pub use crate::error::{ErrorKind, ImagingError, Result};
pub use crate::export::{ExportMetadata, NumpyExporter};
pub use crate::labeling::{
    LabelNameMap, LabelStats, LabeledRecord, LabeledSeries, Labeler, LocalExtremaLabeler,
    TradeAction,
};
pub use crate::pipeline::{data_to_labelled_images, LabelledImageDataset, LabelledImagePipeline};
pub use crate::series::SeriesTable;
pub use crate::stacking::{ChannelPolicy, ImageTensor};
pub use crate::transform::{ImageStrategy, TransformOptions};

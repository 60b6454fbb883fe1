//! Labelled Image
//!
//! Turn a single price series into a supervised image-classification dataset:
//! windowed image encodings of the series paired with Sell / Buy / Hold
//! labels, all aligned to the same timestamp.
//!
//! # Overview
//!
//! - **Labels**: local extrema in a centred window of odd size `L`
//! - **Images**: Gramian angular fields (GASF / GADF), recurrence plots and
//!   Markov transition fields over windows of `W` values
//! - **Alignment**: one `[start, end)` bound shared by images, labels and
//!   prices, for either the raw series or its one-step returns
//! - **Stacking**: several encodings become channels-last tensors in request order
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────┐
//! │                      Labelled Image                             │
//! ├─────────────────────────────────────────────────────────────────┤
//! │  series/        - Input column table and series checks          │
//! │  labeling/      - Labeler seam, local extrema, one-hot encoder  │
//! │  alignment      - Shared slice bounds for both bases            │
//! │  transform/     - GASF, GADF, RP, MTF and the dispatcher        │
//! │  stacking       - Single or channels-last image tensors         │
//! │  pipeline       - End-to-end dataset assembly                   │
//! │  export/        - NumPy export for Python                       │
//! │  batch          - Parallel columns (feature `parallel`)         │
//! └─────────────────────────────────────────────────────────────────┘
//! ```
//!
//! # Example
//!
//! ```
//! use labelled_image::prelude::*;
//!
//! let values: Vec<f64> = (0..40).map(|i| 100.0 + (i as f64 * 0.3).sin()).collect();
//! let table = SeriesTable::from_column("Close", values);
//!
//! let pipeline = DatasetBuilder::new("Close")
//!     .windows(3, 14)
//!     .strategy(ImageStrategy::Rp)
//!     .build()?;
//!
//! let dataset = pipeline.process(&table)?;
//! assert_eq!(dataset.images.shape(), vec![26, 14, 14]);
//! # Ok::<(), labelled_image::ImagingError>(())
//! ```

pub mod alignment;
#[cfg(feature = "parallel")]
pub mod batch;
pub mod builder;
pub mod config;
pub mod error;
pub mod export;
pub mod labeling;
pub mod pipeline;
pub mod prelude;
pub mod preprocessing;
pub mod series;
pub mod stacking;
pub mod transform;

// Re-exports - Errors
pub use error::{ErrorKind, ImagingError, Result};

// Re-exports - Config
pub use builder::DatasetBuilder;
pub use config::DatasetConfig;

// Re-exports - Core
pub use alignment::{Alignment, Basis};
pub use series::SeriesTable;
pub use stacking::{stack_images, ChannelPolicy, ImageTensor};
pub use transform::{
    parse_strategies, Dispatcher, ImageStrategy, ImageTransform, StrategyImages,
    TransformOptions,
};

// Re-exports - Labeling
pub use labeling::{
    LabelEncoder, LabelNameMap, LabelStats, LabeledRecord, LabeledSeries, Labeler,
    LocalExtremaLabeler, OneHotLabels, TradeAction,
};

// Re-exports - Export
pub use export::{export_to_numpy, ExportMetadata, NumpyExporter};

// Re-exports - Pipeline
pub use pipeline::{data_to_labelled_images, LabelledImageDataset, LabelledImagePipeline};

//! Parallel dataset building for several columns of one table.
//!
//! Each column gets its own [`LabelledImagePipeline`] run on a local Rayon
//! thread pool. Every run is still the single-threaded pure function of the
//! sequential pipeline; the only shared data is the read-only input table.
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────┐
//! │                 process_columns                      │
//! │  ┌────────────────────────────────────────────────┐  │
//! │  │              Rayon Thread Pool                 │  │
//! │  │                                                │  │
//! │  │  Thread 1        Thread 2        Thread N      │  │
//! │  │  "Close"         "Open"          "High"        │  │
//! │  │     │               │               │          │  │
//! │  │     ▼               ▼               ▼          │  │
//! │  │  ColumnResult   ColumnResult   ColumnError     │  │
//! │  └──────────────────────┬─────────────────────────┘  │
//! │                         ▼                            │
//! │                    BatchOutput                       │
//! └──────────────────────────────────────────────────────┘
//! ```
//!
//! # Example
//!
//! ```
//! use labelled_image::batch::{process_columns, BatchConfig, ErrorMode};
//! use labelled_image::prelude::*;
//!
//! let close: Vec<f64> = (0..40).map(|i| 10.0 + (i as f64 * 0.5).sin()).collect();
//! let open: Vec<f64> = close.iter().map(|v| v + 0.1).collect();
//! let table = SeriesTable::from_column("Close", close)
//!     .with_column("Open", open)
//!     .unwrap();
//!
//! let config = DatasetConfig::new("Close", 3, 10, vec![ImageStrategy::Rp]);
//! let batch = BatchConfig::new()
//!     .with_threads(2)
//!     .with_error_mode(ErrorMode::CollectErrors);
//!
//! let output = process_columns(&table, &["Close", "Open"], &config, &batch).unwrap();
//! assert_eq!(output.successful_count(), 2);
//! ```

use crate::config::DatasetConfig;
use crate::error::{ImagingError, Result};
use crate::pipeline::{LabelledImageDataset, LabelledImagePipeline};
use crate::series::SeriesTable;
use rayon::prelude::*;
use std::time::{Duration, Instant};

// ============================================================================
// Configuration
// ============================================================================

/// Error handling mode for batch processing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ErrorMode {
    /// Return the first failing column's error (default).
    #[default]
    FailFast,

    /// Keep the successful columns and report the failures alongside.
    CollectErrors,
}

/// Configuration for batch processing.
#[derive(Debug, Clone, Default)]
pub struct BatchConfig {
    /// Number of threads to use.
    ///
    /// - `None`: Use Rayon default (typically num_cpus)
    /// - `Some(n)`: Use exactly n threads
    pub num_threads: Option<usize>,

    /// How to handle errors during processing.
    pub error_mode: ErrorMode,

    /// Stack size per thread in bytes (advanced).
    pub stack_size: Option<usize>,
}

impl BatchConfig {
    /// Create a new batch configuration with defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the number of threads to use (at least one).
    pub fn with_threads(mut self, threads: usize) -> Self {
        self.num_threads = Some(threads.max(1));
        self
    }

    /// Set the error handling mode.
    pub fn with_error_mode(mut self, mode: ErrorMode) -> Self {
        self.error_mode = mode;
        self
    }

    /// Set custom stack size per thread (advanced).
    pub fn with_stack_size(mut self, size: usize) -> Self {
        self.stack_size = Some(size);
        self
    }

    /// Get effective thread count.
    pub fn effective_threads(&self) -> usize {
        self.num_threads.unwrap_or_else(rayon::current_num_threads)
    }
}

// ============================================================================
// Results
// ============================================================================

/// Dataset built for one column.
#[derive(Debug)]
pub struct ColumnResult {
    /// Column name.
    pub column: String,

    /// Aligned dataset.
    pub dataset: LabelledImageDataset,

    /// Processing time for this column.
    pub elapsed: Duration,

    /// Thread that processed this column (for debugging).
    pub thread_id: usize,
}

/// Failure for one column.
#[derive(Debug)]
pub struct ColumnError {
    /// Column name.
    pub column: String,

    /// What went wrong.
    pub error: ImagingError,
}

/// Aggregated results from batch processing, in requested column order.
#[derive(Debug)]
pub struct BatchOutput {
    /// Successfully processed columns.
    pub results: Vec<ColumnResult>,

    /// Failed columns (only populated with [`ErrorMode::CollectErrors`]).
    pub errors: Vec<ColumnError>,

    /// Total processing time (wall clock).
    pub elapsed: Duration,

    /// Number of threads used.
    pub threads_used: usize,
}

impl BatchOutput {
    /// Get count of successfully processed columns.
    pub fn successful_count(&self) -> usize {
        self.results.len()
    }

    /// Get count of failed columns.
    pub fn failed_count(&self) -> usize {
        self.errors.len()
    }

    /// Check if all columns were processed successfully.
    pub fn all_successful(&self) -> bool {
        self.errors.is_empty()
    }

    /// Total number of images across all columns.
    pub fn total_images(&self) -> usize {
        self.results.iter().map(|r| r.dataset.len()).sum()
    }

    /// Dataset for `column`, if it succeeded.
    pub fn dataset(&self, column: &str) -> Option<&LabelledImageDataset> {
        self.results
            .iter()
            .find(|r| r.column == column)
            .map(|r| &r.dataset)
    }
}

// ============================================================================
// Processing
// ============================================================================

/// Build one dataset per entry of `columns`, in parallel.
///
/// `config.column` is ignored; every other parameter is shared.
///
/// # Errors
///
/// With [`ErrorMode::FailFast`], the error of the first failing column (in
/// `columns` order). An invalid `config` fails before any work is scheduled.
pub fn process_columns<S: AsRef<str> + Sync>(
    table: &SeriesTable,
    columns: &[S],
    config: &DatasetConfig,
    batch_config: &BatchConfig,
) -> Result<BatchOutput> {
    let start = Instant::now();
    let threads_used = batch_config.effective_threads();

    config.validate()?;

    // Local pool so different calls may use different thread counts.
    let mut pool_builder = rayon::ThreadPoolBuilder::new().num_threads(threads_used);
    if let Some(stack_size) = batch_config.stack_size {
        pool_builder = pool_builder.stack_size(stack_size);
    }
    let pool = pool_builder.build().map_err(|e| {
        ImagingError::InvalidConfig(format!("failed to create thread pool: {e}"))
    })?;

    let outcomes: Vec<std::result::Result<ColumnResult, ColumnError>> = pool.install(|| {
        columns
            .par_iter()
            .map(|column| process_single_column(table, column.as_ref(), config))
            .collect()
    });

    let mut results = Vec::new();
    let mut errors = Vec::new();
    for outcome in outcomes {
        match outcome {
            Ok(result) => results.push(result),
            Err(failure) => {
                if batch_config.error_mode == ErrorMode::FailFast {
                    return Err(failure.error);
                }
                log::warn!("column '{}' failed: {}", failure.column, failure.error);
                errors.push(failure);
            }
        }
    }

    let output = BatchOutput {
        results,
        errors,
        elapsed: start.elapsed(),
        threads_used,
    };
    log::info!(
        "batch: {} columns ok, {} failed, {} images in {:?} on {} threads",
        output.successful_count(),
        output.failed_count(),
        output.total_images(),
        output.elapsed,
        threads_used
    );

    Ok(output)
}

/// Process a single column (called from the thread pool).
fn process_single_column(
    table: &SeriesTable,
    column: &str,
    config: &DatasetConfig,
) -> std::result::Result<ColumnResult, ColumnError> {
    let start = Instant::now();

    let column_config = DatasetConfig {
        column: column.to_string(),
        ..config.clone()
    };

    LabelledImagePipeline::from_config(column_config)
        .and_then(|pipeline| pipeline.process(table))
        .map(|dataset| ColumnResult {
            column: column.to_string(),
            dataset,
            elapsed: start.elapsed(),
            thread_id: rayon::current_thread_index().unwrap_or(0),
        })
        .map_err(|error| ColumnError {
            column: column.to_string(),
            error,
        })
}

// ============================================================================
// Tests
// ============================================================================

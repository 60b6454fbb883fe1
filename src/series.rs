//! Input series table.
//!
//! A minimal column store: each column is a named, ordered sequence of `f64`
//! values sharing one time index. The pipeline only ever reads from it.
//!
//! # Example
//!
//! ```
//! use labelled_image::series::SeriesTable;
//!
//! let table = SeriesTable::new()
//!     .with_column("Close", vec![100.0, 101.0, 100.5])
//!     .unwrap();
//!
//! assert_eq!(table.len(), 3);
//! assert_eq!(table.column("Close").unwrap()[1], 101.0);
//! ```

use crate::error::{ImagingError, Result};

/// Named numeric columns over a shared index.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SeriesTable {
    columns: Vec<(String, Vec<f64>)>,
}

impl SeriesTable {
    /// Create an empty table.
    pub fn new() -> Self {
        Self::default()
    }

    /// Single-column table.
    pub fn from_column(name: &str, values: Vec<f64>) -> Self {
        Self {
            columns: vec![(name.to_string(), values)],
        }
    }

    /// Add a column (builder pattern).
    ///
    /// Fails if the column length differs from existing columns. A column
    /// with an existing name replaces it.
    pub fn with_column(mut self, name: &str, values: Vec<f64>) -> Result<Self> {
        if let Some((_, first)) = self.columns.iter().find(|(n, _)| n != name) {
            if first.len() != values.len() {
                return Err(ImagingError::InvalidSeries(format!(
                    "column '{}' has {} rows, table has {}",
                    name,
                    values.len(),
                    first.len()
                )));
            }
        }

        match self.columns.iter_mut().find(|(n, _)| n == name) {
            Some((_, existing)) => *existing = values,
            None => self.columns.push((name.to_string(), values)),
        }
        Ok(self)
    }

    /// Values of the named column.
    pub fn column(&self, name: &str) -> Result<&[f64]> {
        self.columns
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, v)| v.as_slice())
            .ok_or_else(|| ImagingError::MissingColumn(name.to_string()))
    }

    /// Column names in insertion order.
    pub fn column_names(&self) -> impl Iterator<Item = &str> {
        self.columns.iter().map(|(n, _)| n.as_str())
    }

    /// Number of rows.
    pub fn len(&self) -> usize {
        self.columns.first().map_or(0, |(_, v)| v.len())
    }

    /// True if the table has no rows.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Reject empty series and NaN/Inf values.
pub fn validate_series(values: &[f64]) -> Result<()> {
    if values.is_empty() {
        return Err(ImagingError::InvalidSeries("series is empty".to_string()));
    }
    if let Some(idx) = values.iter().position(|v| !v.is_finite()) {
        return Err(ImagingError::InvalidSeries(format!(
            "non-finite value {} at index {}",
            values[idx], idx
        )));
    }
    Ok(())
}

/// One-step simple returns: `r[t-1] = v[t] / v[t-1] - 1`, length `N - 1`.
///
/// A zero price would make the following return infinite, so it is rejected.
pub fn simple_returns(values: &[f64]) -> Result<Vec<f64>> {
    values
        .windows(2)
        .enumerate()
        .map(|(i, pair)| {
            if pair[0] == 0.0 {
                Err(ImagingError::InvalidSeries(format!(
                    "zero value at index {i} makes the return at index {} undefined",
                    i + 1
                )))
            } else {
                Ok(pair[1] / pair[0] - 1.0)
            }
        })
        .collect()
}

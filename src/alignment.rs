//! Alignment of image windows with centred label windows.
//!
//! Images, labels and prices must refer to the same timestamp. This module
//! computes the single `[start, end)` range over the original series that
//! every output is sliced with.
//!
//! # Index Arithmetic
//!
//! With series length `N`, label window `L` (odd), `h = floor(L/2)` and image
//! window `W`:
//!
//! ```text
//! Price basis:    image i covers values[i .. i+W]        → ends at t = i + W - 1
//!                 start = W - 1
//! Returns basis:  image i covers returns[i .. i+W]       → return r ends at t = r + 1
//!                 start = W
//! Both:           end   = N - h   (label centre never runs past the series end)
//! ```
//!
//! Transforms see the image source truncated by `h` trailing values, so they
//! produce exactly `end - start` images:
//!
//! ```text
//! trimmed_len = (N - offset) - h          offset = 0 (price) / 1 (returns)
//! images      = trimmed_len - W + 1 = end - start
//! ```
//!
//! # Example
//!
//! ```
//! use labelled_image::alignment::{Alignment, Basis};
//!
//! let price = Alignment::compute(40, 3, 14, Basis::Price).unwrap();
//! assert_eq!((price.start, price.end), (13, 39));
//! assert_eq!(price.len(), 26);
//!
//! let returns = Alignment::compute(40, 3, 14, Basis::Returns).unwrap();
//! assert_eq!(returns.start, price.start + 1);
//! assert_eq!(returns.end, price.end);
//! ```

use crate::error::{ImagingError, Result};
use crate::series::simple_returns;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Which series the image transforms consume.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Basis {
    /// Images built from the raw series values.
    #[default]
    Price,

    /// Images built from one-step simple returns (one value shorter).
    Returns,
}

impl Basis {
    /// `Returns` when `use_returns` is set.
    pub fn from_use_returns(use_returns: bool) -> Self {
        if use_returns {
            Basis::Returns
        } else {
            Basis::Price
        }
    }

    /// Leading values lost when deriving the image source.
    #[inline]
    pub fn offset(&self) -> usize {
        match self {
            Basis::Price => 0,
            Basis::Returns => 1,
        }
    }
}

impl fmt::Display for Basis {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Basis::Price => write!(f, "price"),
            Basis::Returns => write!(f, "returns"),
        }
    }
}

/// Shared slice bounds for images, labels and prices.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Alignment {
    /// First original-series index with both an image and a label.
    pub start: usize,

    /// One past the last usable index.
    pub end: usize,

    /// Imaging basis the bounds were computed for.
    pub basis: Basis,

    /// Label window size (L).
    pub label_window: usize,

    /// Image window size (W).
    pub image_window: usize,

    /// Length of the original series (N).
    pub series_len: usize,
}

impl Alignment {
    /// Compute and validate the aligned range.
    ///
    /// # Errors
    ///
    /// Configuration errors, in check order:
    /// - [`ImagingError::InvalidLabelWindow`]: `L` zero or even
    /// - [`ImagingError::LabelWindowExceedsSeries`]: `L > N`
    /// - [`ImagingError::InvalidImageWindow`]: `W == 0`
    /// - [`ImagingError::ImageWindowTooSmall`]: `W < ceil(L/2)`
    /// - [`ImagingError::ImageWindowExceedsSeries`]: `W` longer than the trimmed image source
    pub fn compute(
        series_len: usize,
        label_window: usize,
        image_window: usize,
        basis: Basis,
    ) -> Result<Self> {
        if label_window == 0 || label_window % 2 == 0 {
            return Err(ImagingError::InvalidLabelWindow(label_window));
        }
        if label_window > series_len {
            return Err(ImagingError::LabelWindowExceedsSeries {
                label_window,
                series_len,
            });
        }
        if image_window == 0 {
            return Err(ImagingError::InvalidImageWindow);
        }

        let required = label_window.div_ceil(2);
        if image_window < required {
            return Err(ImagingError::ImageWindowTooSmall {
                image_window,
                label_window,
                required,
            });
        }

        let half = label_window / 2;
        let effective_len = (series_len - half).saturating_sub(basis.offset());
        if image_window > effective_len {
            return Err(ImagingError::ImageWindowExceedsSeries {
                image_window,
                effective_len,
            });
        }

        let alignment = Self {
            start: image_window - 1 + basis.offset(),
            end: series_len - half,
            basis,
            label_window,
            image_window,
            series_len,
        };

        log::debug!(
            "aligned {} basis: N={} L={} W={} -> [{}, {}) ({} images)",
            basis,
            series_len,
            label_window,
            image_window,
            alignment.start,
            alignment.end,
            alignment.len()
        );

        Ok(alignment)
    }

    /// Number of aligned images / labels / prices.
    #[inline]
    pub fn len(&self) -> usize {
        self.end - self.start
    }

    /// Never true for a successfully computed alignment.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.end == self.start
    }

    /// `floor(L / 2)`: trailing values dropped from the image source.
    #[inline]
    pub fn half_label_window(&self) -> usize {
        self.label_window / 2
    }

    /// Length of the series handed to the transforms.
    #[inline]
    pub fn trimmed_len(&self) -> usize {
        self.series_len - self.basis.offset() - self.half_label_window()
    }

    /// Original-series index the `i`-th image ends on.
    #[inline]
    pub fn image_timestamp(&self, i: usize) -> usize {
        self.start + i
    }

    /// Slice any per-timestamp column of the original series to `[start, end)`.
    ///
    /// # Panics
    ///
    /// If `values` is shorter than `end`.
    pub fn slice<'a, T>(&self, values: &'a [T]) -> &'a [T] {
        &values[self.start..self.end]
    }

    /// Build the series the transforms consume: the first `end` values,
    /// returns-derived if required. Either way the result has `trimmed_len()`
    /// values.
    pub fn image_source(&self, series: &[f64]) -> Result<Vec<f64>> {
        if series.len() != self.series_len {
            return Err(ImagingError::InvalidSeries(format!(
                "series has {} values, alignment was computed for {}",
                series.len(),
                self.series_len
            )));
        }

        // Values past `end` only feed labels, never images.
        let kept = &series[..self.end];
        match self.basis {
            Basis::Price => Ok(kept.to_vec()),
            Basis::Returns => simple_returns(kept),
        }
    }

    /// Number of sliding windows of `image_window` over the image source.
    #[inline]
    pub fn expected_images(&self) -> usize {
        self.trimmed_len() + 1 - self.image_window
    }
}
